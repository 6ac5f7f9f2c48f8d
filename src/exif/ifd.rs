//! Image File Directory traversal.
//!
//! Directories are walked from an explicit work queue rather than by
//! recursion. An offset is marked visited when it is queued, in a set shared
//! by the IFD chain and all sub-directories, so each distinct directory is
//! queued at most once and a pointer back to one already seen ends that
//! branch. Entry reads draw from a budget of `buffer length / 12`, which no
//! well-formed file can exceed since its directories never overlap. Together
//! these keep the walk linear in the size of the input.

use std::collections::{HashSet, VecDeque};

use super::cursor::ByteCursor;
use super::document::ExifDocument;
use super::header::TiffHeader;
use super::tags::{IfdEntry, TagDecoder, TagScope, pointer_rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingDirectory {
    /// TIFF-relative offset.
    offset: u32,
    scope: TagScope,
    /// Whether the trailing next-IFD offset is followed. Only the IFD0 chain is.
    chained: bool,
}

/// What a walk went through, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WalkSummary {
    /// Directories whose entries were read.
    pub directories: usize,
    /// Entries read across all directories.
    pub entries: usize,
    /// Directories abandoned because their entries ran past the buffer.
    pub truncated: usize,
    /// Pointers that led back to an already queued or visited directory.
    pub cycles: usize,
    /// Directories skipped because the entry budget was spent.
    pub over_budget: usize,
    /// Document fields filled in.
    pub fields: usize,
}

/// Mutable state of one walk.
struct WalkState {
    queue: VecDeque<PendingDirectory>,
    visited: HashSet<u32>,
    entries_left: usize,
    summary: WalkSummary,
}

impl WalkState {
    fn enqueue(&mut self, dir: PendingDirectory) {
        if self.visited.insert(dir.offset) {
            self.queue.push_back(dir);
        } else {
            log::debug!("directory at {} already seen, branch stopped", dir.offset);
            self.summary.cycles += 1;
        }
    }
}

pub(crate) struct IfdWalker<'a> {
    cursor: ByteCursor<'a>,
    header: TiffHeader,
    decoder: TagDecoder<'a>,
    entry_budget: usize,
}

impl<'a> IfdWalker<'a> {
    pub fn new(data: &'a [u8], header: TiffHeader) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            header,
            decoder: TagDecoder::new(data, header),
            entry_budget: data.len() / IfdEntry::SIZE,
        }
    }

    /// Walk IFD0, its chain and any Exif/GPS sub-directories, filling `doc`.
    pub fn walk(&self, doc: &mut ExifDocument) -> WalkSummary {
        let mut state = WalkState {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            entries_left: self.entry_budget,
            summary: WalkSummary::default(),
        };

        if self.header.first_ifd_offset != 0 {
            state.enqueue(PendingDirectory {
                offset: self.header.first_ifd_offset,
                scope: TagScope::Image,
                chained: true,
            });
        }

        while let Some(dir) = state.queue.pop_front() {
            self.visit(dir, doc, &mut state);
        }

        state.summary
    }

    fn visit(&self, dir: PendingDirectory, doc: &mut ExifDocument, state: &mut WalkState) {
        let order = self.header.byte_order;
        let Some(pos) = self
            .header
            .absolute(dir.offset)
            .filter(|&pos| self.cursor.has(pos, 2))
        else {
            log::debug!("directory offset {} lies outside the buffer", dir.offset);
            state.summary.truncated += 1;
            return;
        };

        let count = self.cursor.read_u16(pos, order) as usize;
        let entries_start = pos + 2;
        if !self.cursor.has(entries_start, count * IfdEntry::SIZE) {
            log::debug!(
                "directory at {} declares {count} entries but the buffer ends first",
                dir.offset
            );
            state.summary.truncated += 1;
            return;
        }
        if count > state.entries_left {
            log::debug!(
                "directory at {} skipped: {count} entries, {} left in budget",
                dir.offset,
                state.entries_left
            );
            state.summary.over_budget += 1;
            return;
        }
        state.entries_left -= count;
        state.summary.directories += 1;
        state.summary.entries += count;

        for i in 0..count {
            let entry = IfdEntry::read(&self.cursor, entries_start + i * IfdEntry::SIZE, order);

            if dir.scope == TagScope::Image {
                if let Some(rule) = pointer_rule(entry.tag) {
                    match self.decoder.pointer_offset(&entry) {
                        Some(offset) if offset != 0 => state.enqueue(PendingDirectory {
                            offset,
                            scope: rule.scope,
                            chained: false,
                        }),
                        _ => log::trace!("{}: unusable pointer, skipped", rule.name),
                    }
                    continue;
                }
            }

            if self.decoder.decode_into(&entry, dir.scope, doc) {
                state.summary.fields += 1;
            }
        }

        if dir.chained {
            // A missing next-offset reads as 0 and ends the chain.
            let next = self
                .cursor
                .read_u32(entries_start + count * IfdEntry::SIZE, order);
            if next != 0 {
                state.enqueue(PendingDirectory {
                    offset: next,
                    scope: TagScope::Image,
                    chained: true,
                });
            }
        }
    }
}
