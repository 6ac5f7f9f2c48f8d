//! Directory entries and the table of tags this crate understands.
//!
//! Each recognized tag is one row in [`TAG_RULES`]: the directory it may
//! appear in, the kind of value it carries, and the [`ExifDocument`] field it
//! fills. Anything not in the table is skipped.

use super::cursor::{ByteCursor, ByteOrder};
use super::document::ExifDocument;
use super::header::TiffHeader;

pub(crate) const EXIF_IFD_POINTER: u16 = 0x8769;
pub(crate) const GPS_IFD_POINTER: u16 = 0x8825;

/// TIFF field types relevant here. Everything else is carried as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldType {
    Ascii,
    Short,
    Long,
    Rational,
    Other(u16),
}

impl FieldType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            other => Self::Other(other),
        }
    }
}

/// One 12-byte directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IfdEntry {
    pub tag: u16,
    pub field_type: FieldType,
    pub count: u32,
    /// The 4-byte value slot read as a `u32` in file byte order.
    pub value_offset: u32,
    /// Absolute buffer position of the value slot, for inline values.
    pub slot: usize,
}

impl IfdEntry {
    pub const SIZE: usize = 12;

    /// Read the entry starting at absolute position `pos`.
    pub fn read(cursor: &ByteCursor<'_>, pos: usize, order: ByteOrder) -> Self {
        Self {
            tag: cursor.read_u16(pos, order),
            field_type: FieldType::from_u16(cursor.read_u16(pos + 2, order)),
            count: cursor.read_u32(pos + 4, order),
            value_offset: cursor.read_u32(pos + 8, order),
            slot: pos + 8,
        }
    }
}

/// Which family of tags a directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TagScope {
    /// IFD0, its chained successors and the Exif sub-directory.
    Image,
    /// The GPS sub-directory; tag numbers overlap with `Image`.
    Gps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    /// Short or Long, single value.
    Dimension,
    /// ASCII kept as stored.
    Text,
    /// ASCII `YYYY:MM:DD HH:MM:SS` reduced to `YYYY-MM-DD`.
    CaptureDate,
    /// Three rationals (hour, minute, second) rendered as `HH:MM:SS`.
    TimeOfDay,
}

impl ValueKind {
    fn accepts(self, field_type: FieldType) -> bool {
        match self {
            Self::Dimension => matches!(field_type, FieldType::Short | FieldType::Long),
            Self::Text | Self::CaptureDate => field_type == FieldType::Ascii,
            Self::TimeOfDay => field_type == FieldType::Rational,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Target {
    Number(fn(&mut ExifDocument) -> &mut u32),
    Text(fn(&mut ExifDocument) -> &mut String),
}

pub(crate) struct TagRule {
    pub tag: u16,
    pub name: &'static str,
    pub scope: TagScope,
    pub kind: ValueKind,
    pub target: Target,
}

fn width(doc: &mut ExifDocument) -> &mut u32 {
    &mut doc.width
}
fn height(doc: &mut ExifDocument) -> &mut u32 {
    &mut doc.height
}
fn camera_make(doc: &mut ExifDocument) -> &mut String {
    &mut doc.camera_make
}
fn camera_model(doc: &mut ExifDocument) -> &mut String {
    &mut doc.camera_model
}
fn date_time(doc: &mut ExifDocument) -> &mut String {
    &mut doc.date_time
}
fn date_taken(doc: &mut ExifDocument) -> &mut String {
    &mut doc.date_taken
}
fn date_digitized(doc: &mut ExifDocument) -> &mut String {
    &mut doc.date_digitized
}
fn gps_date_stamp(doc: &mut ExifDocument) -> &mut String {
    &mut doc.gps_date_stamp
}
fn gps_time_stamp(doc: &mut ExifDocument) -> &mut String {
    &mut doc.gps_time_stamp
}

pub(crate) static TAG_RULES: &[TagRule] = &[
    TagRule { tag: 0x0100, name: "ImageWidth", scope: TagScope::Image, kind: ValueKind::Dimension, target: Target::Number(width) },
    TagRule { tag: 0x0101, name: "ImageLength", scope: TagScope::Image, kind: ValueKind::Dimension, target: Target::Number(height) },
    TagRule { tag: 0x010F, name: "Make", scope: TagScope::Image, kind: ValueKind::Text, target: Target::Text(camera_make) },
    TagRule { tag: 0x0110, name: "Model", scope: TagScope::Image, kind: ValueKind::Text, target: Target::Text(camera_model) },
    TagRule { tag: 0x0132, name: "DateTime", scope: TagScope::Image, kind: ValueKind::Text, target: Target::Text(date_time) },
    TagRule { tag: 0x9003, name: "DateTimeOriginal", scope: TagScope::Image, kind: ValueKind::CaptureDate, target: Target::Text(date_taken) },
    TagRule { tag: 0x9004, name: "DateTimeDigitized", scope: TagScope::Image, kind: ValueKind::Text, target: Target::Text(date_digitized) },
    TagRule { tag: 0x001D, name: "GPSDateStamp", scope: TagScope::Gps, kind: ValueKind::Text, target: Target::Text(gps_date_stamp) },
    TagRule { tag: 0x0007, name: "GPSTimeStamp", scope: TagScope::Gps, kind: ValueKind::TimeOfDay, target: Target::Text(gps_time_stamp) },
];

/// Tags in an image directory that lead to a nested directory.
pub(crate) struct PointerRule {
    pub tag: u16,
    pub name: &'static str,
    /// Scope of the directory the pointer leads to.
    pub scope: TagScope,
}

pub(crate) static POINTER_RULES: &[PointerRule] = &[
    PointerRule { tag: EXIF_IFD_POINTER, name: "ExifIFDPointer", scope: TagScope::Image },
    PointerRule { tag: GPS_IFD_POINTER, name: "GPSInfoIFDPointer", scope: TagScope::Gps },
];

pub(crate) fn tag_rule(scope: TagScope, tag: u16) -> Option<&'static TagRule> {
    TAG_RULES.iter().find(|r| r.scope == scope && r.tag == tag)
}

pub(crate) fn pointer_rule(tag: u16) -> Option<&'static PointerRule> {
    POINTER_RULES.iter().find(|r| r.tag == tag)
}

enum Decoded {
    Number(u32),
    Text(String),
}

/// Reads entry values out of the TIFF structure and stores them in a document.
pub(crate) struct TagDecoder<'a> {
    cursor: ByteCursor<'a>,
    header: TiffHeader,
}

impl<'a> TagDecoder<'a> {
    pub fn new(data: &'a [u8], header: TiffHeader) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            header,
        }
    }

    /// Decode `entry` if its tag is recognized in `scope`.
    ///
    /// Returns `true` when a document field was filled. A field that already
    /// holds a value is left alone, so the first directory to supply it wins.
    pub fn decode_into(&self, entry: &IfdEntry, scope: TagScope, doc: &mut ExifDocument) -> bool {
        let Some(rule) = tag_rule(scope, entry.tag) else {
            return false;
        };
        if !rule.kind.accepts(entry.field_type) {
            log::trace!(
                "{}: unexpected field type {:?}, skipped",
                rule.name,
                entry.field_type
            );
            return false;
        }
        let Some(value) = self.decode_value(rule.kind, entry) else {
            log::trace!("{}: value unavailable", rule.name);
            return false;
        };

        match (rule.target, value) {
            (Target::Number(field), Decoded::Number(n)) => {
                let slot = field(doc);
                if *slot == 0 && n != 0 {
                    *slot = n;
                    return true;
                }
            }
            (Target::Text(field), Decoded::Text(s)) => {
                let slot = field(doc);
                if slot.is_empty() && !s.is_empty() {
                    *slot = s;
                    return true;
                }
            }
            _ => log::trace!("{}: value does not fit its target", rule.name),
        }
        false
    }

    /// Offset carried by a sub-directory pointer entry.
    pub fn pointer_offset(&self, entry: &IfdEntry) -> Option<u32> {
        (entry.field_type == FieldType::Long && entry.count == 1).then_some(entry.value_offset)
    }

    fn decode_value(&self, kind: ValueKind, entry: &IfdEntry) -> Option<Decoded> {
        match kind {
            ValueKind::Dimension => self.read_integer(entry).map(Decoded::Number),
            ValueKind::Text => self.read_ascii(entry).map(Decoded::Text),
            ValueKind::CaptureDate => self
                .read_ascii(entry)
                .and_then(|raw| format_capture_date(&raw))
                .map(Decoded::Text),
            ValueKind::TimeOfDay => self
                .read_rationals(entry, 3)
                .and_then(|parts| format_time_of_day(&parts))
                .map(Decoded::Text),
        }
    }

    fn read_integer(&self, entry: &IfdEntry) -> Option<u32> {
        match entry.field_type {
            FieldType::Short if (1..=2).contains(&entry.count) => {
                Some(u32::from(self.cursor.read_u16(entry.slot, self.header.byte_order)))
            }
            FieldType::Long if entry.count == 1 => Some(entry.value_offset),
            _ => None,
        }
    }

    fn read_ascii(&self, entry: &IfdEntry) -> Option<String> {
        let len = entry.count as usize;
        if len == 0 {
            return None;
        }
        let at = if len <= 4 {
            entry.slot
        } else {
            self.header.absolute(entry.value_offset)?
        };
        self.cursor.has(at, len).then(|| self.cursor.read_ascii_run(at, len))
    }

    fn read_rationals(&self, entry: &IfdEntry, wanted: usize) -> Option<Vec<(u32, u32)>> {
        if (entry.count as usize) < wanted {
            return None;
        }
        let at = self.header.absolute(entry.value_offset)?;
        let raw = self.cursor.bytes(at, wanted * 8)?;
        let order = self.header.byte_order;
        Some(
            raw.chunks_exact(8)
                .map(|pair| {
                    (
                        order.u32([pair[0], pair[1], pair[2], pair[3]]),
                        order.u32([pair[4], pair[5], pair[6], pair[7]]),
                    )
                })
                .collect(),
        )
    }
}

/// `YYYY:MM:DD HH:MM:SS` to `YYYY-MM-DD`.
///
/// Values shorter than 19 bytes produce `None`. The separators at positions 4
/// and 7 are replaced whatever they hold.
pub(crate) fn format_capture_date(raw: &str) -> Option<String> {
    if raw.len() < 19 {
        return None;
    }
    Some(format!(
        "{}-{}-{}",
        raw.get(0..4)?,
        raw.get(5..7)?,
        raw.get(8..10)?
    ))
}

/// Render hour, minute and second rationals as `HH:MM:SS`.
///
/// Each component is truncated by integer division. A zero denominator in
/// any component makes the whole time unavailable.
pub(crate) fn format_time_of_day(parts: &[(u32, u32)]) -> Option<String> {
    let [h, m, s] = parts else {
        return None;
    };
    let mut out = Vec::with_capacity(3);
    for &(num, den) in [h, m, s] {
        if den == 0 {
            return None;
        }
        out.push(format!("{:02}", num / den));
    }
    Some(out.join(":"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn header(order: ByteOrder) -> TiffHeader {
        TiffHeader {
            byte_order: order,
            first_ifd_offset: 8,
            start: 0,
        }
    }

    /// Lay one entry at position 0 of a fresh buffer, followed by `extra`.
    fn entry_buffer(order: ByteOrder, tag: u16, field_type: u16, count: u32, slot: [u8; 4], extra: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        match order {
            ByteOrder::Big => {
                data.extend_from_slice(&tag.to_be_bytes());
                data.extend_from_slice(&field_type.to_be_bytes());
                data.extend_from_slice(&count.to_be_bytes());
            }
            ByteOrder::Little => {
                data.extend_from_slice(&tag.to_le_bytes());
                data.extend_from_slice(&field_type.to_le_bytes());
                data.extend_from_slice(&count.to_le_bytes());
            }
        }
        data.extend_from_slice(&slot);
        data.extend_from_slice(extra);
        data
    }

    fn decode(order: ByteOrder, data: &[u8], scope: TagScope) -> (ExifDocument, bool) {
        let cursor = ByteCursor::new(data);
        let entry = IfdEntry::read(&cursor, 0, order);
        let decoder = TagDecoder::new(data, header(order));
        let mut doc = ExifDocument::default();
        let stored = decoder.decode_into(&entry, scope, &mut doc);
        (doc, stored)
    }

    // ── Table ────────────────────────────────────────────────────────

    #[test]
    fn table_has_no_duplicates() {
        let mut seen = HashSet::new();
        for rule in TAG_RULES {
            assert!(seen.insert((rule.scope, rule.tag)), "duplicate rule for {}", rule.name);
        }
    }

    #[test]
    fn table_kinds_match_targets() {
        for rule in TAG_RULES {
            let numeric = matches!(rule.target, Target::Number(_));
            assert_eq!(numeric, rule.kind == ValueKind::Dimension, "{}", rule.name);
        }
    }

    #[test]
    fn gps_tags_are_scoped() {
        assert!(tag_rule(TagScope::Gps, 0x0007).is_some());
        assert!(tag_rule(TagScope::Image, 0x0007).is_none());
        assert!(tag_rule(TagScope::Gps, 0x010F).is_none());
        assert_eq!(pointer_rule(GPS_IFD_POINTER).map(|r| r.scope), Some(TagScope::Gps));
        assert_eq!(pointer_rule(EXIF_IFD_POINTER).map(|r| r.scope), Some(TagScope::Image));
        assert!(pointer_rule(0x010F).is_none());
    }

    #[test]
    fn field_type_mapping() {
        assert_eq!(FieldType::from_u16(2), FieldType::Ascii);
        assert_eq!(FieldType::from_u16(3), FieldType::Short);
        assert_eq!(FieldType::from_u16(4), FieldType::Long);
        assert_eq!(FieldType::from_u16(5), FieldType::Rational);
        assert_eq!(FieldType::from_u16(7), FieldType::Other(7));
    }

    // ── Integers ─────────────────────────────────────────────────────

    #[test]
    fn short_width_both_orders() {
        let be = entry_buffer(ByteOrder::Big, 0x0100, 3, 1, [0x0F, 0xA0, 0, 0], &[]);
        let le = entry_buffer(ByteOrder::Little, 0x0100, 3, 1, [0xA0, 0x0F, 0, 0], &[]);
        assert_eq!(decode(ByteOrder::Big, &be, TagScope::Image).0.width, 4000);
        assert_eq!(decode(ByteOrder::Little, &le, TagScope::Image).0.width, 4000);
    }

    #[test]
    fn long_height() {
        let data = entry_buffer(ByteOrder::Big, 0x0101, 4, 1, [0, 0, 0x15, 0x58], &[]);
        let (doc, stored) = decode(ByteOrder::Big, &data, TagScope::Image);
        assert!(stored);
        assert_eq!(doc.height, 5464);
    }

    #[test]
    fn long_with_many_values_is_skipped() {
        let data = entry_buffer(ByteOrder::Big, 0x0100, 4, 2, [0, 0, 0, 8], &[]);
        let (doc, stored) = decode(ByteOrder::Big, &data, TagScope::Image);
        assert!(!stored);
        assert_eq!(doc.width, 0);
    }

    #[test]
    fn width_as_ascii_is_skipped() {
        let data = entry_buffer(ByteOrder::Big, 0x0100, 2, 4, *b"640\0", &[]);
        assert_eq!(decode(ByteOrder::Big, &data, TagScope::Image), (ExifDocument::default(), false));
    }

    // ── ASCII ────────────────────────────────────────────────────────

    #[test]
    fn inline_ascii() {
        let data = entry_buffer(ByteOrder::Little, 0x010F, 2, 4, *b"LGE\0", &[]);
        assert_eq!(decode(ByteOrder::Little, &data, TagScope::Image).0.camera_make, "LGE");
    }

    #[test]
    fn out_of_line_ascii_with_padding() {
        // value lives right after the 12-byte entry
        let data = entry_buffer(ByteOrder::Big, 0x010F, 2, 8, [0, 0, 0, 12], b"Canon\0\0\0");
        assert_eq!(decode(ByteOrder::Big, &data, TagScope::Image).0.camera_make, "Canon");
    }

    #[test]
    fn out_of_line_ascii_past_end_stays_empty() {
        let data = entry_buffer(ByteOrder::Big, 0x0110, 2, 16, [0, 0, 0, 12], b"EOS R5\0");
        let (doc, stored) = decode(ByteOrder::Big, &data, TagScope::Image);
        assert!(!stored);
        assert!(doc.camera_model.is_empty());
    }

    #[test]
    fn ascii_offset_overflow_stays_empty() {
        let data = entry_buffer(ByteOrder::Big, 0x0110, 2, 16, [0xFF, 0xFF, 0xFF, 0xFF], &[]);
        assert!(!decode(ByteOrder::Big, &data, TagScope::Image).1);
    }

    #[test]
    fn zero_count_ascii_is_skipped() {
        let data = entry_buffer(ByteOrder::Big, 0x010F, 2, 0, [b'X', 0, 0, 0], &[]);
        assert!(!decode(ByteOrder::Big, &data, TagScope::Image).1);
    }

    #[test]
    fn date_time_kept_verbatim() {
        let data = entry_buffer(ByteOrder::Big, 0x0132, 2, 20, [0, 0, 0, 12], b"2024:01:15 10:20:30\0");
        assert_eq!(decode(ByteOrder::Big, &data, TagScope::Image).0.date_time, "2024:01:15 10:20:30");
    }

    #[test]
    fn date_time_original_reformatted() {
        let data = entry_buffer(ByteOrder::Big, 0x9003, 2, 20, [0, 0, 0, 12], b"2024:01:15 10:20:30\0");
        assert_eq!(decode(ByteOrder::Big, &data, TagScope::Image).0.date_taken, "2024-01-15");
    }

    #[test]
    fn image_tag_ignored_in_gps_scope() {
        let data = entry_buffer(ByteOrder::Big, 0x010F, 2, 4, *b"LGE\0", &[]);
        assert!(!decode(ByteOrder::Big, &data, TagScope::Gps).1);
    }

    // ── Rationals ────────────────────────────────────────────────────

    fn rationals(order: ByteOrder, parts: &[(u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        for &(n, d) in parts {
            match order {
                ByteOrder::Big => {
                    out.extend_from_slice(&n.to_be_bytes());
                    out.extend_from_slice(&d.to_be_bytes());
                }
                ByteOrder::Little => {
                    out.extend_from_slice(&n.to_le_bytes());
                    out.extend_from_slice(&d.to_le_bytes());
                }
            }
        }
        out
    }

    #[test]
    fn gps_time_stamp_both_orders() {
        let parts = [(10, 1), (5, 1), (0, 1)];
        let be = entry_buffer(ByteOrder::Big, 0x0007, 5, 3, [0, 0, 0, 12], &rationals(ByteOrder::Big, &parts));
        let le = entry_buffer(ByteOrder::Little, 0x0007, 5, 3, [12, 0, 0, 0], &rationals(ByteOrder::Little, &parts));
        assert_eq!(decode(ByteOrder::Big, &be, TagScope::Gps).0.gps_time_stamp, "10:05:00");
        assert_eq!(decode(ByteOrder::Little, &le, TagScope::Gps).0.gps_time_stamp, "10:05:00");
    }

    #[test]
    fn gps_time_stamp_zero_denominator() {
        let parts = [(10, 1), (5, 0), (0, 1)];
        let data = entry_buffer(ByteOrder::Big, 0x0007, 5, 3, [0, 0, 0, 12], &rationals(ByteOrder::Big, &parts));
        let (doc, stored) = decode(ByteOrder::Big, &data, TagScope::Gps);
        assert!(!stored);
        assert!(doc.gps_time_stamp.is_empty());
    }

    #[test]
    fn gps_time_stamp_truncated_data() {
        let parts = [(10, 1), (5, 1)];
        let data = entry_buffer(ByteOrder::Big, 0x0007, 5, 3, [0, 0, 0, 12], &rationals(ByteOrder::Big, &parts));
        assert!(!decode(ByteOrder::Big, &data, TagScope::Gps).1);
    }

    // ── First value wins ─────────────────────────────────────────────

    #[test]
    fn existing_field_is_not_overwritten() {
        let data = entry_buffer(ByteOrder::Big, 0x010F, 2, 4, *b"LGE\0", &[]);
        let cursor = ByteCursor::new(&data);
        let entry = IfdEntry::read(&cursor, 0, ByteOrder::Big);
        let decoder = TagDecoder::new(&data, header(ByteOrder::Big));
        let mut doc = ExifDocument {
            camera_make: "Canon".into(),
            ..Default::default()
        };
        assert!(!decoder.decode_into(&entry, TagScope::Image, &mut doc));
        assert_eq!(doc.camera_make, "Canon");
    }

    #[test]
    fn pointer_offset_requires_single_long() {
        let data = entry_buffer(ByteOrder::Big, GPS_IFD_POINTER, 4, 1, [0, 0, 0, 0x40], &[]);
        let cursor = ByteCursor::new(&data);
        let decoder = TagDecoder::new(&data, header(ByteOrder::Big));
        let entry = IfdEntry::read(&cursor, 0, ByteOrder::Big);
        assert_eq!(decoder.pointer_offset(&entry), Some(0x40));

        let short = IfdEntry {
            field_type: FieldType::Short,
            ..entry
        };
        assert_eq!(decoder.pointer_offset(&short), None);
    }

    // ── Formatters ───────────────────────────────────────────────────

    #[test]
    fn capture_date_formatting() {
        assert_eq!(format_capture_date("2024:01:15 10:20:30").as_deref(), Some("2024-01-15"));
        assert_eq!(format_capture_date("2024:01:15 10:20:30.123").as_deref(), Some("2024-01-15"));
        assert_eq!(format_capture_date("2024:01:15"), None);
        assert_eq!(format_capture_date(""), None);
    }

    #[test]
    fn time_of_day_formatting() {
        assert_eq!(format_time_of_day(&[(10, 1), (5, 1), (0, 1)]).as_deref(), Some("10:05:00"));
        assert_eq!(format_time_of_day(&[(23, 1), (5930, 100), (5999, 100)]).as_deref(), Some("23:59:59"));
        assert_eq!(format_time_of_day(&[(0, 0), (5, 1), (0, 1)]), None);
        assert_eq!(format_time_of_day(&[(1, 1), (2, 1)]), None);
    }
}
