//! Synthetic TIFF and JPEG byte streams for tests.

use super::cursor::ByteOrder;

pub(crate) enum Value {
    /// Raw ASCII bytes; the count is the byte length, so include the NUL.
    Ascii(Vec<u8>),
    Short(u16),
    Long(u32),
    Rationals(Vec<(u32, u32)>),
    /// Long pointer to another directory, by index.
    Dir(usize),
    /// Verbatim entry fields, for crafting broken entries.
    Raw { field_type: u16, count: u32, slot: u32 },
}

pub(crate) fn ascii(s: &str) -> Value {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    Value::Ascii(bytes)
}

pub(crate) struct Entry(pub u16, pub Value);

pub(crate) enum Next {
    End,
    Dir(usize),
    Offset(u32),
}

struct Directory {
    entries: Vec<Entry>,
    next: Next,
}

/// Lays out directories back to back after the 8-byte header, then all
/// out-of-line values. Directory 0 is IFD0.
pub(crate) struct TiffBuilder {
    order: ByteOrder,
    dirs: Vec<Directory>,
}

impl TiffBuilder {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            dirs: Vec::new(),
        }
    }

    pub fn dir(mut self, entries: Vec<Entry>, next: Next) -> Self {
        self.dirs.push(Directory { entries, next });
        self
    }

    /// TIFF-relative offset of directory `index`.
    pub fn offset_of(&self, index: usize) -> u32 {
        8 + self.dirs[..index]
            .iter()
            .map(|d| 2 + 12 * d.entries.len() as u32 + 4)
            .sum::<u32>()
    }

    fn u16(&self, v: u16) -> [u8; 2] {
        match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }

    fn u32(&self, v: u32) -> [u8; 4] {
        match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = match self.order {
            ByteOrder::Big => b"MM".to_vec(),
            ByteOrder::Little => b"II".to_vec(),
        };
        out.extend_from_slice(&self.u16(42));
        let first = if self.dirs.is_empty() { 0 } else { self.offset_of(0) };
        out.extend_from_slice(&self.u32(first));

        let data_base = self.offset_of(self.dirs.len());
        let mut data = Vec::new();

        for dir in &self.dirs {
            out.extend_from_slice(&self.u16(dir.entries.len() as u16));
            for Entry(tag, value) in &dir.entries {
                let (field_type, count, slot) = match value {
                    Value::Ascii(bytes) if bytes.len() <= 4 => {
                        let mut slot = [0u8; 4];
                        slot[..bytes.len()].copy_from_slice(bytes);
                        (2, bytes.len() as u32, slot)
                    }
                    Value::Ascii(bytes) => {
                        let at = data_base + data.len() as u32;
                        data.extend_from_slice(bytes);
                        (2, bytes.len() as u32, self.u32(at))
                    }
                    Value::Short(v) => {
                        let [a, b] = self.u16(*v);
                        (3, 1, [a, b, 0, 0])
                    }
                    Value::Long(v) => (4, 1, self.u32(*v)),
                    Value::Rationals(parts) => {
                        let at = data_base + data.len() as u32;
                        for &(num, den) in parts {
                            data.extend_from_slice(&self.u32(num));
                            data.extend_from_slice(&self.u32(den));
                        }
                        (5, parts.len() as u32, self.u32(at))
                    }
                    Value::Dir(index) => (4, 1, self.u32(self.offset_of(*index))),
                    Value::Raw {
                        field_type,
                        count,
                        slot,
                    } => (*field_type, *count, self.u32(*slot)),
                };
                out.extend_from_slice(&self.u16(*tag));
                out.extend_from_slice(&self.u16(field_type));
                out.extend_from_slice(&self.u32(count));
                out.extend_from_slice(&slot);
            }
            let next = match dir.next {
                Next::End => 0,
                Next::Dir(index) => self.offset_of(index),
                Next::Offset(offset) => offset,
            };
            out.extend_from_slice(&self.u32(next));
        }

        out.extend_from_slice(&data);
        out
    }

    pub fn jpeg(&self) -> Vec<u8> {
        wrap_jpeg(&self.build())
    }
}

/// Wrap a TIFF blob as SOI, a JFIF APP0, the EXIF APP1 and EOI.
pub(crate) fn wrap_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    out.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// A plain JPEG with no APP1 segment.
pub(crate) fn jpeg_without_exif() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    out.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x03, 0x00]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}
