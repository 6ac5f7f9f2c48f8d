use serde::{Deserialize, Serialize};

/// Byte order of the TIFF structure embedded in an EXIF segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    /// "MM" (Motorola), most significant byte first.
    Big,
    /// "II" (Intel), least significant byte first.
    Little,
}

impl ByteOrder {
    /// Detect the byte order from the two marker bytes at the start of a TIFF header.
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            b"MM" => Some(Self::Big),
            b"II" => Some(Self::Little),
            _ => None,
        }
    }

    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Big => u16::from_be_bytes(bytes),
            Self::Little => u16::from_le_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Big => u32::from_be_bytes(bytes),
            Self::Little => u32::from_le_bytes(bytes),
        }
    }
}

/// Bounds-checked reads over a borrowed image buffer.
///
/// Every read that would reach past the end of the buffer yields a zero or
/// empty default instead of failing, so a damaged file still gives up
/// whatever fields sit in its intact parts. Offset arithmetic is checked;
/// an offset near `usize::MAX` is simply out of bounds.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Whether `len` bytes starting at `offset` lie inside the buffer.
    pub fn has(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    /// Borrow `len` bytes at `offset`, or `None` if the span leaves the buffer.
    pub fn bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.bytes(offset, N)?.try_into().ok()
    }

    pub fn read_u8(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    pub fn read_u16(&self, offset: usize, order: ByteOrder) -> u16 {
        self.array::<2>(offset).map(|b| order.u16(b)).unwrap_or(0)
    }

    pub fn read_u32(&self, offset: usize, order: ByteOrder) -> u32 {
        self.array::<4>(offset).map(|b| order.u32(b)).unwrap_or(0)
    }

    /// Big-endian 16-bit read, used for JPEG marker lengths.
    pub fn read_u16_be(&self, offset: usize) -> u16 {
        self.read_u16(offset, ByteOrder::Big)
    }

    /// Read a NUL-terminated ASCII run of at most `max_len` bytes.
    ///
    /// The whole `max_len` span must fit in the buffer, otherwise the result
    /// is empty. Bytes after the first NUL are dropped and the remainder is
    /// cleaned with [`clean_ascii`].
    pub fn read_ascii_run(&self, offset: usize, max_len: usize) -> String {
        match self.bytes(offset, max_len) {
            Some(raw) => clean_ascii(raw),
            None => String::new(),
        }
    }
}

/// Turn a raw EXIF ASCII value into a tidy string.
///
/// Cuts at the first NUL, strips any stray NULs, then trims whitespace and
/// control characters from both ends. Non-UTF-8 bytes are replaced rather
/// than rejected.
pub fn clean_ascii(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text = String::from_utf8_lossy(&raw[..end]);
    text.replace('\0', "")
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}
