use serde::{Deserialize, Serialize};

/// Capture metadata recovered from a JPEG's EXIF segment.
///
/// Every field defaults to empty (or zero). A field stays at its default when
/// the tag is absent, has an unexpected type, or points outside the file.
/// `has_exif` only says that a well-formed EXIF container was found; it says
/// nothing about how many fields were filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExifDocument {
    /// `DateTimeOriginal` reduced to `YYYY-MM-DD`.
    pub date_taken: String,
    /// `DateTime` as stored (`YYYY:MM:DD HH:MM:SS`).
    pub date_time: String,
    /// `DateTimeDigitized` as stored.
    pub date_digitized: String,
    /// `GPSDateStamp` as stored (`YYYY:MM:DD`).
    pub gps_date_stamp: String,
    /// `GPSTimeStamp` as `HH:MM:SS` (UTC).
    pub gps_time_stamp: String,
    pub camera_make: String,
    pub camera_model: String,
    pub width: u32,
    pub height: u32,
    pub has_exif: bool,
}

impl ExifDocument {
    /// True when no metadata field was recovered, whether or not an EXIF
    /// container was present.
    pub fn is_empty(&self) -> bool {
        self.date_taken.is_empty()
            && self.date_time.is_empty()
            && self.date_digitized.is_empty()
            && self.gps_date_stamp.is_empty()
            && self.gps_time_stamp.is_empty()
            && self.camera_make.is_empty()
            && self.camera_model.is_empty()
            && self.width == 0
            && self.height == 0
    }

    /// Best available capture date as `YYYY-MM-DD`.
    ///
    /// Prefers `date_taken`, then the date part of `date_time`, then the GPS
    /// date stamp. Returns `None` when none of them holds a usable date.
    pub fn capture_date(&self) -> Option<String> {
        if !self.date_taken.is_empty() {
            return Some(self.date_taken.clone());
        }
        [self.date_time.as_str(), self.gps_date_stamp.as_str()]
            .into_iter()
            .find_map(normalize_date)
    }

    /// `width x height`, when both dimensions are known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        (self.width > 0 && self.height > 0).then_some((self.width, self.height))
    }
}

/// `YYYY:MM:DD...` to `YYYY-MM-DD`, rejecting anything that is not digits in
/// the expected places.
fn normalize_date(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    let digits_ok = [0, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|&i| bytes[i].is_ascii_digit());
    if !digits_ok || bytes[4] != b':' || bytes[7] != b':' {
        return None;
    }
    Some(format!("{}-{}-{}", &raw[0..4], &raw[5..7], &raw[8..10]))
}
