//! Binary time tags CP16Time2a, CP24Time2a and CP56Time2a.
//!
//! All three are little-endian with the milliseconds-in-minute counter in
//! the low bytes. The seven-byte CP56 variant carries a full calendar
//! stamp with a two-digit year; mapping it onto an absolute date needs a
//! century base, which callers supply explicitly.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

use crate::error::{Iec60870Error, Result};

/// CP16Time2a: elapsed milliseconds, 0..=59999.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cp16Time2a(pub u16);

impl Cp16Time2a {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("CP16Time2a too short"));
        }
        Ok(Self(u16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// The millisecond count.
    #[inline]
    pub const fn milliseconds(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Cp16Time2a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// CP24Time2a: milliseconds in minute plus the minute itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cp24Time2a {
    /// Milliseconds within the minute (0-59999).
    pub milliseconds: u16,
    /// Minutes (0-59).
    pub minutes: u8,
    /// Invalid flag.
    pub invalid: bool,
}

impl Cp24Time2a {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 3;

    /// Parse from 3 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("CP24Time2a too short"));
        }
        Ok(Self {
            milliseconds: u16::from_le_bytes([bytes[0], bytes[1]]),
            minutes: bytes[2] & 0x3F,
            invalid: bytes[2] & 0x80 != 0,
        })
    }

    /// Encode to 3 bytes.
    pub fn to_bytes(self) -> [u8; 3] {
        let ms = self.milliseconds.to_le_bytes();
        [
            ms[0],
            ms[1],
            (self.minutes & 0x3F) | if self.invalid { 0x80 } else { 0 },
        ]
    }
}

impl std::fmt::Display for Cp24Time2a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}.{:03}{}",
            self.minutes,
            self.milliseconds / 1000,
            self.milliseconds % 1000,
            if self.invalid { " IV" } else { "" }
        )
    }
}

/// CP56Time2a: full seven-byte calendar time tag.
///
/// Wire layout, byte by byte: milliseconds-in-minute as u16 LE, minutes
/// with the invalid flag in bit 7, hours with the summer-time flag in
/// bit 7, day-of-month with day-of-week in bits 5-7, month, and the
/// two-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cp56Time2a {
    /// Milliseconds within the minute (0-59999).
    pub milliseconds: u16,
    /// Minutes (0-59).
    pub minutes: u8,
    /// Hours (0-23).
    pub hours: u8,
    /// Day of month (1-31).
    pub day: u8,
    /// Day of week (1-7, 1 = Monday, 0 = unused).
    pub day_of_week: u8,
    /// Month (1-12).
    pub month: u8,
    /// Year within the century (0-99).
    pub year: u8,
    /// Invalid flag.
    pub invalid: bool,
    /// Summer time (DST) flag.
    pub summer_time: bool,
}

impl Cp56Time2a {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 7;

    /// Parse from 7 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("CP56Time2a too short"));
        }
        Ok(Self {
            milliseconds: u16::from_le_bytes([bytes[0], bytes[1]]),
            minutes: bytes[2] & 0x3F,
            invalid: bytes[2] & 0x80 != 0,
            hours: bytes[3] & 0x1F,
            summer_time: bytes[3] & 0x80 != 0,
            day: bytes[4] & 0x1F,
            day_of_week: (bytes[4] >> 5) & 0x07,
            month: bytes[5] & 0x0F,
            year: bytes[6] & 0x7F,
        })
    }

    /// Encode to 7 bytes.
    ///
    /// The millisecond counter goes into the low two bytes LSB first and
    /// the invalid flag into bit 7 of the minute byte.
    pub fn to_bytes(self) -> [u8; 7] {
        let ms = self.milliseconds.to_le_bytes();
        [
            ms[0],
            ms[1],
            (self.minutes & 0x3F) | if self.invalid { 0x80 } else { 0 },
            (self.hours & 0x1F) | if self.summer_time { 0x80 } else { 0 },
            (self.day & 0x1F) | ((self.day_of_week & 0x07) << 5),
            self.month & 0x0F,
            self.year & 0x7F,
        ]
    }

    /// Build a time tag from an absolute UTC timestamp.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            milliseconds: (dt.second() * 1000 + dt.timestamp_subsec_millis()) as u16,
            minutes: dt.minute() as u8,
            hours: dt.hour() as u8,
            day: dt.day() as u8,
            day_of_week: dt.weekday().number_from_monday() as u8,
            month: dt.month() as u8,
            year: (dt.year().rem_euclid(100)) as u8,
            invalid: false,
            summer_time: false,
        }
    }

    /// Resolve the tag to an absolute UTC timestamp.
    ///
    /// `start_of_century` anchors the two-digit year: years smaller than
    /// `start_of_century % 100` fall into the following century. Returns
    /// `None` for calendar-invalid field combinations.
    pub fn datetime_with_century(&self, start_of_century: i32) -> Option<DateTime<Utc>> {
        let mut century = start_of_century / 100 * 100;
        if i32::from(self.year) < start_of_century % 100 {
            century += 100;
        }
        let date = NaiveDate::from_ymd_opt(
            century + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        let naive = date.and_hms_milli_opt(
            u32::from(self.hours),
            u32::from(self.minutes),
            u32::from(self.milliseconds / 1000),
            u32::from(self.milliseconds % 1000),
        )?;
        Some(Utc.from_utc_datetime(&naive))
    }

    /// Resolve the tag with the 1970 pivot: years 70-99 map into the
    /// twentieth century, 0-69 into the twenty-first.
    #[inline]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.datetime_with_century(1970)
    }
}

impl std::fmt::Display for Cp56Time2a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}{}",
            self.year,
            self.month,
            self.day,
            self.hours,
            self.minutes,
            self.milliseconds / 1000,
            self.milliseconds % 1000,
            if self.invalid { " IV" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp16_roundtrip() {
        let t = Cp16Time2a(59999);
        assert_eq!(Cp16Time2a::from_bytes(&t.to_bytes()).unwrap(), t);
        assert_eq!(t.to_bytes(), [0x5F, 0xEA]);
    }

    #[test]
    fn test_cp24_roundtrip() {
        let t = Cp24Time2a {
            milliseconds: 30123,
            minutes: 59,
            invalid: true,
        };
        let bytes = t.to_bytes();
        assert_eq!(bytes[2], 0x80 | 59);
        assert_eq!(Cp24Time2a::from_bytes(&bytes).unwrap(), t);
    }

    #[test]
    fn test_cp56_struct_roundtrip() {
        let t = Cp56Time2a {
            milliseconds: 45678,
            minutes: 42,
            hours: 23,
            day: 31,
            day_of_week: 7,
            month: 12,
            year: 99,
            invalid: false,
            summer_time: true,
        };
        assert_eq!(Cp56Time2a::from_bytes(&t.to_bytes()).unwrap(), t);
    }

    #[test]
    fn test_cp56_byte_layout() {
        // Milliseconds belong in the low two bytes LSB first and the
        // invalid flag in bit 7 of the minute byte.
        let t = Cp56Time2a {
            milliseconds: 0x1234,
            minutes: 5,
            hours: 6,
            day: 7,
            day_of_week: 1,
            month: 8,
            year: 24,
            invalid: true,
            summer_time: false,
        };
        let bytes = t.to_bytes();
        assert_eq!(bytes[0], 0x34);
        assert_eq!(bytes[1], 0x12);
        assert_eq!(bytes[2], 0x80 | 5);
        assert_eq!(bytes[3], 6);
        assert_eq!(bytes[4], (1 << 5) | 7);
        assert_eq!(bytes[5], 8);
        assert_eq!(bytes[6], 24);
    }

    #[test]
    fn test_datetime_roundtrip_millisecond_precision() {
        let stamps = [
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap()
                + chrono::Duration::milliseconds(123),
            Utc.with_ymd_and_hms(2069, 12, 31, 23, 59, 59).unwrap(),
        ];
        for dt in stamps {
            let tag = Cp56Time2a::from_datetime(dt);
            let decoded = Cp56Time2a::from_bytes(&tag.to_bytes()).unwrap();
            assert_eq!(decoded.datetime().unwrap(), dt, "roundtrip failed for {dt}");
        }
    }

    #[test]
    fn test_datetime_roundtrip_late_century() {
        // 2070-2099 need an explicit century base.
        let dt = Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(500);
        let tag = Cp56Time2a::from_datetime(dt);
        let decoded = Cp56Time2a::from_bytes(&tag.to_bytes()).unwrap();
        assert_eq!(decoded.datetime_with_century(2000).unwrap(), dt);
    }

    #[test]
    fn test_century_pivot() {
        let mut tag = Cp56Time2a::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        tag.year = 70;
        assert_eq!(tag.datetime().unwrap().year(), 1970);
        tag.year = 69;
        assert_eq!(tag.datetime().unwrap().year(), 2069);
        tag.year = 5;
        assert_eq!(tag.datetime_with_century(2000).unwrap().year(), 2005);
    }

    #[test]
    fn test_invalid_calendar_fields() {
        let tag = Cp56Time2a {
            milliseconds: 0,
            minutes: 0,
            hours: 0,
            day: 31,
            day_of_week: 0,
            month: 2,
            year: 23,
            invalid: false,
            summer_time: false,
        };
        assert!(tag.datetime().is_none());
    }

    #[test]
    fn test_truncated_input() {
        assert!(Cp16Time2a::from_bytes(&[0x01]).is_err());
        assert!(Cp24Time2a::from_bytes(&[0x01, 0x02]).is_err());
        assert!(Cp56Time2a::from_bytes(&[0; 6]).is_err());
    }
}
