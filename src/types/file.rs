//! File transfer information elements.

use bytes::Bytes;

use crate::error::{Iec60870Error, Result};

/// Name of file (NOF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameOfFile(pub u16);

impl NameOfFile {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("NOF too short"));
        }
        Ok(Self(u16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

/// Name of section (NOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameOfSection(pub u8);

impl NameOfSection {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// Length of file or section (LOF), 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthOfFileOrSection(pub u32);

impl LengthOfFileOrSection {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 3;

    /// Parse from 3 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("LOF too short"));
        }
        Ok(Self(
            u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16),
        ))
    }

    /// Encode to 3 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.0 & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            ((self.0 >> 16) & 0xFF) as u8,
        ]
    }
}

/// File ready qualifier (FRQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileReadyQualifier {
    /// Low seven qualifier bits.
    pub qualifier: u8,
    /// Negative confirmation of the announced file.
    pub negative: bool,
}

impl FileReadyQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the FRQ byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            qualifier: byte & 0x7F,
            negative: byte & 0x80 != 0,
        }
    }

    /// Encode to the FRQ byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.qualifier & 0x7F) | ((self.negative as u8) << 7)
    }
}

/// Section ready qualifier (SRQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionReadyQualifier {
    /// Low seven qualifier bits.
    pub qualifier: u8,
    /// The section is not ready to be loaded.
    pub not_ready: bool,
}

impl SectionReadyQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the SRQ byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            qualifier: byte & 0x7F,
            not_ready: byte & 0x80 != 0,
        }
    }

    /// Encode to the SRQ byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.qualifier & 0x7F) | ((self.not_ready as u8) << 7)
    }
}

/// Select and call qualifier (SCQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectAndCallQualifier(pub u8);

impl SelectAndCallQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// Last section or segment qualifier (LSQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastSectionOrSegmentQualifier(pub u8);

impl LastSectionOrSegmentQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// Acknowledge file or section qualifier (AFQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckFileOrSectionQualifier(pub u8);

impl AckFileOrSectionQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// Checksum (CHS) over a section or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(pub u8);

impl Checksum {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// One segment of file data, length-prefixed on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSegment(pub Bytes);

impl FileSegment {
    /// Create a segment. At most 255 bytes fit the length prefix, and the
    /// enclosing APDU restricts it further.
    pub fn new(data: Bytes) -> Result<Self> {
        if data.len() > u8::MAX as usize {
            return Err(Iec60870Error::malformed_payload_static(
                "file segment exceeds 255 bytes",
            ));
        }
        Ok(Self(data))
    }

    /// Encoded size in bytes (length prefix plus data).
    #[inline]
    pub fn wire_size(&self) -> usize {
        1 + self.0.len()
    }

    /// Parse a length-prefixed segment, consuming exactly the bytes it
    /// covers.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((&len, rest)) = bytes.split_first() else {
            return Err(Iec60870Error::malformed_payload_static("file segment too short"));
        };
        let len = usize::from(len);
        if rest.len() < len {
            return Err(Iec60870Error::malformed_payload_static("file segment truncated"));
        }
        Ok(Self(Bytes::copy_from_slice(&rest[..len])))
    }
}

/// Status of file (SOF) in a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusOfFile {
    /// Status bits (0 = default).
    pub status: u8,
    /// Last file of the directory (LFD).
    pub last_file: bool,
    /// Name defines a subdirectory (FOR).
    pub is_directory: bool,
    /// File transfer is active (FA).
    pub transfer_active: bool,
}

impl StatusOfFile {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the SOF byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            status: byte & 0x1F,
            last_file: byte & 0x20 != 0,
            is_directory: byte & 0x40 != 0,
            transfer_active: byte & 0x80 != 0,
        }
    }

    /// Encode to the SOF byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.status & 0x1F)
            | ((self.last_file as u8) << 5)
            | ((self.is_directory as u8) << 6)
            | ((self.transfer_active as u8) << 7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_roundtrip() {
        let nof = NameOfFile(0x1234);
        assert_eq!(nof.to_bytes(), [0x34, 0x12]);
        assert_eq!(NameOfFile::from_bytes(&nof.to_bytes()).unwrap(), nof);
    }

    #[test]
    fn test_file_length_roundtrip() {
        let lof = LengthOfFileOrSection(0x012345);
        assert_eq!(lof.to_bytes(), [0x45, 0x23, 0x01]);
        assert_eq!(LengthOfFileOrSection::from_bytes(&lof.to_bytes()).unwrap(), lof);
    }

    #[test]
    fn test_ready_qualifiers() {
        let frq = FileReadyQualifier {
            qualifier: 0,
            negative: true,
        };
        assert_eq!(frq.to_byte(), 0x80);
        assert_eq!(FileReadyQualifier::from_byte(0x80), frq);

        let srq = SectionReadyQualifier {
            qualifier: 1,
            not_ready: false,
        };
        assert_eq!(SectionReadyQualifier::from_byte(srq.to_byte()), srq);
    }

    #[test]
    fn test_segment_prefix() {
        let seg = FileSegment::new(Bytes::from_static(b"abc")).unwrap();
        assert_eq!(seg.wire_size(), 4);

        let parsed = FileSegment::from_bytes(&[3, b'a', b'b', b'c']).unwrap();
        assert_eq!(parsed, seg);

        assert!(FileSegment::from_bytes(&[4, 1, 2, 3]).is_err());
        assert!(FileSegment::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_segment_size_limit() {
        assert!(FileSegment::new(Bytes::from(vec![0u8; 255])).is_ok());
        assert!(FileSegment::new(Bytes::from(vec![0u8; 256])).is_err());
    }

    #[test]
    fn test_status_of_file_roundtrip() {
        let sof = StatusOfFile {
            status: 3,
            last_file: true,
            is_directory: false,
            transfer_active: true,
        };
        assert_eq!(sof.to_byte(), 0x03 | 0x20 | 0x80);
        assert_eq!(StatusOfFile::from_byte(sof.to_byte()), sof);
    }
}
