//! Quality descriptor flags.
//!
//! The same five flags appear in three wire encodings: the standalone QDS
//! byte of measured values, and the high bits of the SIQ/DIQ bytes of
//! point information (which never carry the overflow flag).

/// Quality descriptor (OV, BL, SB, NT, IV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quality {
    /// Overflow (OV): the value exceeds its predefined range.
    pub overflow: bool,
    /// Blocked (BL): the value is blocked for transmission.
    pub blocked: bool,
    /// Substituted (SB): the value was entered manually.
    pub substituted: bool,
    /// Not topical (NT): the value is outdated.
    pub not_topical: bool,
    /// Invalid (IV): the value is unusable.
    pub invalid: bool,
}

impl Quality {
    /// Quality with no flags set.
    pub const GOOD: Self = Self {
        overflow: false,
        blocked: false,
        substituted: false,
        not_topical: false,
        invalid: false,
    };

    /// Quality with only the invalid flag set.
    pub const INVALID: Self = Self {
        overflow: false,
        blocked: false,
        substituted: false,
        not_topical: false,
        invalid: true,
    };

    /// Parse from a QDS byte.
    #[inline]
    pub const fn from_qds(byte: u8) -> Self {
        Self {
            overflow: byte & 0x01 != 0,
            blocked: byte & 0x10 != 0,
            substituted: byte & 0x20 != 0,
            not_topical: byte & 0x40 != 0,
            invalid: byte & 0x80 != 0,
        }
    }

    /// Encode to a QDS byte.
    #[inline]
    pub const fn to_qds(self) -> u8 {
        (self.overflow as u8)
            | ((self.blocked as u8) << 4)
            | ((self.substituted as u8) << 5)
            | ((self.not_topical as u8) << 6)
            | ((self.invalid as u8) << 7)
    }

    /// Parse the four descriptor bits shared by SIQ and DIQ.
    ///
    /// Point information carries no overflow flag.
    #[inline]
    pub const fn from_point_byte(byte: u8) -> Self {
        Self {
            overflow: false,
            blocked: byte & 0x10 != 0,
            substituted: byte & 0x20 != 0,
            not_topical: byte & 0x40 != 0,
            invalid: byte & 0x80 != 0,
        }
    }

    /// Encode the four descriptor bits shared by SIQ and DIQ.
    #[inline]
    pub const fn to_point_byte(self) -> u8 {
        ((self.blocked as u8) << 4)
            | ((self.substituted as u8) << 5)
            | ((self.not_topical as u8) << 6)
            | ((self.invalid as u8) << 7)
    }

    /// Check if no flag is set.
    #[inline]
    pub const fn is_good(&self) -> bool {
        !self.overflow && !self.blocked && !self.substituted && !self.not_topical && !self.invalid
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_good() {
            return f.write_str("good");
        }
        let mut first = true;
        for (set, tag) in [
            (self.overflow, "OV"),
            (self.blocked, "BL"),
            (self.substituted, "SB"),
            (self.not_topical, "NT"),
            (self.invalid, "IV"),
        ] {
            if set {
                if !first {
                    f.write_str("|")?;
                }
                first = false;
                f.write_str(tag)?;
            }
        }
        Ok(())
    }
}
