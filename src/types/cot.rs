//! Cause of transmission.
//!
//! Every ASDU names the reason it was sent. The cause occupies the lower
//! six bits of the COT byte; the test and negative-confirm flags ride in
//! the upper two bits and live on the [`Asdu`](crate::types::Asdu) itself.

use crate::error::{Iec60870Error, Result};

/// Cause of transmission of an ASDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cot {
    /// Periodic, cyclic (1).
    Periodic = 1,
    /// Background scan (2).
    Background = 2,
    /// Spontaneous (3).
    Spontaneous = 3,
    /// Initialised (4).
    Initialized = 4,
    /// Request or requested (5).
    Request = 5,
    /// Activation (6).
    Activation = 6,
    /// Activation confirmation (7).
    ActivationCon = 7,
    /// Deactivation (8).
    Deactivation = 8,
    /// Deactivation confirmation (9).
    DeactivationCon = 9,
    /// Activation termination (10).
    ActivationTermination = 10,
    /// Return information caused by a remote command (11).
    ReturnInfoRemote = 11,
    /// Return information caused by a local command (12).
    ReturnInfoLocal = 12,
    /// File transfer (13).
    FileTransfer = 13,
    /// Interrogated by station interrogation (20).
    InterrogatedByStation = 20,
    /// Interrogated by group interrogation, groups 1-16 (21-36).
    InterrogatedByGroup1 = 21,
    InterrogatedByGroup2 = 22,
    InterrogatedByGroup3 = 23,
    InterrogatedByGroup4 = 24,
    InterrogatedByGroup5 = 25,
    InterrogatedByGroup6 = 26,
    InterrogatedByGroup7 = 27,
    InterrogatedByGroup8 = 28,
    InterrogatedByGroup9 = 29,
    InterrogatedByGroup10 = 30,
    InterrogatedByGroup11 = 31,
    InterrogatedByGroup12 = 32,
    InterrogatedByGroup13 = 33,
    InterrogatedByGroup14 = 34,
    InterrogatedByGroup15 = 35,
    InterrogatedByGroup16 = 36,
    /// Requested by general counter request (37).
    RequestedByGeneralCounter = 37,
    /// Requested by group counter request, groups 1-4 (38-41).
    RequestedByGroup1Counter = 38,
    RequestedByGroup2Counter = 39,
    RequestedByGroup3Counter = 40,
    RequestedByGroup4Counter = 41,
    /// Unknown type identification (44).
    UnknownTypeId = 44,
    /// Unknown cause of transmission (45).
    UnknownCot = 45,
    /// Unknown common address of ASDU (46).
    UnknownCommonAddress = 46,
    /// Unknown information object address (47).
    UnknownIoa = 47,
}

impl Cot {
    /// Decode the cause from the lower six bits of the COT byte.
    ///
    /// Reserved cause codes are rejected; the standard leaves 14-19,
    /// 42-43 and 48-63 unassigned.
    pub fn from_u8(value: u8) -> Result<Self> {
        let code = value & 0x3F;
        let cot = match code {
            1 => Self::Periodic,
            2 => Self::Background,
            3 => Self::Spontaneous,
            4 => Self::Initialized,
            5 => Self::Request,
            6 => Self::Activation,
            7 => Self::ActivationCon,
            8 => Self::Deactivation,
            9 => Self::DeactivationCon,
            10 => Self::ActivationTermination,
            11 => Self::ReturnInfoRemote,
            12 => Self::ReturnInfoLocal,
            13 => Self::FileTransfer,
            20 => Self::InterrogatedByStation,
            21 => Self::InterrogatedByGroup1,
            22 => Self::InterrogatedByGroup2,
            23 => Self::InterrogatedByGroup3,
            24 => Self::InterrogatedByGroup4,
            25 => Self::InterrogatedByGroup5,
            26 => Self::InterrogatedByGroup6,
            27 => Self::InterrogatedByGroup7,
            28 => Self::InterrogatedByGroup8,
            29 => Self::InterrogatedByGroup9,
            30 => Self::InterrogatedByGroup10,
            31 => Self::InterrogatedByGroup11,
            32 => Self::InterrogatedByGroup12,
            33 => Self::InterrogatedByGroup13,
            34 => Self::InterrogatedByGroup14,
            35 => Self::InterrogatedByGroup15,
            36 => Self::InterrogatedByGroup16,
            37 => Self::RequestedByGeneralCounter,
            38 => Self::RequestedByGroup1Counter,
            39 => Self::RequestedByGroup2Counter,
            40 => Self::RequestedByGroup3Counter,
            41 => Self::RequestedByGroup4Counter,
            44 => Self::UnknownTypeId,
            45 => Self::UnknownCot,
            46 => Self::UnknownCommonAddress,
            47 => Self::UnknownIoa,
            _ => {
                return Err(Iec60870Error::malformed_payload(format!(
                    "reserved cause of transmission: {code}"
                )))
            }
        };
        Ok(cot)
    }

    /// The raw cause code.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this cause is a confirmation of a command.
    #[inline]
    pub const fn is_confirmation(&self) -> bool {
        matches!(
            self,
            Self::ActivationCon | Self::DeactivationCon | Self::ActivationTermination
        )
    }

    /// Check if this cause reports an addressing or type error.
    #[inline]
    pub const fn is_error_report(&self) -> bool {
        matches!(
            self,
            Self::UnknownTypeId | Self::UnknownCot | Self::UnknownCommonAddress | Self::UnknownIoa
        )
    }

    /// Check if this cause answers a station or group interrogation.
    #[inline]
    pub const fn is_interrogation_response(&self) -> bool {
        matches!(self.as_u8(), 20..=36)
    }

    /// Check if this cause answers a counter request.
    #[inline]
    pub const fn is_counter_response(&self) -> bool {
        matches!(self.as_u8(), 37..=41)
    }

    /// Short textual name of the cause.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Periodic => "Periodic",
            Self::Background => "Background",
            Self::Spontaneous => "Spontaneous",
            Self::Initialized => "Initialized",
            Self::Request => "Request",
            Self::Activation => "Activation",
            Self::ActivationCon => "ActivationCon",
            Self::Deactivation => "Deactivation",
            Self::DeactivationCon => "DeactivationCon",
            Self::ActivationTermination => "ActivationTermination",
            Self::ReturnInfoRemote => "ReturnInfoRemote",
            Self::ReturnInfoLocal => "ReturnInfoLocal",
            Self::FileTransfer => "FileTransfer",
            Self::InterrogatedByStation => "InterrogatedByStation",
            Self::InterrogatedByGroup1 => "InterrogatedByGroup1",
            Self::InterrogatedByGroup2 => "InterrogatedByGroup2",
            Self::InterrogatedByGroup3 => "InterrogatedByGroup3",
            Self::InterrogatedByGroup4 => "InterrogatedByGroup4",
            Self::InterrogatedByGroup5 => "InterrogatedByGroup5",
            Self::InterrogatedByGroup6 => "InterrogatedByGroup6",
            Self::InterrogatedByGroup7 => "InterrogatedByGroup7",
            Self::InterrogatedByGroup8 => "InterrogatedByGroup8",
            Self::InterrogatedByGroup9 => "InterrogatedByGroup9",
            Self::InterrogatedByGroup10 => "InterrogatedByGroup10",
            Self::InterrogatedByGroup11 => "InterrogatedByGroup11",
            Self::InterrogatedByGroup12 => "InterrogatedByGroup12",
            Self::InterrogatedByGroup13 => "InterrogatedByGroup13",
            Self::InterrogatedByGroup14 => "InterrogatedByGroup14",
            Self::InterrogatedByGroup15 => "InterrogatedByGroup15",
            Self::InterrogatedByGroup16 => "InterrogatedByGroup16",
            Self::RequestedByGeneralCounter => "RequestedByGeneralCounter",
            Self::RequestedByGroup1Counter => "RequestedByGroup1Counter",
            Self::RequestedByGroup2Counter => "RequestedByGroup2Counter",
            Self::RequestedByGroup3Counter => "RequestedByGroup3Counter",
            Self::RequestedByGroup4Counter => "RequestedByGroup4Counter",
            Self::UnknownTypeId => "UnknownTypeId",
            Self::UnknownCot => "UnknownCot",
            Self::UnknownCommonAddress => "UnknownCommonAddress",
            Self::UnknownIoa => "UnknownIoa",
        }
    }
}

impl std::fmt::Display for Cot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_assigned_codes_roundtrip() {
        let assigned: Vec<u8> = (1..=13).chain(20..=41).chain(44..=47).collect();
        for code in assigned {
            let cot = Cot::from_u8(code).unwrap();
            assert_eq!(cot.as_u8(), code, "roundtrip failed for cause {code}");
        }
    }

    #[test]
    fn test_reserved_codes_rejected() {
        for code in [0u8, 14, 15, 16, 17, 18, 19, 42, 43, 48, 55, 63] {
            assert!(Cot::from_u8(code).is_err(), "cause {code} should be rejected");
        }
    }

    #[test]
    fn test_flag_bits_masked() {
        // The test and negative-confirm flags must not change the cause.
        assert_eq!(Cot::from_u8(0x80 | 3).unwrap(), Cot::Spontaneous);
        assert_eq!(Cot::from_u8(0x40 | 6).unwrap(), Cot::Activation);
        assert_eq!(Cot::from_u8(0xC0 | 7).unwrap(), Cot::ActivationCon);
    }

    #[test]
    fn test_predicates() {
        assert!(Cot::ActivationCon.is_confirmation());
        assert!(Cot::ActivationTermination.is_confirmation());
        assert!(!Cot::Activation.is_confirmation());

        assert!(Cot::UnknownIoa.is_error_report());
        assert!(!Cot::Spontaneous.is_error_report());

        assert!(Cot::InterrogatedByStation.is_interrogation_response());
        assert!(Cot::InterrogatedByGroup16.is_interrogation_response());
        assert!(!Cot::RequestedByGeneralCounter.is_interrogation_response());

        assert!(Cot::RequestedByGroup4Counter.is_counter_response());
        assert!(!Cot::Spontaneous.is_counter_response());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cot::Spontaneous.to_string(), "Spontaneous");
        assert_eq!(Cot::ActivationCon.to_string(), "ActivationCon");
    }
}
