//! Control-direction information elements.
//!
//! Command outputs and the qualifier bytes that parameterize commands,
//! interrogations and resets.

use crate::error::{Iec60870Error, Result};

/// Single command output (SCO).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleCommand {
    /// Commanded state (OFF/ON).
    pub on: bool,
    /// Qualifier of command (0-31, 0 = no additional definition).
    pub qualifier: u8,
    /// Select (true) or execute (false).
    pub select: bool,
}

impl SingleCommand {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Create an execute command with qualifier 0.
    #[inline]
    pub const fn new(on: bool) -> Self {
        Self {
            on,
            qualifier: 0,
            select: false,
        }
    }

    /// Parse from the SCO byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            on: byte & 0x01 != 0,
            qualifier: (byte >> 2) & 0x1F,
            select: byte & 0x80 != 0,
        }
    }

    /// Encode to the SCO byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.on as u8) | ((self.qualifier & 0x1F) << 2) | ((self.select as u8) << 7)
    }
}

impl std::fmt::Display for SingleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            if self.select { "select" } else { "execute" },
            if self.on { "ON" } else { "OFF" }
        )
    }
}

/// Double command output (DCO).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleCommand {
    /// Commanded state on the double-point scale.
    pub state: crate::types::DoublePointState,
    /// Qualifier of command (0-31).
    pub qualifier: u8,
    /// Select (true) or execute (false).
    pub select: bool,
}

impl DoubleCommand {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the DCO byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            state: crate::types::DoublePointState::from_bits(byte),
            qualifier: (byte >> 2) & 0x1F,
            select: byte & 0x80 != 0,
        }
    }

    /// Encode to the DCO byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.state as u8) | ((self.qualifier & 0x1F) << 2) | ((self.select as u8) << 7)
    }
}

impl std::fmt::Display for DoubleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            if self.select { "select" } else { "execute" },
            self.state
        )
    }
}

/// The two-bit step of a regulating step command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegulatingStep {
    /// Not permitted (00).
    NotPermitted0 = 0,
    /// Next step lower (01).
    Lower = 1,
    /// Next step higher (10).
    Higher = 2,
    /// Not permitted (11).
    NotPermitted3 = 3,
}

impl RegulatingStep {
    /// Decode from the lower two bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::NotPermitted0,
            1 => Self::Lower,
            2 => Self::Higher,
            _ => Self::NotPermitted3,
        }
    }
}

/// Regulating step command (RCO).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegulatingStepCommand {
    /// The commanded step.
    pub step: RegulatingStep,
    /// Qualifier of command (0-31).
    pub qualifier: u8,
    /// Select (true) or execute (false).
    pub select: bool,
}

impl RegulatingStepCommand {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the RCO byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            step: RegulatingStep::from_bits(byte),
            qualifier: (byte >> 2) & 0x1F,
            select: byte & 0x80 != 0,
        }
    }

    /// Encode to the RCO byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.step as u8) | ((self.qualifier & 0x1F) << 2) | ((self.select as u8) << 7)
    }
}

/// Qualifier of set-point command (QOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetPointQualifier {
    /// QL field (0-127, 0 = default).
    pub ql: u8,
    /// Select (true) or execute (false).
    pub select: bool,
}

impl SetPointQualifier {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Execute with the default QL.
    #[inline]
    pub const fn execute() -> Self {
        Self {
            ql: 0,
            select: false,
        }
    }

    /// Parse from the QOS byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            ql: byte & 0x7F,
            select: byte & 0x80 != 0,
        }
    }

    /// Encode to the QOS byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.ql & 0x7F) | ((self.select as u8) << 7)
    }
}

/// Qualifier of interrogation (QOI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierOfInterrogation(pub u8);

impl QualifierOfInterrogation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Station interrogation (global).
    pub const STATION: Self = Self(20);

    /// Interrogation of group `n` (1-16).
    #[inline]
    pub const fn group(n: u8) -> Self {
        Self(20 + n)
    }
}

impl std::fmt::Display for QualifierOfInterrogation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            20 => f.write_str("station"),
            21..=36 => write!(f, "group {}", self.0 - 20),
            other => write!(f, "qoi {other}"),
        }
    }
}

/// Qualifier of counter interrogation command (QCC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierOfCounterInterrogation {
    /// Request qualifier (0-63; 5 = general request counter).
    pub request: u8,
    /// Freeze/reset qualifier (0-3).
    pub freeze: u8,
}

impl QualifierOfCounterInterrogation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the QCC byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            request: byte & 0x3F,
            freeze: byte >> 6,
        }
    }

    /// Encode to the QCC byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.request & 0x3F) | ((self.freeze & 0x03) << 6)
    }
}

/// Qualifier of parameter of measured values (QPM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierOfParameter {
    /// Kind of parameter (1 = threshold, 2 = smoothing factor, 3 = low
    /// limit, 4 = high limit).
    pub kind: u8,
    /// Local parameter change flag.
    pub change: bool,
    /// Parameter not in operation.
    pub not_in_operation: bool,
}

impl QualifierOfParameter {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the QPM byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            kind: byte & 0x3F,
            change: byte & 0x40 != 0,
            not_in_operation: byte & 0x80 != 0,
        }
    }

    /// Encode to the QPM byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.kind & 0x3F) | ((self.change as u8) << 6) | ((self.not_in_operation as u8) << 7)
    }
}

/// Qualifier of parameter activation (QPA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierOfParameterActivation(pub u8);

impl QualifierOfParameterActivation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;
}

/// Qualifier of reset process command (QRP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierOfResetProcess(pub u8);

impl QualifierOfResetProcess {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// General reset of process.
    pub const GENERAL: Self = Self(1);
}

/// Cause of initialization (COI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CauseOfInitialization {
    /// Cause (0 = local power on, 1 = local manual reset, 2 = remote reset).
    pub cause: u8,
    /// Initialization after change of local parameters.
    pub after_parameter_change: bool,
}

impl CauseOfInitialization {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Local power on.
    #[inline]
    pub const fn power_on() -> Self {
        Self {
            cause: 0,
            after_parameter_change: false,
        }
    }

    /// Parse from the COI byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            cause: byte & 0x7F,
            after_parameter_change: byte & 0x80 != 0,
        }
    }

    /// Encode to the COI byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.cause & 0x7F) | ((self.after_parameter_change as u8) << 7)
    }
}

/// Fixed test bit pattern (FBP) of the test command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTestBitPattern(pub u16);

impl FixedTestBitPattern {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// The pattern the standard prescribes.
    pub const PATTERN: u16 = 0x55AA;

    /// Create the standard pattern.
    #[inline]
    pub const fn new() -> Self {
        Self(Self::PATTERN)
    }

    /// Whether the received pattern is the prescribed one.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 == Self::PATTERN
    }

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("FBP too short"));
        }
        Ok(Self(u16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl Default for FixedTestBitPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Test sequence counter (TSC) of the time-tagged test command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSequenceCounter(pub u16);

impl TestSequenceCounter {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("TSC too short"));
        }
        Ok(Self(u16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DoublePointState;

    #[test]
    fn test_single_command_bits() {
        // SCS in bit 0, qualifier in bits 2-6, S/E in bit 7.
        let sco = SingleCommand {
            on: true,
            qualifier: 1,
            select: true,
        };
        assert_eq!(sco.to_byte(), 0x01 | 0x04 | 0x80);
        assert_eq!(SingleCommand::from_byte(sco.to_byte()), sco);

        assert_eq!(SingleCommand::new(true).to_byte(), 0x01);
    }

    #[test]
    fn test_double_command_bits() {
        let dco = DoubleCommand {
            state: DoublePointState::On,
            qualifier: 0,
            select: false,
        };
        assert_eq!(dco.to_byte(), 0x02);
        assert_eq!(DoubleCommand::from_byte(0x82).select, true);
        assert_eq!(DoubleCommand::from_byte(dco.to_byte()), dco);
    }

    #[test]
    fn test_regulating_step_roundtrip() {
        for step in [
            RegulatingStep::NotPermitted0,
            RegulatingStep::Lower,
            RegulatingStep::Higher,
            RegulatingStep::NotPermitted3,
        ] {
            let rco = RegulatingStepCommand {
                step,
                qualifier: 3,
                select: true,
            };
            assert_eq!(RegulatingStepCommand::from_byte(rco.to_byte()), rco);
        }
    }

    #[test]
    fn test_setpoint_qualifier() {
        let qos = SetPointQualifier {
            ql: 0x7F,
            select: true,
        };
        assert_eq!(qos.to_byte(), 0xFF);
        assert_eq!(SetPointQualifier::from_byte(0xFF), qos);
        assert_eq!(SetPointQualifier::execute().to_byte(), 0x00);
    }

    #[test]
    fn test_interrogation_qualifier() {
        assert_eq!(QualifierOfInterrogation::STATION.0, 20);
        assert_eq!(QualifierOfInterrogation::group(16).0, 36);
        assert_eq!(QualifierOfInterrogation::STATION.to_string(), "station");
        assert_eq!(QualifierOfInterrogation::group(3).to_string(), "group 3");
    }

    #[test]
    fn test_counter_interrogation_qualifier() {
        let qcc = QualifierOfCounterInterrogation {
            request: 5,
            freeze: 2,
        };
        assert_eq!(qcc.to_byte(), 5 | 0x80);
        assert_eq!(QualifierOfCounterInterrogation::from_byte(qcc.to_byte()), qcc);
    }

    #[test]
    fn test_parameter_qualifier() {
        let qpm = QualifierOfParameter {
            kind: 1,
            change: true,
            not_in_operation: false,
        };
        assert_eq!(qpm.to_byte(), 0x41);
        assert_eq!(QualifierOfParameter::from_byte(0x41), qpm);
    }

    #[test]
    fn test_cause_of_initialization() {
        let coi = CauseOfInitialization {
            cause: 2,
            after_parameter_change: true,
        };
        assert_eq!(coi.to_byte(), 0x82);
        assert_eq!(CauseOfInitialization::from_byte(0x82), coi);
        assert_eq!(CauseOfInitialization::power_on().to_byte(), 0);
    }

    #[test]
    fn test_fixed_test_pattern() {
        let fbp = FixedTestBitPattern::new();
        assert!(fbp.is_valid());
        assert_eq!(fbp.to_bytes(), [0xAA, 0x55]);
        assert!(!FixedTestBitPattern(0x1234).is_valid());
        assert_eq!(FixedTestBitPattern::from_bytes(&[0xAA, 0x55]).unwrap(), fbp);
    }

    #[test]
    fn test_test_sequence_counter() {
        let tsc = TestSequenceCounter(0xBEEF);
        assert_eq!(TestSequenceCounter::from_bytes(&tsc.to_bytes()).unwrap(), tsc);
    }
}
