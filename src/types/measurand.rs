//! Monitor-direction information elements.
//!
//! Point information, step positions, bitstrings, measured values and
//! counter readings. Each element knows its fixed wire width and its
//! byte-exact encoding.

use crate::error::{Iec60870Error, Result};
use crate::types::Quality;

/// Single-point information with quality descriptor (SIQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinglePointInformation {
    /// The point state (OFF/ON).
    pub on: bool,
    /// Quality descriptor (no overflow flag in this encoding).
    pub quality: Quality,
}

impl SinglePointInformation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Create a point with good quality.
    #[inline]
    pub const fn new(on: bool) -> Self {
        Self {
            on,
            quality: Quality::GOOD,
        }
    }

    /// Parse from the SIQ byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            on: byte & 0x01 != 0,
            quality: Quality::from_point_byte(byte),
        }
    }

    /// Encode to the SIQ byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.on as u8) | self.quality.to_point_byte()
    }
}

impl std::fmt::Display for SinglePointInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", if self.on { "ON" } else { "OFF" }, self.quality)
    }
}

/// The two-bit state of double-point information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DoublePointState {
    /// Indeterminate or intermediate state (00).
    IndeterminateOrIntermediate = 0,
    /// Determined OFF (01).
    Off = 1,
    /// Determined ON (10).
    On = 2,
    /// Indeterminate state (11).
    Indeterminate = 3,
}

impl DoublePointState {
    /// Decode from the lower two bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::IndeterminateOrIntermediate,
            1 => Self::Off,
            2 => Self::On,
            _ => Self::Indeterminate,
        }
    }
}

impl std::fmt::Display for DoublePointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::IndeterminateOrIntermediate => "INDETERMINATE/INTERMEDIATE",
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Indeterminate => "INDETERMINATE",
        };
        f.write_str(name)
    }
}

/// Double-point information with quality descriptor (DIQ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoublePointInformation {
    /// The point state.
    pub state: DoublePointState,
    /// Quality descriptor (no overflow flag in this encoding).
    pub quality: Quality,
}

impl DoublePointInformation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Create a point with good quality.
    #[inline]
    pub const fn new(state: DoublePointState) -> Self {
        Self {
            state,
            quality: Quality::GOOD,
        }
    }

    /// Parse from the DIQ byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            state: DoublePointState::from_bits(byte),
            quality: Quality::from_point_byte(byte),
        }
    }

    /// Encode to the DIQ byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.state as u8) | self.quality.to_point_byte()
    }
}

impl std::fmt::Display for DoublePointInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.state, self.quality)
    }
}

/// Step position value with transient indicator (VTI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueWithTransientState {
    /// The step position, -64..=63.
    pub value: i8,
    /// True while the device is moving between positions.
    pub transient: bool,
}

impl ValueWithTransientState {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 1;

    /// Parse from the VTI byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        // Sign-extend the 7-bit two's complement value.
        let value = (((byte & 0x7F) << 1) as i8) >> 1;
        Self {
            value,
            transient: byte & 0x80 != 0,
        }
    }

    /// Encode to the VTI byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.value as u8 & 0x7F) | ((self.transient as u8) << 7)
    }
}

impl std::fmt::Display for ValueWithTransientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, if self.transient { " (transient)" } else { "" })
    }
}

/// Binary state information, 32 bits (BSI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryStateInformation(pub u32);

impl BinaryStateInformation {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 4;

    /// Parse from 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("BSI too short"));
        }
        Ok(Self(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
    }

    /// Encode to 4 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for BinaryStateInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Status and status change detection, 16+16 bits (SCD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAndStatusChanges {
    /// Current status of 16 points.
    pub status: u16,
    /// Change-detected flags of the same 16 points.
    pub changes: u16,
}

impl StatusAndStatusChanges {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 4;

    /// Parse from 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("SCD too short"));
        }
        Ok(Self {
            status: u16::from_le_bytes([bytes[0], bytes[1]]),
            changes: u16::from_le_bytes([bytes[2], bytes[3]]),
        })
    }

    /// Encode to 4 bytes.
    pub fn to_bytes(self) -> [u8; 4] {
        let s = self.status.to_le_bytes();
        let c = self.changes.to_le_bytes();
        [s[0], s[1], c[0], c[1]]
    }
}

impl std::fmt::Display for StatusAndStatusChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status=0x{:04X} changes=0x{:04X}", self.status, self.changes)
    }
}

/// Normalized value (NVA): signed 16 bits mapping onto [-1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedValue(i16);

impl NormalizedValue {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// Create from the raw wire value.
    #[inline]
    pub const fn new(raw: i16) -> Self {
        Self(raw)
    }

    /// Create from a normalized float, clamped to the representable range.
    pub fn from_normalized(value: f32) -> Self {
        let scaled = (value * 32768.0).round();
        Self(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16)
    }

    /// The raw wire value.
    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// The value mapped onto [-1, 1).
    #[inline]
    pub fn normalized(self) -> f32 {
        f32::from(self.0) / 32768.0
    }

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("NVA too short"));
        }
        Ok(Self(i16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.normalized())
    }
}

/// Scaled value (SVA): signed 16 bits used directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledValue(pub i16);

impl ScaledValue {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 2;

    /// Parse from 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("SVA too short"));
        }
        Ok(Self(i16::from_le_bytes([bytes[0], bytes[1]])))
    }

    /// Encode to 2 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for ScaledValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short floating point number (IEEE 754 single, little-endian).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortFloat(pub f32);

impl ShortFloat {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 4;

    /// Parse from 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("short float too short"));
        }
        Ok(Self(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
    }

    /// Encode to 4 bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for ShortFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary counter reading (BCR): 32-bit counter plus sequence and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryCounterReading {
    /// The counter value.
    pub counter: u32,
    /// Sequence number of the freeze operation (0-31).
    pub sequence: u8,
    /// Carry: the counter overflowed in the covered period.
    pub carry: bool,
    /// Adjusted: the counter was adjusted in the covered period.
    pub adjusted: bool,
    /// Invalid reading.
    pub invalid: bool,
}

impl BinaryCounterReading {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 5;

    /// Create a plain reading with sequence 0 and no flags.
    #[inline]
    pub const fn new(counter: u32) -> Self {
        Self {
            counter,
            sequence: 0,
            carry: false,
            adjusted: false,
            invalid: false,
        }
    }

    /// Parse from 5 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(Iec60870Error::malformed_payload_static("BCR too short"));
        }
        let flags = bytes[4];
        Ok(Self {
            counter: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            sequence: flags & 0x1F,
            carry: flags & 0x20 != 0,
            adjusted: flags & 0x40 != 0,
            invalid: flags & 0x80 != 0,
        })
    }

    /// Encode to 5 bytes.
    pub fn to_bytes(self) -> [u8; 5] {
        let c = self.counter.to_le_bytes();
        let flags = (self.sequence & 0x1F)
            | ((self.carry as u8) << 5)
            | ((self.adjusted as u8) << 6)
            | ((self.invalid as u8) << 7);
        [c[0], c[1], c[2], c[3], flags]
    }
}

impl std::fmt::Display for BinaryCounterReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (seq={})", self.counter, self.sequence)?;
        if self.carry {
            f.write_str(" CY")?;
        }
        if self.adjusted {
            f.write_str(" CA")?;
        }
        if self.invalid {
            f.write_str(" IV")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point() {
        let sp = SinglePointInformation::from_byte(0x81);
        assert!(sp.on);
        assert!(sp.quality.invalid);
        assert_eq!(sp.to_byte(), 0x81);

        assert_eq!(SinglePointInformation::new(true).to_byte(), 0x01);
        assert_eq!(SinglePointInformation::new(false).to_byte(), 0x00);
    }

    #[test]
    fn test_double_point() {
        let dp = DoublePointInformation::from_byte(0x02);
        assert_eq!(dp.state, DoublePointState::On);
        assert!(dp.quality.is_good());
        assert_eq!(dp.to_byte(), 0x02);

        let dp = DoublePointInformation::from_byte(0x91);
        assert_eq!(dp.state, DoublePointState::Off);
        assert!(dp.quality.invalid);
        assert!(dp.quality.blocked);
    }

    #[test]
    fn test_transient_value_sign_extension() {
        for value in [-64i8, -1, 0, 1, 63] {
            for transient in [false, true] {
                let vti = ValueWithTransientState { value, transient };
                let decoded = ValueWithTransientState::from_byte(vti.to_byte());
                assert_eq!(decoded, vti, "roundtrip failed for {value}");
            }
        }
    }

    #[test]
    fn test_bitstring_roundtrip() {
        let bsi = BinaryStateInformation(0xDEADBEEF);
        assert_eq!(bsi.to_bytes(), [0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(BinaryStateInformation::from_bytes(&bsi.to_bytes()).unwrap(), bsi);
    }

    #[test]
    fn test_status_changes_roundtrip() {
        let scd = StatusAndStatusChanges {
            status: 0x1234,
            changes: 0x8001,
        };
        assert_eq!(StatusAndStatusChanges::from_bytes(&scd.to_bytes()).unwrap(), scd);
    }

    #[test]
    fn test_normalized_value() {
        let nv = NormalizedValue::new(16384);
        assert!((nv.normalized() - 0.5).abs() < 1e-6);
        assert_eq!(NormalizedValue::from_bytes(&nv.to_bytes()).unwrap(), nv);

        assert_eq!(NormalizedValue::from_normalized(0.5).raw(), 16384);
        assert_eq!(NormalizedValue::from_normalized(-1.0).raw(), -32768);
        // Out-of-range input clamps instead of wrapping.
        assert_eq!(NormalizedValue::from_normalized(2.0).raw(), i16::MAX);
    }

    #[test]
    fn test_scaled_value_roundtrip() {
        let sv = ScaledValue(-1234);
        assert_eq!(sv.to_bytes(), [0x2E, 0xFB]);
        assert_eq!(ScaledValue::from_bytes(&sv.to_bytes()).unwrap(), sv);
    }

    #[test]
    fn test_short_float_roundtrip() {
        let sf = ShortFloat(23.5);
        assert_eq!(ShortFloat::from_bytes(&sf.to_bytes()).unwrap(), sf);
    }

    #[test]
    fn test_counter_reading_roundtrip() {
        let bcr = BinaryCounterReading {
            counter: 123_456,
            sequence: 5,
            carry: true,
            adjusted: false,
            invalid: true,
        };
        let bytes = bcr.to_bytes();
        assert_eq!(bytes[4], 0x05 | 0x20 | 0x80);
        assert_eq!(BinaryCounterReading::from_bytes(&bytes).unwrap(), bcr);
    }
}
