//! APCI: the 6-byte control prefix of every IEC 60870-5-104 frame.
//!
//! The control field distinguishes the three frame formats and carries the
//! 15-bit send/receive sequence numbers of the information transfer.

use crate::error::{Iec60870Error, Result};

/// Start byte of every IEC 104 frame.
pub const START_BYTE: u8 = 0x68;

/// Minimum value of the length byte (control field only).
pub const MIN_APDU_LENGTH: usize = 4;

/// Maximum value of the length byte.
pub const MAX_APDU_LENGTH: usize = 253;

/// Modulus of the send/receive sequence numbers (15 bits).
pub const SEQ_MODULO: u16 = 1 << 15;

/// Advance a 15-bit sequence number by one.
#[inline]
pub(crate) const fn seq_next(seq: u16) -> u16 {
    (seq + 1) & (SEQ_MODULO - 1)
}

/// Signed distance from `b` to `a` on the 15-bit sequence circle.
///
/// The result lies in `[-2^14, 2^14)`, so `a` acknowledges `b` exactly when
/// the difference is positive.
#[inline]
pub(crate) const fn seq_diff(a: u16, b: u16) -> i16 {
    let d = a.wrapping_sub(b) & (SEQ_MODULO - 1);
    if d >= SEQ_MODULO / 2 {
        (d as i32 - SEQ_MODULO as i32) as i16
    } else {
        d as i16
    }
}

/// Unnumbered control functions.
///
/// Exactly one function bit may be set in the first control byte of a
/// U-frame; the low two bits are always `0b11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UFunction {
    /// STARTDT act: request activation of data transfer.
    StartDtAct,
    /// STARTDT con: confirm activation of data transfer.
    StartDtCon,
    /// STOPDT act: request deactivation of data transfer.
    StopDtAct,
    /// STOPDT con: confirm deactivation of data transfer.
    StopDtCon,
    /// TESTFR act: link liveness probe.
    TestFrAct,
    /// TESTFR con: liveness probe answer.
    TestFrCon,
}

impl UFunction {
    /// The function bit in the first control byte.
    #[inline]
    pub const fn function_bit(self) -> u8 {
        match self {
            Self::StartDtAct => 0x04,
            Self::StartDtCon => 0x08,
            Self::StopDtAct => 0x10,
            Self::StopDtCon => 0x20,
            Self::TestFrAct => 0x40,
            Self::TestFrCon => 0x80,
        }
    }

    /// Full first control byte (function bit plus the U-format marker).
    #[inline]
    pub const fn control_byte(self) -> u8 {
        self.function_bit() | 0x03
    }

    /// Decode the upper six bits of the first control byte.
    ///
    /// Fails unless exactly one function bit is set.
    pub fn from_control_byte(byte: u8) -> Result<Self> {
        let bits = byte & 0xFC;
        match bits {
            0x04 => Ok(Self::StartDtAct),
            0x08 => Ok(Self::StartDtCon),
            0x10 => Ok(Self::StopDtAct),
            0x20 => Ok(Self::StopDtCon),
            0x40 => Ok(Self::TestFrAct),
            0x80 => Ok(Self::TestFrCon),
            _ => Err(Iec60870Error::malformed_apdu(format!(
                "invalid U-frame function bits: 0x{byte:02X}"
            ))),
        }
    }

    /// The confirmation answering this activation, if it is one.
    #[inline]
    pub const fn confirmation(self) -> Option<Self> {
        match self {
            Self::StartDtAct => Some(Self::StartDtCon),
            Self::StopDtAct => Some(Self::StopDtCon),
            Self::TestFrAct => Some(Self::TestFrCon),
            _ => None,
        }
    }
}

impl std::fmt::Display for UFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::StartDtAct => "STARTDT act",
            Self::StartDtCon => "STARTDT con",
            Self::StopDtAct => "STOPDT act",
            Self::StopDtCon => "STOPDT con",
            Self::TestFrAct => "TESTFR act",
            Self::TestFrCon => "TESTFR con",
        };
        f.write_str(name)
    }
}

/// Control field of an APDU: one of the three frame formats.
///
/// ```text
/// +--------+--------+--------+--------+--------+--------+
/// | 0x68   | Length | CF1    | CF2    | CF3    | CF4    |
/// +--------+--------+--------+--------+--------+--------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apci {
    /// Information transfer with send and receive sequence numbers.
    IFrame {
        /// Send sequence number (0..32768).
        send_seq: u16,
        /// Receive sequence number (0..32768).
        recv_seq: u16,
    },
    /// Supervisory acknowledgement carrying a receive sequence number.
    SFrame {
        /// Receive sequence number (0..32768).
        recv_seq: u16,
    },
    /// Unnumbered control function.
    UFrame {
        /// The control function.
        function: UFunction,
    },
}

impl Apci {
    /// Create an I-frame control field.
    #[inline]
    pub const fn i_frame(send_seq: u16, recv_seq: u16) -> Self {
        Self::IFrame { send_seq, recv_seq }
    }

    /// Create an S-frame control field.
    #[inline]
    pub const fn s_frame(recv_seq: u16) -> Self {
        Self::SFrame { recv_seq }
    }

    /// Create a U-frame control field.
    #[inline]
    pub const fn u_frame(function: UFunction) -> Self {
        Self::UFrame { function }
    }

    /// Decode the four control bytes.
    pub fn decode(control: [u8; 4]) -> Result<Self> {
        let [cf1, cf2, cf3, cf4] = control;

        if cf1 & 0x01 == 0 {
            // I format: bit 0 of the first byte is zero.
            let send_seq = ((cf1 >> 1) as u16) | ((cf2 as u16) << 7);
            let recv_seq = ((cf3 >> 1) as u16) | ((cf4 as u16) << 7);
            Ok(Self::IFrame { send_seq, recv_seq })
        } else if cf1 & 0x03 == 0x01 {
            // S format: bits 0..2 are 01 and the rest of CF1/CF2 is zero.
            if cf1 != 0x01 || cf2 != 0 {
                return Err(Iec60870Error::malformed_apdu_static(
                    "reserved bits set in S-frame control field",
                ));
            }
            let recv_seq = ((cf3 >> 1) as u16) | ((cf4 as u16) << 7);
            Ok(Self::SFrame { recv_seq })
        } else {
            // U format: bits 0..2 are 11.
            if cf2 != 0 || cf3 != 0 || cf4 != 0 {
                return Err(Iec60870Error::malformed_apdu_static(
                    "reserved bytes set in U-frame control field",
                ));
            }
            let function = UFunction::from_control_byte(cf1)?;
            Ok(Self::UFrame { function })
        }
    }

    /// Encode to the four control bytes.
    pub fn encode(&self) -> [u8; 4] {
        match *self {
            Self::IFrame { send_seq, recv_seq } => [
                ((send_seq & 0x7F) as u8) << 1,
                (send_seq >> 7) as u8,
                ((recv_seq & 0x7F) as u8) << 1,
                (recv_seq >> 7) as u8,
            ],
            Self::SFrame { recv_seq } => {
                [0x01, 0x00, ((recv_seq & 0x7F) as u8) << 1, (recv_seq >> 7) as u8]
            }
            Self::UFrame { function } => [function.control_byte(), 0x00, 0x00, 0x00],
        }
    }

    /// Check if this is an I-frame.
    #[inline]
    pub const fn is_i_frame(&self) -> bool {
        matches!(self, Self::IFrame { .. })
    }

    /// Check if this is an S-frame.
    #[inline]
    pub const fn is_s_frame(&self) -> bool {
        matches!(self, Self::SFrame { .. })
    }

    /// Check if this is a U-frame.
    #[inline]
    pub const fn is_u_frame(&self) -> bool {
        matches!(self, Self::UFrame { .. })
    }

    /// The send sequence number (I-frames only).
    #[inline]
    pub const fn send_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { send_seq, .. } => Some(*send_seq),
            _ => None,
        }
    }

    /// The receive sequence number (I- and S-frames).
    #[inline]
    pub const fn recv_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { recv_seq, .. } | Self::SFrame { recv_seq } => Some(*recv_seq),
            _ => None,
        }
    }
}

impl std::fmt::Display for Apci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IFrame { send_seq, recv_seq } => write!(f, "I(S={send_seq}, R={recv_seq})"),
            Self::SFrame { recv_seq } => write!(f, "S(R={recv_seq})"),
            Self::UFrame { function } => write!(f, "U({function})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i_frame_roundtrip() {
        for (s, r) in [(0, 0), (1, 1), (100, 50), (16383, 16383), (32767, 0), (0, 32767)] {
            let apci = Apci::i_frame(s, r);
            let decoded = Apci::decode(apci.encode()).unwrap();
            assert_eq!(decoded, apci);
            assert_eq!(decoded.send_seq(), Some(s));
            assert_eq!(decoded.recv_seq(), Some(r));
        }
    }

    #[test]
    fn test_s_frame_roundtrip() {
        for r in [0, 1, 100, 32767] {
            let apci = Apci::s_frame(r);
            let decoded = Apci::decode(apci.encode()).unwrap();
            assert_eq!(decoded, apci);
            assert_eq!(decoded.send_seq(), None);
            assert_eq!(decoded.recv_seq(), Some(r));
        }
    }

    #[test]
    fn test_u_frame_roundtrip() {
        for func in [
            UFunction::StartDtAct,
            UFunction::StartDtCon,
            UFunction::StopDtAct,
            UFunction::StopDtCon,
            UFunction::TestFrAct,
            UFunction::TestFrCon,
        ] {
            let apci = Apci::u_frame(func);
            assert_eq!(Apci::decode(apci.encode()).unwrap(), apci);
        }
    }

    #[test]
    fn test_u_frame_control_bytes() {
        assert_eq!(UFunction::StartDtAct.control_byte(), 0x07);
        assert_eq!(UFunction::StartDtCon.control_byte(), 0x0B);
        assert_eq!(UFunction::StopDtAct.control_byte(), 0x13);
        assert_eq!(UFunction::StopDtCon.control_byte(), 0x23);
        assert_eq!(UFunction::TestFrAct.control_byte(), 0x43);
        assert_eq!(UFunction::TestFrCon.control_byte(), 0x83);
    }

    #[test]
    fn test_u_frame_multiple_bits_rejected() {
        // STARTDT act and con bits set together.
        assert!(Apci::decode([0x0F, 0x00, 0x00, 0x00]).is_err());
        // No function bit at all.
        assert!(Apci::decode([0x03, 0x00, 0x00, 0x00]).is_err());
        // Non-zero trailing bytes.
        assert!(Apci::decode([0x07, 0x00, 0x01, 0x00]).is_err());
    }

    #[test]
    fn test_u_frame_confirmation_pairs() {
        assert_eq!(UFunction::StartDtAct.confirmation(), Some(UFunction::StartDtCon));
        assert_eq!(UFunction::StopDtAct.confirmation(), Some(UFunction::StopDtCon));
        assert_eq!(UFunction::TestFrAct.confirmation(), Some(UFunction::TestFrCon));
        assert_eq!(UFunction::TestFrCon.confirmation(), None);
    }

    #[test]
    fn test_seq_arithmetic() {
        assert_eq!(seq_next(0), 1);
        assert_eq!(seq_next(32767), 0);

        assert_eq!(seq_diff(5, 3), 2);
        assert_eq!(seq_diff(3, 5), -2);
        assert_eq!(seq_diff(0, 32767), 1);
        assert_eq!(seq_diff(32767, 0), -1);
        assert_eq!(seq_diff(10, 10), 0);
        // Extremes of the signed window.
        assert_eq!(seq_diff(16383, 0), 16383);
        assert_eq!(seq_diff(16384, 0), -16384);
    }

    #[test]
    fn test_seq_diff_range() {
        // The difference always lies in [-2^14, 2^14).
        for (a, b) in [(0u16, 0u16), (1, 32767), (20000, 5), (5, 20000), (16384, 0)] {
            let d = seq_diff(a, b);
            assert!((-16384..16384).contains(&(d as i32)), "diff({a},{b}) = {d}");
        }
    }

    #[test]
    fn test_apci_display() {
        assert_eq!(Apci::i_frame(10, 5).to_string(), "I(S=10, R=5)");
        assert_eq!(Apci::s_frame(20).to_string(), "S(R=20)");
        assert_eq!(
            Apci::u_frame(UFunction::TestFrAct).to_string(),
            "U(TESTFR act)"
        );
    }
}
