//! Connection parameters for IEC 60870-5-104 links.
//!
//! A [`ConnectionSettings`] value is created once, handed to the endpoint
//! factory, and is immutable for the lifetime of the connection it
//! configures. Both stations of a link must agree on the three field
//! lengths for the wire format to line up.

use std::time::Duration;

/// Default t1 timeout (acknowledgement) in seconds.
pub const DEFAULT_T1_TIMEOUT: u64 = 15;

/// Default t2 timeout (delayed supervisory acknowledgement) in seconds.
pub const DEFAULT_T2_TIMEOUT: u64 = 10;

/// Default t3 timeout (idle test frame) in seconds.
pub const DEFAULT_T3_TIMEOUT: u64 = 20;

/// Default k parameter (max outstanding sent I-frames).
pub const DEFAULT_K: u16 = 12;

/// Default w parameter (max received I-frames before an S-frame is due).
pub const DEFAULT_W: u16 = 8;

/// Width of the cause-of-transmission field on the wire.
///
/// With two bytes the second byte carries the originator address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CotFieldLength {
    /// Cause byte only, no originator address.
    One,
    /// Cause byte followed by the originator address (the 104 default).
    Two,
}

impl CotFieldLength {
    /// Number of bytes this choice occupies.
    #[inline]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Width of the common address of ASDU on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonAddressFieldLength {
    /// Station addresses 1–254, broadcast 255.
    One,
    /// Station addresses 1–65534, broadcast 65535 (the 104 default).
    Two,
}

impl CommonAddressFieldLength {
    /// Number of bytes this choice occupies.
    #[inline]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Width of the information object address on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoaFieldLength {
    /// Addresses up to 2^8 - 1.
    One,
    /// Addresses up to 2^16 - 1.
    Two,
    /// Addresses up to 2^24 - 1 (the 104 default).
    Three,
}

impl IoaFieldLength {
    /// Number of bytes this choice occupies.
    #[inline]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Largest address representable at this width.
    #[inline]
    pub const fn max_address(self) -> u32 {
        match self {
            Self::One => 0xFF,
            Self::Two => 0xFFFF,
            Self::Three => 0xFF_FFFF,
        }
    }
}

/// Immutable parameters of one IEC 60870-5-104 connection.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Timeout for completing a partially received APDU.
    pub message_fragment_timeout: Duration,
    /// Width of the cause-of-transmission field.
    pub cot_field_length: CotFieldLength,
    /// Width of the common address of ASDU.
    pub common_address_field_length: CommonAddressFieldLength,
    /// Width of the information object address.
    pub ioa_field_length: IoaFieldLength,
    /// t1: time to wait for an acknowledgement of a sent I-frame or for a
    /// STARTDT/STOPDT/TESTFR confirmation.
    pub t1_timeout: Duration,
    /// t2: time after the first unacknowledged received I-frame before a
    /// supervisory frame is emitted. Must be shorter than t1.
    pub t2_timeout: Duration,
    /// t3: idle time after which a TESTFR act probes the link.
    pub t3_timeout: Duration,
    /// k: max unacknowledged sent I-frames before `send` blocks.
    pub k: u16,
    /// w: max received I-frames before an S-frame must be emitted.
    pub w: u16,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            message_fragment_timeout: Duration::from_secs(5),
            cot_field_length: CotFieldLength::Two,
            common_address_field_length: CommonAddressFieldLength::Two,
            ioa_field_length: IoaFieldLength::Three,
            t1_timeout: Duration::from_secs(DEFAULT_T1_TIMEOUT),
            t2_timeout: Duration::from_secs(DEFAULT_T2_TIMEOUT),
            t3_timeout: Duration::from_secs(DEFAULT_T3_TIMEOUT),
            k: DEFAULT_K,
            w: DEFAULT_W,
        }
    }
}

impl ConnectionSettings {
    /// Create settings with the standard 104 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the fragment completion timeout.
    pub fn message_fragment_timeout(mut self, timeout: Duration) -> Self {
        self.message_fragment_timeout = timeout;
        self
    }

    /// Set the cause-of-transmission field width.
    pub fn cot_field_length(mut self, length: CotFieldLength) -> Self {
        self.cot_field_length = length;
        self
    }

    /// Set the common address field width.
    pub fn common_address_field_length(mut self, length: CommonAddressFieldLength) -> Self {
        self.common_address_field_length = length;
        self
    }

    /// Set the information object address width.
    pub fn ioa_field_length(mut self, length: IoaFieldLength) -> Self {
        self.ioa_field_length = length;
        self
    }

    /// Set t1.
    pub fn t1_timeout(mut self, timeout: Duration) -> Self {
        self.t1_timeout = timeout;
        self
    }

    /// Set t2. Keep it shorter than t1.
    pub fn t2_timeout(mut self, timeout: Duration) -> Self {
        self.t2_timeout = timeout;
        self
    }

    /// Set t3.
    pub fn t3_timeout(mut self, timeout: Duration) -> Self {
        self.t3_timeout = timeout;
        self
    }

    /// Set the k window.
    pub fn k(mut self, k: u16) -> Self {
        self.k = k;
        self
    }

    /// Set the w threshold.
    pub fn w(mut self, w: u16) -> Self {
        self.w = w;
        self
    }
}
