//! # voltage_iec60870
//!
//! IEC 60870-5-104 telecontrol protocol library for Rust.
//!
//! A peer endpoint that acts as either controlling station (client) or
//! controlled station (server) over TCP, exchanging APDUs that frame
//! ASDUs. The crate covers the frame codec, the full standardised
//! information element catalogue, and the link state machine with its
//! three protocol timers (t1/t2/t3), sequence numbers and k/w
//! flow-control window.
//!
//! ## Quick start: controlling station
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use voltage_iec60870::{
//!     connect, Asdu, Connection, ConnectionListener, ConnectionSettings, Iec60870Error,
//!     QualifierOfInterrogation,
//! };
//!
//! struct Printer;
//!
//! #[async_trait::async_trait]
//! impl ConnectionListener for Printer {
//!     async fn on_asdu_received(&self, _connection: &Connection, asdu: Asdu) {
//!         println!("received {asdu}");
//!     }
//!     async fn on_connection_lost(&self, _connection: &Connection, error: Iec60870Error) {
//!         eprintln!("connection lost: {error}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> voltage_iec60870::Result<()> {
//!     let settings = ConnectionSettings::default();
//!     let connection = connect("192.168.1.100:2404", settings, Arc::new(Printer)).await?;
//!     connection.start_data_transfer(Duration::from_secs(15)).await?;
//!     connection.interrogation(1, QualifierOfInterrogation::STATION).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Quick start: controlled station
//!
//! Implement [`ConnectionAcceptor`] and hand it to [`listen`]; every
//! incoming connection arrives with its read path already running and
//! answers STARTDT/STOPDT/TESTFR on its own.
//!
//! ## Protocol overview
//!
//! IEC 60870-5-104 runs over TCP (default port 2404) with three frame
//! formats:
//!
//! - **I-frame**: numbered information transfer carrying an ASDU
//! - **S-frame**: supervisory acknowledgement
//! - **U-frame**: unnumbered control (STARTDT, STOPDT, TESTFR)
//!
//! ```text
//! APCI (6 bytes):
//! +--------+--------+--------+--------+--------+--------+
//! | 0x68   | Length | Control Field (4 bytes)           |
//! +--------+--------+--------+--------+--------+--------+
//! ```

pub mod codec;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod settings;
pub mod types;

pub use codec::{Apdu, ApduCodec, MAX_ASDU_LENGTH};
pub use connection::{Connection, ConnectionListener, LinkState};
pub use endpoint::{connect, listen, ConnectionAcceptor, Server};
pub use error::{Iec60870Error, Result};
pub use settings::{
    CommonAddressFieldLength, ConnectionSettings, CotFieldLength, IoaFieldLength,
};
pub use types::*;

/// Default IEC 60870-5-104 TCP port.
pub const DEFAULT_PORT: u16 = 2404;
