//! APDU framing for tokio.
//!
//! [`ApduCodec`] implements the tokio-util codec traits over the IEC 104
//! frame format: start byte `0x68`, a length byte covering everything
//! after it, the four control bytes, and for I-format frames the ASDU.
//!
//! Framing errors are unrecoverable by design. A stream that presents a
//! wrong start byte or an out-of-range length has lost frame alignment,
//! and the only safe resynchronisation point is a fresh TCP connection.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{Iec60870Error, Result};
use crate::settings::ConnectionSettings;
use crate::types::{Apci, Asdu, UFunction, MAX_APDU_LENGTH, MIN_APDU_LENGTH, START_BYTE};

/// Largest ASDU that fits an APDU next to the four control bytes.
pub const MAX_ASDU_LENGTH: usize = MAX_APDU_LENGTH - 4;

/// One application protocol data unit.
///
/// The control field plus, for I-format frames, the ASDU it transports.
#[derive(Debug, Clone, PartialEq)]
pub struct Apdu {
    /// The control field.
    pub apci: Apci,
    /// The transported ASDU (I-format only).
    pub asdu: Option<Asdu>,
}

impl Apdu {
    /// Create an I-frame carrying an ASDU.
    pub fn i_frame(send_seq: u16, recv_seq: u16, asdu: Asdu) -> Self {
        Self {
            apci: Apci::i_frame(send_seq, recv_seq),
            asdu: Some(asdu),
        }
    }

    /// Create a supervisory frame.
    pub fn s_frame(recv_seq: u16) -> Self {
        Self {
            apci: Apci::s_frame(recv_seq),
            asdu: None,
        }
    }

    /// Create an unnumbered control frame.
    pub fn u_frame(function: UFunction) -> Self {
        Self {
            apci: Apci::u_frame(function),
            asdu: None,
        }
    }
}

impl std::fmt::Display for Apdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.apci)?;
        if let Some(asdu) = &self.asdu {
            write!(f, " {asdu}")?;
        }
        Ok(())
    }
}

/// Settings-aware APDU codec.
///
/// The field-length parameters of the connection feed the ASDU layer, so
/// the codec is constructed per connection rather than shared.
#[derive(Debug, Clone)]
pub struct ApduCodec {
    settings: ConnectionSettings,
}

impl ApduCodec {
    /// Create a codec for one connection's settings.
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    /// Whether `buf` holds the beginning of an incomplete frame.
    ///
    /// The connection's read loop uses this to decide when the fragment
    /// timeout applies.
    pub fn mid_frame(&self, buf: &BytesMut) -> bool {
        !buf.is_empty()
    }
}

impl Decoder for ApduCodec {
    type Item = Apdu;
    type Error = Iec60870Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Apdu>> {
        match src.first() {
            None => return Ok(None),
            Some(&START_BYTE) => {}
            Some(&other) => {
                return Err(Iec60870Error::malformed_apdu(format!(
                    "expected start byte 0x68, got 0x{other:02X}"
                )));
            }
        }
        if src.len() < 2 {
            return Ok(None);
        }

        let length = src[1] as usize;
        if !(MIN_APDU_LENGTH..=MAX_APDU_LENGTH).contains(&length) {
            return Err(Iec60870Error::malformed_apdu(format!(
                "APDU length {length} outside 4..=253"
            )));
        }

        if src.len() < 2 + length {
            return Ok(None);
        }

        let frame = src.split_to(2 + length);
        let apci = Apci::decode([frame[2], frame[3], frame[4], frame[5]])?;

        let asdu = if apci.is_i_frame() {
            if length == MIN_APDU_LENGTH {
                return Err(Iec60870Error::malformed_apdu_static("I-frame without ASDU"));
            }
            Some(Asdu::decode(&frame[6..], &self.settings)?)
        } else {
            if length != MIN_APDU_LENGTH {
                return Err(Iec60870Error::malformed_apdu_static(
                    "payload on a supervisory or unnumbered frame",
                ));
            }
            None
        };

        Ok(Some(Apdu { apci, asdu }))
    }
}

impl Encoder<Apdu> for ApduCodec {
    type Error = Iec60870Error;

    fn encode(&mut self, item: Apdu, dst: &mut BytesMut) -> Result<()> {
        let asdu_len = item
            .asdu
            .as_ref()
            .map(|a| a.wire_size(&self.settings))
            .unwrap_or(0);
        if asdu_len > MAX_ASDU_LENGTH {
            return Err(Iec60870Error::malformed_payload(format!(
                "ASDU of {asdu_len} bytes exceeds the APDU size limit"
            )));
        }

        dst.reserve(2 + MIN_APDU_LENGTH + asdu_len);
        dst.extend_from_slice(&[START_BYTE, (MIN_APDU_LENGTH + asdu_len) as u8]);
        dst.extend_from_slice(&item.apci.encode());
        if let Some(asdu) = &item.asdu {
            asdu.encode(dst, &self.settings)?;
        }
        Ok(())
    }
}

/// Read one APDU from `buf`, pulling more bytes from `io` as needed.
///
/// Waiting for the first byte of a frame is unbounded (idle supervision
/// belongs to the t3 timer); once part of a frame is buffered, a stall
/// longer than the fragment timeout fails with `FragmentTimeout`.
pub(crate) async fn read_apdu<R>(
    io: &mut R,
    codec: &mut ApduCodec,
    buf: &mut BytesMut,
) -> Result<Apdu>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    loop {
        if let Some(apdu) = codec.decode(buf)? {
            return Ok(apdu);
        }

        let n = if codec.mid_frame(buf) {
            tokio::time::timeout(codec.settings.message_fragment_timeout, io.read_buf(buf))
                .await
                .map_err(|_| Iec60870Error::FragmentTimeout)??
        } else {
            io.read_buf(buf).await?
        };
        if n == 0 {
            return Err(Iec60870Error::TransportClosed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Cot, InformationElement, InformationObject, Quality, ScaledValue, TypeId,
    };

    fn codec() -> ApduCodec {
        ApduCodec::new(ConnectionSettings::default())
    }

    fn scaled_asdu() -> Asdu {
        Asdu::new(
            TypeId::MeasuredScaled,
            Cot::Spontaneous,
            1,
            vec![InformationObject::new(
                100u32,
                vec![
                    InformationElement::Scaled(ScaledValue(1234)),
                    InformationElement::Quality(Quality::GOOD),
                ],
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_u_frame_bytes() {
        let mut buf = BytesMut::new();
        codec()
            .encode(Apdu::u_frame(UFunction::StartDtAct), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], &[0x68, 0x04, 0x07, 0x00, 0x00, 0x00]);

        let apdu = codec().decode(&mut buf).unwrap().unwrap();
        assert_eq!(apdu, Apdu::u_frame(UFunction::StartDtAct));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_s_frame_bytes() {
        let mut buf = BytesMut::new();
        codec().encode(Apdu::s_frame(1), &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x68, 0x04, 0x01, 0x00, 0x02, 0x00]);

        let apdu = codec().decode(&mut buf).unwrap().unwrap();
        assert_eq!(apdu, Apdu::s_frame(1));
    }

    #[test]
    fn test_i_frame_roundtrip() {
        let apdu = Apdu::i_frame(10, 5, scaled_asdu());
        let mut buf = BytesMut::new();
        codec().encode(apdu.clone(), &mut buf).unwrap();
        // Length byte covers control field plus ASDU.
        assert_eq!(buf[1], 4 + 12);

        let decoded = codec().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, apdu);
    }

    #[test]
    fn test_partial_frames_return_none() {
        let mut codec = codec();

        let mut buf = BytesMut::from(&[0x68][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&[0x04, 0x07, 0x00]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&[0x00, 0x00]);
        assert!(codec.decode(&mut buf).unwrap().is_some());
    }

    #[test]
    fn test_multiple_frames_in_buffer() {
        let mut codec = codec();
        let mut buf = BytesMut::from(
            &[
                0x68, 0x04, 0x07, 0x00, 0x00, 0x00, // STARTDT act
                0x68, 0x04, 0x0B, 0x00, 0x00, 0x00, // STARTDT con
            ][..],
        );

        assert_eq!(
            codec.decode(&mut buf).unwrap().unwrap(),
            Apdu::u_frame(UFunction::StartDtAct)
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap().unwrap(),
            Apdu::u_frame(UFunction::StartDtCon)
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_bad_start_byte_is_fatal() {
        let mut buf = BytesMut::from(&[0xFF, 0x04, 0x07, 0x00, 0x00, 0x00][..]);
        assert!(matches!(
            codec().decode(&mut buf),
            Err(Iec60870Error::MalformedApdu(_))
        ));
    }

    #[test]
    fn test_out_of_range_length_is_fatal() {
        for length in [0x00u8, 0x03, 0xFE, 0xFF] {
            let mut buf = BytesMut::from(&[0x68, length, 0, 0, 0, 0][..]);
            assert!(
                matches!(codec().decode(&mut buf), Err(Iec60870Error::MalformedApdu(_))),
                "length {length} should be rejected"
            );
        }
    }

    #[test]
    fn test_s_frame_with_payload_is_fatal() {
        // S-frame announcing 6 bytes of content.
        let mut buf = BytesMut::from(&[0x68, 0x06, 0x01, 0x00, 0x02, 0x00, 0xAA, 0xBB][..]);
        assert!(codec().decode(&mut buf).is_err());
    }

    #[test]
    fn test_i_frame_without_asdu_is_fatal() {
        let mut buf = BytesMut::from(&[0x68, 0x04, 0x00, 0x00, 0x00, 0x00][..]);
        assert!(codec().decode(&mut buf).is_err());
    }

    #[test]
    fn test_invalid_u_function_is_fatal() {
        // Two function bits set.
        let mut buf = BytesMut::from(&[0x68, 0x04, 0x0F, 0x00, 0x00, 0x00][..]);
        assert!(codec().decode(&mut buf).is_err());
    }

    #[test]
    fn test_oversized_asdu_rejected_on_encode() {
        let payload = bytes::Bytes::from(vec![0u8; MAX_ASDU_LENGTH]);
        // Header adds 6 bytes on top of the payload, pushing it past the limit.
        let asdu = Asdu::private(200, Cot::Spontaneous, 1, false, 1, payload).unwrap();
        let mut buf = BytesMut::new();
        assert!(codec().encode(Apdu::i_frame(0, 0, asdu), &mut buf).is_err());
    }

    #[tokio::test]
    async fn test_read_apdu_across_fragments() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut client = client;

        let handle = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            server.write_all(&[0x68, 0x04]).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            server.write_all(&[0x07, 0x00, 0x00, 0x00]).await.unwrap();
            server
        });

        let mut codec = codec();
        let mut buf = BytesMut::new();
        let apdu = read_apdu(&mut client, &mut codec, &mut buf).await.unwrap();
        assert_eq!(apdu, Apdu::u_frame(UFunction::StartDtAct));
        drop(handle.await.unwrap());
    }

    #[tokio::test]
    async fn test_read_apdu_fragment_timeout() {
        let (client, server) = tokio::io::duplex(64);
        let mut client = client;

        // A lone start byte, then silence.
        let mut server = server;
        {
            use tokio::io::AsyncWriteExt;
            server.write_all(&[0x68]).await.unwrap();
        }

        let settings =
            ConnectionSettings::default().message_fragment_timeout(std::time::Duration::from_millis(50));
        let mut codec = ApduCodec::new(settings);
        let mut buf = BytesMut::new();
        let err = read_apdu(&mut client, &mut codec, &mut buf).await.unwrap_err();
        assert!(matches!(err, Iec60870Error::FragmentTimeout));
        drop(server);
    }

    #[tokio::test]
    async fn test_read_apdu_peer_close() {
        let (client, server) = tokio::io::duplex(64);
        drop(server);

        let mut client = client;
        let mut codec = codec();
        let mut buf = BytesMut::new();
        let err = read_apdu(&mut client, &mut codec, &mut buf).await.unwrap_err();
        assert!(matches!(err, Iec60870Error::TransportClosed));
    }
}
