//! The information element catalogue as one tagged variant.
//!
//! Every standardised element type appears as one enum variant wrapping
//! its typed value. A [`TypeId`](crate::types::TypeId) fixes which kinds
//! appear in each element set, in which order; decoding dispatches over
//! that layout.

use bytes::{BufMut, BytesMut};

use crate::error::{Iec60870Error, Result};
use crate::types::{
    AckFileOrSectionQualifier, BinaryCounterReading, BinaryStateInformation,
    CauseOfInitialization, Checksum, Cp16Time2a, Cp24Time2a, Cp56Time2a, DoubleCommand,
    DoublePointInformation, FileReadyQualifier, FileSegment, FixedTestBitPattern,
    LastSectionOrSegmentQualifier, LengthOfFileOrSection, NameOfFile, NameOfSection,
    NormalizedValue, ProtectionOutputCircuitInfo, ProtectionQuality, ProtectionStartEvents,
    Quality, QualifierOfCounterInterrogation, QualifierOfInterrogation, QualifierOfParameter,
    QualifierOfParameterActivation, QualifierOfResetProcess, RegulatingStepCommand, ScaledValue,
    SectionReadyQualifier, SelectAndCallQualifier, SetPointQualifier, ShortFloat, SingleCommand,
    SinglePointInformation, SingleProtectionEvent, StatusAndStatusChanges, StatusOfFile,
    TestSequenceCounter, ValueWithTransientState,
};

/// Discriminant of an information element variant.
///
/// Type identification layouts are expressed as slices of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    SinglePoint,
    DoublePoint,
    Quality,
    TransientValue,
    Bitstring,
    StatusChanges,
    Normalized,
    Scaled,
    Float,
    CounterReading,
    ProtectionQuality,
    ProtectionEvent,
    ProtectionStartEvents,
    ProtectionOutputCircuit,
    SingleCommand,
    DoubleCommand,
    RegulatingStep,
    SetPointQualifier,
    InterrogationQualifier,
    CounterInterrogationQualifier,
    ParameterQualifier,
    ParameterActivation,
    ResetQualifier,
    InitCause,
    TestPattern,
    TestCounter,
    Time16,
    Time24,
    Time56,
    FileName,
    SectionName,
    FileLength,
    FileReady,
    SectionReady,
    SelectCall,
    LastSection,
    AckQualifier,
    Checksum,
    Segment,
    FileStatus,
}

/// One typed information element.
#[derive(Debug, Clone, PartialEq)]
pub enum InformationElement {
    /// Single-point information with quality (SIQ).
    SinglePoint(SinglePointInformation),
    /// Double-point information with quality (DIQ).
    DoublePoint(DoublePointInformation),
    /// Quality descriptor (QDS).
    Quality(Quality),
    /// Step position with transient indicator (VTI).
    TransientValue(ValueWithTransientState),
    /// Bitstring of 32 bit (BSI).
    Bitstring(BinaryStateInformation),
    /// Status and status change detection (SCD).
    StatusChanges(StatusAndStatusChanges),
    /// Normalized value (NVA).
    Normalized(NormalizedValue),
    /// Scaled value (SVA).
    Scaled(ScaledValue),
    /// Short floating point value (R32).
    Float(ShortFloat),
    /// Binary counter reading (BCR).
    CounterReading(BinaryCounterReading),
    /// Quality descriptor for protection events (QDP).
    ProtectionQuality(ProtectionQuality),
    /// Single event of protection equipment (SEP).
    ProtectionEvent(SingleProtectionEvent),
    /// Start events of protection equipment (SPE).
    ProtectionStartEvents(ProtectionStartEvents),
    /// Output circuit information of protection equipment (OCI).
    ProtectionOutputCircuit(ProtectionOutputCircuitInfo),
    /// Single command (SCO).
    SingleCommand(SingleCommand),
    /// Double command (DCO).
    DoubleCommand(DoubleCommand),
    /// Regulating step command (RCO).
    RegulatingStep(RegulatingStepCommand),
    /// Qualifier of set-point command (QOS).
    SetPointQualifier(SetPointQualifier),
    /// Qualifier of interrogation (QOI).
    InterrogationQualifier(QualifierOfInterrogation),
    /// Qualifier of counter interrogation (QCC).
    CounterInterrogationQualifier(QualifierOfCounterInterrogation),
    /// Qualifier of parameter of measured values (QPM).
    ParameterQualifier(QualifierOfParameter),
    /// Qualifier of parameter activation (QPA).
    ParameterActivation(QualifierOfParameterActivation),
    /// Qualifier of reset process command (QRP).
    ResetQualifier(QualifierOfResetProcess),
    /// Cause of initialization (COI).
    InitCause(CauseOfInitialization),
    /// Fixed test bit pattern (FBP).
    TestPattern(FixedTestBitPattern),
    /// Test sequence counter (TSC).
    TestCounter(TestSequenceCounter),
    /// Two-byte binary time (CP16Time2a).
    Time16(Cp16Time2a),
    /// Three-byte binary time (CP24Time2a).
    Time24(Cp24Time2a),
    /// Seven-byte binary time (CP56Time2a).
    Time56(Cp56Time2a),
    /// Name of file (NOF).
    FileName(NameOfFile),
    /// Name of section (NOS).
    SectionName(NameOfSection),
    /// Length of file or section (LOF).
    FileLength(LengthOfFileOrSection),
    /// File ready qualifier (FRQ).
    FileReady(FileReadyQualifier),
    /// Section ready qualifier (SRQ).
    SectionReady(SectionReadyQualifier),
    /// Select and call qualifier (SCQ).
    SelectCall(SelectAndCallQualifier),
    /// Last section or segment qualifier (LSQ).
    LastSection(LastSectionOrSegmentQualifier),
    /// Acknowledge file or section qualifier (AFQ).
    AckQualifier(AckFileOrSectionQualifier),
    /// Checksum (CHS).
    Checksum(Checksum),
    /// Segment of file data.
    Segment(FileSegment),
    /// Status of file (SOF).
    FileStatus(StatusOfFile),
}

fn first_byte(data: &[u8]) -> Result<u8> {
    data.first()
        .copied()
        .ok_or_else(|| Iec60870Error::malformed_payload_static("truncated information element"))
}

impl InformationElement {
    /// The kind discriminant of this element.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::SinglePoint(_) => ElementKind::SinglePoint,
            Self::DoublePoint(_) => ElementKind::DoublePoint,
            Self::Quality(_) => ElementKind::Quality,
            Self::TransientValue(_) => ElementKind::TransientValue,
            Self::Bitstring(_) => ElementKind::Bitstring,
            Self::StatusChanges(_) => ElementKind::StatusChanges,
            Self::Normalized(_) => ElementKind::Normalized,
            Self::Scaled(_) => ElementKind::Scaled,
            Self::Float(_) => ElementKind::Float,
            Self::CounterReading(_) => ElementKind::CounterReading,
            Self::ProtectionQuality(_) => ElementKind::ProtectionQuality,
            Self::ProtectionEvent(_) => ElementKind::ProtectionEvent,
            Self::ProtectionStartEvents(_) => ElementKind::ProtectionStartEvents,
            Self::ProtectionOutputCircuit(_) => ElementKind::ProtectionOutputCircuit,
            Self::SingleCommand(_) => ElementKind::SingleCommand,
            Self::DoubleCommand(_) => ElementKind::DoubleCommand,
            Self::RegulatingStep(_) => ElementKind::RegulatingStep,
            Self::SetPointQualifier(_) => ElementKind::SetPointQualifier,
            Self::InterrogationQualifier(_) => ElementKind::InterrogationQualifier,
            Self::CounterInterrogationQualifier(_) => ElementKind::CounterInterrogationQualifier,
            Self::ParameterQualifier(_) => ElementKind::ParameterQualifier,
            Self::ParameterActivation(_) => ElementKind::ParameterActivation,
            Self::ResetQualifier(_) => ElementKind::ResetQualifier,
            Self::InitCause(_) => ElementKind::InitCause,
            Self::TestPattern(_) => ElementKind::TestPattern,
            Self::TestCounter(_) => ElementKind::TestCounter,
            Self::Time16(_) => ElementKind::Time16,
            Self::Time24(_) => ElementKind::Time24,
            Self::Time56(_) => ElementKind::Time56,
            Self::FileName(_) => ElementKind::FileName,
            Self::SectionName(_) => ElementKind::SectionName,
            Self::FileLength(_) => ElementKind::FileLength,
            Self::FileReady(_) => ElementKind::FileReady,
            Self::SectionReady(_) => ElementKind::SectionReady,
            Self::SelectCall(_) => ElementKind::SelectCall,
            Self::LastSection(_) => ElementKind::LastSection,
            Self::AckQualifier(_) => ElementKind::AckQualifier,
            Self::Checksum(_) => ElementKind::Checksum,
            Self::Segment(_) => ElementKind::Segment,
            Self::FileStatus(_) => ElementKind::FileStatus,
        }
    }

    /// Encoded size of this element in bytes.
    pub fn wire_size(&self) -> usize {
        match self {
            Self::SinglePoint(_)
            | Self::DoublePoint(_)
            | Self::Quality(_)
            | Self::TransientValue(_)
            | Self::ProtectionQuality(_)
            | Self::ProtectionEvent(_)
            | Self::ProtectionStartEvents(_)
            | Self::ProtectionOutputCircuit(_)
            | Self::SingleCommand(_)
            | Self::DoubleCommand(_)
            | Self::RegulatingStep(_)
            | Self::SetPointQualifier(_)
            | Self::InterrogationQualifier(_)
            | Self::CounterInterrogationQualifier(_)
            | Self::ParameterQualifier(_)
            | Self::ParameterActivation(_)
            | Self::ResetQualifier(_)
            | Self::InitCause(_)
            | Self::SectionName(_)
            | Self::FileReady(_)
            | Self::SectionReady(_)
            | Self::SelectCall(_)
            | Self::LastSection(_)
            | Self::AckQualifier(_)
            | Self::Checksum(_)
            | Self::FileStatus(_) => 1,
            Self::Normalized(_)
            | Self::Scaled(_)
            | Self::TestPattern(_)
            | Self::TestCounter(_)
            | Self::Time16(_)
            | Self::FileName(_) => 2,
            Self::Time24(_) | Self::FileLength(_) => 3,
            Self::Bitstring(_) | Self::StatusChanges(_) | Self::Float(_) => 4,
            Self::CounterReading(_) => 5,
            Self::Time56(_) => 7,
            Self::Segment(segment) => segment.wire_size(),
        }
    }

    /// Decode one element of the given kind, returning it together with
    /// the number of bytes consumed.
    pub fn decode(kind: ElementKind, data: &[u8]) -> Result<(Self, usize)> {
        let element = match kind {
            ElementKind::SinglePoint => {
                Self::SinglePoint(SinglePointInformation::from_byte(first_byte(data)?))
            }
            ElementKind::DoublePoint => {
                Self::DoublePoint(DoublePointInformation::from_byte(first_byte(data)?))
            }
            ElementKind::Quality => Self::Quality(Quality::from_qds(first_byte(data)?)),
            ElementKind::TransientValue => {
                Self::TransientValue(ValueWithTransientState::from_byte(first_byte(data)?))
            }
            ElementKind::Bitstring => Self::Bitstring(BinaryStateInformation::from_bytes(data)?),
            ElementKind::StatusChanges => {
                Self::StatusChanges(StatusAndStatusChanges::from_bytes(data)?)
            }
            ElementKind::Normalized => Self::Normalized(NormalizedValue::from_bytes(data)?),
            ElementKind::Scaled => Self::Scaled(ScaledValue::from_bytes(data)?),
            ElementKind::Float => Self::Float(ShortFloat::from_bytes(data)?),
            ElementKind::CounterReading => {
                Self::CounterReading(BinaryCounterReading::from_bytes(data)?)
            }
            ElementKind::ProtectionQuality => {
                Self::ProtectionQuality(ProtectionQuality::from_byte(first_byte(data)?))
            }
            ElementKind::ProtectionEvent => {
                Self::ProtectionEvent(SingleProtectionEvent::from_byte(first_byte(data)?))
            }
            ElementKind::ProtectionStartEvents => {
                Self::ProtectionStartEvents(ProtectionStartEvents::from_byte(first_byte(data)?))
            }
            ElementKind::ProtectionOutputCircuit => Self::ProtectionOutputCircuit(
                ProtectionOutputCircuitInfo::from_byte(first_byte(data)?),
            ),
            ElementKind::SingleCommand => {
                Self::SingleCommand(SingleCommand::from_byte(first_byte(data)?))
            }
            ElementKind::DoubleCommand => {
                Self::DoubleCommand(DoubleCommand::from_byte(first_byte(data)?))
            }
            ElementKind::RegulatingStep => {
                Self::RegulatingStep(RegulatingStepCommand::from_byte(first_byte(data)?))
            }
            ElementKind::SetPointQualifier => {
                Self::SetPointQualifier(SetPointQualifier::from_byte(first_byte(data)?))
            }
            ElementKind::InterrogationQualifier => {
                Self::InterrogationQualifier(QualifierOfInterrogation(first_byte(data)?))
            }
            ElementKind::CounterInterrogationQualifier => Self::CounterInterrogationQualifier(
                QualifierOfCounterInterrogation::from_byte(first_byte(data)?),
            ),
            ElementKind::ParameterQualifier => {
                Self::ParameterQualifier(QualifierOfParameter::from_byte(first_byte(data)?))
            }
            ElementKind::ParameterActivation => {
                Self::ParameterActivation(QualifierOfParameterActivation(first_byte(data)?))
            }
            ElementKind::ResetQualifier => {
                Self::ResetQualifier(QualifierOfResetProcess(first_byte(data)?))
            }
            ElementKind::InitCause => {
                Self::InitCause(CauseOfInitialization::from_byte(first_byte(data)?))
            }
            ElementKind::TestPattern => Self::TestPattern(FixedTestBitPattern::from_bytes(data)?),
            ElementKind::TestCounter => Self::TestCounter(TestSequenceCounter::from_bytes(data)?),
            ElementKind::Time16 => Self::Time16(Cp16Time2a::from_bytes(data)?),
            ElementKind::Time24 => Self::Time24(Cp24Time2a::from_bytes(data)?),
            ElementKind::Time56 => Self::Time56(Cp56Time2a::from_bytes(data)?),
            ElementKind::FileName => Self::FileName(NameOfFile::from_bytes(data)?),
            ElementKind::SectionName => Self::SectionName(NameOfSection(first_byte(data)?)),
            ElementKind::FileLength => Self::FileLength(LengthOfFileOrSection::from_bytes(data)?),
            ElementKind::FileReady => {
                Self::FileReady(FileReadyQualifier::from_byte(first_byte(data)?))
            }
            ElementKind::SectionReady => {
                Self::SectionReady(SectionReadyQualifier::from_byte(first_byte(data)?))
            }
            ElementKind::SelectCall => Self::SelectCall(SelectAndCallQualifier(first_byte(data)?)),
            ElementKind::LastSection => {
                Self::LastSection(LastSectionOrSegmentQualifier(first_byte(data)?))
            }
            ElementKind::AckQualifier => {
                Self::AckQualifier(AckFileOrSectionQualifier(first_byte(data)?))
            }
            ElementKind::Checksum => Self::Checksum(Checksum(first_byte(data)?)),
            ElementKind::Segment => Self::Segment(FileSegment::from_bytes(data)?),
            ElementKind::FileStatus => Self::FileStatus(StatusOfFile::from_byte(first_byte(data)?)),
        };
        let consumed = element.wire_size();
        Ok((element, consumed))
    }

    /// Encode this element into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Self::SinglePoint(v) => buf.put_u8(v.to_byte()),
            Self::DoublePoint(v) => buf.put_u8(v.to_byte()),
            Self::Quality(v) => buf.put_u8(v.to_qds()),
            Self::TransientValue(v) => buf.put_u8(v.to_byte()),
            Self::Bitstring(v) => buf.put_slice(&v.to_bytes()),
            Self::StatusChanges(v) => buf.put_slice(&v.to_bytes()),
            Self::Normalized(v) => buf.put_slice(&v.to_bytes()),
            Self::Scaled(v) => buf.put_slice(&v.to_bytes()),
            Self::Float(v) => buf.put_slice(&v.to_bytes()),
            Self::CounterReading(v) => buf.put_slice(&v.to_bytes()),
            Self::ProtectionQuality(v) => buf.put_u8(v.to_byte()),
            Self::ProtectionEvent(v) => buf.put_u8(v.to_byte()),
            Self::ProtectionStartEvents(v) => buf.put_u8(v.to_byte()),
            Self::ProtectionOutputCircuit(v) => buf.put_u8(v.to_byte()),
            Self::SingleCommand(v) => buf.put_u8(v.to_byte()),
            Self::DoubleCommand(v) => buf.put_u8(v.to_byte()),
            Self::RegulatingStep(v) => buf.put_u8(v.to_byte()),
            Self::SetPointQualifier(v) => buf.put_u8(v.to_byte()),
            Self::InterrogationQualifier(v) => buf.put_u8(v.0),
            Self::CounterInterrogationQualifier(v) => buf.put_u8(v.to_byte()),
            Self::ParameterQualifier(v) => buf.put_u8(v.to_byte()),
            Self::ParameterActivation(v) => buf.put_u8(v.0),
            Self::ResetQualifier(v) => buf.put_u8(v.0),
            Self::InitCause(v) => buf.put_u8(v.to_byte()),
            Self::TestPattern(v) => buf.put_slice(&v.to_bytes()),
            Self::TestCounter(v) => buf.put_slice(&v.to_bytes()),
            Self::Time16(v) => buf.put_slice(&v.to_bytes()),
            Self::Time24(v) => buf.put_slice(&v.to_bytes()),
            Self::Time56(v) => buf.put_slice(&v.to_bytes()),
            Self::FileName(v) => buf.put_slice(&v.to_bytes()),
            Self::SectionName(v) => buf.put_u8(v.0),
            Self::FileLength(v) => buf.put_slice(&v.to_bytes()),
            Self::FileReady(v) => buf.put_u8(v.to_byte()),
            Self::SectionReady(v) => buf.put_u8(v.to_byte()),
            Self::SelectCall(v) => buf.put_u8(v.0),
            Self::LastSection(v) => buf.put_u8(v.0),
            Self::AckQualifier(v) => buf.put_u8(v.0),
            Self::Checksum(v) => buf.put_u8(v.0),
            Self::Segment(v) => {
                buf.put_u8(v.0.len() as u8);
                buf.put_slice(&v.0);
            }
            Self::FileStatus(v) => buf.put_u8(v.to_byte()),
        }
    }
}

impl std::fmt::Display for InformationElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinglePoint(v) => write!(f, "single point {v}"),
            Self::DoublePoint(v) => write!(f, "double point {v}"),
            Self::Quality(v) => write!(f, "quality {v}"),
            Self::TransientValue(v) => write!(f, "step position {v}"),
            Self::Bitstring(v) => write!(f, "bitstring {v}"),
            Self::StatusChanges(v) => write!(f, "{v}"),
            Self::Normalized(v) => write!(f, "normalized {v}"),
            Self::Scaled(v) => write!(f, "scaled {v}"),
            Self::Float(v) => write!(f, "float {v}"),
            Self::CounterReading(v) => write!(f, "counter {v}"),
            Self::ProtectionQuality(_) => f.write_str("protection quality"),
            Self::ProtectionEvent(v) => write!(f, "protection event {}", v.state),
            Self::ProtectionStartEvents(_) => f.write_str("protection start events"),
            Self::ProtectionOutputCircuit(_) => f.write_str("protection output circuit"),
            Self::SingleCommand(v) => write!(f, "single command {v}"),
            Self::DoubleCommand(v) => write!(f, "double command {v}"),
            Self::RegulatingStep(v) => write!(f, "regulating step {:?}", v.step),
            Self::SetPointQualifier(v) => write!(f, "qos ql={}", v.ql),
            Self::InterrogationQualifier(v) => write!(f, "interrogation {v}"),
            Self::CounterInterrogationQualifier(v) => write!(f, "counter request {}", v.request),
            Self::ParameterQualifier(v) => write!(f, "parameter kind {}", v.kind),
            Self::ParameterActivation(v) => write!(f, "qpa {}", v.0),
            Self::ResetQualifier(v) => write!(f, "qrp {}", v.0),
            Self::InitCause(v) => write!(f, "init cause {}", v.cause),
            Self::TestPattern(v) => write!(f, "test pattern 0x{:04X}", v.0),
            Self::TestCounter(v) => write!(f, "test counter {}", v.0),
            Self::Time16(v) => write!(f, "cp16 {v}"),
            Self::Time24(v) => write!(f, "cp24 {v}"),
            Self::Time56(v) => write!(f, "cp56 {v}"),
            Self::FileName(v) => write!(f, "file {}", v.0),
            Self::SectionName(v) => write!(f, "section {}", v.0),
            Self::FileLength(v) => write!(f, "length {}", v.0),
            Self::FileReady(v) => write!(f, "file ready q={}", v.qualifier),
            Self::SectionReady(v) => write!(f, "section ready q={}", v.qualifier),
            Self::SelectCall(v) => write!(f, "scq {}", v.0),
            Self::LastSection(v) => write!(f, "lsq {}", v.0),
            Self::AckQualifier(v) => write!(f, "afq {}", v.0),
            Self::Checksum(v) => write!(f, "checksum 0x{:02X}", v.0),
            Self::Segment(v) => write!(f, "segment of {} bytes", v.0.len()),
            Self::FileStatus(v) => write!(f, "file status {}", v.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn roundtrip(element: InformationElement) {
        let mut buf = BytesMut::new();
        element.encode(&mut buf);
        assert_eq!(buf.len(), element.wire_size());

        let (decoded, consumed) = InformationElement::decode(element.kind(), &buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded, element);
    }

    #[test]
    fn test_fixed_width_roundtrips() {
        roundtrip(InformationElement::SinglePoint(SinglePointInformation::new(true)));
        roundtrip(InformationElement::Quality(Quality::INVALID));
        roundtrip(InformationElement::TransientValue(ValueWithTransientState {
            value: -5,
            transient: true,
        }));
        roundtrip(InformationElement::Bitstring(BinaryStateInformation(0xCAFEBABE)));
        roundtrip(InformationElement::Normalized(NormalizedValue::new(-12345)));
        roundtrip(InformationElement::Scaled(ScaledValue(1234)));
        roundtrip(InformationElement::Float(ShortFloat(-1.25)));
        roundtrip(InformationElement::CounterReading(BinaryCounterReading::new(42)));
        roundtrip(InformationElement::SingleCommand(SingleCommand::new(true)));
        roundtrip(InformationElement::InterrogationQualifier(
            QualifierOfInterrogation::STATION,
        ));
        roundtrip(InformationElement::TestPattern(FixedTestBitPattern::new()));
        roundtrip(InformationElement::Time16(Cp16Time2a(999)));
        roundtrip(InformationElement::Time24(Cp24Time2a {
            milliseconds: 100,
            minutes: 3,
            invalid: false,
        }));
        roundtrip(InformationElement::FileName(NameOfFile(7)));
        roundtrip(InformationElement::FileLength(LengthOfFileOrSection(1000)));
    }

    #[test]
    fn test_segment_roundtrip() {
        let segment = FileSegment::new(Bytes::from_static(&[1, 2, 3, 4])).unwrap();
        let element = InformationElement::Segment(segment);
        assert_eq!(element.wire_size(), 5);
        roundtrip(element);
    }

    #[test]
    fn test_truncated_decode_fails() {
        assert!(InformationElement::decode(ElementKind::SinglePoint, &[]).is_err());
        assert!(InformationElement::decode(ElementKind::Float, &[0, 1, 2]).is_err());
        assert!(InformationElement::decode(ElementKind::Time56, &[0; 6]).is_err());
    }

    #[test]
    fn test_kind_matches_variant() {
        let element = InformationElement::Scaled(ScaledValue(1));
        assert_eq!(element.kind(), ElementKind::Scaled);

        let element = InformationElement::Time56(Cp56Time2a::from_bytes(&[0; 7]).unwrap());
        assert_eq!(element.kind(), ElementKind::Time56);
    }

    #[test]
    fn test_display_is_textual() {
        assert_eq!(
            InformationElement::Scaled(ScaledValue(1234)).to_string(),
            "scaled 1234"
        );
        assert!(InformationElement::SinglePoint(SinglePointInformation::new(true))
            .to_string()
            .contains("ON"));
    }
}
