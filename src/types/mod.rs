//! Protocol data types.
//!
//! - [`Apci`] / [`UFunction`]: the frame control field
//! - [`TypeId`] / [`Cot`]: the data unit identifier fields
//! - [`Asdu`] / [`InformationObject`] / [`InformationElement`]: the data
//!   units themselves
//! - the element value types: points, measurands, commands, qualifiers,
//!   protection events, file transfer fields and binary time tags

mod apci;
mod asdu;
mod command;
mod cot;
mod element;
mod file;
mod measurand;
mod object;
mod protection;
mod quality;
mod time;
mod type_id;

pub use apci::{Apci, UFunction, MAX_APDU_LENGTH, MIN_APDU_LENGTH, SEQ_MODULO, START_BYTE};
pub(crate) use apci::{seq_diff, seq_next};
pub use asdu::{Asdu, MAX_SEQUENCE_LENGTH};
pub use command::{
    CauseOfInitialization, DoubleCommand, FixedTestBitPattern, QualifierOfCounterInterrogation,
    QualifierOfInterrogation, QualifierOfParameter, QualifierOfParameterActivation,
    QualifierOfResetProcess, RegulatingStep, RegulatingStepCommand, SetPointQualifier,
    SingleCommand, TestSequenceCounter,
};
pub use cot::Cot;
pub use element::{ElementKind, InformationElement};
pub use file::{
    AckFileOrSectionQualifier, Checksum, FileReadyQualifier, FileSegment,
    LastSectionOrSegmentQualifier, LengthOfFileOrSection, NameOfFile, NameOfSection,
    SectionReadyQualifier, SelectAndCallQualifier, StatusOfFile,
};
pub use measurand::{
    BinaryCounterReading, BinaryStateInformation, DoublePointInformation, DoublePointState,
    NormalizedValue, ScaledValue, ShortFloat, SinglePointInformation, StatusAndStatusChanges,
    ValueWithTransientState,
};
pub use object::{InformationObject, Ioa};
pub use protection::{
    ProtectionOutputCircuitInfo, ProtectionQuality, ProtectionStartEvents, SingleProtectionEvent,
};
pub use quality::Quality;
pub use time::{Cp16Time2a, Cp24Time2a, Cp56Time2a};
pub use type_id::TypeId;
