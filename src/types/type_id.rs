//! Type identification.
//!
//! The type identification selects the structure and meaning of every
//! information object in an ASDU. Codes 1-127 are standardised; each one
//! fixes the exact sequence of information elements per object set
//! ([`TypeId::element_layout`]). Codes 128-255 are reserved for private
//! use and carried as opaque payload by the ASDU layer.

use crate::error::{Iec60870Error, Result};
use crate::types::ElementKind;

/// Standard IEC 60870-5-104 type identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    // Process information in monitoring direction.
    /// Single-point information (M_SP_NA_1).
    SinglePoint = 1,
    /// Single-point information with CP24 time tag (M_SP_TA_1).
    SinglePointTime24 = 2,
    /// Double-point information (M_DP_NA_1).
    DoublePoint = 3,
    /// Double-point information with CP24 time tag (M_DP_TA_1).
    DoublePointTime24 = 4,
    /// Step position information (M_ST_NA_1).
    StepPosition = 5,
    /// Step position information with CP24 time tag (M_ST_TA_1).
    StepPositionTime24 = 6,
    /// Bitstring of 32 bit (M_BO_NA_1).
    Bitstring32 = 7,
    /// Bitstring of 32 bit with CP24 time tag (M_BO_TA_1).
    Bitstring32Time24 = 8,
    /// Measured value, normalized (M_ME_NA_1).
    MeasuredNormalized = 9,
    /// Measured value, normalized with CP24 time tag (M_ME_TA_1).
    MeasuredNormalizedTime24 = 10,
    /// Measured value, scaled (M_ME_NB_1).
    MeasuredScaled = 11,
    /// Measured value, scaled with CP24 time tag (M_ME_TB_1).
    MeasuredScaledTime24 = 12,
    /// Measured value, short floating point (M_ME_NC_1).
    MeasuredFloat = 13,
    /// Measured value, short floating point with CP24 time tag (M_ME_TC_1).
    MeasuredFloatTime24 = 14,
    /// Integrated totals (M_IT_NA_1).
    IntegratedTotals = 15,
    /// Integrated totals with CP24 time tag (M_IT_TA_1).
    IntegratedTotalsTime24 = 16,
    /// Event of protection equipment with CP24 time tag (M_EP_TA_1).
    ProtectionEventTime24 = 17,
    /// Packed start events of protection equipment with CP24 time tag (M_EP_TB_1).
    ProtectionStartEventsTime24 = 18,
    /// Packed output circuit information with CP24 time tag (M_EP_TC_1).
    ProtectionCircuitTime24 = 19,
    /// Packed single-point information with status change detection (M_PS_NA_1).
    StatusChangeDetection = 20,
    /// Measured value, normalized, without quality descriptor (M_ME_ND_1).
    MeasuredNormalizedNoQuality = 21,
    /// Single-point information with CP56 time tag (M_SP_TB_1).
    SinglePointTime56 = 30,
    /// Double-point information with CP56 time tag (M_DP_TB_1).
    DoublePointTime56 = 31,
    /// Step position information with CP56 time tag (M_ST_TB_1).
    StepPositionTime56 = 32,
    /// Bitstring of 32 bit with CP56 time tag (M_BO_TB_1).
    Bitstring32Time56 = 33,
    /// Measured value, normalized with CP56 time tag (M_ME_TD_1).
    MeasuredNormalizedTime56 = 34,
    /// Measured value, scaled with CP56 time tag (M_ME_TE_1).
    MeasuredScaledTime56 = 35,
    /// Measured value, short floating point with CP56 time tag (M_ME_TF_1).
    MeasuredFloatTime56 = 36,
    /// Integrated totals with CP56 time tag (M_IT_TB_1).
    IntegratedTotalsTime56 = 37,
    /// Event of protection equipment with CP56 time tag (M_EP_TD_1).
    ProtectionEventTime56 = 38,
    /// Packed start events of protection equipment with CP56 time tag (M_EP_TE_1).
    ProtectionStartEventsTime56 = 39,
    /// Packed output circuit information with CP56 time tag (M_EP_TF_1).
    ProtectionCircuitTime56 = 40,

    // Process information in control direction.
    /// Single command (C_SC_NA_1).
    SingleCommand = 45,
    /// Double command (C_DC_NA_1).
    DoubleCommand = 46,
    /// Regulating step command (C_RC_NA_1).
    RegulatingStep = 47,
    /// Set-point command, normalized (C_SE_NA_1).
    SetpointNormalized = 48,
    /// Set-point command, scaled (C_SE_NB_1).
    SetpointScaled = 49,
    /// Set-point command, short floating point (C_SE_NC_1).
    SetpointFloat = 50,
    /// Bitstring of 32 bit command (C_BO_NA_1).
    Bitstring32Command = 51,
    /// Single command with CP56 time tag (C_SC_TA_1).
    SingleCommandTime56 = 58,
    /// Double command with CP56 time tag (C_DC_TA_1).
    DoubleCommandTime56 = 59,
    /// Regulating step command with CP56 time tag (C_RC_TA_1).
    RegulatingStepTime56 = 60,
    /// Set-point command, normalized, with CP56 time tag (C_SE_TA_1).
    SetpointNormalizedTime56 = 61,
    /// Set-point command, scaled, with CP56 time tag (C_SE_TB_1).
    SetpointScaledTime56 = 62,
    /// Set-point command, short floating point, with CP56 time tag (C_SE_TC_1).
    SetpointFloatTime56 = 63,
    /// Bitstring of 32 bit command with CP56 time tag (C_BO_TA_1).
    Bitstring32CommandTime56 = 64,

    // System information in monitoring direction.
    /// End of initialization (M_EI_NA_1).
    EndOfInit = 70,

    // System information in control direction.
    /// Interrogation command (C_IC_NA_1).
    InterrogationCommand = 100,
    /// Counter interrogation command (C_CI_NA_1).
    CounterInterrogation = 101,
    /// Read command (C_RD_NA_1).
    ReadCommand = 102,
    /// Clock synchronization command (C_CS_NA_1).
    ClockSync = 103,
    /// Test command (C_TS_NA_1).
    TestCommand = 104,
    /// Reset process command (C_RP_NA_1).
    ResetProcess = 105,
    /// Delay acquisition command (C_CD_NA_1).
    DelayAcquisition = 106,
    /// Test command with CP56 time tag (C_TS_TA_1).
    TestCommandTime56 = 107,

    // Parameters in control direction.
    /// Parameter of measured value, normalized (P_ME_NA_1).
    ParameterNormalized = 110,
    /// Parameter of measured value, scaled (P_ME_NB_1).
    ParameterScaled = 111,
    /// Parameter of measured value, short floating point (P_ME_NC_1).
    ParameterFloat = 112,
    /// Parameter activation (P_AC_NA_1).
    ParameterActivation = 113,

    // File transfer.
    /// File ready (F_FR_NA_1).
    FileReady = 120,
    /// Section ready (F_SR_NA_1).
    SectionReady = 121,
    /// Call directory, select file, section or segment (F_SC_NA_1).
    CallDirectory = 122,
    /// Last section or segment (F_LS_NA_1).
    LastSection = 123,
    /// Acknowledge file or section (F_AF_NA_1).
    AckFile = 124,
    /// Segment (F_SG_NA_1).
    Segment = 125,
    /// Directory (F_DR_TA_1).
    Directory = 126,
    /// Query log, request archive file (F_SC_NB_1).
    QueryLog = 127,
}

impl TypeId {
    /// Decode a standard type identification code.
    ///
    /// Codes 128-255 are private and never map to a `TypeId`; unassigned
    /// standard codes fail with `UnknownTypeId`.
    pub fn from_u8(value: u8) -> Result<Self> {
        let id = match value {
            1 => Self::SinglePoint,
            2 => Self::SinglePointTime24,
            3 => Self::DoublePoint,
            4 => Self::DoublePointTime24,
            5 => Self::StepPosition,
            6 => Self::StepPositionTime24,
            7 => Self::Bitstring32,
            8 => Self::Bitstring32Time24,
            9 => Self::MeasuredNormalized,
            10 => Self::MeasuredNormalizedTime24,
            11 => Self::MeasuredScaled,
            12 => Self::MeasuredScaledTime24,
            13 => Self::MeasuredFloat,
            14 => Self::MeasuredFloatTime24,
            15 => Self::IntegratedTotals,
            16 => Self::IntegratedTotalsTime24,
            17 => Self::ProtectionEventTime24,
            18 => Self::ProtectionStartEventsTime24,
            19 => Self::ProtectionCircuitTime24,
            20 => Self::StatusChangeDetection,
            21 => Self::MeasuredNormalizedNoQuality,
            30 => Self::SinglePointTime56,
            31 => Self::DoublePointTime56,
            32 => Self::StepPositionTime56,
            33 => Self::Bitstring32Time56,
            34 => Self::MeasuredNormalizedTime56,
            35 => Self::MeasuredScaledTime56,
            36 => Self::MeasuredFloatTime56,
            37 => Self::IntegratedTotalsTime56,
            38 => Self::ProtectionEventTime56,
            39 => Self::ProtectionStartEventsTime56,
            40 => Self::ProtectionCircuitTime56,
            45 => Self::SingleCommand,
            46 => Self::DoubleCommand,
            47 => Self::RegulatingStep,
            48 => Self::SetpointNormalized,
            49 => Self::SetpointScaled,
            50 => Self::SetpointFloat,
            51 => Self::Bitstring32Command,
            58 => Self::SingleCommandTime56,
            59 => Self::DoubleCommandTime56,
            60 => Self::RegulatingStepTime56,
            61 => Self::SetpointNormalizedTime56,
            62 => Self::SetpointScaledTime56,
            63 => Self::SetpointFloatTime56,
            64 => Self::Bitstring32CommandTime56,
            70 => Self::EndOfInit,
            100 => Self::InterrogationCommand,
            101 => Self::CounterInterrogation,
            102 => Self::ReadCommand,
            103 => Self::ClockSync,
            104 => Self::TestCommand,
            105 => Self::ResetProcess,
            106 => Self::DelayAcquisition,
            107 => Self::TestCommandTime56,
            110 => Self::ParameterNormalized,
            111 => Self::ParameterScaled,
            112 => Self::ParameterFloat,
            113 => Self::ParameterActivation,
            120 => Self::FileReady,
            121 => Self::SectionReady,
            122 => Self::CallDirectory,
            123 => Self::LastSection,
            124 => Self::AckFile,
            125 => Self::Segment,
            126 => Self::Directory,
            127 => Self::QueryLog,
            _ => return Err(Iec60870Error::UnknownTypeId(value)),
        };
        Ok(id)
    }

    /// The raw type identification code.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether `code` falls into the private range 128-255.
    #[inline]
    pub const fn is_private_code(code: u8) -> bool {
        code >= 128
    }

    /// The fixed sequence of element kinds per object set of this type.
    ///
    /// An empty layout means the object consists of the address alone
    /// (the read command).
    pub fn element_layout(self) -> &'static [ElementKind] {
        use ElementKind as K;
        match self {
            Self::SinglePoint => &[K::SinglePoint],
            Self::SinglePointTime24 => &[K::SinglePoint, K::Time24],
            Self::DoublePoint => &[K::DoublePoint],
            Self::DoublePointTime24 => &[K::DoublePoint, K::Time24],
            Self::StepPosition => &[K::TransientValue, K::Quality],
            Self::StepPositionTime24 => &[K::TransientValue, K::Quality, K::Time24],
            Self::Bitstring32 => &[K::Bitstring, K::Quality],
            Self::Bitstring32Time24 => &[K::Bitstring, K::Quality, K::Time24],
            Self::MeasuredNormalized => &[K::Normalized, K::Quality],
            Self::MeasuredNormalizedTime24 => &[K::Normalized, K::Quality, K::Time24],
            Self::MeasuredScaled => &[K::Scaled, K::Quality],
            Self::MeasuredScaledTime24 => &[K::Scaled, K::Quality, K::Time24],
            Self::MeasuredFloat => &[K::Float, K::Quality],
            Self::MeasuredFloatTime24 => &[K::Float, K::Quality, K::Time24],
            Self::IntegratedTotals => &[K::CounterReading],
            Self::IntegratedTotalsTime24 => &[K::CounterReading, K::Time24],
            Self::ProtectionEventTime24 => &[K::ProtectionEvent, K::Time16, K::Time24],
            Self::ProtectionStartEventsTime24 => {
                &[K::ProtectionStartEvents, K::ProtectionQuality, K::Time16, K::Time24]
            }
            Self::ProtectionCircuitTime24 => {
                &[K::ProtectionOutputCircuit, K::ProtectionQuality, K::Time16, K::Time24]
            }
            Self::StatusChangeDetection => &[K::StatusChanges, K::Quality],
            Self::MeasuredNormalizedNoQuality => &[K::Normalized],
            Self::SinglePointTime56 => &[K::SinglePoint, K::Time56],
            Self::DoublePointTime56 => &[K::DoublePoint, K::Time56],
            Self::StepPositionTime56 => &[K::TransientValue, K::Quality, K::Time56],
            Self::Bitstring32Time56 => &[K::Bitstring, K::Quality, K::Time56],
            Self::MeasuredNormalizedTime56 => &[K::Normalized, K::Quality, K::Time56],
            Self::MeasuredScaledTime56 => &[K::Scaled, K::Quality, K::Time56],
            Self::MeasuredFloatTime56 => &[K::Float, K::Quality, K::Time56],
            Self::IntegratedTotalsTime56 => &[K::CounterReading, K::Time56],
            Self::ProtectionEventTime56 => &[K::ProtectionEvent, K::Time16, K::Time56],
            Self::ProtectionStartEventsTime56 => {
                &[K::ProtectionStartEvents, K::ProtectionQuality, K::Time16, K::Time56]
            }
            Self::ProtectionCircuitTime56 => {
                &[K::ProtectionOutputCircuit, K::ProtectionQuality, K::Time16, K::Time56]
            }
            Self::SingleCommand => &[K::SingleCommand],
            Self::DoubleCommand => &[K::DoubleCommand],
            Self::RegulatingStep => &[K::RegulatingStep],
            Self::SetpointNormalized => &[K::Normalized, K::SetPointQualifier],
            Self::SetpointScaled => &[K::Scaled, K::SetPointQualifier],
            Self::SetpointFloat => &[K::Float, K::SetPointQualifier],
            Self::Bitstring32Command => &[K::Bitstring],
            Self::SingleCommandTime56 => &[K::SingleCommand, K::Time56],
            Self::DoubleCommandTime56 => &[K::DoubleCommand, K::Time56],
            Self::RegulatingStepTime56 => &[K::RegulatingStep, K::Time56],
            Self::SetpointNormalizedTime56 => &[K::Normalized, K::SetPointQualifier, K::Time56],
            Self::SetpointScaledTime56 => &[K::Scaled, K::SetPointQualifier, K::Time56],
            Self::SetpointFloatTime56 => &[K::Float, K::SetPointQualifier, K::Time56],
            Self::Bitstring32CommandTime56 => &[K::Bitstring, K::Time56],
            Self::EndOfInit => &[K::InitCause],
            Self::InterrogationCommand => &[K::InterrogationQualifier],
            Self::CounterInterrogation => &[K::CounterInterrogationQualifier],
            Self::ReadCommand => &[],
            Self::ClockSync => &[K::Time56],
            Self::TestCommand => &[K::TestPattern],
            Self::ResetProcess => &[K::ResetQualifier],
            Self::DelayAcquisition => &[K::Time16],
            Self::TestCommandTime56 => &[K::TestCounter, K::Time56],
            Self::ParameterNormalized => &[K::Normalized, K::ParameterQualifier],
            Self::ParameterScaled => &[K::Scaled, K::ParameterQualifier],
            Self::ParameterFloat => &[K::Float, K::ParameterQualifier],
            Self::ParameterActivation => &[K::ParameterActivation],
            Self::FileReady => &[K::FileName, K::FileLength, K::FileReady],
            Self::SectionReady => &[K::FileName, K::SectionName, K::FileLength, K::SectionReady],
            Self::CallDirectory => &[K::FileName, K::SectionName, K::SelectCall],
            Self::LastSection => &[K::FileName, K::SectionName, K::LastSection, K::Checksum],
            Self::AckFile => &[K::FileName, K::SectionName, K::AckQualifier],
            Self::Segment => &[K::FileName, K::SectionName, K::Segment],
            Self::Directory => &[K::FileName, K::FileLength, K::FileStatus, K::Time56],
            Self::QueryLog => &[K::FileName, K::Time56, K::Time56],
        }
    }

    /// Check if this type flows in the monitoring direction.
    #[inline]
    pub const fn is_monitoring(&self) -> bool {
        matches!(self.as_u8(), 1..=40 | 70)
    }

    /// Check if this type flows in the control direction.
    #[inline]
    pub const fn is_control(&self) -> bool {
        matches!(self.as_u8(), 45..=64 | 100..=113)
    }

    /// Check if this type carries a CP24 or CP56 time tag.
    pub fn has_time_tag(&self) -> bool {
        self.element_layout()
            .iter()
            .any(|k| matches!(k, ElementKind::Time24 | ElementKind::Time56))
    }

    /// The IEC standard name, e.g. `M_SP_NA_1`.
    pub const fn standard_name(&self) -> &'static str {
        match self {
            Self::SinglePoint => "M_SP_NA_1",
            Self::SinglePointTime24 => "M_SP_TA_1",
            Self::DoublePoint => "M_DP_NA_1",
            Self::DoublePointTime24 => "M_DP_TA_1",
            Self::StepPosition => "M_ST_NA_1",
            Self::StepPositionTime24 => "M_ST_TA_1",
            Self::Bitstring32 => "M_BO_NA_1",
            Self::Bitstring32Time24 => "M_BO_TA_1",
            Self::MeasuredNormalized => "M_ME_NA_1",
            Self::MeasuredNormalizedTime24 => "M_ME_TA_1",
            Self::MeasuredScaled => "M_ME_NB_1",
            Self::MeasuredScaledTime24 => "M_ME_TB_1",
            Self::MeasuredFloat => "M_ME_NC_1",
            Self::MeasuredFloatTime24 => "M_ME_TC_1",
            Self::IntegratedTotals => "M_IT_NA_1",
            Self::IntegratedTotalsTime24 => "M_IT_TA_1",
            Self::ProtectionEventTime24 => "M_EP_TA_1",
            Self::ProtectionStartEventsTime24 => "M_EP_TB_1",
            Self::ProtectionCircuitTime24 => "M_EP_TC_1",
            Self::StatusChangeDetection => "M_PS_NA_1",
            Self::MeasuredNormalizedNoQuality => "M_ME_ND_1",
            Self::SinglePointTime56 => "M_SP_TB_1",
            Self::DoublePointTime56 => "M_DP_TB_1",
            Self::StepPositionTime56 => "M_ST_TB_1",
            Self::Bitstring32Time56 => "M_BO_TB_1",
            Self::MeasuredNormalizedTime56 => "M_ME_TD_1",
            Self::MeasuredScaledTime56 => "M_ME_TE_1",
            Self::MeasuredFloatTime56 => "M_ME_TF_1",
            Self::IntegratedTotalsTime56 => "M_IT_TB_1",
            Self::ProtectionEventTime56 => "M_EP_TD_1",
            Self::ProtectionStartEventsTime56 => "M_EP_TE_1",
            Self::ProtectionCircuitTime56 => "M_EP_TF_1",
            Self::SingleCommand => "C_SC_NA_1",
            Self::DoubleCommand => "C_DC_NA_1",
            Self::RegulatingStep => "C_RC_NA_1",
            Self::SetpointNormalized => "C_SE_NA_1",
            Self::SetpointScaled => "C_SE_NB_1",
            Self::SetpointFloat => "C_SE_NC_1",
            Self::Bitstring32Command => "C_BO_NA_1",
            Self::SingleCommandTime56 => "C_SC_TA_1",
            Self::DoubleCommandTime56 => "C_DC_TA_1",
            Self::RegulatingStepTime56 => "C_RC_TA_1",
            Self::SetpointNormalizedTime56 => "C_SE_TA_1",
            Self::SetpointScaledTime56 => "C_SE_TB_1",
            Self::SetpointFloatTime56 => "C_SE_TC_1",
            Self::Bitstring32CommandTime56 => "C_BO_TA_1",
            Self::EndOfInit => "M_EI_NA_1",
            Self::InterrogationCommand => "C_IC_NA_1",
            Self::CounterInterrogation => "C_CI_NA_1",
            Self::ReadCommand => "C_RD_NA_1",
            Self::ClockSync => "C_CS_NA_1",
            Self::TestCommand => "C_TS_NA_1",
            Self::ResetProcess => "C_RP_NA_1",
            Self::DelayAcquisition => "C_CD_NA_1",
            Self::TestCommandTime56 => "C_TS_TA_1",
            Self::ParameterNormalized => "P_ME_NA_1",
            Self::ParameterScaled => "P_ME_NB_1",
            Self::ParameterFloat => "P_ME_NC_1",
            Self::ParameterActivation => "P_AC_NA_1",
            Self::FileReady => "F_FR_NA_1",
            Self::SectionReady => "F_SR_NA_1",
            Self::CallDirectory => "F_SC_NA_1",
            Self::LastSection => "F_LS_NA_1",
            Self::AckFile => "F_AF_NA_1",
            Self::Segment => "F_SG_NA_1",
            Self::Directory => "F_DR_TA_1",
            Self::QueryLog => "F_SC_NB_1",
        }
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.standard_name())
    }
}
