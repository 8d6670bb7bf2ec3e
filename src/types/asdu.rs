//! Application service data units.
//!
//! An ASDU is the payload of an I-format APDU: the data unit identifier
//! (type identification, variable structure qualifier, cause of
//! transmission, common address) followed by information objects, or by
//! opaque bytes for type codes in the private range 128-255.
//!
//! The width of the cause, common address and object address fields is
//! not part of the wire format itself; both stations agree on it up
//! front through [`ConnectionSettings`].

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Iec60870Error, Result};
use crate::settings::{CommonAddressFieldLength, ConnectionSettings, CotFieldLength};
use crate::types::{
    Cot, Cp56Time2a, InformationElement, InformationObject, QualifierOfInterrogation, TypeId,
};

/// Largest sequence length the 7-bit VSQ field can carry.
pub const MAX_SEQUENCE_LENGTH: usize = 0x7F;

#[derive(Debug, Clone, PartialEq)]
enum AsduPayload {
    /// Standard type: decoded information objects.
    Objects {
        type_id: TypeId,
        objects: Vec<InformationObject>,
    },
    /// Private type code with opaque payload bytes.
    Private { code: u8, data: Bytes },
}

/// One application service data unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Asdu {
    payload: AsduPayload,
    is_sequence: bool,
    sequence_length: u8,
    cot: Cot,
    test: bool,
    negative_confirm: bool,
    originator: u8,
    common_address: u16,
}

impl Asdu {
    /// Create a standard ASDU carrying a list of information objects,
    /// each with a single element set.
    ///
    /// Fails if the list is empty or longer than 127 entries, if an
    /// object carries more than one element set, or if an element set
    /// does not match the layout of `type_id`.
    pub fn new(
        type_id: TypeId,
        cot: Cot,
        common_address: u16,
        objects: Vec<InformationObject>,
    ) -> Result<Self> {
        if objects.is_empty() {
            return Err(Iec60870Error::malformed_payload_static(
                "ASDU requires at least one information object",
            ));
        }
        if objects.len() > MAX_SEQUENCE_LENGTH {
            return Err(Iec60870Error::malformed_payload_static(
                "more than 127 information objects",
            ));
        }
        for object in &objects {
            let [set] = object.element_sets() else {
                return Err(Iec60870Error::malformed_payload_static(
                    "sequence object in a non-sequence ASDU",
                ));
            };
            check_set(type_id, set)?;
        }
        let sequence_length = objects.len() as u8;
        Ok(Self {
            payload: AsduPayload::Objects { type_id, objects },
            is_sequence: false,
            sequence_length,
            cot,
            test: false,
            negative_confirm: false,
            originator: 0,
            common_address,
        })
    }

    /// Create a sequence-of-elements ASDU from a single object whose
    /// element sets share the object address.
    pub fn new_sequence(
        type_id: TypeId,
        cot: Cot,
        common_address: u16,
        object: InformationObject,
    ) -> Result<Self> {
        let sets = object.element_sets();
        if sets.is_empty() {
            return Err(Iec60870Error::malformed_payload_static(
                "sequence ASDU requires at least one element set",
            ));
        }
        if sets.len() > MAX_SEQUENCE_LENGTH {
            return Err(Iec60870Error::malformed_payload_static(
                "more than 127 element sets",
            ));
        }
        for set in sets {
            check_set(type_id, set)?;
        }
        let sequence_length = sets.len() as u8;
        Ok(Self {
            payload: AsduPayload::Objects {
                type_id,
                objects: vec![object],
            },
            is_sequence: true,
            sequence_length,
            cot,
            test: false,
            negative_confirm: false,
            originator: 0,
            common_address,
        })
    }

    /// Create a private-range ASDU carrying opaque payload bytes.
    pub fn private(
        code: u8,
        cot: Cot,
        common_address: u16,
        is_sequence: bool,
        sequence_length: u8,
        data: Bytes,
    ) -> Result<Self> {
        if !TypeId::is_private_code(code) {
            return Err(Iec60870Error::malformed_payload_static(
                "private ASDU requires a type code in 128-255",
            ));
        }
        if usize::from(sequence_length) > MAX_SEQUENCE_LENGTH {
            return Err(Iec60870Error::malformed_payload_static(
                "sequence length exceeds 127",
            ));
        }
        Ok(Self {
            payload: AsduPayload::Private { code, data },
            is_sequence,
            sequence_length,
            cot,
            test: false,
            negative_confirm: false,
            originator: 0,
            common_address,
        })
    }

    /// Station or group interrogation command (C_IC_NA_1, activation).
    pub fn interrogation(common_address: u16, qualifier: QualifierOfInterrogation) -> Self {
        Self {
            payload: AsduPayload::Objects {
                type_id: TypeId::InterrogationCommand,
                objects: vec![InformationObject::new(
                    0u32,
                    vec![InformationElement::InterrogationQualifier(qualifier)],
                )],
            },
            is_sequence: false,
            sequence_length: 1,
            cot: Cot::Activation,
            test: false,
            negative_confirm: false,
            originator: 0,
            common_address,
        }
    }

    /// Clock synchronization command (C_CS_NA_1, activation).
    pub fn clock_sync(common_address: u16, time: Cp56Time2a) -> Self {
        Self {
            payload: AsduPayload::Objects {
                type_id: TypeId::ClockSync,
                objects: vec![InformationObject::new(
                    0u32,
                    vec![InformationElement::Time56(time)],
                )],
            },
            is_sequence: false,
            sequence_length: 1,
            cot: Cot::Activation,
            test: false,
            negative_confirm: false,
            originator: 0,
            common_address,
        }
    }

    /// Set the test flag.
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// Set the negative-confirm flag.
    pub fn with_negative_confirm(mut self, negative_confirm: bool) -> Self {
        self.negative_confirm = negative_confirm;
        self
    }

    /// Set the originator address (transmitted only with a two-byte
    /// cause field).
    pub fn with_originator(mut self, originator: u8) -> Self {
        self.originator = originator;
        self
    }

    /// Replace the cause of transmission.
    pub fn with_cause(mut self, cot: Cot) -> Self {
        self.cot = cot;
        self
    }

    /// The raw type identification code.
    #[inline]
    pub fn type_code(&self) -> u8 {
        match &self.payload {
            AsduPayload::Objects { type_id, .. } => type_id.as_u8(),
            AsduPayload::Private { code, .. } => *code,
        }
    }

    /// The standard type identification, if this is not a private ASDU.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        match &self.payload {
            AsduPayload::Objects { type_id, .. } => Some(*type_id),
            AsduPayload::Private { .. } => None,
        }
    }

    /// The information objects (empty for private ASDUs).
    #[inline]
    pub fn information_objects(&self) -> &[InformationObject] {
        match &self.payload {
            AsduPayload::Objects { objects, .. } => objects,
            AsduPayload::Private { .. } => &[],
        }
    }

    /// The opaque payload of a private ASDU.
    #[inline]
    pub fn private_information(&self) -> Option<&Bytes> {
        match &self.payload {
            AsduPayload::Private { data, .. } => Some(data),
            AsduPayload::Objects { .. } => None,
        }
    }

    /// Whether the ASDU carries one object with a sequence of elements.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        self.is_sequence
    }

    /// Number of objects, or of element sets when `is_sequence`.
    #[inline]
    pub fn sequence_length(&self) -> u8 {
        self.sequence_length
    }

    /// The cause of transmission.
    #[inline]
    pub fn cause(&self) -> Cot {
        self.cot
    }

    /// The test flag.
    #[inline]
    pub fn is_test(&self) -> bool {
        self.test
    }

    /// The negative-confirm flag.
    #[inline]
    pub fn is_negative_confirm(&self) -> bool {
        self.negative_confirm
    }

    /// The originator address (0 when unused).
    #[inline]
    pub fn originator(&self) -> u8 {
        self.originator
    }

    /// The common address of ASDU.
    #[inline]
    pub fn common_address(&self) -> u16 {
        self.common_address
    }

    /// Encoded size for the given settings.
    pub fn wire_size(&self, settings: &ConnectionSettings) -> usize {
        let header = 2
            + settings.cot_field_length.byte_len()
            + settings.common_address_field_length.byte_len();
        let payload = match &self.payload {
            AsduPayload::Objects { objects, .. } => objects
                .iter()
                .map(|o| o.wire_size(settings.ioa_field_length))
                .sum(),
            AsduPayload::Private { data, .. } => data.len(),
        };
        header + payload
    }

    /// Encode into `buf` using the agreed field widths.
    pub fn encode(&self, buf: &mut BytesMut, settings: &ConnectionSettings) -> Result<()> {
        buf.put_u8(self.type_code());
        buf.put_u8((self.sequence_length & 0x7F) | if self.is_sequence { 0x80 } else { 0 });

        let mut cot_byte = self.cot.as_u8();
        if self.negative_confirm {
            cot_byte |= 0x40;
        }
        if self.test {
            cot_byte |= 0x80;
        }
        buf.put_u8(cot_byte);
        if settings.cot_field_length == CotFieldLength::Two {
            buf.put_u8(self.originator);
        }

        match settings.common_address_field_length {
            CommonAddressFieldLength::One => {
                if self.common_address > 0xFF {
                    return Err(Iec60870Error::malformed_payload(format!(
                        "common address {} exceeds one-byte field",
                        self.common_address
                    )));
                }
                buf.put_u8(self.common_address as u8);
            }
            CommonAddressFieldLength::Two => buf.put_u16_le(self.common_address),
        }

        match &self.payload {
            AsduPayload::Objects { objects, .. } => {
                for object in objects {
                    object.encode(buf, settings.ioa_field_length)?;
                }
            }
            AsduPayload::Private { data, .. } => buf.put_slice(data),
        }
        Ok(())
    }

    /// Decode an ASDU from the bytes following the APCI.
    ///
    /// Standard types must consume the input exactly; private types take
    /// every byte remaining after the header as payload.
    pub fn decode(data: &[u8], settings: &ConnectionSettings) -> Result<Self> {
        let header_len = 2
            + settings.cot_field_length.byte_len()
            + settings.common_address_field_length.byte_len();
        if data.len() < header_len {
            return Err(Iec60870Error::malformed_payload_static("ASDU header too short"));
        }

        let type_code = data[0];
        let vsq = data[1];
        let is_sequence = vsq & 0x80 != 0;
        let sequence_length = vsq & 0x7F;

        let cot_byte = data[2];
        let cot = Cot::from_u8(cot_byte)?;
        let test = cot_byte & 0x80 != 0;
        let negative_confirm = cot_byte & 0x40 != 0;

        let mut offset = 3;
        let originator = if settings.cot_field_length == CotFieldLength::Two {
            offset += 1;
            data[3]
        } else {
            0
        };

        let common_address = match settings.common_address_field_length {
            CommonAddressFieldLength::One => {
                let ca = u16::from(data[offset]);
                offset += 1;
                ca
            }
            CommonAddressFieldLength::Two => {
                let ca = u16::from_le_bytes([data[offset], data[offset + 1]]);
                offset += 2;
                ca
            }
        };

        let rest = &data[offset..];

        let payload = if TypeId::is_private_code(type_code) {
            AsduPayload::Private {
                code: type_code,
                data: Bytes::copy_from_slice(rest),
            }
        } else {
            let type_id = TypeId::from_u8(type_code)?;
            if sequence_length == 0 {
                return Err(Iec60870Error::malformed_payload_static(
                    "ASDU with zero information objects",
                ));
            }
            let (object_count, set_count) = if is_sequence {
                (1, usize::from(sequence_length))
            } else {
                (usize::from(sequence_length), 1)
            };

            let mut objects = Vec::with_capacity(object_count);
            let mut pos = 0;
            for _ in 0..object_count {
                let (object, consumed) = InformationObject::decode(
                    &rest[pos..],
                    type_id,
                    set_count,
                    settings.ioa_field_length,
                )?;
                pos += consumed;
                objects.push(object);
            }
            if pos != rest.len() {
                return Err(Iec60870Error::malformed_payload(format!(
                    "{} trailing bytes after information objects",
                    rest.len() - pos
                )));
            }
            AsduPayload::Objects { type_id, objects }
        };

        Ok(Self {
            payload,
            is_sequence,
            sequence_length,
            cot,
            test,
            negative_confirm,
            originator,
            common_address,
        })
    }
}

fn check_set(type_id: TypeId, set: &[InformationElement]) -> Result<()> {
    let layout = type_id.element_layout();
    let matches = set.len() == layout.len()
        && set.iter().zip(layout).all(|(element, &kind)| element.kind() == kind);
    if !matches {
        return Err(Iec60870Error::malformed_payload(format!(
            "element set does not match the {} layout",
            type_id
        )));
    }
    Ok(())
}

impl std::fmt::Display for Asdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.type_id() {
            Some(type_id) => write!(f, "{type_id}")?,
            None => write!(f, "private({})", self.type_code())?,
        }
        write!(f, " {} CA={}", self.cot, self.common_address)?;
        if self.test {
            f.write_str(" test")?;
        }
        if self.negative_confirm {
            f.write_str(" neg")?;
        }
        for object in self.information_objects() {
            write!(f, " [{object}]")?;
        }
        if let Some(data) = self.private_information() {
            write!(f, " [{} payload bytes]", data.len())?;
        }
        Ok(())
    }
}
