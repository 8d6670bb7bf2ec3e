//! Information objects: an address plus one or more element sets.

use bytes::{BufMut, BytesMut};

use crate::error::{Iec60870Error, Result};
use crate::settings::IoaFieldLength;
use crate::types::{InformationElement, TypeId};

/// Information object address, at most 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ioa(u32);

impl Ioa {
    /// Create an address from the lower 24 bits of `value`.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    /// The raw address value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Decode an address of the configured width, little-endian.
    pub fn decode(data: &[u8], width: IoaFieldLength) -> Result<Self> {
        let len = width.byte_len();
        if data.len() < len {
            return Err(Iec60870Error::malformed_payload_static(
                "truncated information object address",
            ));
        }
        let mut value = 0u32;
        for (i, &byte) in data[..len].iter().enumerate() {
            value |= u32::from(byte) << (8 * i);
        }
        Ok(Self(value))
    }

    /// Encode the address in the configured width, little-endian.
    ///
    /// Fails if the address does not fit the width.
    pub fn encode(self, buf: &mut BytesMut, width: IoaFieldLength) -> Result<()> {
        if self.0 > width.max_address() {
            return Err(Iec60870Error::malformed_payload(format!(
                "information object address {} exceeds {}-byte field",
                self.0,
                width.byte_len()
            )));
        }
        for i in 0..width.byte_len() {
            buf.put_u8((self.0 >> (8 * i)) as u8);
        }
        Ok(())
    }
}

impl From<u32> for Ioa {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Ioa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One information object of an ASDU.
///
/// A plain object carries a single element set. In a
/// sequence-of-elements ASDU the single object of the ASDU carries one
/// set per sequence entry, all sharing the object address (consecutive
/// addresses are implied).
#[derive(Debug, Clone, PartialEq)]
pub struct InformationObject {
    address: Ioa,
    element_sets: Vec<Vec<InformationElement>>,
}

impl InformationObject {
    /// Create an object with a single element set.
    pub fn new(address: impl Into<Ioa>, elements: Vec<InformationElement>) -> Self {
        Self {
            address: address.into(),
            element_sets: vec![elements],
        }
    }

    /// Create an object carrying a sequence of element sets.
    pub fn with_sequence(
        address: impl Into<Ioa>,
        element_sets: Vec<Vec<InformationElement>>,
    ) -> Self {
        Self {
            address: address.into(),
            element_sets,
        }
    }

    /// The object address.
    #[inline]
    pub fn address(&self) -> Ioa {
        self.address
    }

    /// All element sets of this object.
    #[inline]
    pub fn element_sets(&self) -> &[Vec<InformationElement>] {
        &self.element_sets
    }

    /// The first (for plain objects: the only) element set.
    #[inline]
    pub fn elements(&self) -> &[InformationElement] {
        &self.element_sets[0]
    }

    /// Encoded size of this object for the given address width.
    pub fn wire_size(&self, width: IoaFieldLength) -> usize {
        width.byte_len()
            + self
                .element_sets
                .iter()
                .flatten()
                .map(InformationElement::wire_size)
                .sum::<usize>()
    }

    /// Encode address and element sets in declaration order.
    pub fn encode(&self, buf: &mut BytesMut, width: IoaFieldLength) -> Result<()> {
        self.address.encode(buf, width)?;
        for element in self.element_sets.iter().flatten() {
            element.encode(buf);
        }
        Ok(())
    }

    /// Decode one object of `type_id` carrying `set_count` element sets.
    ///
    /// Returns the object and the number of bytes consumed.
    pub fn decode(
        data: &[u8],
        type_id: TypeId,
        set_count: usize,
        width: IoaFieldLength,
    ) -> Result<(Self, usize)> {
        let address = Ioa::decode(data, width)?;
        let mut offset = width.byte_len();

        let layout = type_id.element_layout();
        let mut element_sets = Vec::with_capacity(set_count);
        for _ in 0..set_count {
            let mut set = Vec::with_capacity(layout.len());
            for &kind in layout {
                let (element, consumed) = InformationElement::decode(kind, &data[offset..])?;
                offset += consumed;
                set.push(element);
            }
            element_sets.push(set);
        }

        Ok((
            Self {
                address,
                element_sets,
            },
            offset,
        ))
    }
}

impl std::fmt::Display for InformationObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IOA {}:", self.address)?;
        for set in &self.element_sets {
            for element in set {
                write!(f, " {element}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quality, ScaledValue};

    #[test]
    fn test_ioa_widths() {
        let ioa = Ioa::new(0x123456);
        let mut buf = BytesMut::new();
        ioa.encode(&mut buf, IoaFieldLength::Three).unwrap();
        assert_eq!(&buf[..], &[0x56, 0x34, 0x12]);
        assert_eq!(Ioa::decode(&buf, IoaFieldLength::Three).unwrap(), ioa);

        // Too large for narrower fields.
        let mut buf = BytesMut::new();
        assert!(ioa.encode(&mut buf, IoaFieldLength::Two).is_err());
        assert!(ioa.encode(&mut buf, IoaFieldLength::One).is_err());

        let small = Ioa::new(200);
        let mut buf = BytesMut::new();
        small.encode(&mut buf, IoaFieldLength::One).unwrap();
        assert_eq!(&buf[..], &[200]);
        assert_eq!(Ioa::decode(&buf, IoaFieldLength::One).unwrap(), small);
    }

    #[test]
    fn test_ioa_masks_to_24_bits() {
        assert_eq!(Ioa::new(0xFF00_0001).value(), 1);
    }

    #[test]
    fn test_object_roundtrip() {
        let object = InformationObject::new(
            100u32,
            vec![
                InformationElement::Scaled(ScaledValue(1234)),
                InformationElement::Quality(Quality::GOOD),
            ],
        );

        let mut buf = BytesMut::new();
        object.encode(&mut buf, IoaFieldLength::Three).unwrap();
        assert_eq!(&buf[..], &[0x64, 0x00, 0x00, 0xD2, 0x04, 0x00]);
        assert_eq!(object.wire_size(IoaFieldLength::Three), 6);

        let (decoded, consumed) =
            InformationObject::decode(&buf, crate::types::TypeId::MeasuredScaled, 1, IoaFieldLength::Three)
                .unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(decoded, object);
    }

    #[test]
    fn test_sequence_object_roundtrip() {
        let object = InformationObject::with_sequence(
            1000u32,
            vec![
                vec![
                    InformationElement::Scaled(ScaledValue(1)),
                    InformationElement::Quality(Quality::GOOD),
                ],
                vec![
                    InformationElement::Scaled(ScaledValue(2)),
                    InformationElement::Quality(Quality::INVALID),
                ],
            ],
        );

        let mut buf = BytesMut::new();
        object.encode(&mut buf, IoaFieldLength::Three).unwrap();
        // Address once, then the sets back to back.
        assert_eq!(buf.len(), 3 + 2 * 3);

        let (decoded, consumed) =
            InformationObject::decode(&buf, crate::types::TypeId::MeasuredScaled, 2, IoaFieldLength::Three)
                .unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded, object);
    }

    #[test]
    fn test_truncated_object_fails() {
        // Address present, element missing.
        let data = [0x64, 0x00, 0x00, 0xD2];
        assert!(InformationObject::decode(
            &data,
            crate::types::TypeId::MeasuredScaled,
            1,
            IoaFieldLength::Three
        )
        .is_err());
    }
}
