//! Composable wire schema elements.
//!
//! A [`WireElement`] knows two things about itself: how many bytes it
//! occupies on the wire, and how to serialize itself into a [`DataWriter`].
//! Compound layouts are expressed by grouping elements into tuples and
//! spans, so a record's wire shape reads top-to-bottom in the code that
//! serializes it:
//!
//! ```
//! use capstan_wire::{SystemAllocator, WireBytes, WireUint32, WireVarInt62, serialize_into_buffer};
//!
//! let record = (WireVarInt62(7), WireUint32(42), WireBytes(b"hi"));
//! let buf = serialize_into_buffer(&SystemAllocator, &record).unwrap();
//! assert_eq!(buf.as_ref(), &[0x07, 0x00, 0x00, 0x00, 0x2a, b'h', b'i']);
//! ```
//!
//! Length computation and serialization are kept as two separate passes so
//! output buffers can be allocated at exactly the right size before a single
//! byte is written.

use bytes::Bytes;

use crate::{
    alloc::BufferAllocator,
    error::{Result, WireError},
    varint,
    writer::DataWriter,
};

/// One element of a wire layout.
pub trait WireElement {
    /// Exact number of bytes this element occupies on the wire.
    fn wire_len(&self) -> usize;

    /// Serialize this element into `writer`.
    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()>;
}

/// A single byte.
#[derive(Debug, Clone, Copy)]
pub struct WireUint8(pub u8);

impl WireElement for WireUint8 {
    fn wire_len(&self) -> usize {
        1
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        writer.write_u8(self.0)
    }
}

/// A big-endian `u32`.
#[derive(Debug, Clone, Copy)]
pub struct WireUint32(pub u32);

impl WireElement for WireUint32 {
    fn wire_len(&self) -> usize {
        4
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        writer.write_u32(self.0)
    }
}

/// A canonical variable-length integer.
#[derive(Debug, Clone, Copy)]
pub struct WireVarInt62(pub u64);

impl WireElement for WireVarInt62 {
    fn wire_len(&self) -> usize {
        varint::varint_len(self.0)
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        writer.write_varint62(self.0)
    }
}

/// Raw bytes, written as-is with no length prefix.
#[derive(Debug, Clone, Copy)]
pub struct WireBytes<'a>(pub &'a [u8]);

impl WireElement for WireBytes<'_> {
    fn wire_len(&self) -> usize {
        self.0.len()
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        writer.write_bytes(self.0)
    }
}

/// Concatenation of a homogeneous sequence of elements.
#[derive(Debug, Clone, Copy)]
pub struct WireSpan<'a, T>(pub &'a [T]);

impl<T: WireElement> WireElement for WireSpan<'_, T> {
    fn wire_len(&self) -> usize {
        self.0.iter().map(WireElement::wire_len).sum()
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        for element in self.0 {
            element.serialize(writer)?;
        }
        Ok(())
    }
}

impl<T: WireElement + ?Sized> WireElement for &T {
    fn wire_len(&self) -> usize {
        (**self).wire_len()
    }

    fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
        (**self).serialize(writer)
    }
}

macro_rules! impl_wire_element_for_tuple {
    ($($element:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($element: WireElement),+> WireElement for ($($element,)+) {
            fn wire_len(&self) -> usize {
                let ($($element,)+) = self;
                0 $(+ $element.wire_len())+
            }

            fn serialize(&self, writer: &mut DataWriter<'_>) -> Result<()> {
                let ($($element,)+) = self;
                $($element.serialize(writer)?;)+
                Ok(())
            }
        }
    };
}

impl_wire_element_for_tuple!(A);
impl_wire_element_for_tuple!(A, B);
impl_wire_element_for_tuple!(A, B, C);
impl_wire_element_for_tuple!(A, B, C, D);
impl_wire_element_for_tuple!(A, B, C, D, E);
impl_wire_element_for_tuple!(A, B, C, D, E, F);
impl_wire_element_for_tuple!(A, B, C, D, E, F, G);
impl_wire_element_for_tuple!(A, B, C, D, E, F, G, H);

/// Total on-wire length of `element`.
///
/// Group elements into tuples or a [`WireSpan`] to measure a compound
/// layout in one call.
pub fn wire_len_of<E: WireElement>(element: &E) -> usize {
    element.wire_len()
}

/// Serialize `element` into `writer`.
pub fn serialize_into_writer<E: WireElement>(
    writer: &mut DataWriter<'_>,
    element: &E,
) -> Result<()> {
    element.serialize(writer)
}

/// Serialize `element` into a freshly allocated buffer of exactly its wire
/// length.
///
/// # Errors
///
/// Propagates element write errors, and returns [`WireError::ShortWrite`] if
/// serialization produced fewer bytes than `wire_len` promised. Either way
/// the failure indicates a bug in the element's length accounting.
pub fn serialize_into_buffer<E: WireElement>(
    allocator: &impl BufferAllocator,
    element: &E,
) -> Result<Bytes> {
    let len = element.wire_len();
    let mut buf = allocator.allocate(len);
    buf.resize(len, 0);

    let mut writer = DataWriter::new(&mut buf);
    element.serialize(&mut writer)?;

    let unwritten = writer.remaining();
    if unwritten != 0 {
        return Err(WireError::ShortWrite { unwritten });
    }
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::SystemAllocator;

    #[test]
    fn primitive_lengths() {
        assert_eq!(WireUint8(0).wire_len(), 1);
        assert_eq!(WireUint32(0).wire_len(), 4);
        assert_eq!(WireVarInt62(63).wire_len(), 1);
        assert_eq!(WireVarInt62(64).wire_len(), 2);
        assert_eq!(WireBytes(b"abc").wire_len(), 3);
    }

    #[test]
    fn tuple_concatenates_in_order() {
        let element = (WireUint8(0x01), WireVarInt62(0x2843), WireBytes(b"xy"));
        assert_eq!(element.wire_len(), 1 + 2 + 2);

        let buf = serialize_into_buffer(&SystemAllocator, &element).unwrap();
        assert_eq!(buf.as_ref(), &[0x01, 0x68, 0x43, b'x', b'y']);
    }

    #[test]
    fn span_sums_element_lengths() {
        let elements = [WireVarInt62(1), WireVarInt62(64), WireVarInt62(16_384)];
        let span = WireSpan(&elements);
        assert_eq!(span.wire_len(), 1 + 2 + 4);

        let buf = serialize_into_buffer(&SystemAllocator, &span).unwrap();
        assert_eq!(buf.as_ref(), &[0x01, 0x40, 0x40, 0x80, 0x00, 0x40, 0x00]);
    }

    #[test]
    fn empty_span_is_empty() {
        let span: WireSpan<'_, WireUint8> = WireSpan(&[]);
        assert_eq!(span.wire_len(), 0);
        let buf = serialize_into_buffer(&SystemAllocator, &span).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn writer_combinators_match_buffer_serialization() {
        use crate::writer::DataWriter;

        let element = (WireVarInt62(300), WireUint8(7));
        let mut raw = vec![0u8; wire_len_of(&element)];
        let mut writer = DataWriter::new(&mut raw);
        serialize_into_writer(&mut writer, &element).unwrap();
        assert_eq!(writer.remaining(), 0);

        let buf = serialize_into_buffer(&SystemAllocator, &element).unwrap();
        assert_eq!(buf.as_ref(), raw.as_slice());
    }

    #[test]
    fn varint_overflow_surfaces_from_buffer_serialization() {
        let result = serialize_into_buffer(&SystemAllocator, &WireVarInt62(u64::MAX));
        assert_eq!(result, Err(WireError::VarintOverflow(u64::MAX)));
    }
}
