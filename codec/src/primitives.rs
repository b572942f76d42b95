//! Constructors for the primitive codecs.
//!
//! # Byte order
//!
//! All fixed-width integers and floats are written little-endian. The choice
//! is arbitrary but deliberate: one byte order, everywhere, documented here,
//! so that independent implementations of the wire format agree.
//!
//! # Variable-length alternatives
//!
//! [`uvarint`] and [`ivarint`] trade the fixed width for a length that tracks
//! the magnitude of the value, using the same varint encoding as length
//! prefixes and union tags (see [`crate::varint`]).

use crate::{codec::Codec, error::Error, util, varint};
use bytes::{BufMut, Bytes, BytesMut};
use paste::paste;

macro_rules! numeric_codec {
    ($name:ident) => {
        paste! {
            #[doc = "Codec for a fixed-width little-endian `" $name "`."]
            pub fn $name() -> Codec<$name> {
                Codec::new(
                    |value: &$name, buf: &mut BytesMut| buf.put_slice(&value.to_le_bytes()),
                    |cursor| Ok(<$name>::from_le_bytes(cursor.read_array()?)),
                )
            }
        }
    };
}

numeric_codec!(u8);
numeric_codec!(u16);
numeric_codec!(u32);
numeric_codec!(u64);
numeric_codec!(u128);
numeric_codec!(i8);
numeric_codec!(i16);
numeric_codec!(i32);
numeric_codec!(i64);
numeric_codec!(i128);
numeric_codec!(f32);
numeric_codec!(f64);

/// Codec for a `bool`, one byte on the wire: 0 or 1.
///
/// Any other byte fails to decode with [`Error::InvalidValue`].
pub fn bool() -> Codec<bool> {
    Codec::new(
        |value: &bool, buf: &mut BytesMut| buf.put_u8(*value as u8),
        |cursor| match cursor.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(Error::InvalidValue("bool", byte)),
        },
    )
}

/// Codec for a `u64` in variable-length encoding.
pub fn uvarint() -> Codec<u64> {
    Codec::new(
        |value: &u64, buf: &mut BytesMut| varint::write(*value, buf),
        |cursor| varint::read(cursor),
    )
}

/// Codec for an `i64` in variable-length ZigZag encoding.
pub fn ivarint() -> Codec<i64> {
    Codec::new(
        |value: &i64, buf: &mut BytesMut| varint::write_signed(*value, buf),
        |cursor| varint::read_signed(cursor),
    )
}

/// Codec for a `String`: varint length prefix followed by UTF-8 bytes.
///
/// Decoding fails with [`Error::InvalidUtf8`] if the payload is not valid
/// UTF-8.
pub fn string() -> Codec<String> {
    Codec::new(
        |value: &String, buf: &mut BytesMut| {
            util::write_len(value.len(), buf);
            buf.put_slice(value.as_bytes());
        },
        |cursor| {
            let len = util::read_len(cursor)?;
            let payload = cursor.read(len)?;
            Ok(std::str::from_utf8(payload)?.to_owned())
        },
    )
}

/// Codec for an opaque byte sequence: varint length prefix followed by the
/// raw bytes.
pub fn bytes() -> Codec<Bytes> {
    Codec::new(
        |value: &Bytes, buf: &mut BytesMut| {
            util::write_len(value.len(), buf);
            buf.put_slice(value);
        },
        |cursor| {
            let len = util::read_len(cursor)?;
            Ok(Bytes::copy_from_slice(cursor.read(len)?))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! numeric_roundtrip_test {
        ($type:ident) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let codec = $type();
                    let expected_len = std::mem::size_of::<$type>();
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let encoded = codec.encode(value);
                        assert_eq!(encoded.len(), expected_len);
                        let decoded = codec.decode(&encoded).unwrap();
                        assert_eq!(*value, decoded);
                    }
                }
            }
        };
    }
    numeric_roundtrip_test!(u8);
    numeric_roundtrip_test!(u16);
    numeric_roundtrip_test!(u32);
    numeric_roundtrip_test!(u64);
    numeric_roundtrip_test!(u128);
    numeric_roundtrip_test!(i8);
    numeric_roundtrip_test!(i16);
    numeric_roundtrip_test!(i32);
    numeric_roundtrip_test!(i64);
    numeric_roundtrip_test!(i128);
    numeric_roundtrip_test!(f32);
    numeric_roundtrip_test!(f64);

    #[test]
    fn test_endianness() {
        assert_eq!(u16().encode(&0x0102).as_ref(), &[0x02, 0x01]);
        assert_eq!(
            u32().encode(&0x01020304).as_ref(),
            &[0x04, 0x03, 0x02, 0x01]
        );
        // Little-endian IEEE 754
        assert_eq!(f32().encode(&1.0).as_ref(), &[0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_truncated_numeric() {
        let codec = u32();
        assert!(matches!(
            codec.decode(&[0x01, 0x02]),
            Err(Error::EndOfInput)
        ));
    }

    #[test]
    fn test_bool() {
        let codec = bool();
        assert_eq!(codec.encode(&true).as_ref(), &[0x01]);
        assert_eq!(codec.encode(&false).as_ref(), &[0x00]);
        assert!(codec.decode(&[0x01]).unwrap());
        assert!(!codec.decode(&[0x00]).unwrap());
        assert!(matches!(
            codec.decode(&[0x02]),
            Err(Error::InvalidValue("bool", 0x02))
        ));
    }

    #[test]
    fn test_uvarint() {
        let codec = uvarint();
        for value in [0u64, 1, 127, 128, 300, u64::MAX] {
            let encoded = codec.encode(&value);
            assert_eq!(encoded.len(), varint::size(value));
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
        assert_eq!(codec.encode(&300).as_ref(), &[0xAC, 0x02]);
    }

    #[test]
    fn test_ivarint() {
        let codec = ivarint();
        for value in [0i64, 1, -1, 63, -64, 64, i64::MIN, i64::MAX] {
            let encoded = codec.encode(&value);
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
        // Small magnitudes stay short regardless of sign.
        assert_eq!(codec.encode(&-1).len(), 1);
        assert_eq!(codec.encode(&-64).len(), 1);
    }

    #[test]
    fn test_string() {
        let codec = string();
        for value in ["", "hi", "héllo wörld", "日本語"] {
            let value = value.to_owned();
            let encoded = codec.encode(&value);
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
        assert_eq!(
            codec.encode(&"hi".to_owned()).as_ref(),
            &[0x02, b'h', b'i']
        );
    }

    #[test]
    fn test_string_invalid_utf8() {
        let codec = string();
        assert!(matches!(
            codec.decode(&[0x02, 0xFF, 0xFE]),
            Err(Error::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_string_truncated_payload() {
        // The prefix claims three bytes but only two follow.
        let codec = string();
        assert!(matches!(
            codec.decode(&[0x03, b'h', b'i']),
            Err(Error::EndOfInput)
        ));
    }

    #[test]
    fn test_bytes() {
        let codec = bytes();
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
        ];
        for value in values {
            let encoded = codec.encode(&value);
            assert_eq!(encoded.len(), varint::size(value.len() as u64) + value.len());
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
    }
}
