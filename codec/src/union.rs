//! Tagged-union codecs, assembled variant by variant.
//!
//! A tagged union encodes as a varint tag identifying the variant followed by
//! that variant's fields in declaration order. [`tagged_union`] starts a
//! [`UnionBuilder`]; each `variantN` call registers one variant (its wire
//! tag, one codec per field, a constructor applied on decode and a projection
//! consulted on encode); [`UnionBuilder::build`] consumes the builder and
//! produces the final codec.
//!
//! The projections collectively play the role of a match over the sum type:
//! each one is a single arm, written as a native Rust pattern match, that
//! extracts the variant's fields by reference when the value belongs to the
//! variant and yields `None` otherwise. Exactly one projection must accept
//! any given value.
//!
//! Tags identify variants on the wire; the order in which variants are
//! registered never does. Tags may be sparse and need not start at zero,
//! which is what makes a tagged union the natural substrate for schema
//! evolution: a new shape gets a fresh tag while old tags keep their decode
//! path alive indefinitely.

use crate::{
    codec::{decode_fn, Codec, DecodeFn},
    error::Error,
    varint,
};
use bytes::BytesMut;
use paste::paste;
use std::{collections::BTreeMap, sync::Arc};

// Writes the tag and fields of one variant if the value belongs to it,
// reporting whether it did.
type VariantEncodeFn<T> = Arc<dyn Fn(&T, &mut BytesMut) -> bool + Send + Sync>;

// Registration for variants with two or more fields. Expanded inside the
// `UnionBuilder` impl, once per arity.
macro_rules! variant_codec {
    ($name:ident => $( $F:ident : $c:ident ),+) => {
        paste! {
            /// Registers a variant, with one codec per field.
            ///
            /// `project` must accept exactly the values built by `construct`,
            /// returning the fields by reference in declaration order.
            pub fn $name<$( $F: 'static, )+ C, P>(
                mut self,
                tag: u64,
                $( $c: Codec<$F>, )+
                construct: C,
                project: P,
            ) -> Self
            where
                C: Fn($( $F ),+) -> T + Send + Sync + 'static,
                P: for<'v> Fn(&'v T) -> Option<($( &'v $F, )+)> + Send + Sync + 'static,
            {
                $( let [<$c _e>] = $c.clone(); )+
                let encode: VariantEncodeFn<T> = Arc::new(move |value: &T, buf: &mut BytesMut| {
                    match project(value) {
                        Some(($( [<$c _v>], )+)) => {
                            varint::write(tag, buf);
                            $( [<$c _e>].write([<$c _v>], buf); )+
                            true
                        }
                        None => false,
                    }
                });
                let decode = decode_fn(move |cursor| {
                    $( let [<$c _v>] = $c.read(cursor)?; )+
                    Ok(construct($( [<$c _v>] ),+))
                });
                self.register(tag, encode, decode);
                self
            }
        }
    };
}

/// Starts a builder for a tagged-union codec over `T`.
pub fn tagged_union<T: 'static>() -> UnionBuilder<T> {
    UnionBuilder {
        variants: Vec::new(),
        dispatch: BTreeMap::new(),
    }
}

/// Accumulates variant registrations for a tagged-union codec.
///
/// The builder is single-use: [`UnionBuilder::build`] takes it by value, so
/// registering a variant after building is a compile-time error.
pub struct UnionBuilder<T> {
    variants: Vec<VariantEncodeFn<T>>,
    dispatch: BTreeMap<u64, DecodeFn<T>>,
}

impl<T: 'static> UnionBuilder<T> {
    fn register(&mut self, tag: u64, encode: VariantEncodeFn<T>, decode: DecodeFn<T>) {
        let previous = self.dispatch.insert(tag, decode);
        assert!(previous.is_none(), "duplicate tag {tag} in tagged union");
        self.variants.push(encode);
    }

    /// Registers a variant with no fields.
    ///
    /// `matches` must accept exactly the values built by `construct`.
    pub fn variant0<C, P>(mut self, tag: u64, construct: C, matches: P) -> Self
    where
        C: Fn() -> T + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let encode: VariantEncodeFn<T> = Arc::new(move |value: &T, buf: &mut BytesMut| {
            if matches(value) {
                varint::write(tag, buf);
                true
            } else {
                false
            }
        });
        let decode = decode_fn(move |_cursor| Ok(construct()));
        self.register(tag, encode, decode);
        self
    }

    /// Registers a variant with one field.
    ///
    /// `project` must accept exactly the values built by `construct`,
    /// returning a reference to the field.
    pub fn variant1<F0, C, P>(mut self, tag: u64, c0: Codec<F0>, construct: C, project: P) -> Self
    where
        F0: 'static,
        C: Fn(F0) -> T + Send + Sync + 'static,
        P: for<'v> Fn(&'v T) -> Option<&'v F0> + Send + Sync + 'static,
    {
        let c0_e = c0.clone();
        let encode: VariantEncodeFn<T> = Arc::new(move |value: &T, buf: &mut BytesMut| {
            match project(value) {
                Some(f0) => {
                    varint::write(tag, buf);
                    c0_e.write(f0, buf);
                    true
                }
                None => false,
            }
        });
        let decode = decode_fn(move |cursor| Ok(construct(c0.read(cursor)?)));
        self.register(tag, encode, decode);
        self
    }

    variant_codec!(variant2 => F0:c0, F1:c1);
    variant_codec!(variant3 => F0:c0, F1:c1, F2:c2);
    variant_codec!(variant4 => F0:c0, F1:c1, F2:c2, F3:c3);
    variant_codec!(variant5 => F0:c0, F1:c1, F2:c2, F3:c3, F4:c4);
    variant_codec!(variant6 => F0:c0, F1:c1, F2:c2, F3:c3, F4:c4, F5:c5);

    /// Consumes the builder and produces the codec.
    ///
    /// Encoding probes the projections in registration order and writes the
    /// variant whose projection accepts the value; a value accepted by no
    /// projection is a programmer error and panics. Decoding reads the tag
    /// and dispatches on it, failing with [`Error::UnknownTag`] when no
    /// variant was registered for it.
    pub fn build(self) -> Codec<T> {
        let variants = self.variants;
        let dispatch = self.dispatch;
        Codec::new(
            move |value: &T, buf: &mut BytesMut| {
                for encode in &variants {
                    if encode(value, buf) {
                        return;
                    }
                }
                panic!("value matched no registered variant");
            },
            move |cursor| {
                let tag = varint::read::<u64>(cursor)?;
                match dispatch.get(&tag) {
                    Some(decode) => decode(cursor),
                    None => Err(Error::UnknownTag(tag)),
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{combinators, primitives, recursive::recursive};

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { w: f64, h: f64 },
    }

    fn shape_codec() -> Codec<Shape> {
        tagged_union::<Shape>()
            .variant0(0, || Shape::Point, |v| matches!(v, Shape::Point))
            .variant1(1, primitives::f64(), Shape::Circle, |v| match v {
                Shape::Circle(r) => Some(r),
                _ => None,
            })
            .variant2(
                2,
                primitives::f64(),
                primitives::f64(),
                |w, h| Shape::Rect { w, h },
                |v| match v {
                    Shape::Rect { w, h } => Some((w, h)),
                    _ => None,
                },
            )
            .build()
    }

    #[test]
    fn test_shape_roundtrip() {
        let codec = shape_codec();
        let values = [
            Shape::Point,
            Shape::Circle(2.5),
            Shape::Rect { w: 3.0, h: 4.0 },
        ];
        for value in values {
            let encoded = codec.encode(&value);
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_zero_field_variant_is_just_the_tag() {
        let codec = tagged_union::<Shape>()
            .variant0(2, || Shape::Point, |v| matches!(v, Shape::Point))
            .build();
        assert_eq!(codec.encode(&Shape::Point).as_ref(), &[0x02]);
        assert_eq!(codec.decode(&[0x02]).unwrap(), Shape::Point);
    }

    #[test]
    fn test_unknown_tag() {
        let codec = shape_codec();
        assert!(matches!(
            codec.decode(&[0x07]),
            Err(Error::UnknownTag(7))
        ));
    }

    #[test]
    fn test_tag_independent_of_registration_order() {
        let forward = shape_codec();
        let reversed = tagged_union::<Shape>()
            .variant2(
                2,
                primitives::f64(),
                primitives::f64(),
                |w, h| Shape::Rect { w, h },
                |v| match v {
                    Shape::Rect { w, h } => Some((w, h)),
                    _ => None,
                },
            )
            .variant1(1, primitives::f64(), Shape::Circle, |v| match v {
                Shape::Circle(r) => Some(r),
                _ => None,
            })
            .variant0(0, || Shape::Point, |v| matches!(v, Shape::Point))
            .build();

        let values = [
            Shape::Point,
            Shape::Circle(2.5),
            Shape::Rect { w: 3.0, h: 4.0 },
        ];
        for value in values {
            assert_eq!(forward.encode(&value), reversed.encode(&value));
            assert_eq!(
                reversed.decode(&forward.encode(&value)).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_sparse_tags() {
        // Tags need not be contiguous or start at zero.
        let codec = tagged_union::<Shape>()
            .variant0(300, || Shape::Point, |v| matches!(v, Shape::Point))
            .variant1(7, primitives::f64(), Shape::Circle, |v| match v {
                Shape::Circle(r) => Some(r),
                _ => None,
            })
            .build();
        assert_eq!(codec.encode(&Shape::Point).as_ref(), &[0xAC, 0x02]);
        assert_eq!(codec.decode(&[0xAC, 0x02]).unwrap(), Shape::Point);
    }

    #[test]
    #[should_panic(expected = "duplicate tag 1 in tagged union")]
    fn test_duplicate_tag_panics() {
        let _ = tagged_union::<Shape>()
            .variant0(1, || Shape::Point, |v| matches!(v, Shape::Point))
            .variant1(1, primitives::f64(), Shape::Circle, |v| match v {
                Shape::Circle(r) => Some(r),
                _ => None,
            });
    }

    #[test]
    #[should_panic(expected = "value matched no registered variant")]
    fn test_unregistered_value_panics() {
        let codec = tagged_union::<Shape>()
            .variant0(0, || Shape::Point, |v| matches!(v, Shape::Point))
            .build();
        let _ = codec.encode(&Shape::Circle(1.0));
    }

    #[test]
    fn test_truncated_fields() {
        let codec = shape_codec();
        let encoded = codec.encode(&Shape::Rect { w: 3.0, h: 4.0 });
        assert!(matches!(
            codec.decode(&encoded[..encoded.len() - 1]),
            Err(Error::EndOfInput)
        ));
    }

    // A recursive sum type: Peano numbers.
    #[derive(Debug, Clone, PartialEq)]
    enum Nat {
        Zero,
        Succ(Box<Nat>),
    }

    fn nat_codec() -> Codec<Nat> {
        recursive(|nat| {
            let boxed = combinators::map(nat, |b: &Box<Nat>| b.as_ref().clone(), Box::new);
            tagged_union::<Nat>()
                .variant0(0, || Nat::Zero, |v| matches!(v, Nat::Zero))
                .variant1(1, boxed, Nat::Succ, |v| match v {
                    Nat::Succ(n) => Some(n),
                    _ => None,
                })
                .build()
        })
    }

    fn nat_of(n: u32) -> Nat {
        (0..n).fold(Nat::Zero, |nat, _| Nat::Succ(Box::new(nat)))
    }

    #[test]
    fn test_nat_roundtrip() {
        let codec = nat_codec();
        for n in [0, 1, 5] {
            let value = nat_of(n);
            let encoded = codec.encode(&value);
            // One tag byte per successor plus the zero tag.
            assert_eq!(encoded.len(), n as usize + 1);
            assert_eq!(codec.decode(&encoded).unwrap(), value);
        }
    }
}
