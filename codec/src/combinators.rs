//! Structural combinators: build new codecs out of existing ones.

use crate::{codec::Codec, error::Error, util};
use bytes::{BufMut, BytesMut};
use paste::paste;

/// Builds a codec for `A` on top of a codec for `B` and a pair of conversion
/// functions.
///
/// The encode path applies `from` and delegates to `inner`; the decode path
/// delegates to `inner` and applies `into`. The engine cannot verify that the
/// two functions are mutual inverses: round-trip correctness of a mapped
/// codec is the caller's obligation. The usual safe shape is a
/// constructor/destructor pair for a product type, as in:
///
/// ```
/// use bitweave_codec::{combinators, primitives, Codec};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Position {
///     lat: f64,
///     lon: f64,
/// }
///
/// let position: Codec<Position> = combinators::map(
///     combinators::tuple2(primitives::f64(), primitives::f64()),
///     |p: &Position| (p.lat, p.lon),
///     |(lat, lon)| Position { lat, lon },
/// );
///
/// let value = Position { lat: 48.8584, lon: 2.2945 };
/// assert_eq!(position.decode(&position.encode(&value)).unwrap(), value);
/// ```
pub fn map<A, B, F, G>(inner: Codec<B>, from: F, into: G) -> Codec<A>
where
    A: 'static,
    B: 'static,
    F: Fn(&A) -> B + Send + Sync + 'static,
    G: Fn(B) -> A + Send + Sync + 'static,
{
    let reader = inner.clone();
    Codec::new(
        move |value: &A, buf: &mut BytesMut| inner.write(&from(value), buf),
        move |cursor| Ok(into(reader.read(cursor)?)),
    )
}

/// Builds a codec for `Option<T>`: one presence byte (0 = absent,
/// 1 = present) followed by the payload if present.
///
/// Any other presence byte fails to decode with [`Error::InvalidValue`].
pub fn maybe<T: 'static>(inner: Codec<T>) -> Codec<Option<T>> {
    let reader = inner.clone();
    Codec::new(
        move |value: &Option<T>, buf: &mut BytesMut| match value {
            Some(payload) => {
                buf.put_u8(1);
                inner.write(payload, buf);
            }
            None => buf.put_u8(0),
        },
        move |cursor| match cursor.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(reader.read(cursor)?)),
            byte => Err(Error::InvalidValue("presence flag", byte)),
        },
    )
}

/// Builds a codec for `Vec<T>`: a varint element count followed by each
/// element in order.
///
/// Decoding rejects a count larger than the bytes remaining before touching
/// any element, and fails on the first element that fails, discarding
/// partially decoded elements.
pub fn list<T: 'static>(item: Codec<T>) -> Codec<Vec<T>> {
    let reader = item.clone();
    Codec::new(
        move |values: &Vec<T>, buf: &mut BytesMut| {
            util::write_len(values.len(), buf);
            for value in values {
                item.write(value, buf);
            }
        },
        move |cursor| {
            let count = util::read_len(cursor)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(reader.read(cursor)?);
            }
            Ok(values)
        },
    )
}

// Tuple codecs concatenate the member encodings with no prefix; decode reads
// the members back in the same order and fails on the first failing member.
macro_rules! tuple_codec {
    ($name:ident => $( $c:ident : $T:ident : $idx:tt ),+) => {
        paste! {
            /// Builds a codec for a fixed-arity tuple from one codec per member.
            pub fn $name<$( $T: 'static ),+>( $( $c: Codec<$T> ),+ ) -> Codec<($( $T, )+)> {
                $( let [<$c _r>] = $c.clone(); )+
                Codec::new(
                    move |value: &($( $T, )+), buf: &mut BytesMut| {
                        $( $c.write(&value.$idx, buf); )+
                    },
                    move |cursor| Ok(( $( [<$c _r>].read(cursor)?, )+ )),
                )
            }
        }
    };
}

tuple_codec!(tuple2 => c0:T0:0, c1:T1:1);
tuple_codec!(tuple3 => c0:T0:0, c1:T1:1, c2:T2:2);
tuple_codec!(tuple4 => c0:T0:0, c1:T1:1, c2:T2:2, c3:T3:3);
tuple_codec!(tuple5 => c0:T0:0, c1:T1:1, c2:T2:2, c3:T3:3, c4:T4:4);
tuple_codec!(tuple6 => c0:T0:0, c1:T1:1, c2:T2:2, c3:T3:3, c4:T4:4, c5:T5:5);
tuple_codec!(tuple7 => c0:T0:0, c1:T1:1, c2:T2:2, c3:T3:3, c4:T4:4, c5:T5:5, c6:T6:6);
tuple_codec!(tuple8 => c0:T0:0, c1:T1:1, c2:T2:2, c3:T3:3, c4:T4:4, c5:T5:5, c6:T6:6, c7:T7:7);
