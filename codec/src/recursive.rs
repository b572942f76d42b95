//! Codecs for self-referential types.

use crate::{codec::Codec, cursor::Cursor};
use bytes::BytesMut;
use std::sync::{Arc, OnceLock};

/// Builds a codec for a type that refers to itself, directly or through
/// [`maybe`](crate::combinators::maybe), [`list`](crate::combinators::list)
/// or a tagged-union field.
///
/// `build` receives a placeholder codec standing in for the codec under
/// construction and returns the real definition. The placeholder indirects
/// through a write-once cell that is filled with the real definition before
/// `recursive` returns, so embedding it inside other combinators is free of
/// construction-time recursion.
///
/// `build` must only *embed* the placeholder; invoking `encode`/`decode` on
/// it during `build`'s own execution is a programmer error and panics.
///
/// ```
/// use bitweave_codec::{combinators, primitives, recursive, Codec};
///
/// // A cons list of u32 values.
/// #[derive(Debug, Clone, PartialEq)]
/// struct Chain(Option<Box<(u32, Chain)>>);
///
/// let chain: Codec<Chain> = recursive(|chain| {
///     combinators::map(
///         combinators::maybe(combinators::tuple2(primitives::u32(), chain)),
///         |value: &Chain| value.0.as_deref().cloned(),
///         |link| Chain(link.map(Box::new)),
///     )
/// });
///
/// let value = Chain(Some(Box::new((1, Chain(Some(Box::new((2, Chain(None)))))))));
/// assert_eq!(chain.decode(&chain.encode(&value)).unwrap(), value);
/// ```
pub fn recursive<T, F>(build: F) -> Codec<T>
where
    T: 'static,
    F: FnOnce(Codec<T>) -> Codec<T>,
{
    let cell: Arc<OnceLock<Codec<T>>> = Arc::new(OnceLock::new());
    let placeholder = {
        let encode_cell = Arc::clone(&cell);
        let decode_cell = Arc::clone(&cell);
        Codec::new(
            move |value: &T, buf: &mut BytesMut| resolve(&encode_cell).write(value, buf),
            move |cursor: &mut Cursor<'_>| resolve(&decode_cell).read(cursor),
        )
    };

    let definition = build(placeholder.clone());
    if cell.set(definition).is_err() {
        // The cell is private to this call and set nowhere else.
        unreachable!("recursive codec cell already filled");
    }
    placeholder
}

fn resolve<T>(cell: &OnceLock<Codec<T>>) -> &Codec<T> {
    cell.get()
        .expect("recursive codec used before its constructor returned")
}
