//! Composable bidirectional binary codecs.
//!
//! # Overview
//!
//! A codec pairs an encoder and a decoder for one type in a single immutable
//! [`Codec`] value. Codecs for complex types are assembled bottom-up, exactly
//! once (typically at process startup), from:
//!
//! - Primitives: fixed-width little-endian numerics, varints, `bool`,
//!   length-prefixed strings and byte sequences ([`primitives`])
//! - Structural combinators: [`map`], [`tuple2`]..[`tuple8`], [`list`],
//!   [`maybe`] ([`combinators`])
//! - [`recursive()`] for self-referential types
//! - [`tagged_union`] for sum types, dispatching on a varint wire tag
//!
//! At run time, [`Codec::encode`] and [`Codec::decode`] are the only entry
//! points: encoding appends to a growable buffer and cannot fail for
//! well-typed values, decoding reads through a bounds-checked [`Cursor`] and
//! reports every failure as a typed [`Error`]. Codecs hold no mutable state
//! and may be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use bitweave_codec::{combinators, primitives, tagged_union, Codec};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Event {
//!     Heartbeat,
//!     Login { user: String, admin: bool },
//!     Batch(Vec<u32>),
//! }
//!
//! let event: Codec<Event> = tagged_union::<Event>()
//!     .variant0(0, || Event::Heartbeat, |v| matches!(v, Event::Heartbeat))
//!     .variant2(
//!         1,
//!         primitives::string(),
//!         primitives::bool(),
//!         |user, admin| Event::Login { user, admin },
//!         |v| match v {
//!             Event::Login { user, admin } => Some((user, admin)),
//!             _ => None,
//!         },
//!     )
//!     .variant1(
//!         2,
//!         combinators::list(primitives::u32()),
//!         Event::Batch,
//!         |v| match v {
//!             Event::Batch(items) => Some(items),
//!             _ => None,
//!         },
//!     )
//!     .build();
//!
//! let value = Event::Login { user: "ada".into(), admin: true };
//! let encoded = event.encode(&value);
//! assert_eq!(event.decode(&encoded).unwrap(), value);
//! ```
//!
//! # Recursive types
//!
//! [`recursive()`] hands the definition a placeholder for the codec being
//! built, so a type may nest inside itself without infinite recursion at
//! construction time:
//!
//! ```
//! use bitweave_codec::{combinators, primitives, recursive, Codec};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Comment {
//!     author: String,
//!     replies: Vec<Comment>,
//! }
//!
//! let comment: Codec<Comment> = recursive(|comment| {
//!     combinators::map(
//!         combinators::tuple2(primitives::string(), combinators::list(comment)),
//!         |c: &Comment| (c.author.clone(), c.replies.clone()),
//!         |(author, replies)| Comment { author, replies },
//!     )
//! });
//!
//! let thread = Comment {
//!     author: "ada".into(),
//!     replies: vec![Comment { author: "alan".into(), replies: vec![] }],
//! };
//! assert_eq!(comment.decode(&comment.encode(&thread)).unwrap(), thread);
//! ```

pub mod codec;
pub mod combinators;
pub mod cursor;
pub mod error;
pub mod primitives;
pub mod recursive;
pub mod union;
mod util;
pub mod varint;

// Re-export main types and constructors
pub use codec::Codec;
pub use combinators::{list, map, maybe, tuple2, tuple3, tuple4, tuple5, tuple6, tuple7, tuple8};
pub use cursor::Cursor;
pub use error::Error;
pub use recursive::recursive;
pub use union::{tagged_union, UnionBuilder};
