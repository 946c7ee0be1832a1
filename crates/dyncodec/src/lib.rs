//! Dynamic codec combinators with path-addressed diagnostics.
//!
//! Codecs map typed values to and from a generic document value through an
//! [`Ops`] backend. On top of that base this crate provides:
//!
//! - [`ObjectCodec`]: object codecs assembled from key/getter/setter bindings,
//!   with required, nullable, recursive, extend and mandatory fields;
//! - [`ListCodec`]: a list codec that writes singletons bare and flattens
//!   nested sequences on read;
//! - [`DiagnosticContext`]: a per-decode accumulator filing every failure at
//!   its [`PathAddress`].
//!
//! # Example
//!
//! ```
//! use dyncodec::codec::{I32Codec, StringCodec};
//! use dyncodec::diagnostics::decode_diagnosed;
//! use dyncodec::object::FieldSet;
//! use dyncodec::ops::JsonOps;
//! use serde_json::{json, Value};
//!
//! #[derive(Debug, Default)]
//! struct Block {
//!     id: String,
//!     light: i32,
//! }
//!
//! let codec = FieldSet::<Block, Value>::new(Block::default)
//!     .field(StringCodec, "id", |b| &b.id, |b, v| b.id = v)
//!     .field(I32Codec, "light", |b| &b.light, |b, v| b.light = v)
//!     .build();
//!
//! let outcome = decode_diagnosed(&codec, JsonOps, &json!({"id": 5, "light": "high"}));
//! assert!(!outcome.is_ok());
//! let leaves = outcome.context.error_root(None).erred_leaves();
//! assert_eq!(leaves.len(), 2);
//! ```

pub mod codec;
pub mod diagnostics;
pub mod error;
pub mod list;
pub mod object;
pub mod ops;

pub use codec::Codec;
pub use diagnostics::{decode_diagnosed, DiagnosticContext, DiagnosticOps, Diagnosed, ErrorNode};
pub use dyncodec_path::{PathAddress, PathSyntaxError, Segment};
pub use error::CodecError;
pub use list::{ListCodec, ListShape};
pub use object::{DynamicField, FieldKind, FieldSet, ObjectCodec};
pub use ops::Ops;

#[cfg(feature = "cbor")]
pub use ops::CborOps;
#[cfg(feature = "json")]
pub use ops::JsonOps;
