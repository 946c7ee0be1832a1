//! Object codecs assembled from field bindings.
//!
//! A [`FieldSet`] pairs a factory with an ordered list of fields; each field
//! binds a key to a getter, a setter and a value codec. [`ObjectCodec`] turns
//! the set into a `Codec<O, V>`.
//!
//! ```
//! use dyncodec::codec::{Codec, I32Codec, StringCodec};
//! use dyncodec::object::FieldSet;
//! use dyncodec::ops::JsonOps;
//! use serde_json::{json, Value};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Item {
//!     name: String,
//!     count: i32,
//!     note: Option<String>,
//! }
//!
//! let codec = FieldSet::<Item, Value>::new(Item::default)
//!     .field(StringCodec, "name", |i| &i.name, |i, v| i.name = v)
//!     .field(I32Codec, "count", |i| &i.count, |i, v| i.count = v)
//!     .nullable(StringCodec, "note", |i| i.note.as_ref(), |i, v| i.note = v)
//!     .build();
//!
//! let item = codec.decode(&JsonOps, &json!({"name": "stone", "count": 3})).unwrap();
//! assert_eq!(item.count, 3);
//! assert_eq!(
//!     codec.encode(&item, &JsonOps).unwrap(),
//!     json!({"name": "stone", "count": 3, "note": null})
//! );
//! ```

mod field;

pub use field::{ExtendField, FieldSpec, NullableField, RecursiveField};

use std::fmt;
use std::sync::{Arc, Weak};

use crate::codec::Codec;
use crate::error::CodecError;
use crate::ops::Ops;

/// How a field treats absence, null and recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Absent keeps the factory default; explicit null fails.
    Required,
    /// Absent keeps the factory default; explicit null decodes to `None`.
    Nullable,
    /// Value of the enclosing type; absent or null terminates the recursion.
    Recursive,
    /// A nested independently defined object; absent yields its default.
    Extend,
    /// Absent fails with [`CodecError::MissingRequiredField`].
    Mandatory,
}

/// One field of an object codec, with its value type erased.
pub trait DynamicField<O, V>: Send + Sync {
    fn key(&self) -> &str;

    fn kind(&self) -> FieldKind;

    /// Decode `input` (the value under [`key`](Self::key), `None` if absent)
    /// into `target`.
    fn decode_into(
        &self,
        target: &mut O,
        ops: &dyn Ops<V>,
        input: Option<&V>,
    ) -> Result<(), CodecError>;

    /// The value to write under the key, or `None` to omit it.
    fn encode_from(&self, source: &O, ops: &dyn Ops<V>) -> Result<Option<V>, CodecError>;

    /// Receive the enclosing codec once it is allocated.
    fn bind(&self, _this: &Weak<ObjectCodec<O, V>>) {}
}

type Factory<O> = Box<dyn Fn() -> O + Send + Sync>;

/// Ordered field bindings plus the factory producing default instances.
pub struct FieldSet<O, V> {
    factory: Factory<O>,
    fields: Vec<Box<dyn DynamicField<O, V>>>,
}

impl<O: 'static, V: 'static> FieldSet<O, V> {
    pub fn new(factory: impl Fn() -> O + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            fields: Vec::new(),
        }
    }

    /// Add a [`FieldKind::Required`] field.
    pub fn field<T, C, G, S>(self, codec: C, key: impl Into<String>, get: G, set: S) -> Self
    where
        T: 'static,
        C: Codec<T, V> + 'static,
        G: Fn(&O) -> &T + Send + Sync + 'static,
        S: Fn(&mut O, T) + Send + Sync + 'static,
    {
        self.push(FieldSpec::new(FieldKind::Required, codec, key.into(), get, set))
    }

    /// Add a [`FieldKind::Mandatory`] field.
    pub fn mandatory<T, C, G, S>(self, codec: C, key: impl Into<String>, get: G, set: S) -> Self
    where
        T: 'static,
        C: Codec<T, V> + 'static,
        G: Fn(&O) -> &T + Send + Sync + 'static,
        S: Fn(&mut O, T) + Send + Sync + 'static,
    {
        self.push(FieldSpec::new(FieldKind::Mandatory, codec, key.into(), get, set))
    }

    /// Add a [`FieldKind::Nullable`] field.
    pub fn nullable<T, C, G, S>(self, codec: C, key: impl Into<String>, get: G, set: S) -> Self
    where
        T: 'static,
        C: Codec<T, V> + 'static,
        G: Fn(&O) -> Option<&T> + Send + Sync + 'static,
        S: Fn(&mut O, Option<T>) + Send + Sync + 'static,
    {
        self.push(NullableField::new(codec, key.into(), get, set))
    }

    /// Add a [`FieldKind::Recursive`] field holding another `O`.
    pub fn recursive<G, S>(self, key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&O) -> Option<&O> + Send + Sync + 'static,
        S: Fn(&mut O, Option<O>) + Send + Sync + 'static,
    {
        self.push(RecursiveField::new(key.into(), get, set))
    }

    /// Add a [`FieldKind::Extend`] field nesting `inner` under `key`.
    pub fn extend<I, G, S>(
        self,
        inner: Arc<ObjectCodec<I, V>>,
        key: impl Into<String>,
        get: G,
        set: S,
    ) -> Self
    where
        I: 'static,
        G: Fn(&O) -> &I + Send + Sync + 'static,
        S: Fn(&mut O, I) + Send + Sync + 'static,
    {
        self.push(ExtendField::new(inner, key.into(), get, set))
    }

    /// Add a custom field.
    pub fn push(mut self, field: impl DynamicField<O, V> + 'static) -> Self {
        self.fields.push(Box::new(field));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn build(self) -> Arc<ObjectCodec<O, V>> {
        ObjectCodec::new(self)
    }
}

impl<O, V> fmt::Debug for FieldSet<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSet")
            .field("fields", &FieldList(&self.fields))
            .finish_non_exhaustive()
    }
}

/// Codec for `O` built from a [`FieldSet`].
pub struct ObjectCodec<O, V> {
    factory: Factory<O>,
    fields: Vec<Box<dyn DynamicField<O, V>>>,
}

impl<O, V> ObjectCodec<O, V> {
    /// Allocate the codec and bind every recursive field to it.
    pub fn new(fields: FieldSet<O, V>) -> Arc<Self> {
        let FieldSet { factory, fields } = fields;
        Arc::new_cyclic(|this| {
            for field in &fields {
                field.bind(this);
            }
            Self { factory, fields }
        })
    }

    /// A fresh instance from the factory.
    pub fn create_default(&self) -> O {
        (self.factory)()
    }

    pub fn fields(&self) -> &[Box<dyn DynamicField<O, V>>] {
        &self.fields
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.key())
    }
}

impl<O, V> Codec<O, V> for ObjectCodec<O, V> {
    fn encode(&self, value: &O, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        let mut entries = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if let Some(encoded) = field.encode_from(value, ops)? {
                entries.push((field.key().to_string(), encoded));
            }
        }
        Ok(ops.create_map(entries))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<O, CodecError> {
        if !ops.is_map(input) {
            // Surfaces the backend's own mismatch message.
            ops.get_entries(input)?;
        }

        let mut target = (self.factory)();
        let mut failures = Vec::new();
        for field in &self.fields {
            let outcome = ops
                .get_field(input, field.key())
                .and_then(|value| field.decode_into(&mut target, ops, value.as_ref()));
            if let Err(err) = outcome {
                failures.push(err);
            }
        }

        if !failures.is_empty() {
            tracing::trace!(failures = failures.len(), "object decode failed");
        }
        CodecError::collect(failures).map(|()| target)
    }
}

impl<O, V> fmt::Debug for ObjectCodec<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCodec")
            .field("fields", &FieldList(&self.fields))
            .finish_non_exhaustive()
    }
}

struct FieldList<'a, O, V>(&'a [Box<dyn DynamicField<O, V>>]);

impl<O, V> fmt::Debug for FieldList<'_, O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|field| (field.key(), field.kind())))
            .finish()
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::codec::{I32Codec, StringCodec};
    use crate::ops::JsonOps;
    use serde_json::{json, Value};

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        a: i32,
        b: String,
    }

    fn pair_codec() -> Arc<ObjectCodec<Pair, Value>> {
        FieldSet::new(Pair::default)
            .field(I32Codec, "a", |p: &Pair| &p.a, |p, v| p.a = v)
            .field(StringCodec, "b", |p: &Pair| &p.b, |p, v| p.b = v)
            .build()
    }

    #[test]
    fn test_field_keys_in_declaration_order() {
        let codec = pair_codec();
        assert_eq!(codec.field_keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(codec.fields()[0].kind(), FieldKind::Required);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let codec = pair_codec();
        let decoded = codec
            .decode(&JsonOps, &json!({"a": 1, "b": "x", "extra": true}))
            .unwrap();
        assert_eq!(decoded, Pair { a: 1, b: "x".into() });
    }

    #[test]
    fn test_non_map_input() {
        let codec = pair_codec();
        assert_eq!(
            codec.decode(&JsonOps, &json!([1])).unwrap_err().to_string(),
            "Not a map: [1]"
        );
    }

    #[test]
    fn test_debug_lists_fields() {
        let rendered = format!("{:?}", pair_codec());
        assert!(rendered.contains("\"a\": Required"));
    }
}
