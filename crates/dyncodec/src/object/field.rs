//! The field kinds an [`ObjectCodec`] is assembled from.

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, Weak};

use dyncodec_path::Segment;

use super::{DynamicField, FieldKind, ObjectCodec};
use crate::codec::Codec;
use crate::diagnostics::attempt;
use crate::error::CodecError;
use crate::ops::Ops;

/// A plain field bound to `get`/`set` and a value codec.
///
/// Used for both [`FieldKind::Required`] (absent keeps the factory default)
/// and [`FieldKind::Mandatory`] (absent is an error). An explicit null is a
/// failure for either.
pub struct FieldSpec<O, T, C, G, S> {
    key: String,
    kind: FieldKind,
    codec: C,
    get: G,
    set: S,
    _marker: PhantomData<fn(&mut O, T)>,
}

impl<O, T, C, G, S> FieldSpec<O, T, C, G, S> {
    pub(crate) fn new(kind: FieldKind, codec: C, key: String, get: G, set: S) -> Self {
        Self {
            key,
            kind,
            codec,
            get,
            set,
            _marker: PhantomData,
        }
    }
}

impl<O, T, V, C, G, S> DynamicField<O, V> for FieldSpec<O, T, C, G, S>
where
    C: Codec<T, V>,
    G: Fn(&O) -> &T + Send + Sync,
    S: Fn(&mut O, T) + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn decode_into(
        &self,
        target: &mut O,
        ops: &dyn Ops<V>,
        input: Option<&V>,
    ) -> Result<(), CodecError> {
        let at = Segment::key(self.key.as_str());
        let Some(input) = input else {
            if self.kind == FieldKind::Mandatory {
                return attempt(ops, at, || {
                    Err(CodecError::MissingRequiredField {
                        key: self.key.clone(),
                    })
                });
            }
            return Ok(());
        };

        let value = attempt(ops, at, || {
            if ops.is_null(input) {
                return Err(CodecError::mismatch(format!(
                    "Unexpected null for \"{}\"",
                    self.key
                )));
            }
            self.codec.decode(ops, input)
        })?;
        (self.set)(target, value);
        Ok(())
    }

    fn encode_from(&self, source: &O, ops: &dyn Ops<V>) -> Result<Option<V>, CodecError> {
        self.codec.encode((self.get)(source), ops).map(Some)
    }
}

/// A field whose explicit null decodes to `None` and whose `None` encodes
/// as an explicit null.
pub struct NullableField<O, T, C, G, S> {
    key: String,
    codec: C,
    get: G,
    set: S,
    _marker: PhantomData<fn(&mut O, T)>,
}

impl<O, T, C, G, S> NullableField<O, T, C, G, S> {
    pub(crate) fn new(codec: C, key: String, get: G, set: S) -> Self {
        Self {
            key,
            codec,
            get,
            set,
            _marker: PhantomData,
        }
    }
}

impl<O, T, V, C, G, S> DynamicField<O, V> for NullableField<O, T, C, G, S>
where
    C: Codec<T, V>,
    G: Fn(&O) -> Option<&T> + Send + Sync,
    S: Fn(&mut O, Option<T>) + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Nullable
    }

    fn decode_into(
        &self,
        target: &mut O,
        ops: &dyn Ops<V>,
        input: Option<&V>,
    ) -> Result<(), CodecError> {
        let Some(input) = input else {
            return Ok(());
        };
        if ops.is_null(input) {
            (self.set)(target, None);
            return Ok(());
        }
        let value = attempt(ops, Segment::key(self.key.as_str()), || {
            self.codec.decode(ops, input)
        })?;
        (self.set)(target, Some(value));
        Ok(())
    }

    fn encode_from(&self, source: &O, ops: &dyn Ops<V>) -> Result<Option<V>, CodecError> {
        match (self.get)(source) {
            Some(value) => self.codec.encode(value, ops).map(Some),
            None => Ok(Some(ops.null())),
        }
    }
}

/// A field holding another instance of the enclosing object type.
///
/// The enclosing codec cannot be captured while it is being built, so the
/// field holds a cell that [`ObjectCodec::new`] fills right after allocating
/// the codec. Absence terminates the recursion and is encoded by omitting the
/// key.
pub struct RecursiveField<O, V, G, S> {
    key: String,
    get: G,
    set: S,
    this: OnceLock<Weak<ObjectCodec<O, V>>>,
}

impl<O, V, G, S> RecursiveField<O, V, G, S> {
    pub(crate) fn new(key: String, get: G, set: S) -> Self {
        Self {
            key,
            get,
            set,
            this: OnceLock::new(),
        }
    }

    fn resolve(&self) -> Result<Arc<ObjectCodec<O, V>>, CodecError> {
        self.this.get().and_then(Weak::upgrade).ok_or_else(|| {
            tracing::debug!(key = %self.key, "recursive field used before its codec was bound");
            CodecError::UnboundRecursion {
                key: self.key.clone(),
            }
        })
    }
}

impl<O, V, G, S> DynamicField<O, V> for RecursiveField<O, V, G, S>
where
    G: Fn(&O) -> Option<&O> + Send + Sync,
    S: Fn(&mut O, Option<O>) + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Recursive
    }

    fn decode_into(
        &self,
        target: &mut O,
        ops: &dyn Ops<V>,
        input: Option<&V>,
    ) -> Result<(), CodecError> {
        let input = match input {
            Some(input) if !ops.is_null(input) => input,
            _ => {
                (self.set)(target, None);
                return Ok(());
            }
        };
        let codec = self.resolve()?;
        let value = attempt(ops, Segment::key(self.key.as_str()), || {
            codec.decode(ops, input)
        })?;
        (self.set)(target, Some(value));
        Ok(())
    }

    fn encode_from(&self, source: &O, ops: &dyn Ops<V>) -> Result<Option<V>, CodecError> {
        match (self.get)(source) {
            Some(next) => self.resolve()?.encode(next, ops).map(Some),
            None => Ok(None),
        }
    }

    fn bind(&self, this: &Weak<ObjectCodec<O, V>>) {
        if self.this.set(this.clone()).is_err() {
            tracing::debug!(key = %self.key, "recursive field already bound");
        }
    }
}

/// An independently defined object nested under a key.
///
/// An absent key yields the inner codec's factory default.
pub struct ExtendField<O, I, V, G, S> {
    key: String,
    inner: Arc<ObjectCodec<I, V>>,
    get: G,
    set: S,
    _marker: PhantomData<fn(&mut O)>,
}

impl<O, I, V, G, S> ExtendField<O, I, V, G, S> {
    pub(crate) fn new(inner: Arc<ObjectCodec<I, V>>, key: String, get: G, set: S) -> Self {
        Self {
            key,
            inner,
            get,
            set,
            _marker: PhantomData,
        }
    }
}

impl<O, I, V, G, S> DynamicField<O, V> for ExtendField<O, I, V, G, S>
where
    G: Fn(&O) -> &I + Send + Sync,
    S: Fn(&mut O, I) + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Extend
    }

    fn decode_into(
        &self,
        target: &mut O,
        ops: &dyn Ops<V>,
        input: Option<&V>,
    ) -> Result<(), CodecError> {
        let value = match input {
            None => self.inner.create_default(),
            Some(input) => attempt(ops, Segment::key(self.key.as_str()), || {
                self.inner.decode(ops, input)
            })?,
        };
        (self.set)(target, value);
        Ok(())
    }

    fn encode_from(&self, source: &O, ops: &dyn Ops<V>) -> Result<Option<V>, CodecError> {
        self.inner.encode((self.get)(source), ops).map(Some)
    }
}
