//! Auto-flattening list codec.
//!
//! A list of one element is written as the bare element; any other length is
//! written as a sequence. Decoding accepts either shape and flattens nested
//! sequences depth-first, so `[[1, [2]], 3]` reads as `[1, 2, 3]`.

use dyncodec_path::Segment;

use crate::codec::Codec;
use crate::diagnostics::attempt;
use crate::error::CodecError;
use crate::ops::Ops;

/// Wire-level shape of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListShape<T> {
    Singleton(T),
    Sequence(Vec<T>),
}

impl<T> ListShape<T> {
    /// The shape `list` is written in.
    pub fn classify(list: &[T]) -> ListShape<&T> {
        match list {
            [single] => ListShape::Singleton(single),
            _ => ListShape::Sequence(list.iter().collect()),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListShape::Singleton(item) => vec![item],
            ListShape::Sequence(items) => items,
        }
    }
}

/// `Vec<T>` codec built from an element codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCodec<C> {
    element: C,
}

impl<C> ListCodec<C> {
    pub fn new(element: C) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &C {
        &self.element
    }

    fn flatten_into<T, V>(
        &self,
        ops: &dyn Ops<V>,
        items: &[V],
        out: &mut Vec<T>,
    ) -> Result<(), CodecError>
    where
        C: Codec<T, V>,
    {
        let mut failures = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let step = attempt(ops, Segment::Index(i), || {
                if ops.is_list(item) {
                    let nested = ops.get_list(item)?;
                    self.flatten_into(ops, &nested, out)
                } else {
                    self.element.decode(ops, item).map(|value| out.push(value))
                }
            });
            if let Err(err) = step {
                failures.push(err);
            }
        }
        CodecError::collect(failures)
    }
}

impl<T, V, C> Codec<Vec<T>, V> for ListCodec<C>
where
    C: Codec<T, V>,
{
    fn encode(&self, value: &Vec<T>, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        match ListShape::classify(value.as_slice()) {
            ListShape::Singleton(item) => self.element.encode(item, ops),
            ListShape::Sequence(items) => {
                let encoded = items
                    .into_iter()
                    .map(|item| self.element.encode(item, ops))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ops.create_list(encoded))
            }
        }
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<Vec<T>, CodecError> {
        if !ops.is_list(input) {
            return self
                .element
                .decode(ops, input)
                .map(|single| ListShape::Singleton(single).into_vec());
        }
        let items = ops.get_list(input)?;
        let mut out = Vec::with_capacity(items.len());
        self.flatten_into(ops, &items, &mut out)?;
        Ok(out)
    }
}
