use crate::error::Result;

use super::{Decode, KeyCodec, RawSource};

/// A lazily decoded mapping from typed keys to domain values.
///
/// Composes a [`RawSource`] with a [`KeyCodec`] and a [`Decode`]: entry names
/// that fit the codec's pattern become typed keys, and values are decoded from
/// raw bytes on every access. Nothing is cached: key listings are re-derived
/// from the source per call, and repeated [`get`](KeyedView::get)s re-decode.
pub struct KeyedView<S, C, D> {
    source: S,
    codec: C,
    decoder: D,
}

impl<S, C, D> KeyedView<S, C, D>
where
    S: RawSource,
    C: KeyCodec,
    D: Decode,
{
    pub fn new(source: S, codec: C, decoder: D) -> Self {
        Self {
            source,
            codec,
            decoder,
        }
    }

    /// Keys of every matching entry, ascending by key value.
    ///
    /// Names that do not fit the pattern are silently excluded; names that fit
    /// but whose field values cannot be coerced propagate their error.
    pub fn keys(&self) -> Result<Vec<C::Key>> {
        let mut keys = Vec::new();
        for name in self.source.names()? {
            if self.codec.matches(&name) {
                keys.push(self.codec.extract(&name)?);
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.keys()?.is_empty())
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        let name = self.codec.render(key)?;
        Ok(self.source.names()?.iter().any(|n| *n == name))
    }

    /// Decode the value behind `key`.
    ///
    /// Fails with [`Error::KeyNotFound`](crate::Error::KeyNotFound) when the
    /// rendered name is absent from the source, and with
    /// [`Error::KeyFormat`](crate::Error::KeyFormat) when the key itself does
    /// not fit the pattern.
    pub fn get(&self, key: &C::Key) -> Result<D::Output> {
        let name = self.codec.render(key)?;
        let bytes = self.source.read(&name)?;
        self.decoder.decode(bytes)
    }

    /// Iterate entries in key order, decoding each value on advance.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<(C::Key, D::Output)>> + '_> {
        let keys = self.keys()?;
        Ok(keys.into_iter().map(move |key| {
            let value = self.get(&key)?;
            Ok((key, value))
        }))
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
