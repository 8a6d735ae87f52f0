//! Keyed views over archived byte blobs.
//!
//! A [`RawSource`] is a flat mapping from entry name to raw bytes (here: the
//! contents of a downloaded zip archive). A [`KeyCodec`] narrows those names
//! to the ones belonging to a dataset and bridges them to typed keys, and a
//! [`Decode`] turns an entry's bytes into a domain value. [`KeyedView`]
//! composes the three into a lazily decoded, sorted mapping, and
//! [`DatasetRouter`] unifies several such pipelines behind one name-keyed
//! mapping dispatched by prefix.

use crate::error::Result;

mod archive;
mod router;
mod template;
mod view;

pub use archive::ZipStore;
pub use router::{DatasetRouter, pipeline};
pub use template::{KeyTemplate, ShardTemplate};
pub use view::KeyedView;

/// A read-only mapping from entry name to raw bytes.
pub trait RawSource {
    /// Entry names, in no particular order. Re-derived on every call.
    fn names(&self) -> Result<Vec<String>>;

    /// Bytes of one entry. Absent names fail with
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound).
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Bridges typed keys and raw entry names for one dataset.
pub trait KeyCodec {
    type Key: Ord;

    /// Whether `name` belongs to this dataset.
    fn matches(&self, name: &str) -> bool;

    /// Typed key of a matching name. Non-matching names fail with
    /// [`Error::KeyFormat`](crate::Error::KeyFormat), as do names whose
    /// field values cannot be coerced.
    fn extract(&self, name: &str) -> Result<Self::Key>;

    /// Inverse of [`extract`](Self::extract): the exact entry name for `key`.
    fn render(&self, key: &Self::Key) -> Result<String>;
}

/// Turns an entry's raw bytes into a domain value.
pub trait Decode {
    type Output;

    fn decode(&self, bytes: Vec<u8>) -> Result<Self::Output>;
}

/// Presents several raw sources as one mapping.
///
/// Entry names are expected to be unique across members; lookups try members
/// in order and settle on the first that has the name.
pub struct MultiSource<S>(Vec<S>);

impl<S: RawSource> MultiSource<S> {
    pub fn new(sources: Vec<S>) -> Self {
        Self(sources)
    }
}

impl<S: RawSource> RawSource for MultiSource<S> {
    fn names(&self) -> Result<Vec<String>> {
        let mut all = Vec::new();
        for source in &self.0 {
            all.extend(source.names()?);
        }
        Ok(all)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        for source in &self.0 {
            match source.read(name) {
                Err(crate::Error::KeyNotFound(_)) => continue,
                other => return other,
            }
        }
        Err(crate::Error::KeyNotFound(name.to_string()))
    }
}
