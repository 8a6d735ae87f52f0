use crate::error::{Error, Result};

use super::{Decode, KeyCodec, RawSource};

type RoutePipeline<T> = Box<dyn Fn(&str, Vec<u8>) -> Result<T>>;

struct Route<T> {
    prefix: String,
    pipeline: RoutePipeline<T>,
}

/// One name-keyed mapping over several datasets sharing a raw source.
///
/// Routes are an ordered list of (prefix, pipeline) pairs; a lookup is
/// dispatched to the first route whose prefix the name starts with. Prefixes
/// must be disjoint: registration rejects a prefix that contains or is
/// contained in an already registered one, so misconfiguration fails at
/// construction rather than silently resolving to whichever route came first.
pub struct DatasetRouter<S, T> {
    source: S,
    routes: Vec<Route<T>>,
}

impl<S, T> DatasetRouter<S, T>
where
    S: RawSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            routes: Vec::new(),
        }
    }

    /// Register a dataset's decode pipeline under `prefix`.
    pub fn route<F>(mut self, prefix: impl Into<String>, pipeline: F) -> Result<Self>
    where
        F: Fn(&str, Vec<u8>) -> Result<T> + 'static,
    {
        let prefix = prefix.into();
        for route in &self.routes {
            if route.prefix.starts_with(&prefix) || prefix.starts_with(&route.prefix) {
                return Err(Error::AmbiguousPrefixes(route.prefix.clone(), prefix));
            }
        }
        self.routes.push(Route {
            prefix,
            pipeline: Box::new(pipeline),
        });
        Ok(self)
    }

    /// Decode the entry named `name` through its owning dataset's pipeline.
    ///
    /// Fails with [`Error::UnknownDataset`] when no prefix matches, with
    /// [`Error::KeyNotFound`] when the owning source has no such entry, and
    /// with whatever the pipeline itself reports (e.g. [`Error::KeyFormat`]
    /// for a name that carries the right prefix but not the right shape).
    pub fn get(&self, name: &str) -> Result<T> {
        let route = self
            .routes
            .iter()
            .find(|route| name.starts_with(&route.prefix))
            .ok_or_else(|| Error::UnknownDataset(name.to_string()))?;
        let bytes = self.source.read(name)?;
        (route.pipeline)(name, bytes)
    }

    /// Entry names owned by some registered dataset, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .source
            .names()?
            .into_iter()
            .filter(|name| self.routes.iter().any(|route| name.starts_with(&route.prefix)))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.prefix.as_str())
    }
}

/// The standard per-dataset pipeline: enforce the dataset's name shape, then
/// decode the raw bytes.
pub fn pipeline<C, D>(codec: C, decoder: D) -> impl Fn(&str, Vec<u8>) -> Result<D::Output>
where
    C: KeyCodec,
    D: Decode,
{
    move |name, bytes| {
        codec.extract(name)?;
        decoder.decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ShardTemplate;

    struct MemSource(Vec<(String, Vec<u8>)>);

    impl MemSource {
        fn of(names: &[&str]) -> Self {
            Self(
                names
                    .iter()
                    .map(|n| (n.to_string(), n.as_bytes().to_vec()))
                    .collect(),
            )
        }
    }

    impl RawSource for MemSource {
        fn names(&self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|(n, _)| n.clone()).collect())
        }

        fn read(&self, name: &str) -> Result<Vec<u8>> {
            self.0
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| Error::KeyNotFound(name.to_string()))
        }
    }

    fn tagged(tag: &'static str) -> impl Fn(&str, Vec<u8>) -> Result<String> {
        move |name, _| Ok(format!("{tag}:{name}"))
    }

    struct LenDecoder;

    impl Decode for LenDecoder {
        type Output = usize;

        fn decode(&self, bytes: Vec<u8>) -> Result<usize> {
            Ok(bytes.len())
        }
    }

    #[test]
    fn dispatch_goes_to_the_owning_pipeline_only() {
        let router = DatasetRouter::new(MemSource::of(&["a_1.parquet", "b_1.parquet"]))
            .route("a_", tagged("A"))
            .expect("route a")
            .route("b_", tagged("B"))
            .expect("route b");
        assert_eq!(router.get("a_1.parquet").expect("get"), "A:a_1.parquet");
        assert_eq!(router.get("b_1.parquet").expect("get"), "B:b_1.parquet");
    }

    #[test]
    fn unmatched_names_are_unknown() {
        let router = DatasetRouter::new(MemSource::of(&["c_1.parquet"]))
            .route("a_", tagged("A"))
            .expect("route");
        assert!(matches!(
            router.get("c_1.parquet"),
            Err(Error::UnknownDataset(_))
        ));
    }

    #[test]
    fn matched_prefix_with_absent_entry_is_not_found() {
        let router = DatasetRouter::new(MemSource::of(&[]))
            .route("a_", tagged("A"))
            .expect("route");
        assert!(matches!(
            router.get("a_1.parquet"),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn overlapping_prefixes_are_rejected_up_front() {
        let router = DatasetRouter::<_, String>::new(MemSource::of(&[]))
            .route("a_", tagged("A"))
            .expect("route");
        assert!(matches!(
            router.route("a_b", tagged("B")),
            Err(Error::AmbiguousPrefixes(..))
        ));
    }

    #[test]
    fn pipeline_enforces_the_name_shape() {
        let source = MemSource::of(&["a_junk.parquet", "a_1.parquet"]);
        let router = DatasetRouter::new(source)
            .route(
                "a_",
                pipeline(ShardTemplate::new("a").expect("template"), LenDecoder),
            )
            .expect("route");
        assert!(matches!(
            router.get("a_junk.parquet"),
            Err(Error::KeyFormat { .. })
        ));
        assert_eq!(
            router.get("a_1.parquet").expect("get"),
            "a_1.parquet".len()
        );
    }

    #[test]
    fn names_lists_routable_entries_sorted() {
        let router = DatasetRouter::new(MemSource::of(&[
            "b_2.parquet",
            "a_1.parquet",
            "stray.txt",
        ]))
        .route("a_", tagged("A"))
        .expect("route a")
        .route("b_", tagged("B"))
        .expect("route b");
        assert_eq!(
            router.names().expect("names"),
            vec!["a_1.parquet".to_string(), "b_2.parquet".to_string()]
        );
    }
}
