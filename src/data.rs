//! The arXiv bulk-metadata datasets and their access façade.
//!
//! The data ships as two zip archives of parquet shards, published at
//! <https://alex.macrocosm.so/download>. Google Drive refuses unattended
//! downloads of files this large, so the archives usually have to be fetched
//! by hand and placed in the cache via [`ArxivData::seed`] (or `xv seed`).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::store::{
    DatasetRouter, KeyedView, MultiSource, ShardTemplate, ZipStore, pipeline,
};
use crate::table::{ParquetDecoder, Table};

pub const TITLES_URL: &str =
    "https://drive.google.com/file/d/1Ul5mPePtoPKHZkH5Rm6dWKAO11dG98GN/view?usp=share_link";
pub const ABSTRACTS_URL: &str =
    "https://drive.google.com/file/d/1g3K-wlixFxklTSUQNZKpEgN4WNTFTPIZ/view?usp=share_link";

const DATASETS: &[(&str, &str)] = &[("titles", TITLES_URL), ("abstracts", ABSTRACTS_URL)];

/// One dataset as a mapping from shard number to decoded table.
pub type ShardView = KeyedView<ZipStore, ShardTemplate, ParquetDecoder>;

/// Every dataset behind one mapping keyed by raw entry name.
pub type ShardRouter = DatasetRouter<MultiSource<ZipStore>, Table>;

/// Entry point to the bulk titles/abstracts data.
pub struct ArxivData {
    fetcher: Fetcher,
}

impl ArxivData {
    /// Use the per-user cache root.
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(Fetcher::default_root()?),
        })
    }

    /// Use `root` as the cache root.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher: Fetcher::new(root),
        }
    }

    pub fn dataset_names() -> impl Iterator<Item = &'static str> {
        DATASETS.iter().map(|(name, _)| *name)
    }

    pub fn dataset_url(name: &str) -> Option<&'static str> {
        DATASETS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, url)| *url)
    }

    /// Open one dataset as a shard-keyed view, fetching its archive if the
    /// cache slot is empty.
    pub fn open(&self, name: &str) -> Result<ShardView> {
        Ok(KeyedView::new(
            self.store(name)?,
            ShardTemplate::new(name)?,
            ParquetDecoder,
        ))
    }

    pub fn titles(&self) -> Result<ShardView> {
        self.open("titles")
    }

    pub fn abstracts(&self) -> Result<ShardView> {
        self.open("abstracts")
    }

    /// All datasets behind one name-keyed mapping, dispatched by the
    /// `<kind>_` prefix of each entry name.
    pub fn router(&self) -> Result<ShardRouter> {
        let mut stores = Vec::new();
        for &(name, _) in DATASETS {
            stores.push(self.store(name)?);
        }
        let mut router = DatasetRouter::new(MultiSource::new(stores));
        for &(name, _) in DATASETS {
            router = router.route(
                format!("{name}_"),
                pipeline(ShardTemplate::new(name)?, ParquetDecoder),
            )?;
        }
        Ok(router)
    }

    /// Fill a dataset's cache slot from a manually downloaded archive.
    pub fn seed(&self, name: &str, archive: &Path) -> Result<PathBuf> {
        let url = Self::dataset_url(name).ok_or_else(|| Error::UnknownDataset(name.to_string()))?;
        self.fetcher.put_file(url, archive)
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    fn store(&self, name: &str) -> Result<ZipStore> {
        let url = Self::dataset_url(name).ok_or_else(|| Error::UnknownDataset(name.to_string()))?;
        ZipStore::open(self.fetcher.fetch(url)?)
    }
}
