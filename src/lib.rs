//! Access to the bulk arXiv titles/abstracts dataset, plus helpers that
//! translate arXiv identifiers and DOIs into canonical resource URLs.
//!
//! The data ships as zip archives of parquet shards named
//! `<kind>_<number>.parquet`. [`ArxivData`] exposes each archive as a mapping
//! from shard number to decoded [`Table`], decoding lazily on access:
//!
//! ```no_run
//! use xv::{ArxivData, ArxivResource, arxiv_url};
//!
//! # fn main() -> xv::Result<()> {
//! let data = ArxivData::new()?;
//! let titles = data.titles()?;
//! for shard in titles.keys()? {
//!     let table = titles.get(&shard)?;
//!     println!("shard {shard}: {} rows", table.len());
//! }
//!
//! assert_eq!(
//!     arxiv_url("https://arxiv.org/abs/10.3233", ArxivResource::Pdf),
//!     "https://arxiv.org/pdf/10.3233",
//! );
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod fetch;
pub mod identifier;
pub mod store;
pub mod table;

pub use data::{ArxivData, ShardRouter, ShardView};
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use identifier::{
    ArxivResource, ArxivUri, arxiv_url, arxiv_url_with, extract_arxiv_doi, extract_doi,
    try_arxiv_url,
};
pub use table::Table;
