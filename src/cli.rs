use std::path::PathBuf;

use clap::{Parser, Subcommand};

use xv::ArxivResource;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the downloaded archives (defaults to the per-user
    /// data directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate an arXiv URI or DOI to the URL of a resource
    Url {
        #[arg(value_name = "URI")]
        uri: String,
        /// Target resource kind
        #[arg(long, short, default_value = "abs")]
        resource: ArxivResource,
    },
    /// List the recognised resource kinds
    Resources,
    /// List the shard numbers available in a dataset
    Shards {
        #[arg(value_name = "DATASET")]
        dataset: String,
    },
    /// Decode one shard and print a preview
    Show {
        #[arg(value_name = "DATASET")]
        dataset: String,
        #[arg(value_name = "SHARD")]
        shard: u32,
        /// Number of rows to print
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Place a manually downloaded archive into a dataset's cache slot
    Seed {
        #[arg(value_name = "DATASET")]
        dataset: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
