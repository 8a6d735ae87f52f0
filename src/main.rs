use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;

use xv::{ArxivData, ArxivResource, arxiv_url};

use crate::cli::{Cli, Command};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    match args.command {
        Command::Url { uri, resource } => {
            println!("{}", arxiv_url(&uri, resource));
        }
        Command::Resources => {
            for resource in ArxivResource::ALL {
                let name = format!("{:<8}", resource.as_str());
                println!("{} {}", name.bold(), resource.description());
            }
        }
        Command::Shards { dataset } => {
            let view = data_at(args.data_dir)?.open(&dataset)?;
            for shard in view.keys()? {
                println!("{shard}");
            }
        }
        Command::Show {
            dataset,
            shard,
            rows,
        } => {
            let view = data_at(args.data_dir)?.open(&dataset)?;
            let table = view.get(&shard)?;
            println!(
                "{} shard {shard}: {} rows, columns: {}",
                dataset.bold(),
                table.len(),
                table.columns().join(", "),
            );
            for row in table.rows().iter().take(rows) {
                println!("{}", serde_json::Value::Array(row.clone()));
            }
        }
        Command::Seed { dataset, file } => {
            let dest = data_at(args.data_dir)?.seed(&dataset, &file)?;
            eprintln!("{} {} -> {}", "seeded".green(), dataset, dest.display());
        }
    }
    Ok(())
}

fn data_at(dir: Option<PathBuf>) -> xv::Result<ArxivData> {
    match dir {
        Some(dir) => Ok(ArxivData::at(dir)),
        None => ArxivData::new(),
    }
}
