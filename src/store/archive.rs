use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};

use super::RawSource;

/// A [`RawSource`] over a zip archive on disk.
///
/// OS junk entries and directory markers are dropped at open, and a directory
/// prefix shared by every remaining entry is stripped from the exposed names
/// (archives in the wild often wrap their payload in a single folder). The
/// store keeps only the archive path and the name snapshot; each read opens
/// the archive afresh, so shared references are safe without coordination.
pub struct ZipStore {
    path: PathBuf,
    prefix: String,
    names: Vec<String>,
}

impl ZipStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let archive = ZipArchive::new(File::open(&path)?)?;
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/') && !is_junk(name))
            .map(str::to_owned)
            .collect();
        let prefix = common_dir_prefix(&names);
        if !prefix.is_empty() {
            for name in &mut names {
                name.drain(..prefix.len());
            }
        }
        names.sort();
        Ok(Self { path, prefix, names })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSource for ZipStore {
    fn names(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        if self
            .names
            .binary_search_by(|n| n.as_str().cmp(name))
            .is_err()
        {
            return Err(Error::KeyNotFound(name.to_string()));
        }
        let mut archive = ZipArchive::new(File::open(&self.path)?)?;
        let mut entry = archive.by_name(&format!("{}{name}", self.prefix))?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn is_junk(name: &str) -> bool {
    if name.starts_with("__MACOSX/") {
        return true;
    }
    let base = name.rsplit('/').next().unwrap_or(name);
    base == ".DS_Store" || base == "Thumbs.db" || base.starts_with("._")
}

/// Longest directory prefix shared by every name, empty if there is none.
fn common_dir_prefix(names: &[String]) -> String {
    let Some((first, rest)) = names.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for name in rest {
        len = name
            .bytes()
            .zip(first.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    match first.as_bytes()[..len].iter().rposition(|&b| b == b'/') {
        Some(idx) => first[..=idx].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junk_entries_are_recognised() {
        assert!(is_junk("__MACOSX/data/._titles_1.parquet"));
        assert!(is_junk("data/.DS_Store"));
        assert!(is_junk("._titles_1.parquet"));
        assert!(!is_junk("data/titles_1.parquet"));
        assert!(!is_junk("titles_1.parquet"));
    }

    #[test]
    fn common_prefix_stops_at_directory_boundaries() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            common_dir_prefix(&names(&["data/titles_1.parquet", "data/titles_2.parquet"])),
            "data/"
        );
        // Shared characters inside a file name are not a directory prefix.
        assert_eq!(
            common_dir_prefix(&names(&["titles_1.parquet", "titles_2.parquet"])),
            ""
        );
        assert_eq!(
            common_dir_prefix(&names(&["a/x.parquet", "b/x.parquet"])),
            ""
        );
        assert_eq!(common_dir_prefix(&names(&["a/b/x.parquet"])), "a/b/");
        assert_eq!(common_dir_prefix(&[]), "");
    }
}
