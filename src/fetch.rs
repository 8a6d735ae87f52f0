use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{Error, Result};

/// Characters that cannot (or should not) appear in a cache file name.
const CACHE_KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'*')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'|');

/// A URL-keyed file cache: each URL owns one slot under the cache root, and
/// [`fetch`](Fetcher::fetch) downloads into it on first use.
///
/// Slots can also be filled by hand via [`put_file`](Fetcher::put_file), for
/// archives whose hosts refuse unattended download.
pub struct Fetcher {
    root: PathBuf,
}

impl Fetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The per-user default cache root, e.g. `~/.local/share/xv/fetch`.
    pub fn default_root() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or(Error::NoDataDir)?
            .join("xv")
            .join("fetch"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The cache slot for `url`, whether or not it is filled yet.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        self.root.join(cache_key(url))
    }

    /// Return the cached file for `url`, downloading it first if absent.
    pub fn fetch(&self, url: &str) -> Result<PathBuf> {
        let dest = self.cached_path(url);
        if dest.exists() {
            return Ok(dest);
        }
        fs::create_dir_all(&self.root)?;
        self.download(url, &dest)?;
        Ok(dest)
    }

    /// Fill the cache slot for `url` from a local file.
    pub fn put_file(&self, url: &str, source: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let dest = self.cached_path(url);
        fs::copy(source, &dest)?;
        Ok(dest)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let url = url::Url::parse(url)?;
        let url = url.as_str();
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(10)))
            .build();
        let agent = ureq::Agent::new_with_config(config);
        let response = agent.get(url).call().map_err(|e| Error::Fetch {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        match total {
            Some(n) => eprintln!("downloading {url} ({})", HumanBytes(n)),
            None => eprintln!("downloading {url}"),
        }
        let bar = match total {
            Some(n) => {
                let bar = ProgressBar::new(n);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:32} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                    )
                    .unwrap(),
                );
                bar
            }
            None => ProgressBar::new_spinner(),
        };

        // Stream into a sibling .part file and rename once complete, so an
        // interrupted download never occupies the cache slot.
        let mut partial = dest.to_path_buf().into_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);
        let mut out = fs::File::create(&partial)?;
        let reader = response.into_body().into_reader();
        io::copy(&mut bar.wrap_read(reader), &mut out)?;
        bar.finish_and_clear();
        fs::rename(&partial, dest)?;
        Ok(())
    }
}

fn cache_key(url: &str) -> String {
    utf8_percent_encode(url, CACHE_KEY_ENCODE_SET).to_string()
}
