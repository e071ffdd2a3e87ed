//! Raw data-set downloads for the cold build.
//!
//! Fetches only files that are absent; a populated data directory never
//! touches the network. Callers hold the cold-path lock (see
//! `loader::COLD_PATH_LOCK`), so two constructors can never race on a
//! partially written file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::{GeodexError, Result};

/// One raw Geonames file.
pub(crate) struct DataSource {
    pub url: &'static str,
    pub filename: &'static str,
}

pub(crate) const CITIES_ARCHIVE: &str = "cities1000.zip";
pub(crate) const COUNTRY_INFO: &str = "countryInfo.txt";

pub(crate) const DATA_SOURCES: &[DataSource] = &[
    DataSource {
        url: "https://download.geonames.org/export/dump/cities1000.zip",
        filename: CITIES_ARCHIVE,
    },
    DataSource {
        url: "https://download.geonames.org/export/dump/countryInfo.txt",
        filename: COUNTRY_INFO,
    },
    DataSource {
        url: "https://download.geonames.org/export/dump/admin1CodesASCII.txt",
        filename: crate::admin::ADMIN1_FILE,
    },
];

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Removes a partially written file unless disarmed.
struct PartialFileGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl Drop for PartialFileGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(self.path);
        }
    }
}

/// Ensures every raw data file exists locally, downloading the missing
/// ones. The caller holds the cold-path lock.
pub(crate) fn ensure_data_sets(config: &Config) -> Result<()> {
    let dir = &config.data_dir;
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| GeodexError::io_at("creating data dir", dir, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o755))
                .map_err(|e| GeodexError::io_at("setting permissions on", dir, e))?;
        }
    }

    for source in DATA_SOURCES {
        let local: PathBuf = config.data_file(source.filename);
        // Re-check under the lock; another constructor may have fetched it.
        if local.exists() {
            continue;
        }
        tracing::info!(url = source.url, "fetching data set");
        download_file(source.url, &local)?;
    }
    Ok(())
}

fn download_file(url: &str, path: &Path) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let mut response = client.get(url).send()?.error_for_status()?;

    let mut file =
        File::create(path).map_err(|e| GeodexError::io_at("creating data file", path, e))?;
    let mut guard = PartialFileGuard { path, armed: true };

    io::copy(&mut response, &mut file)
        .map_err(|e| GeodexError::io_at("writing data file", path, e))?;
    file.sync_all()
        .map_err(|e| GeodexError::io_at("flushing data file", path, e))?;

    guard.armed = false;
    Ok(())
}
