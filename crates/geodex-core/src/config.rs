use std::path::{Path, PathBuf};

/// Default directory for raw Geonames source files.
pub const DEFAULT_DATA_DIR: &str = "./geodex-data";

/// Default directory for serialized cache blobs.
pub const DEFAULT_CACHE_DIR: &str = "./geodex-cache";

/// Directories used by an instance.
///
/// `data_dir` holds the raw Geonames files consumed by the cold build
/// (`cities1000.zip`, `countryInfo.txt`, `admin1CodesASCII.txt`) and
/// `cache_dir` holds the serialized blobs read at warm start.
///
/// ```
/// use geodex_core::Config;
///
/// let cfg = Config::default()
///     .with_data_dir("/var/lib/geodex/data")
///     .with_cache_dir("/var/lib/geodex/cache");
/// assert_eq!(cfg.data_dir.to_str(), Some("/var/lib/geodex/data"));
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl Config {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub(crate) fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub(crate) fn cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}
