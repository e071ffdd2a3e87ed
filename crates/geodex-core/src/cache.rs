//! On-disk cache codec.
//!
//! Three blobs make a warm start: the city arena, the country table and
//! the inverted name index. Each blob is an 8-byte header (magic,
//! version, reserved) followed by a bincode body. City records are
//! written wire-shaped — country and region as code strings, never as
//! interner handles — so a cache outlives any interner-layout change;
//! codes are re-interned on load.
//!
//! Readers prefer a bzip2-compressed sibling (`<name>.bz2`) and fall
//! through to the plain file. Writers always produce plain files;
//! compressing them is a packaging step, not a codec concern. The cell
//! index is rebuilt on every construction and never persisted.

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use bzip2::read::BzDecoder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{GeodexError, Result};
use crate::index::name::NameIndex;
use crate::model::{CityRecord, CityWire, CountryInfo, Geodex};

pub(crate) const CITIES_FILE: &str = "cities.dex";
pub(crate) const COUNTRIES_FILE: &str = "countries.dex";
pub(crate) const NAME_INDEX_FILE: &str = "name-index.dex";

const MAGIC: &[u8; 4] = b"GDX1";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 8;

// Guards against decompression bombs in a tampered cache directory.
const BODY_SIZE_LIMIT: u64 = 256 * 1024 * 1024;

fn codec_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(BODY_SIZE_LIMIT)
        .allow_trailing_bytes()
}

fn write_blob<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| GeodexError::io_at("creating", path, e))?;
    let mut writer = BufWriter::new(file);

    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(MAGIC);
    header[4] = VERSION;
    writer
        .write_all(&header)
        .map_err(|e| GeodexError::io_at("writing", path, e))?;

    codec_options().serialize_into(&mut writer, value)?;
    writer
        .flush()
        .map_err(|e| GeodexError::io_at("flushing", path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))
            .map_err(|e| GeodexError::io_at("setting permissions on", path, e))?;
    }
    Ok(())
}

fn read_blob<T: DeserializeOwned>(mut reader: impl Read, name: &str) -> Result<T> {
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|e| GeodexError::io(format!("reading header of {name}"), e))?;
    if header[..4] != MAGIC[..] {
        return Err(GeodexError::Corrupt(format!("{name}: bad magic")));
    }
    if header[4] != VERSION {
        return Err(GeodexError::Corrupt(format!(
            "{name}: unsupported version {}",
            header[4]
        )));
    }
    Ok(codec_options().deserialize_from(reader)?)
}

/// Opens `<dir>/<name>.bz2` (decompressing) or `<dir>/<name>`, whichever
/// exists, and decodes the blob.
fn load_blob<T: DeserializeOwned>(config: &Config, name: &str) -> Result<T> {
    let compressed = config.cache_file(&format!("{name}.bz2"));
    if let Ok(file) = fs::File::open(&compressed) {
        return read_blob(BzDecoder::new(file), name);
    }

    let plain = config.cache_file(name);
    let file =
        fs::File::open(&plain).map_err(|e| GeodexError::io_at("opening cache blob", &plain, e))?;
    read_blob(file, name)
}

pub(crate) fn load_cities(config: &Config) -> Result<Vec<CityRecord>> {
    let wires: Vec<CityWire> = load_blob(config, CITIES_FILE)?;
    Ok(wires.into_iter().map(CityRecord::from).collect())
}

pub(crate) fn load_countries(config: &Config) -> Result<Vec<CountryInfo>> {
    load_blob(config, COUNTRIES_FILE)
}

pub(crate) fn load_name_index(config: &Config) -> Result<NameIndex> {
    load_blob(config, NAME_INDEX_FILE)
}

/// Rejects cache directories other users could have written into.
fn check_not_world_writable(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let meta =
            fs::metadata(dir).map_err(|e| GeodexError::io_at("inspecting cache dir", dir, e))?;
        if meta.permissions().mode() & 0o002 != 0 {
            return Err(GeodexError::Config(format!(
                "cache directory {} is world-writable",
                dir.display()
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

impl Geodex {
    /// Writes the three canonical cache blobs, uncompressed, into the
    /// configured cache directory (created `0755` if absent, files `0644`).
    pub fn store(&self) -> Result<()> {
        let dir = &self.config.cache_dir;
        if !dir.is_dir() {
            fs::create_dir_all(dir)
                .map_err(|e| GeodexError::io_at("creating cache dir", dir, e))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(dir, fs::Permissions::from_mode(0o755))
                    .map_err(|e| GeodexError::io_at("setting permissions on", dir, e))?;
            }
        }
        check_not_world_writable(dir)?;

        let wires: Vec<CityWire> = self.cities.iter().map(CityWire::from).collect();
        write_blob(&self.config.cache_file(CITIES_FILE), &wires)?;
        write_blob(&self.config.cache_file(COUNTRIES_FILE), &self.countries)?;
        write_blob(&self.config.cache_file(NAME_INDEX_FILE), &self.name_index)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_cities() -> Vec<CityRecord> {
        vec![
            CityRecord::new(
                "Austin".into(),
                "ATX".into(),
                "US",
                "TX",
                30.26715,
                -97.74306,
                931_830,
            ),
            CityRecord::new("Paris".into(), String::new(), "FR", "11", 48.85341, 2.3488, 2_138_551),
        ]
    }

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config::default()
            .with_cache_dir(dir.path().join("cache"))
            .with_data_dir(dir.path().join("data"))
    }

    fn stored_instance(dir: &tempfile::TempDir) -> Geodex {
        Geodex::assemble(sample_cities(), Vec::new(), None, config_in(dir))
    }

    #[test]
    fn blobs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let g = stored_instance(&dir);
        g.store().unwrap();

        let cities = load_cities(&g.config).unwrap();
        assert_eq!(cities, g.cities);
        assert_eq!(cities[0].country(), "US");
        assert_eq!(cities[0].region(), "TX");

        let index = load_name_index(&g.config).unwrap();
        assert_eq!(index, g.name_index);
    }

    #[test]
    fn header_mismatch_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let g = stored_instance(&dir);
        g.store().unwrap();

        let path = g.config.cache_file(CITIES_FILE);
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] = b'X';
        fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            load_cities(&g.config),
            Err(GeodexError::Corrupt(_))
        ));
    }

    #[test]
    fn version_bump_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let g = stored_instance(&dir);
        g.store().unwrap();

        let path = g.config.cache_file(COUNTRIES_FILE);
        let mut bytes = fs::read(&path).unwrap();
        bytes[4] = 99;
        fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            load_countries(&g.config),
            Err(GeodexError::Corrupt(_))
        ));
    }

    #[test]
    fn compressed_blob_is_preferred() {
        use bzip2::write::BzEncoder;
        use bzip2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let g = stored_instance(&dir);
        g.store().unwrap();

        // compress the name index, then corrupt the plain file; the reader
        // must pick the .bz2 sibling
        let plain = g.config.cache_file(NAME_INDEX_FILE);
        let bytes = fs::read(&plain).unwrap();
        let bz_path = g.config.cache_file(&format!("{NAME_INDEX_FILE}.bz2"));
        let mut enc = BzEncoder::new(fs::File::create(&bz_path).unwrap(), Compression::default());
        enc.write_all(&bytes).unwrap();
        enc.finish().unwrap();
        fs::write(&plain, b"garbage").unwrap();

        let index = load_name_index(&g.config).unwrap();
        assert_eq!(index, g.name_index);
    }

    #[test]
    fn missing_blob_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        assert!(matches!(
            load_cities(&config),
            Err(GeodexError::Io { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn world_writable_cache_dir_is_refused() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let g = stored_instance(&dir);
        g.store().unwrap();
        fs::set_permissions(
            &g.config.cache_dir,
            fs::Permissions::from_mode(0o777),
        )
        .unwrap();

        assert!(matches!(g.store(), Err(GeodexError::Config(_))));
    }

    #[test]
    fn empty_index_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let g = Geodex::assemble(Vec::new(), Vec::new(), None, config_in(&dir));
        g.store().unwrap();
        let index: HashMap<String, Vec<u32>> = load_name_index(&g.config).unwrap();
        assert!(index.is_empty());
    }
}
