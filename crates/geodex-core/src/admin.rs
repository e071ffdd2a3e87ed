//! First-level administrative divisions, loaded from
//! `admin1CodesASCII.txt`.
//!
//! The parser consults this table to decide whether a trailing 2-3 letter
//! token like "ON" or "NSW" names a subdivision. Tables are cached per data
//! directory so instances sharing a directory share one load.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// File consulted inside the data directory.
pub(crate) const ADMIN1_FILE: &str = "admin1CodesASCII.txt";

/// A first-level subdivision: code ("TX", "08", "ENG") and English name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminDivision {
    pub code: String,
    pub name: String,
}

/// country ISO-2 → division code → division. Codes uppercased on store.
pub(crate) struct AdminTable {
    divisions: HashMap<String, HashMap<String, AdminDivision>>,
}

impl AdminTable {
    fn empty() -> Self {
        AdminTable {
            divisions: HashMap::new(),
        }
    }

    /// Loads the TSV. A missing or malformed file yields an empty table;
    /// admin-division awareness is an enhancement, not a requirement.
    fn load(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "admin divisions unavailable");
                return AdminTable::empty();
            }
        };

        let mut table = AdminTable::empty();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        // Records look like `CC.CODE \t Name \t AsciiName \t GeonameId`.
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(_) => continue,
            };
            let (key, name) = match (record.get(0), record.get(1)) {
                (Some(k), Some(n)) => (k, n),
                _ => continue,
            };
            let Some((country, code)) = key.split_once('.') else {
                continue;
            };
            if country.is_empty() || code.is_empty() {
                continue;
            }
            let code = code.to_uppercase();
            table
                .divisions
                .entry(country.to_uppercase())
                .or_default()
                .insert(
                    code.clone(),
                    AdminDivision {
                        code,
                        name: name.to_string(),
                    },
                );
        }
        table
    }

    pub(crate) fn is_division(&self, country: &str, code: &str) -> bool {
        let code = code.to_uppercase();
        self.divisions
            .get(&country.to_uppercase())
            .is_some_and(|divs| divs.contains_key(&code))
    }

    /// The country using `code`, but only when exactly one does.
    /// Ambiguous codes (numeric "01", "02", ...) resolve to empty.
    pub(crate) fn division_country(&self, code: &str) -> String {
        let code = code.to_uppercase();
        let mut found = String::new();
        for (country, divs) in &self.divisions {
            if divs.contains_key(&code) {
                if !found.is_empty() {
                    return String::new();
                }
                found = country.clone();
            }
        }
        found
    }

    pub(crate) fn division_name(&self, country: &str, code: &str) -> String {
        self.divisions
            .get(&country.to_uppercase())
            .and_then(|divs| divs.get(&code.to_uppercase()))
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }
}

// Tables keyed by data directory, double-checked under the write lock so
// concurrent first uses load the file once.
static TABLES: Lazy<RwLock<HashMap<PathBuf, Arc<AdminTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The (shared) admin table for a data directory, loading it on first use.
pub(crate) fn table_for(data_dir: &Path) -> Arc<AdminTable> {
    if let Ok(tables) = TABLES.read() {
        if let Some(table) = tables.get(data_dir) {
            return Arc::clone(table);
        }
    }

    let mut tables = match TABLES.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(table) = tables.get(data_dir) {
        return Arc::clone(table);
    }
    let table = Arc::new(AdminTable::load(&data_dir.join(ADMIN1_FILE)));
    tables.insert(data_dir.to_path_buf(), Arc::clone(&table));
    table
}

impl crate::Geodex {
    /// Whether `code` names a first-level division of `country`.
    pub fn is_admin_division(&self, country: &str, code: &str) -> bool {
        table_for(&self.config.data_dir).is_division(country, code)
    }

    /// The single country using `code`, or empty when none or several do.
    pub fn admin_division_country(&self, code: &str) -> String {
        table_for(&self.config.data_dir).division_country(code)
    }

    /// English name of a division, or empty when unknown.
    pub fn admin_division_name(&self, country: &str, code: &str) -> String {
        table_for(&self.config.data_dir).division_name(country, code)
    }
}

/// US state, territory and armed-forces codes, sorted for deterministic
/// iteration in the parser. Unordered iteration here once produced
/// flapping parses.
pub(crate) const US_STATE_CODES: &[&str] = &[
    "AA", "AE", "AK", "AL", "AP", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "FM",
    "GA", "GU", "HI", "IA", "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MH", "MI",
    "MN", "MO", "MP", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK",
    "OR", "PA", "PR", "PW", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VI", "VT", "WA", "WI",
    "WV", "WY",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table_from(content: &str) -> AdminTable {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ADMIN1_FILE);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        AdminTable::load(&path)
    }

    const SAMPLE: &str = "US.TX\tTexas\tTexas\t4736286\n\
US.CA\tCalifornia\tCalifornia\t5332921\n\
CA.08\tOntario\tOntario\t6093943\n\
MX.08\tChihuahua\tChihuahua\t4014336\n\
AU.NSW\tNew South Wales\tNew South Wales\t2155400\n";

    #[test]
    fn lookups_are_case_insensitive_on_code() {
        let t = table_from(SAMPLE);
        assert!(t.is_division("US", "TX"));
        assert!(t.is_division("US", "tx"));
        assert!(t.is_division("AU", "nsw"));
        assert!(!t.is_division("US", "NSW"));
    }

    #[test]
    fn ambiguous_codes_resolve_to_no_country() {
        let t = table_from(SAMPLE);
        assert_eq!(t.division_country("NSW"), "AU");
        assert_eq!(t.division_country("TX"), "US");
        // "08" is used by both CA and MX
        assert_eq!(t.division_country("08"), "");
        assert_eq!(t.division_country("ZZ"), "");
    }

    #[test]
    fn name_and_membership_agree() {
        let t = table_from(SAMPLE);
        for (cc, code) in [("US", "TX"), ("US", "CA"), ("AU", "NSW"), ("CA", "08")] {
            assert_eq!(t.is_division(cc, code), !t.division_name(cc, code).is_empty());
        }
        assert_eq!(t.division_name("US", "TX"), "Texas");
        assert_eq!(t.division_name("US", "ZZ"), "");
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let t = AdminTable::load(Path::new("/definitely/not/here.txt"));
        assert!(!t.is_division("US", "TX"));
        assert_eq!(t.division_country("TX"), "");
    }

    #[test]
    fn state_codes_are_sorted() {
        let mut sorted = US_STATE_CODES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, US_STATE_CODES);
        assert_eq!(US_STATE_CODES.len(), 62);
    }

    #[test]
    fn tables_are_shared_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ADMIN1_FILE), SAMPLE).unwrap();
        let a = table_for(dir.path());
        let b = table_for(dir.path());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_division("US", "TX"));
    }
}
