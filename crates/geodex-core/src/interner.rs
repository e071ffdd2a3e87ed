//! Country and region code interning.
//!
//! Every [`crate::CityRecord`] stores two `u16` handles instead of two
//! inline strings. With ~145K cities that swap saves a few megabytes and
//! keeps the record `Copy`-sized; the codes themselves live once in a pair
//! of process-wide tables.
//!
//! The tables are process-wide rather than per-instance because record
//! accessors ([`crate::CityRecord::country`] / [`crate::CityRecord::region`])
//! run on plain values with no back-reference to the instance that produced
//! them. After construction the tables are only ever read, so the hot path
//! takes the read side of the lock.
//!
//! Handle 0 is reserved for the empty string. `u16` is deliberate for the
//! country table too: the dataset carries ~252 distinct country codes, close
//! enough to a `u8`'s ceiling that a byte-wide handle would be one dataset
//! update away from corruption.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

/// Interner handle. Stable for the lifetime of the process.
pub(crate) type Handle = u16;

/// Thread-safe string interner with double-checked insertion.
pub(crate) struct Interner {
    inner: RwLock<Inner>,
}

struct Inner {
    lookup: Vec<String>,
    index: HashMap<String, Handle>,
}

impl Interner {
    fn with_capacity(capacity: usize) -> Self {
        let mut index = HashMap::with_capacity(capacity);
        index.insert(String::new(), 0);
        Interner {
            inner: RwLock::new(Inner {
                lookup: vec![String::new()],
                index,
            }),
        }
    }

    /// Returns the handle for `s`, assigning a fresh one if unseen.
    ///
    /// # Panics
    ///
    /// Panics when the table outgrows the handle type. Silent wraparound
    /// would alias unrelated codes, which is far worse than aborting.
    pub(crate) fn intern(&self, s: &str) -> Handle {
        if let Ok(inner) = self.inner.read() {
            if let Some(&idx) = inner.index.get(s) {
                return idx;
            }
        }

        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(&idx) = inner.index.get(s) {
            return idx;
        }

        if inner.lookup.len() > Handle::MAX as usize {
            panic!(
                "interner capacity exceeded: {} entries (max {})",
                inner.lookup.len(),
                Handle::MAX
            );
        }

        let idx = inner.lookup.len() as Handle;
        inner.lookup.push(s.to_string());
        inner.index.insert(s.to_string(), idx);
        idx
    }

    /// The string for a handle, or empty for out-of-range handles.
    pub(crate) fn get(&self, idx: Handle) -> String {
        match self.inner.read() {
            Ok(inner) => inner.lookup.get(idx as usize).cloned().unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// Number of distinct entries, including the reserved empty handle.
    pub(crate) fn count(&self) -> usize {
        match self.inner.read() {
            Ok(inner) => inner.lookup.len(),
            Err(_) => 0,
        }
    }
}

// Capacity hints match the dataset: ~252 countries, ~4000 admin-1 regions.
static COUNTRIES: Lazy<Interner> = Lazy::new(|| Interner::with_capacity(300));
static REGIONS: Lazy<Interner> = Lazy::new(|| Interner::with_capacity(8192));

pub(crate) fn intern_country(code: &str) -> Handle {
    COUNTRIES.intern(code)
}

pub(crate) fn intern_region(code: &str) -> Handle {
    REGIONS.intern(code)
}

pub(crate) fn country_code(handle: Handle) -> String {
    COUNTRIES.get(handle)
}

pub(crate) fn region_code(handle: Handle) -> String {
    REGIONS.get(handle)
}

/// Distinct country codes seen by this process.
pub fn country_count() -> usize {
    COUNTRIES.count()
}

/// Distinct region codes seen by this process.
pub fn region_count() -> usize {
    REGIONS.count()
}
