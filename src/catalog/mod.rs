//! Country catalog loading.
//!
//! The catalog merges two resources:
//! - `countries.json`: an object of country records keyed by code
//! - `mapList.json`: `[code, name, fullName, imageRef, difficulty]` rows whose
//!   difficulty overrides the record's own
//!
//! Sources are read through the [`CatalogSource`] port. The last successful
//! load is kept in a process-wide [`CatalogCache`] (see [`shared_catalog`]).

use crate::models::{Country, Difficulty};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Row of the map list: code, name, full name, image reference, difficulty.
type MapListRow = (String, String, String, String, String);

/// Errors that can occur while loading the catalog
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Catalog resource {resource} is unreachable: {source}")]
    Unreachable {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog resource {resource} is malformed: {source}")]
    Malformed {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the two catalog resources come from.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource {
    /// Raw JSON of the country records.
    fn countries_json(&self) -> Result<String, LoadError>;

    /// Raw JSON of the map list with difficulty overrides.
    fn map_list_json(&self) -> Result<String, LoadError>;
}

/// Catalog resources stored on disk.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    countries_path: Utf8PathBuf,
    map_list_path: Utf8PathBuf,
}

impl FileCatalogSource {
    pub fn new<P: AsRef<Utf8Path>, Q: AsRef<Utf8Path>>(countries_path: P, map_list_path: Q) -> Self {
        Self {
            countries_path: countries_path.as_ref().to_path_buf(),
            map_list_path: map_list_path.as_ref().to_path_buf(),
        }
    }

    fn read(path: &Utf8Path) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Unreachable {
            resource: path.to_string(),
            source,
        })
    }
}

impl CatalogSource for FileCatalogSource {
    fn countries_json(&self) -> Result<String, LoadError> {
        Self::read(&self.countries_path)
    }

    fn map_list_json(&self) -> Result<String, LoadError> {
        Self::read(&self.map_list_path)
    }
}

/// Lookup of every known country by code, in resource order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    countries: IndexMap<String, Country>,
}

impl Catalog {
    /// Load and merge both resources from `source`.
    pub fn load(source: &dyn CatalogSource) -> Result<Self, LoadError> {
        let countries_json = source.countries_json()?;
        let map_list_json = source.map_list_json()?;
        Self::from_json(&countries_json, &map_list_json)
    }

    /// Merge already-fetched resource contents.
    pub fn from_json(countries_json: &str, map_list_json: &str) -> Result<Self, LoadError> {
        let records: IndexMap<String, Country> =
            serde_json::from_str(countries_json).map_err(|source| LoadError::Malformed {
                resource: "countries".to_string(),
                source,
            })?;

        let map_list: Vec<MapListRow> =
            serde_json::from_str(map_list_json).map_err(|source| LoadError::Malformed {
                resource: "map list".to_string(),
                source,
            })?;

        let overrides: HashMap<String, Difficulty> = map_list
            .into_iter()
            .map(|(code, _name, _full_name, _image, difficulty)| {
                (code, Difficulty::from_override(&difficulty))
            })
            .collect();

        let catalog = Self::from_records(records, &overrides);

        tracing::info!(
            "Loaded country catalog: {} countries, {} difficulty overrides",
            catalog.len(),
            overrides.len()
        );

        Ok(catalog)
    }

    /// Build a catalog straight from country records, without overrides.
    pub fn from_countries<I: IntoIterator<Item = Country>>(countries: I) -> Self {
        let records = countries
            .into_iter()
            .map(|country| (country.code.clone(), country))
            .collect::<IndexMap<_, _>>();
        Self::from_records(records, &HashMap::new())
    }

    fn from_records(
        records: IndexMap<String, Country>,
        overrides: &HashMap<String, Difficulty>,
    ) -> Self {
        let mut countries = IndexMap::with_capacity(records.len());

        for (key, mut country) in records {
            if key != country.code {
                tracing::warn!(
                    "Catalog key {} differs from record code {}, keying by code",
                    key,
                    country.code
                );
            }

            if let Some(difficulty) = overrides.get(&country.code) {
                country.difficulty = *difficulty;
            }

            if countries.contains_key(&country.code) {
                tracing::warn!("Duplicate country code {} in catalog, keeping the last record", country.code);
            }
            countries.insert(country.code.clone(), country);
        }

        Self { countries }
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    /// Countries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Read-through cache holding the last successfully loaded catalog.
///
/// Failed loads are not cached, so a later call retries the source.
#[derive(Debug, Default)]
pub struct CatalogCache {
    slot: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogCache {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// The cached catalog, if one has been loaded.
    pub fn get(&self) -> Option<Arc<Catalog>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the cached catalog, loading it from `source` on first use.
    pub fn get_or_load(&self, source: &dyn CatalogSource) -> Result<Arc<Catalog>, LoadError> {
        if let Some(catalog) = self.get() {
            return Ok(catalog);
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = slot.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(Catalog::load(source).inspect_err(|e| {
            tracing::error!("Failed to load countries: {}", e);
        })?);
        *slot = Some(Arc::clone(&catalog));

        Ok(catalog)
    }

    /// Drop the cached catalog.
    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

static SHARED_CATALOG: CatalogCache = CatalogCache::new();

/// Process-wide catalog, loaded lazily from `source` on first access.
pub fn shared_catalog(source: &dyn CatalogSource) -> Result<Arc<Catalog>, LoadError> {
    SHARED_CATALOG.get_or_load(source)
}
