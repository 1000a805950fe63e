//! Country catalogs
//!
//! Code → name tables backing the two pickers: the qualified teams (champion
//! prediction) and every country (RSVP home country). Both are JSON objects
//! of the form `{"mx": "Mexico", ...}`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::roster::flag_asset;

const BUNDLED_QUALIFIED: &str = include_str!("../../data/qualified-countries.json");
const BUNDLED_ALL: &str = include_str!("../../data/all-countries.json");

/// One picker option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    /// Flag image path
    pub flag: String,
}

/// Country lookup table, listed alphabetically by name
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    countries: Vec<Country>,
    by_code: HashMap<String, usize>,
}

/// Errors loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read country catalog {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse country catalog: {0}")]
    Parse(String),
}

impl CountryCatalog {
    /// Parse a `{code: name}` JSON object
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let table: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self::from_pairs(table))
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Load `path` if given, otherwise fall back to `bundled`
    pub fn load_or(path: Option<&Path>, bundled: fn() -> Self) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(bundled()),
        }
    }

    /// Qualified teams shipped with the crate
    pub fn bundled_qualified() -> Self {
        Self::from_json_str(BUNDLED_QUALIFIED).unwrap_or_default()
    }

    /// Every country shipped with the crate
    pub fn bundled_all() -> Self {
        Self::from_json_str(BUNDLED_ALL).unwrap_or_default()
    }

    /// Build from `(code, name)` pairs; codes are stored lowercase
    pub fn from_pairs<I, C, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let table: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(code, name)| (code.into().trim().to_lowercase(), name.into()))
            .filter(|(code, _)| !code.is_empty())
            .collect();

        let mut countries: Vec<Country> = table
            .into_iter()
            .map(|(code, name)| Country {
                flag: flag_asset(&code),
                code,
                name,
            })
            .collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

        let by_code = countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.clone(), i))
            .collect();

        Self { countries, by_code }
    }

    /// Find a country by code (case-insensitive)
    pub fn get(&self, code: &str) -> Option<&Country> {
        self.by_code
            .get(&code.trim().to_lowercase())
            .map(|&i| &self.countries[i])
    }

    /// Country name for a code
    pub fn name(&self, code: &str) -> Option<&str> {
        self.get(code).map(|c| c.name.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_catalogs_load() {
        let qualified = CountryCatalog::bundled_qualified();
        let all = CountryCatalog::bundled_all();

        assert!(!qualified.is_empty());
        assert!(all.len() > qualified.len());
        assert_eq!(qualified.name("mx"), Some("Mexico"));
        assert_eq!(all.name("gb-wls"), Some("Wales"));

        // Every qualified team is also a valid home country
        for country in qualified.iter() {
            assert!(all.contains(&country.code), "{} missing", country.code);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = CountryCatalog::from_pairs([("US", "United States")]);
        assert_eq!(catalog.name("us"), Some("United States"));
        assert_eq!(catalog.name(" Us "), Some("United States"));
        assert_eq!(catalog.get("us").unwrap().flag, "img/flags/us.png");
        assert!(catalog.get("ca").is_none());
    }

    #[test]
    fn test_sorted_by_name() {
        let catalog =
            CountryCatalog::from_json_str(r#"{"uy": "Uruguay", "ar": "Argentina", "br": "Brazil"}"#)
                .unwrap();
        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Argentina", "Brazil", "Uruguay"]);
    }

    #[test]
    fn test_parse_error() {
        let result = CountryCatalog::from_json_str(r#"["not", "an", "object"]"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gh": "Ghana"}}"#).unwrap();

        let catalog = CountryCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name("gh"), Some("Ghana"));

        let fallback = CountryCatalog::load_or(None, CountryCatalog::bundled_qualified).unwrap();
        assert!(fallback.contains("ar"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = CountryCatalog::load(Path::new("/nonexistent/countries.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
