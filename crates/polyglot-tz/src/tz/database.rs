//! Zone registry: packed zones, links and country mappings.
//!
//! Zones are stored packed and unpacked on first use. Names are matched
//! case-insensitively, with `/` and `_` treated as the same character.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use polyglot_core::{PolyglotError, PolyglotResult, SETTINGS};

use super::zone::Zone;

const BUNDLED: &str = include_str!("../../data/packed.json");

/// The JSON document zone data is distributed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedBundle {
    #[serde(default)]
    pub version: String,
    /// Packed zone strings.
    #[serde(default)]
    pub zones: Vec<String>,
    /// `Target|Alias` pairs.
    #[serde(default)]
    pub links: Vec<String>,
    /// `CC|Zone/One Zone/Two` entries.
    #[serde(default)]
    pub countries: Vec<String>,
}

impl PackedBundle {
    pub fn from_json(json: &str) -> PolyglotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A registry of time zones.
#[derive(Debug, Default)]
pub struct TzDatabase {
    version: String,
    packed: HashMap<String, String>,
    links: HashMap<String, String>,
    names: HashMap<String, String>,
    countries: BTreeMap<String, Vec<String>>,
    cache: RwLock<HashMap<String, Arc<Zone>>>,
}

/// Lower-cases a zone name and maps `/` to `_`.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('/', "_")
}

impl TzDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The data shipped with this crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_tz::tz::TzDatabase;
    ///
    /// let db = TzDatabase::bundled().unwrap();
    /// let sofia = db.zone("europe/sofia").unwrap();
    /// assert_eq!(sofia.name(), "Europe/Sofia");
    /// assert_eq!(db.zones_for_country("bg"), vec!["Europe/Sofia"]);
    /// ```
    pub fn bundled() -> PolyglotResult<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> PolyglotResult<Self> {
        let mut db = Self::new();
        db.load(PackedBundle::from_json(json)?)?;
        Ok(db)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PolyglotResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Adds every zone, link and country of a bundle.
    pub fn load(&mut self, bundle: PackedBundle) -> PolyglotResult<()> {
        for zone in &bundle.zones {
            self.add_zone(zone)?;
        }
        for link in &bundle.links {
            self.add_link(link)?;
        }
        for country in &bundle.countries {
            self.add_country(country)?;
        }
        tracing::info!(
            version = %bundle.version,
            zones = bundle.zones.len(),
            links = bundle.links.len(),
            countries = bundle.countries.len(),
            "loaded time zone data"
        );
        self.version = bundle.version;
        Ok(())
    }

    /// Registers a packed zone. It is unpacked on first lookup.
    pub fn add_zone(&mut self, packed: &str) -> PolyglotResult<()> {
        let name = match packed.split_once('|') {
            Some((name, rest)) if !name.is_empty() && rest.matches('|').count() >= 3 => name,
            _ => {
                return Err(PolyglotError::InvalidPackedData(format!(
                    "not a packed zone: {packed:?}"
                )))
            }
        };
        let key = normalize_name(name);
        self.cache_mut().remove(&key);
        self.names.insert(key.clone(), name.to_string());
        self.packed.insert(key, packed.to_string());
        Ok(())
    }

    /// Registers a `Target|Alias` link. Links work in both directions.
    pub fn add_link(&mut self, link: &str) -> PolyglotResult<()> {
        let (a, b) = match link.split_once('|') {
            Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains('|') => (a, b),
            _ => {
                return Err(PolyglotError::InvalidPackedData(format!(
                    "not a link: {link:?}"
                )))
            }
        };
        let (key_a, key_b) = (normalize_name(a), normalize_name(b));
        self.links.insert(key_a.clone(), key_b.clone());
        self.links.insert(key_b.clone(), key_a.clone());
        self.names.entry(key_a).or_insert_with(|| a.to_string());
        self.names.insert(key_b.clone(), b.to_string());
        self.cache_mut().remove(&key_b);
        Ok(())
    }

    /// Registers a `CC|Zone/One Zone/Two` country entry.
    pub fn add_country(&mut self, entry: &str) -> PolyglotResult<()> {
        let (code, zones) = match entry.split_once('|') {
            Some((code, zones)) if code.len() == 2 => (code, zones),
            _ => {
                return Err(PolyglotError::InvalidPackedData(format!(
                    "not a country entry: {entry:?}"
                )))
            }
        };
        self.countries.insert(
            code.to_ascii_uppercase(),
            zones.split_whitespace().map(str::to_string).collect(),
        );
        Ok(())
    }

    /// Looks up a zone by name or link alias.
    pub fn zone(&self, name: &str) -> PolyglotResult<Arc<Zone>> {
        let key = normalize_name(name);
        if let Some(zone) = self.cache().get(&key) {
            return Ok(Arc::clone(zone));
        }

        let zone = if let Some(packed) = self.packed.get(&key) {
            tracing::trace!(zone = %name, "unpacking zone");
            Zone::unpack(packed)?
        } else {
            let target = self
                .links
                .get(&key)
                .and_then(|target| self.packed.get(target))
                .ok_or_else(|| PolyglotError::UnknownTimeZone(name.to_string()))?;
            tracing::trace!(zone = %name, "unpacking linked zone");
            let display = self.names.get(&key).map_or(name, String::as_str);
            Zone::unpack(target)?.with_name(display)
        };

        let zone = Arc::new(zone);
        self.cache_mut().insert(key, Arc::clone(&zone));
        Ok(zone)
    }

    /// Returns `true` if `name` resolves to a zone.
    pub fn has_zone(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.packed.contains_key(&key)
            || self
                .links
                .get(&key)
                .is_some_and(|target| self.packed.contains_key(target))
    }

    /// Display names of every zone and link, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .iter()
            .filter(|(key, _)| self.has_zone(key))
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Zone names listed for an ISO country code.
    pub fn zones_for_country(&self, code: &str) -> Vec<String> {
        self.countries
            .get(&code.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Country codes with at least one zone, sorted.
    pub fn countries(&self) -> Vec<&str> {
        self.countries.keys().map(String::as_str).collect()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Zone>>> {
        self.cache.read().expect("zone cache lock poisoned")
    }

    fn cache_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Zone>>> {
        self.cache.write().expect("zone cache lock poisoned")
    }
}

/// The process-wide database.
///
/// Loaded from `SETTINGS.tz_data` when configured, otherwise from the
/// bundled data.
pub fn global() -> &'static TzDatabase {
    static DATABASE: OnceLock<TzDatabase> = OnceLock::new();
    DATABASE.get_or_init(|| {
        if let Some(path) = SETTINGS.try_get().and_then(|s| s.tz_data.as_ref()) {
            match TzDatabase::from_file(path) {
                Ok(db) => return db,
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load time zone data, using bundled data"
                ),
            }
        }
        TzDatabase::bundled().expect("bundled time zone data is valid")
    })
}
