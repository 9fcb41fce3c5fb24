//! Bridge identity database consulted during scrubbing.
//!
//! Maps a bridge endpoint (`"IP:port"`) to the identity the sanitised
//! record may carry instead: a hashed fingerprint and the distribution
//! channel. The database is loaded once, is read-only afterwards, and can
//! be shared across reports processed in parallel.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BridgeDbError, Result};

/// Identity record for one bridge endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeEntry {
    /// Identity fingerprint, uppercase hex.
    pub fingerprint: String,
    /// Precomputed hashed fingerprint; derived from `fingerprint` when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_fingerprint: Option<String>,
    /// Distribution channel the bridge was handed out through.
    pub distributor: String,
    /// Pluggable transport, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

/// In-memory bridge lookup with O(1) access by endpoint address.
///
/// # Examples
///
/// ```no_run
/// use report_pipeline_sanitise::BridgeDb;
///
/// let db = BridgeDb::from_path("bridge_db.json").unwrap();
/// if let Some(entry) = db.get("1.2.3.4:443") {
///     println!("distributed via {}", entry.distributor);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BridgeDb {
    bridges: HashMap<String, BridgeEntry>,
    /// Every hashed fingerprint this database can substitute. Lets the
    /// handlers recognise their own output when a record is re-sanitised.
    hashed: HashSet<String>,
}

impl BridgeDb {
    /// Returns an empty database; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a database from a JSON file mapping address to entry.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeDbError::Io`] if the file cannot be read or
    /// [`BridgeDbError::Json`] if it is not a valid address map.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let bridges: HashMap<String, BridgeEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(bridges))
    }

    /// Loads a database from a YAML file mapping address to entry.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeDbError::Io`] if the file cannot be read or
    /// [`BridgeDbError::Yaml`] if it is not a valid address map.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let bridges: HashMap<String, BridgeEntry> = serde_yaml::from_reader(reader)?;
        Ok(Self::from_entries(bridges))
    }

    /// Loads a database, selecting the format by file extension
    /// (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// [`BridgeDbError::UnsupportedFormat`] for any other extension, plus
    /// the per-format errors of [`Self::from_json_file`] and
    /// [`Self::from_yaml_file`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            other => Err(BridgeDbError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    fn from_entries(bridges: HashMap<String, BridgeEntry>) -> Self {
        let mut db = Self::new();
        for (address, entry) in bridges {
            db.insert(address, entry);
        }
        db
    }

    /// Adds or replaces the entry for an address.
    pub fn insert(&mut self, address: impl Into<String>, entry: BridgeEntry) {
        self.hashed.insert(hash_of(&entry));
        self.bridges.insert(address.into(), entry);
    }

    /// Looks up the identity entry for an endpoint address.
    pub fn get(&self, address: &str) -> Option<&BridgeEntry> {
        self.bridges.get(address)
    }

    /// Hashed fingerprint for an endpoint address: the stored one when the
    /// database carries it, otherwise lowercase-hex SHA-256 of the
    /// fingerprint.
    pub fn hashed_fingerprint(&self, address: &str) -> Option<String> {
        self.get(address).map(hash_of)
    }

    /// `true` if `value` is the hashed fingerprint of a known bridge, i.e.
    /// something this database has already substituted into a record.
    pub fn is_hashed_fingerprint(&self, value: &str) -> bool {
        self.hashed.contains(value)
    }

    /// Number of known bridges.
    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    /// `true` if no bridges are known.
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}

fn hash_of(entry: &BridgeEntry) -> String {
    match &entry.hashed_fingerprint {
        Some(hashed) => hashed.clone(),
        None => {
            let digest = Sha256::digest(entry.fingerprint.as_bytes());
            format!("{digest:x}")
        }
    }
}
