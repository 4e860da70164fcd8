//! Viewer profiles cached per profile id.
//!
//! Profiles live under a root directory, one TOML file per profile named by a
//! hash of the id to avoid filesystem issues. The cache is an ordinary value:
//! construct it once and hand it to whatever needs profiles.

use crate::config::ViewerSettings;
use crate::normalizer::{ContentNormalizer, NormalizerConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Display and normalization options for one profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerProfile {
    pub viewer: ViewerSettings,
    pub normalization: NormalizerConfig,
}

impl ViewerProfile {
    pub fn normalizer(&self) -> ContentNormalizer {
        ContentNormalizer::new(self.normalization.clone())
    }
}

#[derive(Debug)]
pub struct ProfileCache {
    root: PathBuf,
    entries: HashMap<String, ViewerProfile>,
}

impl ProfileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the cached profile, loading it from disk on a miss.
    pub fn get(&mut self, profile_id: &str) -> &ViewerProfile {
        if !self.entries.contains_key(profile_id) {
            let profile = self.load(profile_id);
            self.entries.insert(profile_id.to_string(), profile);
        }
        &self.entries[profile_id]
    }

    /// Drop the cached copy of one profile and reload it.
    pub fn refresh(&mut self, profile_id: &str) -> &ViewerProfile {
        self.entries.remove(profile_id);
        tracing::debug!(profile = profile_id, "Refreshing viewer profile");
        self.get(profile_id)
    }

    pub fn clear(&mut self) {
        tracing::debug!(count = self.entries.len(), "Clearing viewer profile cache");
        self.entries.clear();
    }

    pub fn insert(&mut self, profile_id: &str, profile: ViewerProfile) {
        self.entries.insert(profile_id.to_string(), profile);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist a profile and update the cached copy.
    pub fn save(&mut self, profile_id: &str, profile: ViewerProfile) -> Result<()> {
        let path = self.profile_path(profile_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(&profile).context("failed to serialize viewer profile")?;
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(profile = profile_id, path = %path.display(), "Saved viewer profile");
        self.insert(profile_id, profile);
        Ok(())
    }

    pub fn profile_path(&self, profile_id: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(profile_id.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(format!("{hash}.toml"))
    }

    fn load(&self, profile_id: &str) -> ViewerProfile {
        let path = self.profile_path(profile_id);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => {
                tracing::debug!(profile = profile_id, path = %path.display(), "Using default viewer profile: {err}");
                return ViewerProfile::default();
            }
        };
        match toml::from_str(&data) {
            Ok(profile) => {
                tracing::info!(profile = profile_id, "Loaded viewer profile");
                profile
            }
            Err(err) => {
                tracing::warn!(profile = profile_id, path = %path.display(), "Invalid viewer profile TOML: {err}");
                ViewerProfile::default()
            }
        }
    }
}
