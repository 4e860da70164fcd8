//! Write-time normalization of stored content bodies.
//!
//! Runs as the pre-save step for articles, pages and photo books: legacy
//! pagebreak encodings become the canonical marker, adjacent markers collapse,
//! and page-count metadata is computed for listings.

use crate::marker::{self, LegacyForm};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_NORMALIZER_PATH: &str = "conf/normalizer.toml";

#[derive(Debug, Clone, Default)]
pub struct ContentNormalizer {
    config: NormalizerConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct NormalizerFile {
    normalization: NormalizerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizerConfig {
    pub legacy_forms: Vec<LegacyForm>,
    pub collapse_duplicates: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            legacy_forms: LegacyForm::ALL.to_vec(),
            collapse_duplicates: true,
        }
    }
}

/// Denormalized page information stored next to a body.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageCountMetadata {
    pub page_count: usize,
    pub has_page_breaks: bool,
}

impl PageCountMetadata {
    pub fn from_marker_count(markers: usize) -> Self {
        Self {
            page_count: markers + 1,
            has_page_breaks: markers > 0,
        }
    }
}

impl Default for PageCountMetadata {
    fn default() -> Self {
        Self::from_marker_count(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedBody {
    pub body: Option<String>,
    pub metadata: PageCountMetadata,
}

/// Kinds of content record that carry a paginated body.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Article,
    Page,
    PhotoBook,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// The slice of a persisted content record that the save hook touches.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentRecord {
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl ContentNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn load_default() -> Self {
        Self::load(Path::new(DEFAULT_NORMALIZER_PATH))
    }

    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<NormalizerFile>(&contents) {
                Ok(file) => {
                    tracing::info!(path = %path.display(), "Loaded content normalizer config");
                    Self {
                        config: file.normalization,
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), "Invalid normalizer config TOML: {err}");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), "Falling back to default normalizer config: {err}");
                Self::default()
            }
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Rewrite legacy markers and collapse duplicates, without computing metadata.
    pub fn normalize_markup(&self, input: &str) -> String {
        let rewritten = marker::rewrite_legacy(input, &self.config.legacy_forms);
        if self.config.collapse_duplicates {
            marker::collapse_duplicates(&rewritten).into_owned()
        } else {
            rewritten.into_owned()
        }
    }

    /// Normalize a body and compute its page metadata.
    ///
    /// Absent or empty bodies pass through unchanged with a single implicit page.
    pub fn normalize(&self, body: Option<&str>) -> NormalizedBody {
        let Some(raw) = body.filter(|raw| !raw.is_empty()) else {
            return NormalizedBody {
                body: body.map(str::to_string),
                metadata: PageCountMetadata::default(),
            };
        };

        let normalized = self.normalize_markup(raw);
        let metadata = Self::metadata(&normalized);
        if normalized.len() != raw.len() {
            tracing::debug!(
                before = raw.len(),
                after = normalized.len(),
                pages = metadata.page_count,
                "Normalized legacy pagebreaks"
            );
        }
        NormalizedBody {
            body: Some(normalized),
            metadata,
        }
    }

    /// Page metadata for an already-normalized body.
    pub fn metadata(body: &str) -> PageCountMetadata {
        PageCountMetadata::from_marker_count(marker::count_markers(body))
    }

    /// Pre-save hook: normalize the body in place and merge page metadata into
    /// the record's metadata object, keeping unrelated keys.
    pub fn before_save(&self, record: &mut ContentRecord) {
        let Some(body) = record.body.as_deref() else {
            return;
        };
        if body.is_empty() {
            return;
        }

        let NormalizedBody { body, metadata } = self.normalize(Some(body));
        record.body = body;

        let entries = record.metadata.get_or_insert_with(Map::new);
        entries.insert("pageCount".to_string(), Value::from(metadata.page_count));
        entries.insert(
            "hasPageBreaks".to_string(),
            Value::from(metadata.has_page_breaks),
        );
        tracing::info!(
            slug = %record.slug,
            kind = ?record.kind,
            pages = metadata.page_count,
            "Prepared content body for save"
        );
    }
}
