//! Field-scoped translation cache.
//!
//! Entries are keyed by `(field, exact source text)`. Values of multi-valued
//! fields (genres, performers, directors) are split on commas and each term
//! is cached on its own, so a genre translated once is reused by every later
//! record that carries it.
//!
//! The store lives in memory for the whole run and is written back through
//! [`write_atomic`](crate::util::write_atomic) when [`TranslationCache::flush`]
//! is called.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use nfo_scout_core::Field;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, TranslateError};
use crate::translate::Translator;
use crate::util::write_atomic;

/// Persisted format version.
const CACHE_VERSION: u32 = 1;

/// Service name recorded for entries imported without metadata.
const IMPORT_SERVICE: &str = "import";

/// A cached translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub translation: String,
    /// Backend that produced the translation
    pub service: String,
    /// RFC 3339 timestamp of when the entry was stored
    pub created_at: String,
}

impl CacheEntry {
    pub fn new(translation: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            service: service.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// On-disk representation, also used for export and import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheDocument {
    version: u32,
    fields: BTreeMap<String, BTreeMap<String, CacheEntry>>,
}

/// Accepted import shapes: a full export, or a bare
/// `field -> text -> translation` map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Versioned {
        #[allow(dead_code)]
        version: u32,
        fields: BTreeMap<String, BTreeMap<String, ImportedValue>>,
    },
    Flat(BTreeMap<String, BTreeMap<String, ImportedValue>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportedValue {
    Entry(CacheEntry),
    Plain(String),
}

impl ImportedValue {
    fn into_entry(self) -> CacheEntry {
        match self {
            Self::Entry(entry) => entry,
            Self::Plain(translation) => CacheEntry::new(translation, IMPORT_SERVICE),
        }
    }
}

/// How imported entries interact with entries already in the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Existing entries are kept; imports only fill gaps.
    #[default]
    KeepLocal,
    /// Imported entries replace existing ones with the same key.
    Overwrite,
}

/// Counts from an import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
    /// Entries skipped because a local entry already existed
    pub kept_local: usize,
    /// Field names in the import that are not known to this version
    pub unknown_fields: Vec<String>,
}

/// Entry counts per field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub per_field: BTreeMap<Field, usize>,
    pub total: usize,
}

/// In-memory translation cache with optional file backing.
#[derive(Debug)]
pub struct TranslationCache {
    path: Option<PathBuf>,
    store: BTreeMap<Field, BTreeMap<String, CacheEntry>>,
    multi_valued: BTreeSet<Field>,
    dirty: bool,
}

impl TranslationCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            store: BTreeMap::new(),
            multi_valued: Field::all()
                .iter()
                .copied()
                .filter(Field::is_multi_valued)
                .collect(),
            dirty: false,
        }
    }

    /// Load the cache file at `path`. A missing file yields an empty cache.
    ///
    /// A file that exists but cannot be parsed is reported as
    /// [`CacheError::Corrupt`]; it is never silently replaced.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut cache = Self::in_memory();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let doc: CacheDocument = serde_json::from_str(&contents)
                .map_err(|e| CacheError::corrupt(&path, e.to_string()))?;
            if doc.version != CACHE_VERSION {
                return Err(CacheError::corrupt(
                    &path,
                    format!("unsupported cache version {}", doc.version),
                ));
            }
            for (name, entries) in doc.fields {
                match name.parse::<Field>() {
                    Ok(field) => {
                        cache.store.entry(field).or_default().extend(entries);
                    }
                    Err(_) => log::warn!("Ignoring unknown cache field '{}'", name),
                }
            }
            log::debug!(
                "Loaded {} cached translations from {}",
                cache.len(),
                path.display()
            );
        }

        cache.path = Some(path);
        Ok(cache)
    }

    /// Replace the file at `path` with an empty cache without reading it.
    ///
    /// If the old file does not parse it is kept next to the new one as
    /// `<name>.corrupt-<timestamp>`, and that backup path is returned.
    pub fn reset(path: &Path) -> Result<Option<PathBuf>, CacheError> {
        let mut backup = None;
        if path.exists() {
            let readable = fs::read_to_string(path)
                .ok()
                .and_then(|s| serde_json::from_str::<CacheDocument>(&s).ok())
                .is_some();
            if !readable {
                let mut name = path.file_name().unwrap_or_default().to_os_string();
                name.push(format!(
                    ".corrupt-{}",
                    chrono::Local::now().format("%Y%m%d%H%M%S")
                ));
                let target = path.with_file_name(name);
                fs::rename(path, &target)?;
                backup = Some(target);
            }
        }

        let mut cache = Self::in_memory();
        cache.path = Some(path.to_path_buf());
        cache.save()?;
        Ok(backup)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Mark `field` as holding comma-joined lists.
    pub fn register_multi_valued(&mut self, field: Field) {
        self.multi_valued.insert(field);
    }

    pub fn is_multi_valued(&self, field: Field) -> bool {
        self.multi_valued.contains(&field)
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.store.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored entry for an exact `(field, text)` key.
    pub fn entry(&self, field: Field, text: &str) -> Option<&CacheEntry> {
        self.store.get(&field)?.get(text)
    }

    /// Cached translation for `text`, without calling any backend.
    ///
    /// For multi-valued fields a comma-joined `text` is a hit only when every
    /// term is cached.
    pub fn lookup(&self, field: Field, text: &str) -> Option<String> {
        if let Some(entry) = self.entry(field, text) {
            return Some(entry.translation.clone());
        }
        if !self.is_multi_valued(field) {
            return None;
        }

        let mut parts = Vec::new();
        for piece in text.split(',') {
            let (lead, term, trail) = split_padding(piece);
            if term.is_empty() {
                parts.push(piece.to_string());
            } else {
                let translated = &self.entry(field, term)?.translation;
                parts.push(format!("{lead}{translated}{trail}"));
            }
        }
        Some(parts.join(","))
    }

    /// Translate `text`, consulting the cache first.
    ///
    /// Misses call `translator` once per atomic term and store the result.
    /// A failed call stores nothing and returns the backend error; terms
    /// translated before the failure stay cached.
    pub fn translate<T: Translator + ?Sized>(
        &mut self,
        field: Field,
        text: &str,
        translator: &T,
    ) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        if !self.is_multi_valued(field) {
            return self.translate_term(field, text, translator);
        }

        let mut parts = Vec::new();
        for piece in text.split(',') {
            let (lead, term, trail) = split_padding(piece);
            if term.is_empty() {
                parts.push(piece.to_string());
                continue;
            }
            let translated = self.translate_term(field, term, translator)?;
            parts.push(format!("{lead}{translated}{trail}"));
        }
        Ok(parts.join(","))
    }

    fn translate_term<T: Translator + ?Sized>(
        &mut self,
        field: Field,
        term: &str,
        translator: &T,
    ) -> Result<String, TranslateError> {
        if let Some(entry) = self.entry(field, term) {
            return Ok(entry.translation.clone());
        }

        let translated = translator.translate(term, field)?;
        if translated.trim().is_empty() {
            return Err(TranslateError::unexpected(format!(
                "{} returned an empty translation for \"{}\"",
                translator.name(),
                term
            )));
        }

        log::debug!("Cached {} translation: {} -> {}", field, term, translated);
        self.store
            .entry(field)
            .or_default()
            .insert(term.to_string(), CacheEntry::new(&translated, translator.name()));
        self.dirty = true;
        Ok(translated)
    }

    /// Remove every entry of `field`, or everything when `field` is `None`.
    ///
    /// Returns the number of removed entries.
    pub fn clear(&mut self, field: Option<Field>) -> usize {
        let removed = match field {
            Some(field) => self.store.remove(&field).map(|m| m.len()).unwrap_or(0),
            None => {
                let n = self.len();
                self.store.clear();
                n
            }
        };
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let per_field: BTreeMap<Field, usize> = self
            .store
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(field, entries)| (*field, entries.len()))
            .collect();
        let total = per_field.values().sum();
        CacheStats { per_field, total }
    }

    fn document(&self) -> CacheDocument {
        CacheDocument {
            version: CACHE_VERSION,
            fields: self
                .store
                .iter()
                .filter(|(_, entries)| !entries.is_empty())
                .map(|(field, entries)| (field.as_str().to_string(), entries.clone()))
                .collect(),
        }
    }

    /// Serialize every entry as pretty JSON.
    pub fn export_json(&self) -> Result<String, CacheError> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }

    /// Write an export file to `target`. Returns the number of entries written.
    pub fn export_to(&self, target: &Path) -> Result<usize, CacheError> {
        write_atomic(target, self.export_json()?.as_bytes())?;
        Ok(self.len())
    }

    /// Merge entries from a JSON export according to `policy`.
    pub fn import_json(
        &mut self,
        json: &str,
        policy: MergePolicy,
    ) -> Result<ImportSummary, CacheError> {
        let doc: ImportDocument = serde_json::from_str(json).map_err(|e| {
            CacheError::invalid(format!("not a translation cache export: {e}"))
        })?;
        let fields = match doc {
            ImportDocument::Versioned { fields, .. } => fields,
            ImportDocument::Flat(fields) => fields,
        };

        let mut summary = ImportSummary::default();
        for (name, entries) in fields {
            let Ok(field) = name.parse::<Field>() else {
                log::warn!("Skipping unknown field '{}' in import", name);
                summary.unknown_fields.push(name);
                continue;
            };
            let local = self.store.entry(field).or_default();
            for (text, value) in entries {
                match (local.contains_key(&text), policy) {
                    (false, _) => {
                        local.insert(text, value.into_entry());
                        summary.added += 1;
                    }
                    (true, MergePolicy::Overwrite) => {
                        local.insert(text, value.into_entry());
                        summary.replaced += 1;
                    }
                    (true, MergePolicy::KeepLocal) => summary.kept_local += 1,
                }
            }
        }

        if summary.added > 0 || summary.replaced > 0 {
            self.dirty = true;
        }
        Ok(summary)
    }

    /// Merge entries from an export file according to `policy`.
    pub fn import_from(
        &mut self,
        source: &Path,
        policy: MergePolicy,
    ) -> Result<ImportSummary, CacheError> {
        let json = fs::read_to_string(source)?;
        self.import_json(&json, policy)
    }

    /// Write pending changes to the backing file, if there is one.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// Write the whole cache to the backing file unconditionally.
    pub fn save(&mut self) -> Result<(), CacheError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.document())?;
            write_atomic(path, json.as_bytes())?;
            log::debug!("Saved translation cache to {}", path.display());
        }
        self.dirty = false;
        Ok(())
    }
}

/// Split `piece` into leading whitespace, trimmed term, trailing whitespace.
fn split_padding(piece: &str) -> (&str, &str, &str) {
    let start = piece.len() - piece.trim_start().len();
    let end = piece.trim_end().len().max(start);
    (&piece[..start], &piece[start..end], &piece[end..])
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
