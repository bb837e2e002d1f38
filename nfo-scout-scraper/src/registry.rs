use nfo_scout_lib::Settings;

use crate::error::ScrapeError;
use crate::fanza::FanzaSource;
use crate::r18dev::R18DevSource;
use crate::source::{MetadataSource, http_client};

struct Entry {
    name: String,
    source: Box<dyn MetadataSource>,
}

/// Name-keyed table of metadata sources, in registration order.
///
/// Pure lookup: fallback between sources is the caller's business.
#[derive(Default)]
pub struct ScraperRegistry {
    entries: Vec<Entry>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in source.
    pub fn builtin(settings: &Settings) -> Result<Self, ScrapeError> {
        let http = http_client(&settings.http)?;
        let mut registry = Self::new();
        registry.register(
            "r18dev",
            Box::new(R18DevSource::new(http.clone(), &settings.scrapers.r18dev_language)),
        );
        registry.register("fanza", Box::new(FanzaSource::new(http)));
        Ok(registry)
    }

    /// Add `source` under `name`, replacing an existing entry of that name.
    pub fn register(&mut self, name: impl Into<String>, source: Box<dyn MetadataSource>) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.source = source,
            None => self.entries.push(Entry { name, source }),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn MetadataSource, ScrapeError> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| e.source.as_ref())
            .ok_or_else(|| ScrapeError::UnknownSource(name.to_string()))
    }

    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Resolve `names` in order. Fails on the first unknown name.
    pub fn select(&self, names: &[String]) -> Result<Vec<&dyn MetadataSource>, ScrapeError> {
        if names.is_empty() {
            return Err(ScrapeError::config("no metadata sources enabled"));
        }
        names.iter().map(|n| self.get(n)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
