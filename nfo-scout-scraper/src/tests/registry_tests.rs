use super::*;
use nfo_scout_core::{Identifier, MetadataRecord};

struct Named(&'static str);

impl MetadataSource for Named {
    fn name(&self) -> &str {
        self.0
    }

    fn fetch(&self, id: &Identifier) -> Result<MetadataRecord, ScrapeError> {
        let mut record = MetadataRecord::new(id.clone(), self.0, "en");
        record.title = format!("from {}", self.0);
        Ok(record)
    }
}

#[test]
fn register_get_and_list() {
    let mut registry = ScraperRegistry::new();
    assert!(registry.is_empty());
    registry.register("alpha", Box::new(Named("alpha")));
    registry.register("beta", Box::new(Named("beta")));

    assert_eq!(registry.list(), vec!["alpha", "beta"]);
    assert_eq!(registry.get("BETA").unwrap().name(), "beta");
    assert!(matches!(
        registry.get("gamma"),
        Err(ScrapeError::UnknownSource(name)) if name == "gamma"
    ));
}

#[test]
fn re_registering_replaces_in_place() {
    let mut registry = ScraperRegistry::new();
    registry.register("alpha", Box::new(Named("old")));
    registry.register("beta", Box::new(Named("beta")));
    registry.register("alpha", Box::new(Named("new")));

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.list(), vec!["alpha", "beta"]);
    assert_eq!(registry.get("alpha").unwrap().name(), "new");
}

#[test]
fn select_keeps_requested_order() {
    let mut registry = ScraperRegistry::new();
    registry.register("alpha", Box::new(Named("alpha")));
    registry.register("beta", Box::new(Named("beta")));

    let picked = registry
        .select(&["beta".to_string(), "alpha".to_string()])
        .unwrap();
    let names: Vec<&str> = picked.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["beta", "alpha"]);

    assert!(registry.select(&["alpha".to_string(), "nope".to_string()]).is_err());
    assert!(registry.select(&[]).is_err());
}

#[test]
fn builtin_has_both_sources() {
    let registry = ScraperRegistry::builtin(&Settings::default()).unwrap();
    assert_eq!(registry.list(), vec!["r18dev", "fanza"]);
}
