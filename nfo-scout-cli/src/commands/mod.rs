pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod scan;
pub(crate) mod scrapers;
pub(crate) mod search;
pub(crate) mod summary;
