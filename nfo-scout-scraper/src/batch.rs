//! Per-item pipeline and batch runner.
//!
//! Every item goes through fetch, translate, assets and descriptor, one item
//! at a time on the calling thread. Stage failures are recorded in the
//! item's [`ItemReport`] and never stop the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use nfo_scout_core::{Field, Identifier, MetadataRecord};
use nfo_scout_frontend::{DescriptorWriter, render_dir_template};
use nfo_scout_lib::{
    DiscoveredItem, Duplicate, Pacer, Settings, TranslationCache, Translator, dedup_items,
};

use crate::assets::{AssetOutcome, AssetSource};
use crate::error::ScrapeError;
use crate::source::MetadataSource;

/// Pipeline stage an error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetch,
    Translate,
    Assets,
    Descriptor,
}

impl Stage {
    /// Whether an error in this stage fails the whole item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fetch | Self::Descriptor)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Translate => "translate",
            Self::Assets => "assets",
            Self::Descriptor => "descriptor",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub stage: Stage,
    pub message: String,
}

impl ItemError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Success,
    /// Record written, but translation or an asset failed
    PartialFailure,
    Failure,
    /// Descriptor already present; nothing fetched
    Skipped,
}

/// Outcome of one item.
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub identifier: Identifier,
    /// Video file the item came from; `None` for a manual search
    pub path: Option<PathBuf>,
    pub status: ItemStatus,
    /// Source that supplied the record
    pub source: Option<String>,
    /// Final record after genre filtering and translation
    pub record: Option<MetadataRecord>,
    pub descriptor: Option<PathBuf>,
    pub assets: Vec<PathBuf>,
    pub errors: Vec<ItemError>,
}

impl ItemReport {
    fn new(identifier: Identifier, path: Option<&Path>) -> Self {
        Self {
            identifier,
            path: path.map(Path::to_path_buf),
            status: ItemStatus::Success,
            source: None,
            record: None,
            descriptor: None,
            assets: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// File name of the video, or the identifier for manual searches.
    pub fn label(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.identifier.to_string())
    }

    fn push_error(&mut self, stage: Stage, message: impl fmt::Display) {
        self.errors.push(ItemError::new(stage, message.to_string()));
    }

    /// Derive the status from the recorded errors.
    fn finish(mut self) -> Self {
        self.status = if self.errors.iter().any(|e| e.stage.is_fatal()) {
            ItemStatus::Failure
        } else if self.errors.is_empty() {
            ItemStatus::Success
        } else {
            ItemStatus::PartialFailure
        };
        self
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Deduplication done; `total` items will be processed.
    Started { total: usize, duplicates: usize },
    ItemStarted { index: usize, identifier: String },
    ItemStage { index: usize, stage: Stage },
    ItemFinished {
        index: usize,
        identifier: String,
        status: ItemStatus,
    },
    Done,
}

/// Run-wide options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Minimum spacing between two metadata fetches
    pub request_delay: Duration,
    /// Fields to translate when a translator is present
    pub translate_fields: Vec<Field>,
    /// Records already in this language are not translated
    pub target_lang: String,
    pub skip_genres: Vec<String>,
    /// Descriptor root; `None` puts descriptors next to each video
    pub output_dir: Option<PathBuf>,
    pub dir_template: String,
    /// Reprocess items whose descriptor already exists
    pub force: bool,
}

impl BatchOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            request_delay: settings.http.request_delay(),
            translate_fields: settings.translation.fields.clone(),
            target_lang: settings.translation.target_lang.clone(),
            skip_genres: settings.genres.skip.clone(),
            output_dir: settings.output.dir.clone(),
            dir_template: settings.output.dir_template.clone(),
            force: false,
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The collaborators one run talks to.
pub struct Pipeline<'a> {
    /// Tried in order; the first record wins
    pub sources: Vec<&'a dyn MetadataSource>,
    /// `None` disables translation
    pub translator: Option<&'a dyn Translator>,
    pub cache: &'a mut TranslationCache,
    pub assets: Vec<&'a dyn AssetSource>,
    /// `None` disables descriptor output
    pub writer: Option<&'a dyn DescriptorWriter>,
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<ItemReport>,
    pub duplicates: Vec<Duplicate>,
}

impl BatchOutcome {
    pub fn count(&self, status: ItemStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(ItemStatus::Failure) > 0
    }
}

/// Sends stage events for one item, if anyone listens.
struct Emitter<'e> {
    index: usize,
    tx: Option<&'e mpsc::Sender<BatchEvent>>,
}

impl Emitter<'_> {
    fn stage(&self, stage: Stage) {
        if let Some(tx) = self.tx {
            let _ = tx.send(BatchEvent::ItemStage {
                index: self.index,
                stage,
            });
        }
    }
}

/// Drives items through the pipeline with a politeness delay between
/// metadata fetches.
pub struct BatchOrchestrator<'a> {
    pipeline: Pipeline<'a>,
    options: BatchOptions,
    pacer: Pacer,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(pipeline: Pipeline<'a>, options: BatchOptions) -> Self {
        let pacer = Pacer::new(options.request_delay);
        Self {
            pipeline,
            options,
            pacer,
        }
    }

    /// Deduplicate `items` and process each survivor in order.
    pub fn run(
        &mut self,
        items: Vec<DiscoveredItem>,
        events: &mpsc::Sender<BatchEvent>,
    ) -> BatchOutcome {
        let (items, duplicates) = dedup_items(items);
        for dup in &duplicates {
            log::debug!(
                "{} duplicates {} ({})",
                dup.path.display(),
                dup.kept.display(),
                dup.identifier
            );
        }
        let _ = events.send(BatchEvent::Started {
            total: items.len(),
            duplicates: duplicates.len(),
        });

        let mut reports = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let identifier = item.identifier.canonical().to_string();
            let _ = events.send(BatchEvent::ItemStarted {
                index,
                identifier: identifier.clone(),
            });
            let emitter = Emitter {
                index,
                tx: Some(events),
            };
            let report = self.process_item(&item.identifier, Some(&item.path), &emitter);
            let _ = events.send(BatchEvent::ItemFinished {
                index,
                identifier,
                status: report.status,
            });
            reports.push(report);
        }

        self.flush_cache();
        let _ = events.send(BatchEvent::Done);
        BatchOutcome {
            reports,
            duplicates,
        }
    }

    /// Process a single identifier outside of a batch (manual search).
    ///
    /// Existing descriptors are overwritten.
    pub fn process(&mut self, id: &Identifier) -> ItemReport {
        let force = std::mem::replace(&mut self.options.force, true);
        let report = self.process_item(id, None, &Emitter { index: 0, tx: None });
        self.options.force = force;
        self.flush_cache();
        report
    }

    fn process_item(
        &mut self,
        id: &Identifier,
        video: Option<&Path>,
        emit: &Emitter<'_>,
    ) -> ItemReport {
        let mut report = ItemReport::new(id.clone(), video);
        let base_dir = self.base_dir(video);

        if !self.options.force {
            if let Some(existing) = self.existing_descriptor(id, &base_dir) {
                log::debug!("{} already has {}", id, existing.display());
                report.descriptor = Some(existing);
                report.status = ItemStatus::Skipped;
                return report;
            }
        }

        emit.stage(Stage::Fetch);
        let record = match fetch_record(&self.pipeline.sources, id, &self.pacer) {
            Ok(record) => record,
            Err(e) => {
                report.push_error(Stage::Fetch, e);
                return report.finish();
            }
        };
        report.source = Some(record.source.clone());
        let mut record = record.without_genres(&self.options.skip_genres);

        if self.pipeline.translator.is_some() {
            emit.stage(Stage::Translate);
            record = self.translate_record(record, &mut report);
            self.flush_cache();
        }

        let dest_dir = match render_dir_template(&self.options.dir_template, &record) {
            Ok(sub) => base_dir.join(sub),
            Err(e) => {
                report.push_error(Stage::Descriptor, e);
                report.record = Some(record);
                return report.finish();
            }
        };

        let mut assets = AssetOutcome::default();
        if !self.pipeline.assets.is_empty() {
            emit.stage(Stage::Assets);
        }
        for fetcher in &self.pipeline.assets {
            match fetcher.fetch(&record, &dest_dir) {
                Ok(outcome) => {
                    for warning in &outcome.warnings {
                        report.push_error(Stage::Assets, format!("{}: {warning}", fetcher.name()));
                    }
                    assets.merge(outcome);
                }
                Err(e) => report.push_error(Stage::Assets, format!("{}: {e}", fetcher.name())),
            }
        }
        report.assets = assets.files;

        if let Some(writer) = self.pipeline.writer {
            emit.stage(Stage::Descriptor);
            match writer.write(&record, &assets.artwork, &dest_dir) {
                Ok(path) => report.descriptor = Some(path),
                Err(e) => report.push_error(Stage::Descriptor, ScrapeError::from(e)),
            }
        }

        report.record = Some(record);
        report.finish()
    }

    /// Translate the configured fields; failed fields keep their source text.
    fn translate_record(
        &mut self,
        record: MetadataRecord,
        report: &mut ItemReport,
    ) -> MetadataRecord {
        let Some(translator) = self.pipeline.translator else {
            return record;
        };
        if record.language.eq_ignore_ascii_case(&self.options.target_lang) {
            log::debug!("{} is already in {}", record.identifier, record.language);
            return record;
        }

        let mut current = record;
        for &field in &self.options.translate_fields {
            let values: Vec<String> = current
                .field_values(field)
                .into_iter()
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                continue;
            }

            let translated: Result<Vec<String>, _> = values
                .iter()
                .map(|v| self.pipeline.cache.translate(field, v, translator))
                .collect();
            match translated {
                Ok(values) => current = current.with_field(field, values),
                Err(e) => {
                    log::warn!("Translating {} of {} failed: {}", field, current.identifier, e);
                    report.push_error(Stage::Translate, format!("{field}: {e}"));
                }
            }
        }
        current
    }

    /// Directory descriptors go to before the template is applied.
    fn base_dir(&self, video: Option<&Path>) -> PathBuf {
        self.options
            .output_dir
            .clone()
            .or_else(|| video.and_then(Path::parent).map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Existing descriptor for `id`, if the output layout can be predicted
    /// from the identifier alone.
    fn existing_descriptor(&self, id: &Identifier, base_dir: &Path) -> Option<PathBuf> {
        let writer = self.pipeline.writer?;
        let stub = MetadataRecord::new(id.clone(), "", "");
        let sub = render_dir_template(&self.options.dir_template, &stub).ok()?;
        let path = writer.path_for(id, &base_dir.join(sub));
        path.exists().then_some(path)
    }

    fn flush_cache(&mut self) {
        if let Err(e) = self.pipeline.cache.flush() {
            log::warn!("Could not save translation cache: {}", e);
        }
    }
}

/// Fetch from `sources` in order, spacing every call with `pacer`.
pub fn fetch_record(
    sources: &[&dyn MetadataSource],
    id: &Identifier,
    pacer: &Pacer,
) -> Result<MetadataRecord, ScrapeError> {
    if sources.is_empty() {
        return Err(ScrapeError::config("no metadata sources enabled"));
    }
    let mut attempts = Vec::new();
    for source in sources {
        match pacer.call(|| source.fetch(id)) {
            Ok(record) => {
                log::debug!("{} found {}", source.name(), id);
                return Ok(record);
            }
            Err(e) => {
                log::debug!("{} failed for {}: {}", source.name(), id, e);
                attempts.push(format!("{}: {e}", source.name()));
            }
        }
    }
    Err(ScrapeError::Unavailable {
        identifier: id.canonical().to_string(),
        attempts,
    })
}

/// Run `items` through `pipeline` in one call.
pub fn run_batch(
    items: Vec<DiscoveredItem>,
    pipeline: Pipeline<'_>,
    options: BatchOptions,
    events: &mpsc::Sender<BatchEvent>,
) -> BatchOutcome {
    BatchOrchestrator::new(pipeline, options).run(items, events)
}
