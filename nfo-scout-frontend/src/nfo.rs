use std::path::Path;

use nfo_scout_core::{Identifier, MetadataRecord};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::{Artwork, DescriptorWriter, FrontendError};

/// Characters of the plot kept in `<outline>`.
const OUTLINE_CHARS: usize = 100;

/// Kodi-style `<movie>` NFO writer.
pub struct NfoWriter;

impl NfoWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NfoWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorWriter for NfoWriter {
    fn name(&self) -> &'static str {
        "Kodi NFO"
    }

    fn file_name(&self, id: &Identifier) -> String {
        format!("{}.nfo", id.canonical())
    }

    fn render(
        &self,
        record: &MetadataRecord,
        artwork: &Artwork,
        dest_dir: &Path,
    ) -> Result<String, FrontendError> {
        let title = record.title.trim();
        if title.is_empty() {
            return Err(FrontendError::InvalidMetadata(format!(
                "{} has no title",
                record.identifier
            )));
        }
        let code = record.identifier.canonical();
        let content_id = record
            .content_id
            .as_deref()
            .unwrap_or_else(|| record.identifier.content_id());

        let mut nfo = NfoBuilder::new();
        nfo.declaration()?;
        nfo.open("movie", &[])?;

        nfo.element("title", &format!("[{code}] {title}"))?;
        nfo.element(
            "originaltitle",
            record.original_title.as_deref().unwrap_or(title),
        )?;
        nfo.element("sorttitle", code)?;
        nfo.element("id", code)?;
        nfo.element_with("uniqueid", &[("type", "code"), ("default", "true")], code)?;
        nfo.element_with("uniqueid", &[("type", "contentid")], content_id)?;

        if let Some(date) = record.release_date.as_deref() {
            nfo.element("premiered", date)?;
            nfo.element("releasedate", date)?;
        }
        if let Some(year) = record.year() {
            nfo.element("year", year)?;
        }
        if let Some(runtime) = record.runtime_minutes {
            nfo.element("runtime", &runtime.to_string())?;
        }
        nfo.element("country", "Japan")?;
        nfo.element("mpaa", "R")?;

        for director in &record.directors {
            nfo.element("director", director)?;
        }
        nfo.optional("studio", record.studio.as_deref())?;
        nfo.optional("label", record.label.as_deref())?;
        if let Some(series) = record.series.as_deref().filter(|s| !s.trim().is_empty()) {
            nfo.open("set", &[])?;
            nfo.element("name", series)?;
            nfo.close("set")?;
        }
        if let Some(plot) = record.plot.as_deref().filter(|p| !p.trim().is_empty()) {
            nfo.element("plot", plot)?;
            nfo.element("outline", &outline(plot))?;
        }
        for genre in &record.genres {
            nfo.element("genre", genre)?;
        }

        for performer in &record.performers {
            nfo.open("actor", &[])?;
            nfo.element("name", &performer.name)?;
            nfo.optional("altname", performer.original_name.as_deref())?;
            nfo.element("role", "Actress")?;
            nfo.optional("thumb", performer.image_url.as_deref())?;
            nfo.close("actor")?;
        }

        let poster = image_ref(artwork.poster.as_deref(), record.poster_url.as_deref(), dest_dir);
        if let Some(poster) = poster {
            nfo.element_with("thumb", &[("aspect", "poster")], &poster)?;
        }
        let cover = image_ref(artwork.cover.as_deref(), record.cover_url.as_deref(), dest_dir);
        if let Some(cover) = cover {
            nfo.open("fanart", &[])?;
            nfo.element("thumb", &cover)?;
            nfo.close("fanart")?;
        }

        nfo.close("movie")?;
        nfo.finish()
    }
}

/// Local file relative to the descriptor when present, otherwise the URL.
fn image_ref(local: Option<&Path>, url: Option<&str>, dest_dir: &Path) -> Option<String> {
    match local {
        Some(path) => {
            let shown = pathdiff::diff_paths(path, dest_dir).unwrap_or_else(|| path.to_path_buf());
            Some(shown.to_string_lossy().replace('\\', "/"))
        }
        None => url.filter(|u| !u.is_empty()).map(str::to_string),
    }
}

fn outline(plot: &str) -> String {
    let plot = plot.trim();
    if plot.chars().count() <= OUTLINE_CHARS {
        return plot.to_string();
    }
    let cut: String = plot.chars().take(OUTLINE_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// Thin wrapper over the quick-xml writer with indentation.
struct NfoBuilder {
    writer: Writer<Vec<u8>>,
}

impl NfoBuilder {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<(), FrontendError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<(), FrontendError> {
        let start = BytesStart::new(tag).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, tag: &str) -> Result<(), FrontendError> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    fn element(&mut self, tag: &str, value: &str) -> Result<(), FrontendError> {
        self.element_with(tag, &[], value)
    }

    fn element_with(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        value: &str,
    ) -> Result<(), FrontendError> {
        self.open(tag, attrs)?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.close(tag)
    }

    /// Write `tag` only when `value` has content.
    fn optional(&mut self, tag: &str, value: Option<&str>) -> Result<(), FrontendError> {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.element(tag, v),
            None => Ok(()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), FrontendError> {
        self.writer.write_event(event).map_err(FrontendError::xml)
    }

    fn finish(self) -> Result<String, FrontendError> {
        let mut xml = String::from_utf8(self.writer.into_inner()).map_err(FrontendError::xml)?;
        xml.push('\n');
        Ok(xml)
    }
}

#[cfg(test)]
#[path = "tests/nfo_tests.rs"]
mod tests;
