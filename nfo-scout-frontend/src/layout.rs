//! Output directory layout and file naming.

use std::path::{Path, PathBuf};

use nfo_scout_core::MetadataRecord;

use crate::FrontendError;

/// Longest `<TITLE>` expansion, in characters.
const TITLE_MAX_CHARS: usize = 50;

/// Placeholder for tags whose value is missing.
const UNKNOWN: &str = "Unknown";

/// Expand a directory template such as `<STUDIO>/<YEAR>/<ID>` for `record`.
///
/// Recognized tags: `<ID>`, `<YEAR>`, `<STUDIO>`, `<LABEL>`, `<SERIES>`,
/// `<TITLE>`. Every path component is sanitized; components that end up
/// empty are dropped. An empty template yields an empty path.
pub fn render_dir_template(
    template: &str,
    record: &MetadataRecord,
) -> Result<PathBuf, FrontendError> {
    let mut out = PathBuf::new();
    for component in template.split(['/', '\\']) {
        let expanded = expand_component(template, component, record)?;
        let clean = sanitize_component(&expanded);
        if !clean.is_empty() {
            out.push(clean);
        }
    }
    Ok(out)
}

fn expand_component(
    template: &str,
    component: &str,
    record: &MetadataRecord,
) -> Result<String, FrontendError> {
    let mut out = String::new();
    let mut rest = component;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('>')
            .ok_or_else(|| FrontendError::template(template, "unclosed '<'"))?;
        let tag = &after[..end];
        out.push_str(&tag_value(template, tag, record)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn tag_value(template: &str, tag: &str, record: &MetadataRecord) -> Result<String, FrontendError> {
    let or_unknown = |v: Option<&str>| {
        v.filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };
    Ok(match tag.to_ascii_uppercase().as_str() {
        "ID" => record.identifier.canonical().to_string(),
        "YEAR" => or_unknown(record.year()),
        "STUDIO" => or_unknown(record.studio.as_deref()),
        "LABEL" => or_unknown(record.label.as_deref()),
        "SERIES" => or_unknown(record.series.as_deref()),
        "TITLE" => record.title.trim().chars().take(TITLE_MAX_CHARS).collect(),
        other => {
            return Err(FrontendError::template(
                template,
                format!("unknown tag <{other}>"),
            ));
        }
    })
}

/// Make `name` safe as a single path component on common filesystems.
pub fn sanitize_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string()
}

/// First free path `dir/stem.ext`, `dir/stem-1.ext`, `dir/stem-2.ext`, ...
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}-{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
