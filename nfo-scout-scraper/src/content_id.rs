//! Storefront content ids.
//!
//! The DMM storefront files some labels under ids that differ from the plain
//! `prefix + 5-digit number` form, either with a maker number in front or
//! with a shorter numeric width.

use nfo_scout_core::Identifier;

/// Labels stored with a narrow (3-digit) numeric width.
const NARROW_LABELS: &[&str] = &[
    "smus", "smjh", "smub", "smjs", "smjx", "orecz", "nost", "mfc", "mfcs",
];

/// Labels with a maker number prepended and a narrow width.
const NARROW_PREFIXED: &[(&str, &str)] = &[("abf", "118"), ("abw", "118")];

/// Labels with a maker prefix prepended.
const PREFIXED: &[(&str, &str)] = &[
    ("sdmf", "1"),
    ("dldss", "1"),
    ("sw", "1"),
    ("start", "1"),
    ("stars", "1"),
    ("piyo", "1"),
    ("sdam", "1"),
    ("sdmm", "1"),
    ("hawa", "1"),
    ("fsdss", "1"),
    ("senn", "1"),
    ("milk", "h_1240"),
    ("ambi", "h_237"),
    ("fnew", "h_491"),
    ("einav", "h_1350"),
    ("pjab", "h_1604"),
    ("dhld", "36"),
    ("fays", "55"),
];

/// Content id the storefront uses for `id`.
pub fn store_content_id(id: &Identifier) -> String {
    let prefix = id.studio_prefix().to_ascii_lowercase();
    let number = id.number();

    if NARROW_LABELS.contains(&prefix.as_str()) {
        return format!("{prefix}{number:03}");
    }
    if let Some((_, maker)) = NARROW_PREFIXED.iter().find(|(label, _)| *label == prefix) {
        return format!("{maker}{prefix}{number:03}");
    }
    if let Some((_, maker)) = PREFIXED.iter().find(|(label, _)| *label == prefix) {
        return format!("{maker}{prefix}{number:05}");
    }
    id.content_id().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfo_scout_core::extract;

    fn store(code: &str) -> String {
        store_content_id(&extract(code).unwrap())
    }

    #[test]
    fn default_matches_content_id_form() {
        assert_eq!(store("SONE-638"), "sone00638");
    }

    #[test]
    fn maker_prefixed_labels() {
        assert_eq!(store("SDMF-022"), "1sdmf00022");
        assert_eq!(store("MILK-225"), "h_1240milk00225");
        assert_eq!(store("DHLD-011"), "36dhld00011");
    }

    #[test]
    fn narrow_labels() {
        assert_eq!(store("SMJH-07"), "smjh007");
        assert_eq!(store("ABF-012"), "118abf012");
        assert_eq!(store("ORECZ-1234"), "orecz1234");
    }
}
