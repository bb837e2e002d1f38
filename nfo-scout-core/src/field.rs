/// Translatable metadata fields.
///
/// The cache is scoped by field, so the same source text may translate
/// differently as a title than as a genre.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Plot,
    Genres,
    Actresses,
    Directors,
    Studio,
    Label,
    Series,
}

/// All field variants in display order.
const ALL_FIELDS: &[Field] = &[
    Field::Title,
    Field::Plot,
    Field::Genres,
    Field::Actresses,
    Field::Directors,
    Field::Studio,
    Field::Label,
    Field::Series,
];

impl Field {
    /// Key used in config files and in the persisted cache.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Plot => "plot",
            Self::Genres => "genres",
            Self::Actresses => "actresses",
            Self::Directors => "directors",
            Self::Studio => "studio",
            Self::Label => "label",
            Self::Series => "series",
        }
    }

    /// Alternative spellings accepted on input.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["title"],
            Self::Plot => &["plot", "description", "metadata"],
            Self::Genres => &["genres", "genre", "categories"],
            Self::Actresses => &["actresses", "actress", "performers", "cast"],
            Self::Directors => &["directors", "director"],
            Self::Studio => &["studio", "maker"],
            Self::Label => &["label"],
            Self::Series => &["series", "set"],
        }
    }

    /// Whether values of this field are comma-joined lists of atomic terms.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Genres | Self::Actresses | Self::Directors)
    }

    pub fn all() -> &'static [Field] {
        ALL_FIELDS
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed into a `Field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(pub String);

impl std::fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown field: '{}'", self.0)
    }
}

impl std::error::Error for FieldParseError {}

impl std::str::FromStr for Field {
    type Err = FieldParseError;

    /// Parse a field from its key or any alias (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_FIELDS
            .iter()
            .copied()
            .find(|field| field.aliases().contains(&lower.as_str()))
            .ok_or_else(|| FieldParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for &field in Field::all() {
            let parsed: Field = field.as_str().parse().unwrap();
            assert_eq!(parsed, field);
        }
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!("Genre".parse::<Field>().unwrap(), Field::Genres);
        assert_eq!("actress".parse::<Field>().unwrap(), Field::Actresses);
        assert_eq!(" DIRECTOR ".parse::<Field>().unwrap(), Field::Directors);
        assert!("rating".parse::<Field>().is_err());
    }

    #[test]
    fn multi_valued_fields() {
        let multi: Vec<Field> = Field::all()
            .iter()
            .copied()
            .filter(Field::is_multi_valued)
            .collect();
        assert_eq!(multi, vec![Field::Genres, Field::Actresses, Field::Directors]);
    }
}
