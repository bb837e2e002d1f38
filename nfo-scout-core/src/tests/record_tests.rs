use super::*;
use crate::identifier::extract;

fn sample() -> MetadataRecord {
    let mut record = MetadataRecord::new(extract("SONE-638").unwrap(), "r18dev", "ja");
    record.title = "新人デビュー".to_string();
    record.genres = vec!["ハイビジョン".to_string(), "単体作品".to_string(), "4K".to_string()];
    record.performers = vec![Performer::new("河北彩花"), Performer::new("三上悠亜")];
    record.studio = Some("エスワン".to_string());
    record.release_date = Some("2024-12-10".to_string());
    record
}

#[test]
fn year_from_release_date() {
    let record = sample();
    assert_eq!(record.year(), Some("2024"));

    let mut undated = record.clone();
    undated.release_date = None;
    assert_eq!(undated.year(), None);

    undated.release_date = Some("soon".to_string());
    assert_eq!(undated.year(), None);
}

#[test]
fn field_values_skip_empty_single_fields() {
    let record = sample();
    assert_eq!(record.field_values(Field::Title), vec!["新人デビュー"]);
    assert!(record.field_values(Field::Plot).is_empty());
    assert!(record.field_values(Field::Label).is_empty());
    assert_eq!(record.field_values(Field::Actresses).len(), 2);
}

#[test]
fn with_field_keeps_original_title() {
    let record = sample();
    let translated = record.with_field(Field::Title, vec!["Rookie Debut".to_string()]);
    assert_eq!(translated.title, "Rookie Debut");
    assert_eq!(translated.original_title.as_deref(), Some("新人デビュー"));
    // the source record is untouched
    assert_eq!(record.title, "新人デビュー");
}

#[test]
fn with_field_renames_performers_in_order() {
    let record = sample();
    let translated = record.with_field(
        Field::Actresses,
        vec!["Saika Kawakita".to_string(), "Yua Mikami".to_string()],
    );
    assert_eq!(translated.performers[0].name, "Saika Kawakita");
    assert_eq!(translated.performers[0].original_name.as_deref(), Some("河北彩花"));
    assert_eq!(translated.performers[1].name, "Yua Mikami");
}

#[test]
fn without_genres_filters_skip_list() {
    let record = sample();
    let skip = vec!["4K".to_string(), " ハイビジョン".to_string()];
    let filtered = record.without_genres(&skip);
    assert_eq!(filtered.genres, vec!["単体作品".to_string()]);
}
