use super::*;
use nfo_scout_core::extract;

const SAMPLE: &str = r#"{
  "data": {
    "ppvContent": {
      "id": "SONE00638",
      "title": "新人デビュー",
      "description": "あらすじ",
      "packageImage": {"largeUrl": "https://img/pl.jpg", "mediumUrl": "https://img/ps.jpg"},
      "sampleImages": [
        {"number": 1, "imageUrl": "https://img/1.jpg", "largeImageUrl": "https://img/1l.jpg"}
      ],
      "deliveryStartDate": "2025-01-17T10:00:00Z",
      "makerReleasedAt": null,
      "duration": 7260,
      "actresses": [
        {"id": "1", "name": "河北彩花", "nameRuby": "かわきたさいか", "imageUrl": "https://img/a.jpg"}
      ],
      "directors": [{"id": "2", "name": "監督"}],
      "series": null,
      "maker": {"id": "3", "name": "エスワン"},
      "label": {"id": "4", "name": "S1"},
      "genres": [{"id": "5", "name": "単体作品"}, {"id": "6", "name": "ハイビジョン"}],
      "makerContentId": "SONE-638"
    }
  }
}"#;

#[test]
fn parses_ppv_content() {
    let id = extract("SONE-638").unwrap();
    let record = parse_content(SAMPLE, &id).unwrap();

    assert_eq!(record.source, "fanza");
    assert_eq!(record.language, "ja");
    assert_eq!(record.content_id.as_deref(), Some("sone00638"));
    assert_eq!(record.title, "新人デビュー");
    assert_eq!(record.plot.as_deref(), Some("あらすじ"));
    assert_eq!(record.release_date.as_deref(), Some("2025-01-17"));
    assert_eq!(record.runtime_minutes, Some(121));
    assert_eq!(record.cover_url.as_deref(), Some("https://img/pl.jpg"));
    assert_eq!(record.poster_url.as_deref(), Some("https://img/ps.jpg"));
    assert_eq!(record.gallery, vec!["https://img/1l.jpg"]);
    assert_eq!(record.performers.len(), 1);
    assert_eq!(record.performers[0].name, "河北彩花");
    assert_eq!(record.directors, vec!["監督"]);
    assert_eq!(record.genres, vec!["単体作品", "ハイビジョン"]);
    assert_eq!(record.series, None);
    assert_eq!(record.studio.as_deref(), Some("エスワン"));
    assert_eq!(record.label.as_deref(), Some("S1"));
}

#[test]
fn null_content_is_not_found() {
    let id = extract("SONE-638").unwrap();
    let err = parse_content(r#"{"data": {"ppvContent": null}}"#, &id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn graphql_errors_are_reported() {
    let id = extract("SONE-638").unwrap();
    let err = parse_content(
        r#"{"data": null, "errors": [{"message": "rate limited"}]}"#,
        &id,
    )
    .unwrap_err();
    assert!(matches!(err, ScrapeError::Api(ref m) if m == "rate limited"));
}
