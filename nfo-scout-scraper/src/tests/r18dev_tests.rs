use super::*;
use nfo_scout_core::extract;

const SAMPLE: &str = r#"{
  "content_id": "sone00638",
  "dvd_id": "SONE-638",
  "title_en": "Rookie Debut",
  "title_ja": "新人デビュー",
  "comment_en": null,
  "release_date": "2025-01-17 10:00:00",
  "runtime_mins": 120,
  "jacket_full_url": "https://pics.dmm.co.jp/digital/video/sone00638/sone00638pl.jpg",
  "jacket_thumb_url": "https://pics.dmm.co.jp/digital/video/sone00638/sone00638ps.jpg",
  "actresses": [
    {"name_romaji": "Saika Kawakita", "name_kanji": "河北彩花", "image_url": "kawakita_saika.jpg"},
    {"name_romaji": null, "name_kanji": "新人", "image_url": null}
  ],
  "directors": [{"name_romaji": "Someone", "name_kanji": "誰か"}],
  "categories": [
    {"name_en": "Featured Actress", "name_ja": "単体作品"},
    {"name_en": "", "name_ja": "ハイビジョン"}
  ],
  "maker_name_en": "S1 NO.1 STYLE",
  "maker_name_ja": "エスワン",
  "label_name_en": null,
  "label_name_ja": "S1",
  "series_name_en": null,
  "series_name_ja": null,
  "gallery": null
}"#;

#[test]
fn english_prefers_english_fields() {
    let id = extract("SONE-638").unwrap();
    let record = parse_detail(SAMPLE, &id, true).unwrap();

    assert_eq!(record.title, "Rookie Debut");
    assert_eq!(record.original_title.as_deref(), Some("新人デビュー"));
    assert_eq!(record.content_id.as_deref(), Some("sone00638"));
    assert_eq!(record.release_date.as_deref(), Some("2025-01-17"));
    assert_eq!(record.runtime_minutes, Some(120));
    assert_eq!(record.genres, vec!["Featured Actress", "ハイビジョン"]);
    assert_eq!(record.studio.as_deref(), Some("S1 NO.1 STYLE"));
    assert_eq!(record.label.as_deref(), Some("S1"));
    assert_eq!(record.series, None);
    assert_eq!(record.directors, vec!["Someone"]);
    assert_eq!(record.language, "en");
    assert!(record.gallery.is_empty());

    let saika = &record.performers[0];
    assert_eq!(saika.name, "Saika Kawakita");
    assert_eq!(saika.original_name.as_deref(), Some("河北彩花"));
    assert_eq!(
        saika.image_url.as_deref(),
        Some("https://pics.dmm.co.jp/mono/actjpgs/kawakita_saika.jpg")
    );
    assert_eq!(record.performers[1].name, "新人");
    assert_eq!(record.performers[1].original_name, None);
}

#[test]
fn japanese_prefers_japanese_fields() {
    let id = extract("SONE-638").unwrap();
    let record = parse_detail(SAMPLE, &id, false).unwrap();
    assert_eq!(record.title, "新人デビュー");
    assert_eq!(record.original_title, None);
    assert_eq!(record.studio.as_deref(), Some("エスワン"));
    assert_eq!(record.genres, vec!["単体作品", "ハイビジョン"]);
    assert_eq!(record.performers[0].name, "河北彩花");
    assert_eq!(record.language, "ja");
}

#[test]
fn empty_payload_is_not_found() {
    let id = extract("SONE-638").unwrap();
    let err = parse_detail("{}", &id, true).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn garbage_is_an_api_error() {
    let id = extract("SONE-638").unwrap();
    assert!(matches!(
        parse_detail("<html>", &id, true),
        Err(ScrapeError::Api(_))
    ));
}

#[test]
fn url_uses_store_content_id() {
    let id = extract("SDMF-022").unwrap();
    assert_eq!(
        R18DevSource::detail_url(&id),
        "https://r18.dev/videos/vod/movies/detail/-/combined=1sdmf00022/json"
    );
}
