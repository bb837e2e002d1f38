use super::*;
use std::path::PathBuf;
use nfo_scout_core::{Performer, extract};

fn sample_record() -> MetadataRecord {
    let mut record = MetadataRecord::new(extract("SONE-638").unwrap(), "r18dev", "en");
    record.content_id = Some("sone00638".to_string());
    record.title = "Summer & Sea <Special>".to_string();
    record.original_title = Some("夏と海".to_string());
    record.plot = Some("A".repeat(150));
    record.genres = vec!["Featured Actress".to_string(), "Drama".to_string()];
    let mut performer = Performer::new("Saika Kawakita");
    performer.original_name = Some("河北彩花".to_string());
    performer.image_url = Some("https://img.example/saika.jpg".to_string());
    record.performers = vec![performer];
    record.directors = vec!["Someone".to_string()];
    record.studio = Some("S1 NO.1 STYLE".to_string());
    record.series = Some("Summer Series".to_string());
    record.release_date = Some("2025-01-17".to_string());
    record.runtime_minutes = Some(120);
    record.cover_url = Some("https://img.example/sone638pl.jpg".to_string());
    record.poster_url = Some("https://img.example/sone638ps.jpg".to_string());
    record
}

#[test]
fn file_name_uses_canonical_code() {
    let id = extract("sone00638.mp4").unwrap();
    assert_eq!(NfoWriter::new().file_name(&id), "SONE-638.nfo");
}

#[test]
fn render_contains_core_fields_and_escapes_text() {
    let xml = NfoWriter::new()
        .render(&sample_record(), &Artwork::default(), Path::new("/media"))
        .unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
    assert!(xml.contains("<title>[SONE-638] Summer &amp; Sea &lt;Special&gt;</title>"));
    assert!(xml.contains("<originaltitle>夏と海</originaltitle>"));
    assert!(xml.contains("<id>SONE-638</id>"));
    assert!(xml.contains(r#"<uniqueid type="code" default="true">SONE-638</uniqueid>"#));
    assert!(xml.contains(r#"<uniqueid type="contentid">sone00638</uniqueid>"#));
    assert!(xml.contains("<year>2025</year>"));
    assert!(xml.contains("<runtime>120</runtime>"));
    assert!(xml.contains("<genre>Featured Actress</genre>"));
    assert!(xml.contains("<genre>Drama</genre>"));
    assert!(xml.contains("<name>Summer Series</name>"));
    assert!(xml.contains("<altname>河北彩花</altname>"));
    assert!(!xml.contains("<label>"));
    assert!(xml.trim_end().ends_with("</movie>"));
}

#[test]
fn outline_is_truncated_plot() {
    let xml = NfoWriter::new()
        .render(&sample_record(), &Artwork::default(), Path::new("/media"))
        .unwrap();
    let expected = format!("<outline>{}...</outline>", "A".repeat(100));
    assert!(xml.contains(&expected));
    assert!(xml.contains(&format!("<plot>{}</plot>", "A".repeat(150))));
}

#[test]
fn remote_urls_used_without_local_artwork() {
    let xml = NfoWriter::new()
        .render(&sample_record(), &Artwork::default(), Path::new("/media"))
        .unwrap();
    assert!(xml.contains(r#"<thumb aspect="poster">https://img.example/sone638ps.jpg</thumb>"#));
    assert!(xml.contains("<thumb>https://img.example/sone638pl.jpg</thumb>"));
}

#[test]
fn local_artwork_is_relative_to_descriptor() {
    let artwork = Artwork {
        poster: Some(PathBuf::from("/media/SONE-638/SONE-638-folder.jpg")),
        cover: Some(PathBuf::from("/media/art/SONE-638-fanart.jpg")),
    };
    let xml = NfoWriter::new()
        .render(&sample_record(), &artwork, Path::new("/media/SONE-638"))
        .unwrap();
    assert!(xml.contains(r#"<thumb aspect="poster">SONE-638-folder.jpg</thumb>"#));
    assert!(xml.contains("<thumb>../art/SONE-638-fanart.jpg</thumb>"));
}

#[test]
fn empty_title_is_rejected() {
    let mut record = sample_record();
    record.title = "  ".to_string();
    let err = NfoWriter::new()
        .render(&record, &Artwork::default(), Path::new("."))
        .unwrap_err();
    assert!(matches!(err, FrontendError::InvalidMetadata(_)));
}

#[test]
fn write_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out").join("SONE-638");
    let path = NfoWriter::new()
        .write(&sample_record(), &Artwork::default(), &dest)
        .unwrap();
    assert_eq!(path, dest.join("SONE-638.nfo"));
    let xml = std::fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<movie>"));
}
