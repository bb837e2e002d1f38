use super::*;

fn canonical(input: &str) -> String {
    extract(input)
        .unwrap_or_else(|e| panic!("expected a match for {input:?}: {e}"))
        .canonical()
        .to_string()
}

#[test]
fn content_id_filename() {
    assert_eq!(canonical("sone00638.mp4"), "SONE-638");
}

#[test]
fn noisy_release_name() {
    assert_eq!(canonical("SONE-638-UncenLeak-1080p.mp4"), "SONE-638");
}

#[test]
fn variants_of_same_code_agree() {
    let variants = [
        "SONE-638",
        "sone-638",
        "sone638",
        "SONE_638",
        "SONE 638",
        "sone00638",
        "SONE-00638",
        "[group] sone_638 (FHD).mp4",
        "hhd800.com@SONE-638.mkv",
        "SONE-638C.mp4",
        "SONE-638-4K.mkv",
        "  sone-638.MP4 ",
    ];
    for v in variants {
        assert_eq!(canonical(v), "SONE-638", "variant {v:?}");
    }
}

#[test]
fn identifier_forms() {
    let id = extract("sone-638").unwrap();
    assert_eq!(id.studio_prefix(), "SONE");
    assert_eq!(id.numeric_part(), "638");
    assert_eq!(id.canonical(), "SONE-638");
    assert_eq!(id.content_id(), "sone00638");
    assert_eq!(id.number(), 638);
    assert_eq!(id.to_string(), "SONE-638");
}

#[test]
fn canonical_keeps_three_digit_minimum() {
    let id = extract("sdmf00022").unwrap();
    assert_eq!(id.canonical(), "SDMF-022");
    assert_eq!(id.content_id(), "sdmf00022");
}

#[test]
fn four_digit_numbers_survive() {
    let id = extract("ABP-1234.avi").unwrap();
    assert_eq!(id.canonical(), "ABP-1234");
    assert_eq!(id.content_id(), "abp01234");
}

#[test]
fn content_id_round_trip() {
    for input in ["SONE-638", "SDMF-022", "ABP-1234", "MIDV-001", "IPX-99999"] {
        let first = extract(input).unwrap();
        let second = extract(first.content_id()).unwrap();
        assert_eq!(first.canonical(), second.canonical(), "input {input:?}");
        assert_eq!(first, second);
    }
}

#[test]
fn longest_candidate_wins() {
    // "hhd800" is shorter than "MIDV-018"
    assert_eq!(canonical("hhd800 MIDV-018"), "MIDV-018");
}

#[test]
fn leftmost_wins_on_tie() {
    assert_eq!(canonical("ABC-123 DEF-456"), "ABC-123");
}

#[test]
fn resolution_tags_are_not_codes() {
    assert_eq!(canonical("SONE-638 Leak-1080p"), "SONE-638");
}

#[test]
fn numeric_label_prefix_is_ignored() {
    assert_eq!(canonical("1sdmf00022.mp4"), "SDMF-022");
    assert_eq!(canonical("h_1240milk00225"), "MILK-225");
}

#[test]
fn no_match_is_an_error_not_a_panic() {
    for input in ["", "holiday video.mp4", "1080p.mkv", "x264-2160p", "abcdefgh-123"] {
        match extract(input) {
            Err(ExtractionError::NoMatch(raw)) => assert_eq!(raw, input),
            other => panic!("expected NoMatch for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn too_many_digits_do_not_match() {
    assert!(extract("abp123456").is_err());
}

#[test]
fn double_separator_does_not_match() {
    assert!(extract("SONE--638").is_err());
    assert!(extract("SONE  638").is_err());
}

#[test]
fn new_rejects_bad_parts() {
    assert!(Identifier::new("SO1", "638").is_err());
    assert!(Identifier::new("SONE", "6a8").is_err());
    assert!(Identifier::new("SONE", "").is_err());
    assert!(Identifier::new("SONE", "123456").is_err());
}

#[test]
fn all_zero_number() {
    let id = Identifier::new("abc", "000").unwrap();
    assert_eq!(id.canonical(), "ABC-000");
    assert_eq!(id.content_id(), "abc00000");
}

#[test]
fn parses_with_from_str() {
    let id: Identifier = "midv_018".parse().unwrap();
    assert_eq!(id.canonical(), "MIDV-018");
}
