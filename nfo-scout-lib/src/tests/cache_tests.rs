use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::*;

/// Dictionary-backed translator that counts backend calls.
struct FakeTranslator {
    words: HashMap<&'static str, &'static str>,
    calls: Cell<usize>,
    seen: RefCell<Vec<String>>,
}

impl FakeTranslator {
    fn new(words: &[(&'static str, &'static str)]) -> Self {
        Self {
            words: words.iter().copied().collect(),
            calls: Cell::new(0),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Translator for FakeTranslator {
    fn name(&self) -> &str {
        "fake"
    }

    fn translate(&self, text: &str, _field: Field) -> Result<String, TranslateError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(text.to_string());
        self.words
            .get(text)
            .map(|s| s.to_string())
            .ok_or_else(|| TranslateError::unexpected(format!("no translation for {text}")))
    }
}

fn genres_translator() -> FakeTranslator {
    FakeTranslator::new(&[
        ("ハイビジョン", "High Definition"),
        ("単体作品", "Featured Actress"),
        ("独占配信", "Exclusive Distribution"),
        ("新人デビュー", "Rookie Debut"),
    ])
}

#[test]
fn miss_then_hit_without_backend_call() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();

    let first = cache.translate(Field::Genres, "ハイビジョン", &fake).unwrap();
    assert_eq!(first, "High Definition");
    assert_eq!(fake.calls.get(), 1);

    assert_eq!(
        cache.lookup(Field::Genres, "ハイビジョン").as_deref(),
        Some("High Definition")
    );
    let second = cache.translate(Field::Genres, "ハイビジョン", &fake).unwrap();
    assert_eq!(second, "High Definition");
    assert_eq!(fake.calls.get(), 1);
}

#[test]
fn multi_valued_text_is_cached_per_term() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();

    let joined = cache
        .translate(Field::Genres, "ハイビジョン, 単体作品,独占配信", &fake)
        .unwrap();
    assert_eq!(joined, "High Definition, Featured Actress,Exclusive Distribution");
    assert_eq!(
        *fake.seen.borrow(),
        vec!["ハイビジョン", "単体作品", "独占配信"]
    );

    // each term is now a hit on its own
    assert_eq!(
        cache.lookup(Field::Genres, "単体作品").as_deref(),
        Some("Featured Actress")
    );
    assert!(cache.entry(Field::Genres, "ハイビジョン, 単体作品,独占配信").is_none());

    // and a different combination needs no backend call
    let again = cache
        .translate(Field::Genres, "独占配信, ハイビジョン", &fake)
        .unwrap();
    assert_eq!(again, "Exclusive Distribution, High Definition");
    assert_eq!(fake.calls.get(), 3);
}

#[test]
fn repeated_term_in_one_value_calls_backend_once() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    let out = cache
        .translate(Field::Genres, "単体作品, 単体作品", &fake)
        .unwrap();
    assert_eq!(out, "Featured Actress, Featured Actress");
    assert_eq!(fake.calls.get(), 1);
}

#[test]
fn single_valued_field_is_cached_whole() {
    let mut cache = TranslationCache::in_memory();
    let fake = FakeTranslator::new(&[("夏, 海", "Summer, Sea")]);
    let out = cache.translate(Field::Title, "夏, 海", &fake).unwrap();
    assert_eq!(out, "Summer, Sea");
    assert_eq!(*fake.seen.borrow(), vec!["夏, 海"]);
    assert!(cache.entry(Field::Title, "夏, 海").is_some());
}

#[test]
fn cache_is_scoped_by_field() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    cache.translate(Field::Genres, "新人デビュー", &fake).unwrap();
    assert!(cache.lookup(Field::Title, "新人デビュー").is_none());
    cache.translate(Field::Title, "新人デビュー", &fake).unwrap();
    assert_eq!(fake.calls.get(), 2);
}

#[test]
fn lookup_composes_only_when_every_term_is_cached() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    cache.translate(Field::Genres, "ハイビジョン", &fake).unwrap();
    assert!(cache.lookup(Field::Genres, "ハイビジョン, 単体作品").is_none());
    cache.translate(Field::Genres, "単体作品", &fake).unwrap();
    assert_eq!(
        cache.lookup(Field::Genres, "ハイビジョン, 単体作品").as_deref(),
        Some("High Definition, Featured Actress")
    );
}

#[test]
fn failed_translation_is_not_cached() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();

    let err = cache.translate(Field::Genres, "ハイビジョン, 未知", &fake);
    assert!(err.is_err());
    // the term before the failure stays cached, the failing one does not
    assert!(cache.entry(Field::Genres, "ハイビジョン").is_some());
    assert!(cache.entry(Field::Genres, "未知").is_none());
    assert_eq!(cache.len(), 1);
}

#[test]
fn empty_backend_result_is_an_error() {
    let mut cache = TranslationCache::in_memory();
    let fake = FakeTranslator::new(&[("空", "  ")]);
    assert!(cache.translate(Field::Studio, "空", &fake).is_err());
    assert!(cache.is_empty());
}

#[test]
fn blank_text_skips_backend() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    assert_eq!(cache.translate(Field::Plot, "  ", &fake).unwrap(), "  ");
    assert_eq!(fake.calls.get(), 0);
}

#[test]
fn clear_one_field_or_all() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    cache.translate(Field::Genres, "ハイビジョン, 単体作品", &fake).unwrap();
    cache.translate(Field::Title, "新人デビュー", &fake).unwrap();

    assert_eq!(cache.clear(Some(Field::Genres)), 2);
    assert!(cache.lookup(Field::Genres, "ハイビジョン").is_none());
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.clear(None), 1);
    assert!(cache.is_empty());
}

#[test]
fn stats_count_per_field() {
    let mut cache = TranslationCache::in_memory();
    let fake = genres_translator();
    cache.translate(Field::Genres, "ハイビジョン, 単体作品", &fake).unwrap();
    cache.translate(Field::Title, "新人デビュー", &fake).unwrap();

    let stats = cache.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.per_field.get(&Field::Genres), Some(&2));
    assert_eq!(stats.per_field.get(&Field::Title), Some(&1));
    assert_eq!(stats.per_field.get(&Field::Plot), None);
}

#[test]
fn registered_field_becomes_multi_valued() {
    let mut cache = TranslationCache::in_memory();
    assert!(!cache.is_multi_valued(Field::Series));
    cache.register_multi_valued(Field::Series);
    let fake = FakeTranslator::new(&[("甲", "A"), ("乙", "B")]);
    assert_eq!(cache.translate(Field::Series, "甲,乙", &fake).unwrap(), "A,B");
    assert_eq!(fake.calls.get(), 2);
}

#[test]
fn split_padding_keeps_whitespace() {
    assert_eq!(split_padding(" a b "), (" ", "a b", " "));
    assert_eq!(split_padding("x"), ("", "x", ""));
    assert_eq!(split_padding("   "), ("   ", "", ""));
}
