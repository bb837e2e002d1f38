use super::*;

#[test]
fn test_format_bytes() {
    assert_eq!(format_bytes(0), "0 bytes");
    assert_eq!(format_bytes(2048), "2 KB");
    assert_eq!(format_bytes(3 * 1024 * 1024), "3 MB");
    assert_eq!(format_bytes(1500), "1500 bytes");
}

#[test]
fn test_split_list() {
    assert_eq!(split_list("4K, ハイビジョン ,,独占配信"), vec!["4K", "ハイビジョン", "独占配信"]);
    assert!(split_list(" , ").is_empty());
}

#[test]
fn write_atomic_creates_parents_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("cache.json");

    write_atomic(&target, b"{}").unwrap();
    write_atomic(&target, b"{\"a\":1}").unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"a\":1}");
    let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
