use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use nfo_scout_core::extract;

use super::*;

const SEARCH_HTML: &str = r#"
<table>
<tr><td class="x"><a href="subs/12/SONE-638.html">SONE-638</a>
  (translated from Japanese)</td></tr>
<tr><td><a href="subs/99/sone-638-C.html">sone-638-C</a></td></tr>
<tr><td><a href="subs/5/ABP-001.html">ABP-001</a> (translated from Korean)</td></tr>
<tr><td><a href="https://elsewhere.example/SONE-638">SONE-638 mirror</a></td></tr>
</table>
"#;

#[test]
fn search_results_keep_matching_sub_pages() {
    let pages = parse_search_results(SEARCH_HTML, "SONE-638");
    assert_eq!(
        pages,
        vec![
            SubtitlePage {
                url: "https://subtitlecat.com/subs/12/SONE-638.html".to_string(),
                source_lang: "japanese".to_string(),
            },
            SubtitlePage {
                url: "https://subtitlecat.com/subs/99/sone-638-C.html".to_string(),
                source_lang: "chinese".to_string(),
            },
        ]
    );
}

#[test]
fn search_without_matches_is_empty() {
    assert!(parse_search_results(SEARCH_HTML, "MIDV-001").is_empty());
}

#[test]
fn download_links_are_resolved_against_page() {
    let html = r#"
<div id="download_en"><a class="green-link" href="/subs/12/SONE-638-en.srt">Download</a></div>
<div id="download_zh"><a href="https://cdn.example/SONE-638-zh.srt">Download</a></div>
"#;
    let links = parse_download_links(html, "https://subtitlecat.com/subs/12/SONE-638.html");
    assert_eq!(
        links,
        vec![
            SubtitleLink {
                url: "https://subtitlecat.com/subs/12/SONE-638-en.srt".to_string(),
                language: "en".to_string(),
            },
            SubtitleLink {
                url: "https://cdn.example/SONE-638-zh.srt".to_string(),
                language: "zh".to_string(),
            },
        ]
    );
}

#[test]
fn language_guess_from_file_name() {
    assert_eq!(guess_language("subs/1/x.en.html"), "english");
    assert_eq!(guess_language("subs/1/x-C.html"), "chinese");
    assert_eq!(guess_language("subs/1/x.html"), "unknown");
}

type Seen = Vec<(String, Instant, Instant)>;

/// Serve `count` requests, one connection each, recording the path, when
/// the request arrived and when the response started.
fn serve(listener: TcpListener, count: usize) -> thread::JoinHandle<Seen> {
    thread::spawn(move || {
        let mut seen = Vec::new();
        for stream in listener.incoming().take(count) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let arrived = Instant::now();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or("").to_string();
            let body = if path.starts_with("/index.php") {
                r#"<table><tr><td><a href="subs/1/SONE-638.html">SONE-638</a>
                   (translated from Japanese)</td></tr></table>"#
            } else if path.ends_with(".html") {
                r#"<div id="download_en"><a href="/subs/1/SONE-638-en.srt">Download</a></div>"#
            } else {
                "1\n00:00:01,000 --> 00:00:02,000\nHello\n"
            };
            let answered = Instant::now();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            seen.push((path, arrived, answered));
        }
        seen
    })
}

#[test]
fn every_request_including_downloads_is_spaced() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    let server = serve(listener, 3);

    let delay = Duration::from_millis(150);
    let downloader = SubtitleDownloader {
        http: reqwest::blocking::Client::builder().no_proxy().build().unwrap(),
        settings: SubtitleSettings::default(),
        pacer: Pacer::new(delay),
        base_url,
    };
    let dest = tempfile::tempdir().unwrap();
    let record = MetadataRecord::new(extract("SONE-638").unwrap(), "test", "ja");

    let out = downloader.fetch(&record, dest.path()).unwrap();
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    assert_eq!(
        out.files,
        vec![dest.path().join("SONE-638.en.translated_from_japanese.srt")]
    );

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[2].0.ends_with("SONE-638-en.srt"));
    for pair in seen.windows(2) {
        let gap = pair[1].1.duration_since(pair[0].2);
        assert!(gap >= delay, "{} followed {} after {gap:?}", pair[1].0, pair[0].0);
    }
}
