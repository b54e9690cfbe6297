//! Company catalog loading.
//!
//! Catalogs name the career pages the company collector iterates. Two file
//! formats are accepted: a JSON array of `{name, career_url}` objects, and
//! line-oriented text where each line is `"Name - URL"` or a bare URL.
//! Blank lines and `#` comments are skipped. Entries are deduplicated by
//! normalized URL across all files combined, first occurrence wins, and a
//! file that cannot be read or parsed is skipped without failing the load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::company::{CompanyEntry, normalize_career_url};

pub fn load_catalog(paths: &[PathBuf]) -> Vec<CompanyEntry> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for path in paths {
        let parsed = match load_one(path) {
            Ok(parsed) => parsed,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "skipping catalog source");
                continue;
            }
        };
        for entry in parsed {
            let url = entry.career_url.trim();
            if url.is_empty() {
                continue;
            }
            if seen.insert(normalize_career_url(url)) {
                entries.push(CompanyEntry::new(entry.name.trim(), url));
            }
        }
    }
    entries
}

fn load_one(path: &Path) -> Result<Vec<CompanyEntry>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string());
    let text = text?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        Ok(parse_lines(&text))
    }
}

fn parse_lines(text: &str) -> Vec<CompanyEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, url) = match line.split_once(" - ") {
            Some((name, url)) => (name, url),
            None => ("", line),
        };
        entries.push(CompanyEntry::new(name.trim(), url.trim()));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn parses_name_dash_url_lines_and_bare_urls() {
        let entries = parse_lines(
            "# seed list\n\
             Acme - https://acme.test/careers\n\
             \n\
             https://widgets.test/jobs\n",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Acme");
        assert_eq!(entries[0].career_url, "https://acme.test/careers");
        assert_eq!(entries[1].name, "");
        assert_eq!(entries[1].career_url, "https://widgets.test/jobs");
    }

    #[test]
    fn company_names_may_contain_dashes() {
        let entries = parse_lines("Tripli-Tech Group - https://tripli.test/careers\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Tripli-Tech Group");
        assert_eq!(entries[0].career_url, "https://tripli.test/careers");
    }

    #[test]
    fn loads_json_and_text_catalogs_with_cross_file_dedup() {
        let entries = load_catalog(&[fixture("catalog.json"), fixture("catalog.txt")]);
        let urls: Vec<&str> = entries.iter().map(|e| e.career_url.as_str()).collect();
        // catalog.txt repeats acme's URL with a trailing slash and different
        // host case; only the JSON occurrence survives.
        assert_eq!(
            urls,
            vec![
                "https://acme.test/careers",
                "https://boards.greenhouse.io/widgetco",
                "https://jobs.lever.co/tripli",
                "https://globex.test/jobs"
            ]
        );
        assert_eq!(entries[0].name, "Acme");
    }

    #[test]
    fn unreadable_source_is_skipped_not_fatal() {
        let entries = load_catalog(&[fixture("does-not-exist.txt"), fixture("catalog.json")]);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn malformed_json_source_is_skipped() {
        let entries = load_catalog(&[fixture("malformed.json"), fixture("catalog.json")]);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn json_entries_without_urls_are_dropped() {
        let dir = std::env::temp_dir().join("jobscout-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.json");
        std::fs::write(&path, r#"[{"name": "NoUrl"}, {"name": "Ok", "career_url": "https://ok.test/jobs"}]"#)
            .unwrap();
        let entries = load_catalog(&[path]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Ok");
    }
}
