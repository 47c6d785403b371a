//! Hygiene: the library must degrade, never crash or lose an error silently.
//!
//! Scans non-test sources under `src/` for panicking calls and discarded
//! results. Each pattern carries a budget that only ever shrinks.

use std::fs;
use std::path::{Path, PathBuf};

struct Rule {
    pattern: &'static str,
    budget: usize,
}

const PANICS: &[Rule] = &[
    Rule { pattern: ".unwrap()", budget: 0 },
    Rule { pattern: ".expect(", budget: 0 },
    Rule { pattern: "panic!(", budget: 0 },
    Rule { pattern: "unreachable!(", budget: 0 },
    Rule { pattern: "todo!(", budget: 0 },
];

// Every backend or codec error becomes a `Diagnostic` or a `WriteOutcome`.
const DISCARDS: &[Rule] = &[
    Rule { pattern: "let _ =", budget: 0 },
    Rule { pattern: ".ok()", budget: 0 },
    Rule { pattern: "#[allow(dead_code)]", budget: 0 },
];

fn library_sources(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            library_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

/// Lines over budget, one message per rule.
fn violations(rules: &[Rule]) -> Vec<String> {
    let mut files = Vec::new();
    library_sources(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found under src/");

    rules
        .iter()
        .filter_map(|rule| {
            let hits: Vec<String> = files
                .iter()
                .flat_map(|(path, content)| {
                    content
                        .lines()
                        .enumerate()
                        .filter(|(_, line)| line.contains(rule.pattern))
                        .map(move |(n, _)| format!("  {}:{}", path.display(), n + 1))
                })
                .collect();
            (hits.len() > rule.budget).then(|| {
                format!("`{}`: found {}, budget {}\n{}", rule.pattern, hits.len(), rule.budget, hits.join("\n"))
            })
        })
        .collect()
}

#[test]
fn no_panicking_calls() {
    let over = violations(PANICS);
    assert!(over.is_empty(), "{}", over.join("\n"));
}

#[test]
fn no_discarded_results() {
    let over = violations(DISCARDS);
    assert!(over.is_empty(), "{}", over.join("\n"));
}
