//! Hygiene for the browser bindings.
//!
//! Browser calls may fail for reasons the page cannot act on; those map to a
//! `BackendError` or a neutral default. The budgets below cover the few
//! places that do so by hand.

use std::fs;
use std::path::Path;

/// Count lines containing `pattern` in non-test sources under `dir`.
fn count(dir: &Path, pattern: &str, hits: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            count(&path, pattern, hits);
            continue;
        }
        let name = path.to_string_lossy();
        if !name.ends_with(".rs") || name.ends_with("_test.rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (n, line) in content.lines().enumerate() {
            if line.contains(pattern) {
                hits.push(format!("  {name}:{}", n + 1));
            }
        }
    }
}

fn assert_budget(pattern: &str, budget: usize) {
    let mut hits = Vec::new();
    count(Path::new("src"), pattern, &mut hits);
    assert!(
        hits.len() <= budget,
        "`{pattern}`: found {}, budget {budget}\n{}",
        hits.len(),
        hits.join("\n")
    );
}

#[test]
fn no_panicking_calls() {
    for pattern in [".unwrap()", ".expect(", "panic!(", "unreachable!(", "todo!("] {
        assert_budget(pattern, 0);
    }
}

#[test]
fn unused_bindings_only_in_non_hydrate_stubs() {
    // `BrowserStorage` get/set/remove (3) and the two event hooks' setters.
    assert_budget("let _ =", 5);
}

#[test]
fn dot_ok_only_where_browser_lookups_have_no_error_to_report() {
    // `window.localStorage` throwing means no storage; `innerWidth` not a
    // number means unknown width.
    assert_budget(".ok()", 2);
}
