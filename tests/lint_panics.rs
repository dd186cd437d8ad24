//! Lint: no `.unwrap()` / `.expect(` in production code.
//!
//! Engine commands report failure through `Result` or a logged warning; a
//! panic inside a timer or a save would take the whole game down with it.
//!
//! This test scans every `.rs` file under `src/` up to its first
//! `#[cfg(test)]` line, since test modules are free to unwrap.

use std::fs;
use std::path::Path;

/// Scan the non-test part of a source file for panicking calls.
fn find_panicking_calls(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }
        // Skip comments
        if trimmed.starts_with("//") {
            continue;
        }

        if line.contains(".unwrap()") || line.contains(".expect(") {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn no_unwrap_outside_tests() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut all_violations = Vec::new();

    visit_source_files(&src_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found .unwrap()/.expect( in production code.\n\
             Propagate the error with `?` or log it and fall back.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            let display_path = path.display().to_string();
            for (line_num, line) in find_panicking_calls(&source) {
                violations.push((display_path.clone(), line_num, line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap_and_expect() {
        let source = "let a = x.unwrap();\nlet b = y.expect(\"y\");";
        assert_eq!(find_panicking_calls(source).len(), 2);
    }

    #[test]
    fn allows_fallbacks() {
        let source = "let a = x.unwrap_or(0);\nlet b = y.unwrap_or_else(|_| 1);";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn stops_at_test_module() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests { fn g() { x.unwrap(); } }";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// x.unwrap() is fine here";
        assert!(find_panicking_calls(source).is_empty());
    }
}
