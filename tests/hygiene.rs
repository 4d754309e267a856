//! Source scans for the rules castboard's production code lives by.
//!
//! The engine runs inside a browser event loop, so nothing may panic, every
//! host value is untrusted, and logging goes through `tracing`. These tests
//! read `src/` as text and fail with the offending lines when a rule slips.

use std::fs;
use std::path::Path;

struct SourceFile {
    name: String,
    content: String,
}

impl SourceFile {
    /// Numbered lines that are code, skipping comments and the
    /// `#[cfg(test)]` wiring of sibling test files.
    fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.content
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let t = line.trim_start();
                let wiring = t.starts_with("#[cfg(test)]") || t.starts_with("#[path") || t.ends_with("_test;");
                !(t.starts_with("//") || wiring)
            })
            .map(|(i, line)| (i + 1, line))
    }
}

/// Every non-test `.rs` file directly under `src/`.
fn source_files() -> Vec<SourceFile> {
    let Ok(entries) = fs::read_dir(Path::new("src")) else {
        return Vec::new();
    };
    let mut files: Vec<SourceFile> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "rs"))
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            if name.ends_with("_test.rs") {
                return None;
            }
            let content = fs::read_to_string(&path).ok()?;
            Some(SourceFile { name, content })
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

/// `file:line: text` for every code line containing one of `patterns`,
/// outside the files in `allowed_in`.
fn offenders(files: &[SourceFile], patterns: &[&str], allowed_in: &[&str]) -> Vec<String> {
    files
        .iter()
        .filter(|f| !allowed_in.contains(&f.name.as_str()))
        .flat_map(|f| {
            f.code_lines()
                .filter(|(_, line)| patterns.iter().any(|p| line.contains(p)))
                .map(|(n, line)| format!("  src/{}:{n}: {}", f.name, line.trim()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn assert_clean(rule: &str, hits: &[String]) {
    assert!(hits.is_empty(), "{rule}:\n{}", hits.join("\n"));
}

#[test]
fn scanner_sees_the_crate() {
    let files = source_files();
    assert!(files.iter().any(|f| f.name == "engine.rs"), "run from the crate root");
}

#[test]
fn nothing_panics_on_host_input() {
    let hits = offenders(
        &source_files(),
        &[".unwrap()", ".expect(", "panic!(", "unreachable!(", "todo!(", "unimplemented!("],
        &[],
    );
    assert_clean("production code must not panic", &hits);
}

#[test]
fn errors_are_logged_not_dropped() {
    let hits = offenders(&source_files(), &["let _ =", ".ok()", "#[allow(dead_code)]"], &[]);
    assert_clean("discarded result or dead code", &hits);
}

#[test]
fn logging_goes_through_tracing() {
    let hits = offenders(&source_files(), &["println!(", "eprintln!(", "print!(", "dbg!("], &[]);
    assert_clean("use tracing macros", &hits);
}

#[test]
fn only_the_camera_divides_by_zoom() {
    // The camera is the one place a zoom is known to be sanitized before use.
    let hits = offenders(&source_files(), &["/ zoom", "/ self.zoom", "/ camera.zoom", "/ cam.zoom"], &["camera.rs"]);
    assert_clean("convert through Camera instead of dividing by zoom", &hits);
}

#[test]
fn clamp_bounds_come_from_validated_config() {
    // `f64::clamp` panics when min > max; only validated config bounds may feed it.
    let hits = offenders(&source_files(), &[".clamp("], &["config.rs", "viewport.rs"]);
    assert_clean("clamp outside config-backed code", &hits);
}

#[test]
fn every_module_has_a_sibling_test_file() {
    let untested = ["lib.rs", "consts.rs", "error.rs"];
    let missing: Vec<String> = source_files()
        .iter()
        .filter(|f| !untested.contains(&f.name.as_str()))
        .filter_map(|f| {
            let test_file = f.name.replace(".rs", "_test.rs");
            let wired = f.content.contains(&format!("#[path = \"{test_file}\"]"));
            let exists = Path::new("src").join(&test_file).is_file();
            (!(wired && exists)).then(|| format!("  src/{} -> {test_file}", f.name))
        })
        .collect();
    assert_clean("module without a wired sibling test", &missing);
}
