//! Shared helpers for the rendering integration tests.

use std::fs;
use std::path::PathBuf;

use mdterm_lib::markdown::RenderOptions;

/// Loads a Markdown fixture from `tests/fixtures/`.
///
/// ## Panics
///
/// Panics if the fixture cannot be read.
pub fn load_fixture(path: &str) -> String {
    let mut fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    fixture_path.push("tests");
    fixture_path.push("fixtures");
    fixture_path.push(path);

    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {:?}: {}",
            fixture_path.display(),
            e
        )
    })
}

/// Options with colour off, so output can be compared as plain text.
pub fn plain_options() -> RenderOptions {
    let mut options = RenderOptions::default();
    options.color = false;
    options
}
