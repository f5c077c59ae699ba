//! Terminal output testing utilities.

use regex::Regex;
use std::env;

lazy_static::lazy_static! {
    static ref CSI_REGEX: Regex = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
    static ref ESCAPE_REGEX: Regex =
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").unwrap();
}

/// Removes all ANSI CSI sequences (SGR styling, cursor control) from a string.
///
/// OSC sequences such as hyperlinks are left in place.
///
/// ## Examples
///
/// ```rust
/// use mdterm_lib::testing::strip_ansi_codes;
///
/// let colored = "\x1b[31mRed\x1b[0m \x1b[1;4mBold\x1b[0m";
/// assert_eq!(strip_ansi_codes(colored), "Red Bold");
/// ```
pub fn strip_ansi_codes(input: &str) -> String {
    CSI_REGEX.replace_all(input, "").to_string()
}

/// Removes CSI and OSC sequences, leaving only the visible text.
pub fn strip_escape_codes(input: &str) -> String {
    ESCAPE_REGEX.replace_all(input, "").to_string()
}

/// RAII guard that sets or removes an environment variable and restores the
/// previous value on drop.
///
/// Only use from `#[serial]` tests.
#[derive(Debug)]
pub struct ScopedEnv {
    key: String,
    original: Option<String>,
}

impl ScopedEnv {
    pub fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: only used in serial tests where no other threads
        // are accessing the environment concurrently
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }

    pub fn remove(key: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: see `ScopedEnv::set`
        unsafe {
            env::remove_var(key);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // SAFETY: see `ScopedEnv::set`
        unsafe {
            match &self.original {
                Some(val) => env::set_var(&self.key, val),
                None => env::remove_var(&self.key),
            }
        }
    }
}
