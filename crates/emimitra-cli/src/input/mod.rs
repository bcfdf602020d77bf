pub mod file;
pub mod policy;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <file>` if given, else from piped stdin.
/// `None` means the command should fall back to its individual flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_json(path).map(Some),
        None => stdin::read_stdin(),
    }
}

/// Unwrap a required flag, naming it in the error.
pub fn required(value: Option<String>, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("--{} is required (or provide --input)", flag).into())
}
