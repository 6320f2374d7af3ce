pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Calculator input from `--input`, else piped stdin, else `None` so the
/// caller can fall back to individual flags.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_input(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
