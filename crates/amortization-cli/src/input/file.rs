use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a loan document from a JSON file.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    if !value.is_object() {
        return Err(format!("'{}' must contain a JSON object", resolved.display()).into());
    }
    Ok(value)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }

    Ok(resolved)
}
