//! Message handlers exposed to the demo page through `window.api`.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Value};

use localflare_app::LocalFlare;

/// Register every demo handler on `app`.
pub fn register(app: &mut LocalFlare) {
    app.on_message("get_system_info", get_system_info)
        .on_message("read_file", read_file)
        .on_message("list_dir", list_dir);
}

/// Platform, working directory and environment of the running process.
pub fn get_system_info(_data: Value) -> Result<Value, String> {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .map_err(|e| format!("Error reading current directory: {e}"))?;
    let env: BTreeMap<String, String> = std::env::vars().collect();

    Ok(json!({
        "platform": std::env::consts::OS,
        "family": std::env::consts::FAMILY,
        "arch": std::env::consts::ARCH,
        "cwd": cwd,
        "env": env,
    }))
}

/// Read a UTF-8 text file: `{ "path": string }` -> `{ "content": string }`.
pub fn read_file(data: Value) -> Result<Value, String> {
    let path = data
        .get("path")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .ok_or("No file path provided")?;

    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Error reading file: {e}"))?;
    Ok(json!({ "content": content }))
}

/// List a directory: `{ "path"?: string }` (default `.`) ->
/// `{ "path", "entries": [{ "name", "is_dir", "size" }] }`.
///
/// Directories come first, then files, each group sorted by name.
pub fn list_dir(data: Value) -> Result<Value, String> {
    let path = data
        .get("path")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .unwrap_or(".");
    let dir = Path::new(path);

    let read = std::fs::read_dir(dir).map_err(|e| format!("Error listing directory: {e}"))?;
    let mut entries: Vec<(bool, String, u64)> = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| format!("Error listing directory: {e}"))?;
        // Entries that vanish or deny stat between listing and metadata are skipped.
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let size = if meta.is_dir() { 0 } else { meta.len() };
        entries.push((meta.is_dir(), name, size));
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let resolved = dir
        .canonicalize()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string());

    Ok(json!({
        "path": resolved,
        "entries": entries
            .into_iter()
            .map(|(is_dir, name, size)| json!({ "name": name, "is_dir": is_dir, "size": size }))
            .collect::<Vec<_>>(),
    }))
}
