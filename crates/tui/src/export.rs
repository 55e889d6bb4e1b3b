use std::{fs, path::Path};

use engine::PlanSnapshot;

use crate::error::Result;

/// Writes the proposal snapshot as pretty-printed JSON, creating parent
/// directories as needed. The file is overwritten on every export.
pub fn save_snapshot(path: &str, snapshot: &PlanSnapshot) -> Result<()> {
    let parent = Path::new(path).parent();
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, payload)?;
    Ok(())
}
