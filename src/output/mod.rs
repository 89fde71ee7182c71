pub mod formatter;
pub mod notes;

pub use formatter::{
    format_comparison_table, format_comparison_tsv, format_points, format_progression_table,
    format_progression_tsv, format_ruleset, format_seasons, should_use_colors,
};
pub use notes::historical_note;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Pretty-printed JSON for `--format json`
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Write `contents` to `path` atomically; readers never see a partial file.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .context("Failed to write output")?;
    if !contents.ends_with('\n') {
        file.write_all(b"\n").context("Failed to write output")?;
    }
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}
