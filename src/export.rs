use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::data::pyramid::Pyramid;

/// Write a pyramid to disk. Dispatch by extension.
///
/// * `.csv`  – `Grade,Routes` header, hardest grade first
/// * `.json` – `{ "title": ..., "rows": [{ "grade": ..., "routes": ... }] }`
pub fn export_pyramid(path: &Path, pyramid: &Pyramid) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(path, pyramid),
        "json" => write_json(path, pyramid),
        other => bail!("Unsupported export extension: .{other}"),
    }?;

    log::info!("Exported {} grade rows to {}", pyramid.rows.len(), path.display());
    Ok(())
}

fn write_csv(path: &Path, pyramid: &Pyramid) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Grade", "Routes"])?;
    for row in &pyramid.rows {
        let routes = row.routes.to_string();
        writer.write_record([row.grade.as_str(), routes.as_str()])?;
    }
    writer.flush().context("writing CSV")?;
    Ok(())
}

fn write_json(path: &Path, pyramid: &Pyramid) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, pyramid).context("serializing pyramid")?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
