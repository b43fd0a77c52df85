use anyhow::Context;
use camino::Utf8Path;
use provguard_types::ProvguardReport;

/// Pretty JSON with a trailing newline.
pub fn serialize_report(report: &ProvguardReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the report, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &ProvguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    let bytes = serialize_report(report)?;
    std::fs::write(path, bytes).with_context(|| format!("write report {path}"))?;
    tracing::debug!(path = %path, "report written");
    Ok(())
}
