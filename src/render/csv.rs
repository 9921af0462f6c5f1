use crate::error::Result;
use crate::model::CanonicalEvent;
use chrono::SecondsFormat;
use std::path::Path;

/// One row per event in the fixed column order. Absent fields become empty
/// cells; multi-line messages survive through standard CSV quoting.
pub fn write_csv(events: &[CanonicalEvent], path: &Path) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(super::COLUMNS)?;

    for event in events {
        let timestamp = event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        writer.write_record([
            event.source.as_str(),
            event.action_type.as_str(),
            event.user_name.as_deref().unwrap_or(""),
            event.user_email.as_deref().unwrap_or(""),
            timestamp.as_str(),
            event.ref_name.as_deref().unwrap_or(""),
            event.commit_sha.as_deref().unwrap_or(""),
            event.message.as_deref().unwrap_or(""),
            event.url.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
