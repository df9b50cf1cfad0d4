//! TSV export of the visible record set.

use crate::{
    error::{ManeLocaError, Result},
    save::SaveTarget,
};
use chrono::{NaiveDate, Utc};
use csv::{QuoteStyle, WriterBuilder};
use maneloca_protocol::{BuildVersion, Column, Record};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Canceled,
}

/// Header line plus one tab-separated line per record, in the given order.
pub fn tsv_content(rows: &[&Record]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(Column::ALL.iter().map(|c| c.id()))?;
    for record in rows {
        writer.write_record(Column::ALL.iter().map(|&c| record.field_text(c).into_owned()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ManeLocaError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ManeLocaError::Invalid(e.to_string()))
}

pub fn default_file_name(version: BuildVersion, date: NaiveDate) -> String {
    format!("maneloca_{}_{}.tsv", version, date.format("%Y-%m-%d"))
}

pub fn default_file_name_today(version: BuildVersion) -> String {
    default_file_name(version, Utc::now().date_naive())
}

/// Serializes `rows` and hands them to `target`.
///
/// An empty set is rejected before the target is consulted.
pub fn export_visible(
    rows: &[&Record],
    version: BuildVersion,
    target: &dyn SaveTarget,
) -> Result<ExportOutcome> {
    if rows.is_empty() {
        return Err(ManeLocaError::EmptyExport);
    }
    let content = tsv_content(rows)?;
    let Some(path) = target.choose_destination(&default_file_name_today(version)) else {
        info!("export canceled");
        return Ok(ExportOutcome::Canceled);
    };
    target
        .write(&path, &content)
        .map_err(|source| ManeLocaError::Write {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), rows = rows.len(), "export written");
    Ok(ExportOutcome::Saved(path))
}
