//! Builds the per-build `{version}.bed` tables from separate exon and intron
//! annotation files.

use crate::error::{ManeLocaError, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use maneloca_protocol::parse_int_prefix;
use serde::Serialize;
use std::path::Path;
use tracing::info;

const CHROM_HEADER: &str = "#chrom";
const START_HEADER: &str = "start";
const LOCATION_HEADER: &str = "location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub exon_rows: usize,
    pub intron_rows: usize,
    pub total_rows: usize,
}

struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

fn column_index(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        ManeLocaError::Invalid(format!(
            "'{}' has no '{name}' column",
            path.display()
        ))
    })
}

/// Reads a headered tab-separated file, prefixing every `location` value.
fn read_table(path: &Path, prefix: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let location = column_index(&headers, LOCATION_HEADER, path)?;

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: StringRecord = row
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if i == location {
                    format!("{prefix}{field}")
                } else {
                    field.to_string()
                }
            })
            .collect();
        rows.push(fields);
    }
    Ok(Table { headers, rows })
}

/// Concatenates exon and intron rows, sorts them by chromosome text and
/// numeric start, and writes them without a header line.
pub fn merge_exon_intron(exon: &Path, intron: &Path, output: &Path) -> Result<MergeReport> {
    let exons = read_table(exon, "exon")?;
    let introns = read_table(intron, "intron")?;
    if exons.headers != introns.headers {
        return Err(ManeLocaError::Invalid(format!(
            "'{}' and '{}' have different columns",
            exon.display(),
            intron.display()
        )));
    }
    let chrom = column_index(&exons.headers, CHROM_HEADER, exon)?;
    let start = column_index(&exons.headers, START_HEADER, exon)?;

    let report = MergeReport {
        exon_rows: exons.rows.len(),
        intron_rows: introns.rows.len(),
        total_rows: exons.rows.len() + introns.rows.len(),
    };

    let mut merged: Vec<StringRecord> = exons.rows;
    merged.extend(introns.rows);
    // Unparseable starts go last.
    merged.sort_by_cached_key(|row| {
        (
            row.get(chrom).unwrap_or("").to_string(),
            row.get(start)
                .and_then(parse_int_prefix)
                .unwrap_or(i64::MAX),
        )
    });

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .flexible(true)
        .from_path(output)?;
    for row in &merged {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        output = %output.display(),
        exons = report.exon_rows,
        introns = report.intron_rows,
        "merged annotation table"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "#chrom\tstart\tend\tlocation\tsymbol\trefseq\tensembl\tstrand\n";

    #[test]
    fn test_merge_prefixes_and_sorts_numerically() {
        let td = tempdir().unwrap();
        let exon = td.path().join("exon.bed");
        let intron = td.path().join("intron.bed");
        let output = td.path().join("public").join("GRCh37.bed");
        fs::write(
            &exon,
            format!(
                "{HEADER}chr1\t1000\t1100\t2\tGENE\tNM_1\tENST1\t+\n\
chr1\t200\t300\t1\tGENE\tNM_1\tENST1\t+\n"
            ),
        )
        .unwrap();
        fs::write(
            &intron,
            format!("{HEADER}chr1\t301\t999\t1\tGENE\tNM_1\tENST1\t+\n"),
        )
        .unwrap();

        let report = merge_exon_intron(&exon, &intron, &output).unwrap();
        assert_eq!(
            report,
            MergeReport {
                exon_rows: 2,
                intron_rows: 1,
                total_rows: 3
            }
        );

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "chr1\t200\t300\texon1\tGENE\tNM_1\tENST1\t+",
                "chr1\t301\t999\tintron1\tGENE\tNM_1\tENST1\t+",
                "chr1\t1000\t1100\texon2\tGENE\tNM_1\tENST1\t+",
            ]
        );
    }

    #[test]
    fn test_chromosomes_sort_as_text() {
        let td = tempdir().unwrap();
        let exon = td.path().join("exon.bed");
        let intron = td.path().join("intron.bed");
        let output = td.path().join("out.bed");
        fs::write(
            &exon,
            format!("{HEADER}chr2\t5\t9\t1\tB\tNM_2\tENST2\t-\nchr10\t5\t9\t1\tA\tNM_3\tENST3\t+\n"),
        )
        .unwrap();
        fs::write(&intron, HEADER).unwrap();

        merge_exon_intron(&exon, &intron, &output).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        let chroms: Vec<&str> = text
            .lines()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(chroms, vec!["chr10", "chr2"]);
    }

    #[test]
    fn test_missing_location_column_is_rejected() {
        let td = tempdir().unwrap();
        let exon = td.path().join("exon.bed");
        fs::write(&exon, "#chrom\tstart\tend\nchr1\t1\t2\n").unwrap();
        let err = merge_exon_intron(&exon, &exon, &td.path().join("out.bed")).unwrap_err();
        assert!(err.to_string().contains("location"));
    }
}
