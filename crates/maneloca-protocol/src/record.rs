use crate::{BuildVersion, Column};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One annotated genomic interval from a build-specific BED-like table.
///
/// `start` and `end` are `None` when the source text held no leading integer.
/// Such records are kept; they simply never match a coordinate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub chrom: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub location: String,
    pub symbol: String,
    pub refseq: String,
    pub ensembl: String,
    pub strand: String,
    pub version: BuildVersion,
}

impl Record {
    /// Parses one tab-separated line: chrom, start, end, location, symbol,
    /// refseq, ensembl, strand. Missing trailing fields become empty and extra
    /// fields are ignored.
    pub fn from_bed_line(line: &str, version: BuildVersion) -> Self {
        let mut fields = line.trim_end().split('\t');
        let mut next = || fields.next().unwrap_or("").to_string();
        let chrom = next();
        let start = parse_int_prefix(&next());
        let end = parse_int_prefix(&next());
        Self {
            chrom,
            start,
            end,
            location: next(),
            symbol: next(),
            refseq: next(),
            ensembl: next(),
            strand: next(),
            version,
        }
    }

    /// Text form of a field as shown in the table and written on export.
    pub fn field_text(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::Chrom => Cow::Borrowed(&self.chrom),
            Column::Start => coordinate_text(self.start),
            Column::End => coordinate_text(self.end),
            Column::Location => Cow::Borrowed(&self.location),
            Column::Symbol => Cow::Borrowed(&self.symbol),
            Column::RefSeq => Cow::Borrowed(&self.refseq),
            Column::Ensembl => Cow::Borrowed(&self.ensembl),
            Column::Strand => Cow::Borrowed(&self.strand),
            Column::Version => Cow::Borrowed(self.version.name()),
        }
    }

    /// Closed-interval containment, `start <= pos <= end`.
    pub fn contains(&self, pos: i64) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= pos && pos <= end,
            _ => false,
        }
    }

    /// True when both records describe the same `(chrom, start, end)` interval.
    pub fn same_interval(&self, other: &Record) -> bool {
        self.chrom == other.chrom && self.start == other.start && self.end == other.end
    }
}

fn coordinate_text(value: Option<i64>) -> Cow<'static, str> {
    match value {
        Some(v) => Cow::Owned(v.to_string()),
        None => Cow::Borrowed(""),
    }
}

/// Splits resource text into records, skipping blank lines.
pub fn parse_records(text: &str, version: BuildVersion) -> Vec<Record> {
    text.split('\n')
        .filter(|line| !line.trim_end().is_empty())
        .map(|line| Record::from_bed_line(line, version))
        .collect()
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing garbage is ignored; no digits at all yields `None`. A digit run
/// too long for `i64` saturates instead of failing.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    // Only overflow can make an all-digit slice fail to parse.
    let value: i64 = digits[..len].parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
