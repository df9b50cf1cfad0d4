use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Field of a [`crate::Record`] that can be displayed, filtered, or exported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Chrom,
    Start,
    End,
    Location,
    Symbol,
    RefSeq,
    Ensembl,
    Strand,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown column '{0}'")]
pub struct UnknownColumn(pub String);

impl Column {
    /// Record field order, which is also the export column order.
    pub const ALL: [Column; 9] = [
        Column::Chrom,
        Column::Start,
        Column::End,
        Column::Location,
        Column::Symbol,
        Column::RefSeq,
        Column::Ensembl,
        Column::Strand,
        Column::Version,
    ];

    /// Columns shown in the table. The build tag is implied by the page.
    pub const TABLE: [Column; 8] = [
        Column::Chrom,
        Column::Start,
        Column::End,
        Column::Location,
        Column::Symbol,
        Column::RefSeq,
        Column::Ensembl,
        Column::Strand,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Chrom => "chrom",
            Self::Start => "start",
            Self::End => "end",
            Self::Location => "location",
            Self::Symbol => "symbol",
            Self::RefSeq => "refseq",
            Self::Ensembl => "ensembl",
            Self::Strand => "strand",
            Self::Version => "version",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Self::Chrom => "Chrom",
            Self::Start => "Start",
            Self::End => "End",
            Self::Location => "Location",
            Self::Symbol => "Symbol",
            Self::RefSeq => "RefSeq",
            Self::Ensembl => "Ensembl",
            Self::Strand => "Strand",
            Self::Version => "Version",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}
