use maneloca_protocol::{parse_int_prefix, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `chrom:pos` lookup as typed into the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateQuery {
    pub chrom: String,
    pub pos: i64,
}

impl CoordinateQuery {
    pub fn new(chrom: impl Into<String>, pos: i64) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
        }
    }

    /// Parses `chr7:55242465`. Returns `None` for anything without a
    /// chromosome and a leading integer after the colon; callers treat that
    /// as "clear the search".
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.trim().split(':');
        let chrom = parts.next()?.trim();
        let pos = parse_int_prefix(parts.next()?)?;
        if chrom.is_empty() {
            return None;
        }
        Some(Self::new(chrom, pos))
    }

    /// Only queries with a chromosome and a positive position search anything.
    pub fn is_active(&self) -> bool {
        !self.chrom.is_empty() && self.pos > 0
    }
}

impl fmt::Display for CoordinateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

/// Finds the interval on `chrom` containing `pos` whose start lies closest to
/// `pos`. Equal distances keep the first record in input order.
pub fn locate<'a>(records: &'a [Record], chrom: &str, pos: i64) -> Option<&'a Record> {
    if chrom.is_empty() || pos <= 0 {
        return None;
    }
    records
        .iter()
        .filter(|record| record.chrom == chrom && record.contains(pos))
        .min_by_key(|record| record.start.map_or(u64::MAX, |start| pos.abs_diff(start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maneloca_protocol::BuildVersion;
    use proptest::prelude::*;

    fn rec(chrom: &str, start: i64, end: i64, location: &str) -> Record {
        Record::from_bed_line(
            &format!("{chrom}\t{start}\t{end}\t{location}"),
            BuildVersion::GRCh38,
        )
    }

    #[test]
    fn test_nearest_start_wins() {
        let records = vec![rec("chr7", 100, 200, "outer"), rec("chr7", 150, 160, "inner")];
        let hit = locate(&records, "chr7", 155).unwrap();
        assert_eq!(hit.location, "inner");
    }

    #[test]
    fn test_ties_keep_first_record() {
        let records = vec![rec("chr1", 10, 50, "a"), rec("chr1", 10, 20, "b")];
        assert_eq!(locate(&records, "chr1", 15).unwrap().location, "a");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let records = vec![rec("chr2", 100, 200, "x")];
        assert!(locate(&records, "chr2", 100).is_some());
        assert!(locate(&records, "chr2", 200).is_some());
        assert!(locate(&records, "chr2", 201).is_none());
    }

    #[test]
    fn test_chrom_must_match_exactly() {
        let records = vec![rec("chr2", 100, 200, "x")];
        assert!(locate(&records, "2", 150).is_none());
        assert!(locate(&records, "chr22", 150).is_none());
    }

    #[test]
    fn test_inactive_queries_return_nothing() {
        let records = vec![rec("chr2", 0, 200, "x")];
        assert!(locate(&records, "", 0).is_none());
        assert!(locate(&records, "chr2", 0).is_none());
        assert!(locate(&records, "chr2", -5).is_none());
    }

    #[test]
    fn test_records_without_coordinates_never_match() {
        let records = vec![Record::from_bed_line("chr1\tNaN\t500", BuildVersion::GRCh37)];
        assert!(locate(&records, "chr1", 10).is_none());
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            CoordinateQuery::parse("chr7:55242465"),
            Some(CoordinateQuery::new("chr7", 55242465))
        );
        assert_eq!(
            CoordinateQuery::parse(" chrX:12abc "),
            Some(CoordinateQuery::new("chrX", 12))
        );
        assert_eq!(CoordinateQuery::parse("chr7"), None);
        assert_eq!(CoordinateQuery::parse(":100"), None);
        assert_eq!(CoordinateQuery::parse("chr7:abc"), None);
        assert_eq!(CoordinateQuery::new("chr1", 5).to_string(), "chr1:5");
    }

    #[test]
    fn test_query_activity() {
        assert!(CoordinateQuery::new("chr1", 1).is_active());
        assert!(!CoordinateQuery::new("chr1", 0).is_active());
        assert!(!CoordinateQuery::new("", 10).is_active());
    }

    proptest! {
        #[test]
        fn prop_locate_returns_a_minimal_enclosing_interval(
            intervals in prop::collection::vec((0i64..300, 0i64..300, any::<bool>()), 0..30),
            pos in -5i64..320,
        ) {
            let records: Vec<Record> = intervals
                .iter()
                .map(|(a, b, other)| {
                    let chrom = if *other { "chr2" } else { "chr1" };
                    rec(chrom, *a.min(b), *a.max(b), "x")
                })
                .collect();
            match locate(&records, "chr1", pos) {
                Some(hit) => {
                    prop_assert!(pos > 0);
                    prop_assert_eq!(hit.chrom.as_str(), "chr1");
                    prop_assert!(hit.contains(pos));
                    let best = pos.abs_diff(hit.start.unwrap());
                    for record in records.iter().filter(|r| r.chrom == "chr1" && r.contains(pos)) {
                        prop_assert!(best <= pos.abs_diff(record.start.unwrap()));
                    }
                }
                None => {
                    if pos > 0 {
                        prop_assert!(!records.iter().any(|r| r.chrom == "chr1" && r.contains(pos)));
                    }
                }
            }
        }
    }
}
