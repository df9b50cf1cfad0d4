use crate::{filter::FilterState, pager::total_pages};
use maneloca_protocol::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PageState {
    pub fn first(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_pages: 0,
        }
    }
}

/// Visible set and repaired page, produced together.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition<'a> {
    pub visible: Vec<&'a Record>,
    pub page: PageState,
}

/// Keeps `current_page` inside `[1, max(total_pages, 1)]`.
pub fn clamp_page(current_page: usize, total_pages: usize) -> usize {
    current_page.clamp(1, total_pages.max(1))
}

/// Filters `all`, narrows to the coordinate hit when `search_result` is
/// non-empty, then recomputes paging. Returns indices into `all`.
pub fn compose_indices(
    all: &[Record],
    filters: &FilterState,
    search_result: &[Record],
    current_page: usize,
    page_size: usize,
) -> (Vec<usize>, PageState) {
    let compiled = filters.compile();
    let visible: Vec<usize> = all
        .iter()
        .enumerate()
        .filter(|(_, record)| compiled.matches(record))
        .filter(|(_, record)| {
            search_result.is_empty() || search_result.iter().any(|hit| hit.same_interval(record))
        })
        .map(|(idx, _)| idx)
        .collect();

    let total = total_pages(visible.len(), page_size);
    let page = PageState {
        current_page: clamp_page(current_page, total),
        page_size,
        total_pages: total,
    };
    (visible, page)
}

pub fn compose<'a>(
    all: &'a [Record],
    filters: &FilterState,
    search_result: &[Record],
    current_page: usize,
    page_size: usize,
) -> Composition<'a> {
    let (indices, page) = compose_indices(all, filters, search_result, current_page, page_size);
    Composition {
        visible: indices.into_iter().map(|idx| &all[idx]).collect(),
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply_filters, pager::PAGE_SIZE};
    use maneloca_protocol::{BuildVersion, Column};

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let chrom = if i % 2 == 0 { "chr1" } else { "chr2" };
                let start = (i as i64) * 100 + 1;
                Record::from_bed_line(
                    &format!("{chrom}\t{start}\t{}\texon{i}\tGENE{i}", start + 99),
                    BuildVersion::GRCh37,
                )
            })
            .collect()
    }

    #[test]
    fn test_no_constraints_keeps_everything() {
        let all = records(45);
        let c = compose(&all, &FilterState::new(), &[], 1, PAGE_SIZE);
        assert_eq!(c.visible.len(), 45);
        assert_eq!(c.page.total_pages, 3);
        assert_eq!(c.page.current_page, 1);
    }

    #[test]
    fn test_search_narrows_within_filtered_set() {
        let all = records(10);
        let hit = vec![all[4].clone()];
        let c = compose(&all, &FilterState::new(), &hit, 1, PAGE_SIZE);
        assert_eq!(c.visible, vec![&all[4]]);

        let mut filters = FilterState::new();
        filters.set_needle(Column::Chrom, "chr2");
        let c = compose(&all, &filters, &hit, 1, PAGE_SIZE);
        assert!(c.visible.is_empty());
        assert_eq!(c.page.current_page, 1);
    }

    #[test]
    fn test_search_matches_on_interval_triple() {
        let all = records(3);
        let mut twin = all[1].clone();
        twin.symbol = "OTHER".to_string();
        let c = compose(&all, &FilterState::new(), &[twin], 1, PAGE_SIZE);
        assert_eq!(c.visible, vec![&all[1]]);
    }

    #[test]
    fn test_page_is_clamped_when_result_shrinks() {
        let all = records(45);
        let mut filters = FilterState::new();
        filters.set_needle(Column::Chrom, "chr1");
        let c = compose(&all, &filters, &[], 3, PAGE_SIZE);
        assert_eq!(c.visible.len(), 23);
        assert_eq!(c.page.total_pages, 2);
        assert_eq!(c.page.current_page, 2);
    }

    #[test]
    fn test_empty_result_resets_page_to_one() {
        let all = records(45);
        let mut filters = FilterState::new();
        filters.set_needle(Column::Symbol, "nothing-like-this");
        let c = compose(&all, &filters, &[], 3, PAGE_SIZE);
        assert!(c.visible.is_empty());
        assert_eq!(c.page.total_pages, 0);
        assert_eq!(c.page.current_page, 1);
    }

    #[test]
    fn test_compose_agrees_with_apply_filters() {
        let all = records(30);
        let mut filters = FilterState::new();
        filters.set_needle(Column::Location, "exon1");
        let c = compose(&all, &filters, &[], 1, PAGE_SIZE);
        assert_eq!(c.visible, apply_filters(&all, &filters));
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(4, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 0), 1);
    }
}
