//! Snapshot construction from works and resolved authors

use std::collections::BTreeMap;

use itertools::Itertools;
use rayon::prelude::*;

use crate::data::authors::AuthorTable;
use crate::data::works::{count_by_year, WorkRecord};
use crate::graph::{AuthorNode, CoauthorGraph};

/// Build the coauthorship graph of all works with `publication_year <= cutoff`.
///
/// Nodes are authors that appear in both the filtered works and the author
/// table; authors missing from the table are excluded even when works list
/// them. Works without a coerced year are dropped from the whole operation.
pub fn build_snapshot(
    works: &[WorkRecord],
    authors: &AuthorTable,
    cutoff_year: i32,
) -> CoauthorGraph {
    let filtered: Vec<&WorkRecord> = works
        .iter()
        .filter(|work| work.publication_year.is_some_and(|year| year <= cutoff_year))
        .collect();

    let mut graph = CoauthorGraph::new();

    for work in &filtered {
        for slot in &work.authors {
            if graph.contains(&slot.id) {
                continue;
            }
            if let Some(record) = authors.get(&slot.id) {
                graph.add_author(AuthorNode::from_record(record));
            }
        }
    }

    for work in &filtered {
        // Ids are deduplicated per work, so a repeated listing cannot
        // self-pair or double-count the same collaboration.
        let ids: Vec<&str> = work
            .authors
            .iter()
            .map(|slot| slot.id.as_str())
            .unique()
            .collect();
        for (a, b) in ids.iter().tuple_combinations() {
            graph.record_coauthorship(a, b);
        }
    }

    log::debug!(
        "snapshot <= {}: {} works, {} nodes, {} edges",
        cutoff_year,
        filtered.len(),
        graph.node_count(),
        graph.edge_count()
    );

    graph
}

/// Build one cumulative snapshot per year in `[start_year, end_year]` that
/// has a non-zero work count that year.
///
/// Snapshots are independent values and are built in parallel; the result is
/// identical to from-scratch construction per year.
pub fn build_year_series(
    works: &[WorkRecord],
    authors: &AuthorTable,
    start_year: i32,
    end_year: i32,
) -> BTreeMap<i32, CoauthorGraph> {
    let year_counts = count_by_year(works, start_year, end_year);
    let years: Vec<i32> = year_counts
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(&year, _)| year)
        .collect();

    log::info!(
        "Building {} snapshots for {}-{}",
        years.len(),
        start_year,
        end_year
    );

    years
        .into_par_iter()
        .map(|year| (year, build_snapshot(works, authors, year)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::authors::resolve_authors;
    use crate::data::decode::{decode_authorships, AuthorshipCells};

    fn work(year: i32, ids: &str) -> WorkRecord {
        WorkRecord {
            publication_year: Some(year),
            authors: decode_authorships(AuthorshipCells {
                ids: Some(ids),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn co_listed_pairs_weighted_by_work_count() {
        let works = vec![work(2020, "A1|A2|A3"), work(2021, "A1|A2")];
        let authors = resolve_authors(&works);
        let graph = build_snapshot(&works, &authors, 2021);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.coauthorship_weight("A1", "A2"), Some(2));
        assert_eq!(graph.coauthorship_weight("A1", "A3"), Some(1));
        assert_eq!(graph.coauthorship_weight("A2", "A3"), Some(1));
    }

    #[test]
    fn cutoff_filters_later_works() {
        let works = vec![work(2020, "A1|A2"), work(2022, "A2|A3")];
        let authors = resolve_authors(&works);
        let graph = build_snapshot(&works, &authors, 2020);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains("A1"));
        assert!(!graph.contains("A3"));
    }

    #[test]
    fn authors_missing_from_table_are_excluded() {
        let works = vec![work(2020, "A1|A2|A3")];
        let known = resolve_authors(&[work(2020, "A1|A2")]);
        let graph = build_snapshot(&works, &known, 2020);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.coauthorship_weight("A1", "A2"), Some(1));
        assert_eq!(graph.coauthorship_weight("A1", "A3"), None);
    }

    #[test]
    fn duplicate_listing_counts_once_per_work() {
        let works = vec![work(2020, "A1|A2|A1")];
        let authors = resolve_authors(&works);
        let graph = build_snapshot(&works, &authors, 2020);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.coauthorship_weight("A1", "A2"), Some(1));
    }

    #[test]
    fn rows_without_year_are_dropped() {
        let mut undated = work(2020, "A1|A2");
        undated.publication_year = None;
        let works = vec![undated, work(2020, "A2|A3")];
        let authors = resolve_authors(&works);
        let graph = build_snapshot(&works, &authors, 2020);

        assert!(!graph.contains("A1"));
        assert_eq!(graph.coauthorship_weight("A2", "A3"), Some(1));
    }

    #[test]
    fn series_skips_years_without_works() {
        let works = vec![work(2020, "A1|A2"), work(2022, "A2|A3")];
        let authors = resolve_authors(&works);
        let series = build_year_series(&works, &authors, 2019, 2023);

        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec![2020, 2022]);
        // Snapshots are cumulative
        assert_eq!(series[&2020].node_count(), 2);
        assert_eq!(series[&2022].node_count(), 3);
    }
}
