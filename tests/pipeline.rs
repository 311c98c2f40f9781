//! End-to-end pipeline: CSV exports to metrics and attack analysis

use std::fs;
use std::path::PathBuf;

use coauthor_graph_analyzer::attack::{analyze_attack, identify_hubs};
use coauthor_graph_analyzer::config::EigenvectorConfig;
use coauthor_graph_analyzer::data::authors::{resolve_author_ids, resolve_authors};
use coauthor_graph_analyzer::data::csv::{load_authors, load_works, save_authors};
use coauthor_graph_analyzer::data::works::count_by_year;
use coauthor_graph_analyzer::graph::builder::{build_snapshot, build_year_series};
use coauthor_graph_analyzer::metrics::{compute_metrics, DEGREES_KEY};

const WORKS_CSV: &str = "\
publication_year,authorships.author.id,authorships.author.display_name,authorships.author.orcid,authorships.countries,authorships.raw_author_name,authorships.institutions
2020,A1|A2|A3,Alice Santos|Bruno Lima|Carla Souza,0000-0001|None|None,BR|BR|US,\"Santos, A.|Lima, B.|Souza, C.\",\"{'id': 'I1', 'display_name': 'University of Examples', 'country_code': 'BR'}|None|None\"
2021,A1|A2,Alice Santos|Bruno Lima,0000-0001|None,BR|BR,\"Santos, A.|Lima, B.\",None
2022.0,A4,Dora Reis,None,PT,\"Reis, D.\",None
oops,A9,Bad Year,None,XX,\"Bad, Y.\",None
2021,None|A5,None|Edu Costa,None|None,None|BR,\"None|Costa, E.\",None
";

fn write_works_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("works.csv");
    fs::write(&path, WORKS_CSV).unwrap();
    path
}

#[test]
fn works_table_decodes_with_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let works = load_works(&write_works_csv(&dir)).unwrap();

    assert_eq!(works.len(), 5);
    // Float-formatted and unparseable years
    assert_eq!(works[2].publication_year, Some(2022));
    assert_eq!(works[3].publication_year, None);
    // Invalid identifier positions contribute no author
    assert_eq!(works[4].authors.len(), 1);
    assert_eq!(works[4].authors[0].id, "A5");
}

#[test]
fn author_resolution_and_table_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let works = load_works(&write_works_csv(&dir)).unwrap();

    let resolved = resolve_authors(&works);
    assert_eq!(resolved.len(), 6);
    assert_eq!(resolved.len(), resolve_author_ids(&works).len());

    let alice = resolved.get("A1").unwrap();
    assert_eq!(alice.display_name.as_deref(), Some("Alice Santos"));
    assert_eq!(alice.institution_id.as_deref(), Some("I1"));
    assert_eq!(
        alice.institution_display_name.as_deref(),
        Some("University of Examples")
    );
    assert_eq!(alice.raw_author_name.as_deref(), Some("Santos, A."));

    let authors_path = dir.path().join("authors.csv");
    save_authors(&resolved, &authors_path).unwrap();
    let reloaded = load_authors(&authors_path).unwrap();

    assert_eq!(reloaded.len(), resolved.len());
    assert_eq!(reloaded.get("A1"), resolved.get("A1"));
    assert_eq!(reloaded.get("A5"), resolved.get("A5"));
}

#[test]
fn year_series_builds_cumulative_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let works = load_works(&write_works_csv(&dir)).unwrap();
    let authors = resolve_authors(&works);

    let counts = count_by_year(&works, 2019, 2022);
    assert_eq!(counts[&2019], 0);
    assert_eq!(counts[&2020], 1);
    assert_eq!(counts[&2021], 2);
    assert_eq!(counts[&2022], 1);

    let series = build_year_series(&works, &authors, 2019, 2022);
    assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec![2020, 2021, 2022]);

    let snapshot = &series[&2021];
    assert_eq!(snapshot.node_count(), 4);
    assert_eq!(snapshot.coauthorship_weight("A1", "A2"), Some(2));
    assert_eq!(snapshot.coauthorship_weight("A1", "A3"), Some(1));
    assert_eq!(snapshot.coauthorship_weight("A2", "A3"), Some(1));
    // The row with an unparseable year never reaches a snapshot
    assert!(!series[&2022].contains("A9"));
    assert!(series[&2022].contains("A4"));
}

#[test]
fn metrics_feed_hub_attack() {
    let dir = tempfile::tempdir().unwrap();
    let works = load_works(&write_works_csv(&dir)).unwrap();
    let authors = resolve_authors(&works);

    let snapshot = build_snapshot(&works, &authors, 2021);
    let report = compute_metrics(&snapshot, EigenvectorConfig::default());

    assert_eq!(report.num_nodes, 4);
    assert_eq!(report.num_edges, 3);
    assert_eq!(report.largest_component_size, 3);

    let degrees = report.centrality_for(DEGREES_KEY).unwrap();
    let hubs = identify_hubs(&degrees, 1);
    assert_eq!(hubs, vec!["A1"]);

    let result = analyze_attack(&snapshot, &hubs);
    assert_eq!(result.before_attack.lcc_size, 3);
    assert_eq!(result.after_attack.lcc_size, 2);
    assert!(
        (result.impact.lcc_size_reduction_percent - 100.0 / 3.0).abs() < 1e-9
    );
    assert!(result.impact.global_efficiency_delta > 0.0);

    let unchanged = analyze_attack(&snapshot, &[]);
    assert_eq!(unchanged.before_attack, unchanged.after_attack);
}
