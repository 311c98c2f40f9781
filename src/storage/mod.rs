//! Results persistence module

pub mod gexf;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::attack::AttackResult;
use crate::graph::CoauthorGraph;
use crate::metrics::MetricsReport;

fn write_pretty_json(value: &impl serde::Serialize, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Save a metrics report as pretty-printed JSON
pub fn save_metrics_report(report: &MetricsReport, path: &Path) -> Result<()> {
    write_pretty_json(report, path)?;
    log::info!("Metrics report saved to {}", path.display());
    Ok(())
}

/// Reload a previously computed metrics report
pub fn load_metrics_report(path: &Path) -> Result<MetricsReport> {
    let contents = fs::read_to_string(path)?;
    let report = serde_json::from_str(&contents)?;
    log::info!("Metrics report loaded from {}", path.display());
    Ok(report)
}

/// Save an attack analysis result as pretty-printed JSON
pub fn save_attack_result(result: &AttackResult, path: &Path) -> Result<()> {
    write_pretty_json(result, path)?;
    log::info!("Attack analysis saved to {}", path.display());
    Ok(())
}

/// Save per-year work counts and snapshot sizes alongside a graph series
pub fn save_series_summary(
    series: &BTreeMap<i32, CoauthorGraph>,
    year_counts: &BTreeMap<i32, usize>,
    output_dir: &Path,
) -> Result<()> {
    let summary = json!({
        "works_per_year": year_counts,
        "snapshots": series.iter().map(|(year, graph)| {
            json!({
                "year": year,
                "node_count": graph.node_count(),
                "edge_count": graph.edge_count(),
            })
        }).collect::<Vec<_>>(),
    });

    let path = output_dir.join("summary.json");
    write_pretty_json(&summary, &path)?;
    log::info!("Series summary saved to {}", path.display());
    Ok(())
}
