use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use coauthor_graph_analyzer::attack::{self, HubMetric, HubSelection};
use coauthor_graph_analyzer::config::Config;
use coauthor_graph_analyzer::data;
use coauthor_graph_analyzer::graph::builder::{build_snapshot, build_year_series};
use coauthor_graph_analyzer::metrics::compute_metrics;
use coauthor_graph_analyzer::storage;

#[derive(Parser, Debug)]
#[clap(
    name = "coauthor-graph-analyzer",
    about = "Coauthorship network construction, metrics and hub-robustness analysis"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0", global = true)]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one coauthorship graph per year and export GEXF snapshots
    Networks {
        /// Path to the works CSV export
        #[clap(long)]
        works: PathBuf,

        /// Path to the resolved authors CSV
        #[clap(long)]
        authors: PathBuf,

        /// Output directory for GEXF snapshots and the series summary
        #[clap(long, default_value = "network_results")]
        output_dir: PathBuf,

        /// First snapshot year (inclusive)
        #[clap(long, default_value_t = Config::default().start_year)]
        start_year: i32,

        /// Last snapshot year (inclusive)
        #[clap(long, default_value_t = Config::default().end_year)]
        end_year: i32,
    },

    /// Extract the unique author table of a works CSV
    Authors {
        /// Path to the works CSV export
        #[clap(long)]
        works: PathBuf,

        /// Output path for the resolved author table CSV
        #[clap(long)]
        output: PathBuf,
    },

    /// Compute structural metrics for one year snapshot
    Metrics {
        /// Path to the works CSV export
        #[clap(long)]
        works: PathBuf,

        /// Path to the resolved authors CSV
        #[clap(long)]
        authors: PathBuf,

        /// Snapshot cutoff year (works up to and including this year)
        #[clap(long)]
        year: i32,

        /// Output path for the metrics report JSON
        #[clap(long)]
        output: PathBuf,
    },

    /// Identify hubs, simulate their removal and analyze robustness
    Attack {
        /// Path to the works CSV export
        #[clap(long)]
        works: PathBuf,

        /// Path to the resolved authors CSV
        #[clap(long)]
        authors: PathBuf,

        /// Snapshot cutoff year (works up to and including this year)
        #[clap(long)]
        year: i32,

        /// Previously computed metrics report JSON (centrality source)
        #[clap(long)]
        metrics: PathBuf,

        /// Centrality metric used to identify hubs
        #[clap(long, default_value = "degree", value_parser = parse_metric)]
        metric: HubMetric,

        /// Number of hubs to remove
        #[clap(long, default_value_t = Config::default().num_hubs)]
        num_hubs: usize,

        /// Restrict hub identification to the largest connected component
        #[clap(long)]
        lcc_only: bool,

        /// Output path for the attack analysis JSON
        #[clap(long)]
        output: PathBuf,
    },
}

fn parse_metric(value: &str) -> Result<HubMetric, String> {
    value.parse()
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = Config::default();

    match args.command {
        Command::Networks {
            works,
            authors,
            output_dir,
            start_year,
            end_year,
        } => {
            let works = data::csv::load_works(&works)?;
            let author_table = data::csv::load_authors(&authors)?;

            let year_counts = data::works::count_by_year(&works, start_year, end_year);
            let series = build_year_series(&works, &author_table, start_year, end_year);

            fs::create_dir_all(&output_dir)?;
            for (year, snapshot) in &series {
                let path = output_dir.join(format!("coauthorship_{year}.gexf"));
                storage::gexf::write_gexf(snapshot, &path)?;
            }
            storage::save_series_summary(&series, &year_counts, &output_dir)?;

            log::info!(
                "Built {} snapshots. Results saved to {}",
                series.len(),
                output_dir.display()
            );
        }

        Command::Authors { works, output } => {
            let works = data::csv::load_works(&works)?;
            let table = data::authors::resolve_authors(&works);
            log::info!("Resolved {} unique authors", table.len());
            data::csv::save_authors(&table, &output)?;
        }

        Command::Metrics {
            works,
            authors,
            year,
            output,
        } => {
            let works = data::csv::load_works(&works)?;
            let author_table = data::csv::load_authors(&authors)?;

            let snapshot = build_snapshot(&works, &author_table, year);
            let report = compute_metrics(&snapshot, config.eigenvector);
            storage::save_metrics_report(&report, &output)?;
        }

        Command::Attack {
            works,
            authors,
            year,
            metrics,
            metric,
            num_hubs,
            lcc_only,
            output,
        } => {
            let works = data::csv::load_works(&works)?;
            let author_table = data::csv::load_authors(&authors)?;
            let snapshot = build_snapshot(&works, &author_table, year);

            let report = storage::load_metrics_report(&metrics)?;
            let mut centrality = report.centrality_for(metric.report_key()).with_context(|| {
                format!(
                    "metric '{}' is not available in {}",
                    metric,
                    metrics.display()
                )
            })?;

            let analysis_scope = if lcc_only {
                log::info!("Restricting hub identification to the LCC");
                centrality = attack::restrict_to_lcc(&centrality, &snapshot);
                "Largest Connected Component (LCC)"
            } else {
                "General Graph"
            };

            let hubs = attack::identify_hubs(&centrality, num_hubs);
            log::info!("Identified {} hubs by {} centrality", hubs.len(), metric);

            let mut result = attack::analyze_attack(&snapshot, &hubs);
            result.hubs_removed_info = Some(HubSelection {
                metric_used: metric.name().to_string(),
                analysis_scope: analysis_scope.to_string(),
                num_hubs_requested: num_hubs,
                hubs_ids: hubs,
            });

            storage::save_attack_result(&result, &output)?;
            log::info!(
                "LCC size reduction: {:.2}%",
                result.impact.lcc_size_reduction_percent
            );
        }
    }

    Ok(())
}
