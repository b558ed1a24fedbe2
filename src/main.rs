use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use coauthor_graph_analyzer::analytics::{collaboration_distances, page_rank, PageRankConfig};
use coauthor_graph_analyzer::cluster::cliques::maximal_cliques;
use coauthor_graph_analyzer::cluster::detection::{louvain, LouvainConfig};
use coauthor_graph_analyzer::cluster::metrics::{
    calculate_metrics, closeness_by_degree, closeness_centrality, community_report, local_clustering,
    top_scores,
};
use coauthor_graph_analyzer::config::Config;
use coauthor_graph_analyzer::data::{self, full_id, short_id};
use coauthor_graph_analyzer::graph::algorithms::{filter_by_min_degree, largest_component};
use coauthor_graph_analyzer::graph::{build_collaboration_graph, CollaborationGraph};
use coauthor_graph_analyzer::storage::{self, report};
use coauthor_graph_analyzer::viz;

#[derive(Parser, Debug)]
#[clap(
    name = "coauthor-graph-analyzer",
    about = "Co-authorship graph analysis of DBLP author data"
)]
struct Cli {
    /// Directory holding author dumps and the graph snapshot
    #[clap(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output directory for reports
    #[clap(long, default_value = "results")]
    results_dir: PathBuf,

    /// Snapshot file name inside the data directory (`.json`, otherwise bincode)
    #[clap(long, default_value = "colab_graph.json")]
    graph_file: String,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the collaboration graph from an author dump and save a snapshot
    Build {
        /// Author dump (`.json` map of authors or `.parquet` authorship rows)
        #[clap(long)]
        input: Option<PathBuf>,
    },

    /// Whole-graph metrics, degree, clustering and closeness reports
    Metrics {
        /// Drop authors with fewer coauthors before measuring
        #[clap(long, default_value = "0")]
        min_degree: usize,

        /// Authors listed per score in the log
        #[clap(long, default_value = "10")]
        top: usize,
    },

    /// Weighted PageRank of every author
    Pagerank {
        /// Damping factor
        #[clap(long, default_value = "0.85")]
        d: f64,

        /// Mean absolute change below which iteration stops
        #[clap(long, default_value = "0.0005")]
        alpha: f64,

        /// Iteration cap
        #[clap(long, default_value = "1000")]
        max_iterations: usize,
    },

    /// Collaboration distance of every author from one source author
    Erdos {
        /// Author id, with or without the `homepages/` prefix
        id: String,
    },

    /// Louvain communities of the largest component and their metrics
    Communities {
        /// Modularity resolution
        #[clap(long, default_value = "1.0")]
        resolution: f64,

        /// Smallest community included in the report
        #[clap(long, default_value = "2")]
        min_size: usize,

        /// Drop authors with fewer coauthors before detection
        #[clap(long, default_value = "0")]
        min_degree: usize,
    },

    /// Maximal cliques of collaborating authors in the largest component
    Cliques {
        /// Smallest clique reported [default: 4]
        #[clap(long)]
        min_size: Option<usize>,
    },

    /// Export the graph as GraphML
    Graphml {
        /// Annotate nodes with their Louvain community
        #[clap(long)]
        communities: bool,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let snapshot = args.data_dir.join(&args.graph_file);
    let results = args.results_dir.as_path();

    match args.command {
        Command::Build { input } => {
            let input = input.unwrap_or_else(|| args.data_dir.join("authors.json"));
            build(&input, &snapshot)?;
        }
        Command::Metrics { min_degree, top } => {
            let graph = load(&snapshot, min_degree)?;
            metrics(&graph, &Config::default(), top, results)?;
        }
        Command::Pagerank { d, alpha, max_iterations } => {
            let config = Config::new(d, alpha, max_iterations);
            config.validate()?;
            let graph = load(&snapshot, 0)?;
            let ranks = page_rank(&graph, &PageRankConfig::from(&config))?;
            report::write_rank_report(&graph, &ranks, &config.profile_host, results.join("pagerank.csv"))?;
        }
        Command::Erdos { id } => {
            let config = Config::default();
            let graph = load(&snapshot, 0)?;
            let source = full_id(&id);
            let distances = collaboration_distances(&graph, &source)?;
            log::info!(
                "{} of {} authors are connected to {}, farthest at distance {}",
                distances.len(),
                graph.node_count(),
                source,
                distances.eccentricity()
            );
            let file = format!("erdos_{}.csv", short_id(&source).replace('/', "_"));
            report::write_distance_report(&graph, &distances, &config.profile_host, results.join(file))?;
        }
        Command::Communities { resolution, min_size, min_degree } => {
            let config = Config {
                resolution,
                ..Config::default()
            };
            config.validate()?;
            let graph = largest_component(&load(&snapshot, min_degree)?);
            let partition = louvain(&graph, &LouvainConfig::from(&config));
            let summary = community_report(&graph, &partition, min_size);
            log::info!(
                "{} communities with at least {} authors, modularity {:.4}",
                summary.communities.len(),
                min_size,
                summary.modularity
            );
            report::write_community_report(&summary, results.join("communities.json"))?;
        }
        Command::Cliques { min_size } => {
            let config = Config::default();
            let graph = largest_component(&load(&snapshot, 0)?);
            let cliques = maximal_cliques(&graph, min_size.unwrap_or(config.min_clique_size));
            report::write_clique_report(&graph, &cliques, results.join("cliques.csv"))?;
        }
        Command::Graphml { communities } => {
            let graph = load(&snapshot, 0)?;
            let partition = communities.then(|| louvain(&graph, &LouvainConfig::default()));
            viz::write_graphml(&graph, partition.as_ref(), results.join("colab_graph.graphml"))?;
        }
    }

    log::info!("Done");
    Ok(())
}

fn build(input: &Path, snapshot: &Path) -> Result<()> {
    log::info!("Loading authors from {}", input.display());
    let is_parquet = input
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));
    let store = if is_parquet {
        let path = input.to_str().context("parquet path is not valid UTF-8")?;
        data::parquet::load_authorships(path)?
    } else {
        data::json::load_author_store(input)?
    };
    log::info!(
        "Loaded {} authors with {} authorships",
        store.len(),
        store.authorship_count()
    );

    let graph = build_collaboration_graph(&store);
    storage::save_graph(&graph, snapshot)?;
    Ok(())
}

fn load(snapshot: &Path, min_degree: usize) -> Result<CollaborationGraph> {
    let graph = storage::load_graph(snapshot)
        .with_context(|| format!("run `build` first to create {}", snapshot.display()))?;
    if min_degree > 0 {
        Ok(filter_by_min_degree(&graph, min_degree))
    } else {
        Ok(graph)
    }
}

fn metrics(graph: &CollaborationGraph, config: &Config, top: usize, results: &Path) -> Result<()> {
    let whole = calculate_metrics(graph);
    log::info!(
        "Graph: {} authors, {} edges, average degree {:.2}, clustering {:.4}",
        whole.n,
        whole.m,
        whole.av_degree,
        whole.clustering_coefficient
    );

    let component = largest_component(graph);
    let component_metrics = calculate_metrics(&component);
    report::write_metrics_summary(&whole, &component_metrics, results.join("metrics.json"))?;

    let host = &config.profile_host;
    report::write_degree_report(graph, host, results.join("degree.csv"))?;
    report::write_degree_distribution(graph, results.join("degree_distrib.csv"))?;

    let clustering = local_clustering(graph);
    report::write_score_report(graph, &clustering, "cc", true, host, results.join("clustering.csv"))?;

    let closeness = closeness_centrality(graph);
    for score in top_scores(graph, &closeness, top) {
        log::info!("closeness {:.4} {} ({})", score.value, score.name, score.id);
    }
    report::write_score_report(graph, &closeness, "closeness", false, host, results.join("closeness.csv"))?;
    report::write_closeness_histogram(
        &closeness_by_degree(graph, &closeness),
        results.join("histogram_closeness.csv"),
    )?;

    Ok(())
}
