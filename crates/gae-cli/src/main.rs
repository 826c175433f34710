//! gae CLI - link prediction on interaction networks from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Merge interaction tables into one edge list
//! gae combine Networks/ -o combined_network.txt --header-output combined_network_header.txt
//!
//! # Show statistics about an edge list
//! gae stats combined_network.txt
//!
//! # Export the network for Graphviz
//! gae export combined_network.txt --dot graph.dot
//!
//! # Train and report held-out ROC-AUC / AP
//! gae train combined_network.txt --epochs 200 --seed 123
//!
//! # Train from a TOML config, overriding one field
//! gae train combined_network.txt --config gae.toml --dropout 0.0
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gae_core::formats::{combine_networks, write_dot, write_pairs, CombineColumns};
use gae_core::Graph;
use gae_nn::candle_core::Device;
use gae_nn::training::{write_edges, write_predictions};
use gae_nn::{StopReason, TrainConfig, Trainer};
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gae")]
#[command(about = "Graph autoencoder link prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a two-layer GCN autoencoder and evaluate on held-out edges
    Train(TrainArgs),

    /// Show statistics about an edge list
    Stats {
        /// Input edge list
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export an edge list as a Graphviz DOT graph
    Export {
        /// Input edge list
        input: PathBuf,

        /// Output DOT file
        #[arg(long, default_value = "graph.dot")]
        dot: PathBuf,
    },

    /// Merge headered interaction tables into one edge list
    Combine {
        /// Directory of interaction tables
        dir: PathBuf,

        /// Output edge list (tab-separated, no header)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write a copy with a header row
        #[arg(long)]
        header_output: Option<PathBuf>,

        /// First interactor column
        #[arg(long, default_value = "UniProtName_A")]
        column_a: String,

        /// Second interactor column
        #[arg(long, default_value = "UniProtName_B")]
        column_b: String,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// Input edge list
    input: PathBuf,

    /// TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Number of epochs
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Units in the first hidden layer
    #[arg(long)]
    hidden1: Option<usize>,

    /// Embedding dimension
    #[arg(long)]
    hidden2: Option<usize>,

    /// Dropout rate in [0, 1)
    #[arg(long)]
    dropout: Option<f32>,

    /// Fraction of edges held out for validation
    #[arg(long)]
    val_fraction: Option<f64>,

    /// Fraction of edges held out for testing
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Where to save the model weights
    #[arg(long, default_value = "gae.safetensors")]
    checkpoint: PathBuf,

    /// Where to write per-test-edge scores
    #[arg(long, default_value = "test_predictions.txt")]
    predictions: PathBuf,

    /// Where to write the scored test edges
    #[arg(long, default_value = "test_edges.txt")]
    edges: PathBuf,
}

impl TrainArgs {
    fn config(&self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => TrainConfig::default(),
        };

        if let Some(v) = self.learning_rate {
            config.learning_rate = v;
        }
        if let Some(v) = self.epochs {
            config.epochs = v;
        }
        if let Some(v) = self.hidden1 {
            config.hidden1 = v;
        }
        if let Some(v) = self.hidden2 {
            config.hidden2 = v;
        }
        if let Some(v) = self.dropout {
            config.dropout = v;
        }
        if let Some(v) = self.val_fraction {
            config.val_fraction = v;
        }
        if let Some(v) = self.test_fraction {
            config.test_fraction = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => cmd_train(&args),
        Commands::Stats { input, json } => cmd_stats(&input, json),
        Commands::Export { input, dot } => cmd_export(&input, &dot),
        Commands::Combine {
            dir,
            output,
            header_output,
            column_a,
            column_b,
        } => cmd_combine(
            &dir,
            &output,
            header_output.as_deref(),
            CombineColumns {
                first: column_a,
                second: column_b,
            },
        ),
    }
}

fn load_graph(path: &Path) -> Result<Graph> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let graph =
        gae_core::load(path).with_context(|| format!("Failed to load {}", path.display()))?;

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

fn cmd_train(args: &TrainArgs) -> Result<()> {
    let config = args.config()?;
    let graph = load_graph(&args.input)?;

    let device = Device::Cpu;
    let mut trainer = Trainer::from_graph(&graph, config, &device)
        .context("Failed to prepare training data")?;

    let outcome = trainer.fit(|report| println!("{report}"))?;
    println!("Optimization Finished!");
    if outcome.stop_reason == StopReason::EpochBudget {
        println!(
            "Warning: loss threshold {} not reached after {} epochs",
            trainer.config().loss_threshold,
            outcome.history.len()
        );
    }

    let test = trainer.test_metrics()?;
    println!("Test ROC score: {:.5}", test.roc_auc);
    println!("Test AP score: {:.5}", test.average_precision);

    trainer
        .encoder()
        .save(&args.checkpoint)
        .with_context(|| format!("Failed to write {}", args.checkpoint.display()))?;

    let predictions = trainer.test_predictions()?;
    let file = File::create(&args.predictions)
        .with_context(|| format!("Failed to create {}", args.predictions.display()))?;
    write_predictions(&predictions, BufWriter::new(file))?;
    let file = File::create(&args.edges)
        .with_context(|| format!("Failed to create {}", args.edges.display()))?;
    write_edges(&predictions, BufWriter::new(file))?;

    info!(
        checkpoint = %args.checkpoint.display(),
        predictions = %args.predictions.display(),
        edges = %args.edges.display(),
        "wrote artifacts"
    );
    Ok(())
}

fn cmd_stats(input: &Path, json: bool) -> Result<()> {
    let graph = load_graph(input)?;
    let stats = graph.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Interaction Network Statistics");
    println!("==============================");
    println!("Nodes:          {}", stats.node_count);
    println!("Edges:          {}", stats.edge_count);
    println!("Min degree:     {}", stats.min_degree);
    println!("Max degree:     {}", stats.max_degree);
    println!("Mean degree:    {:.2}", stats.mean_degree);
    println!("Isolated nodes: {}", stats.isolated_nodes);

    Ok(())
}

fn cmd_export(input: &Path, output: &Path) -> Result<()> {
    let graph = load_graph(input)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    write_dot(&graph, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Exported {} nodes and {} edges -> {}",
        graph.node_count(),
        graph.edge_count(),
        output.display()
    );
    Ok(())
}

fn cmd_combine(
    dir: &Path,
    output: &Path,
    header_output: Option<&Path>,
    columns: CombineColumns,
) -> Result<()> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.retain(|p| p.is_file());
    paths.sort();

    let pairs = combine_networks(&paths, &columns)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    write_pairs(&pairs, BufWriter::new(file), None)?;

    if let Some(path) = header_output {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_pairs(&pairs, BufWriter::new(file), Some(&columns))?;
    }

    println!(
        "Combined {} tables into {} interactions -> {}",
        paths.len(),
        pairs.len(),
        output.display()
    );
    Ok(())
}
