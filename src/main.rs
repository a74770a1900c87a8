use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use emotion_prep::cli::{Cli, Command, InspectArgs, PrepareArgs, SplitArgs};
use emotion_prep::{CorpusTable, DatasetBuilder, LabeledTableDataset};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Prepare(args) => handle_prepare(&args),
        Command::Inspect(args) => handle_inspect(&args),
        Command::Split(args) => handle_split(&args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_prepare(args: &PrepareArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    println!("Input root: {:?}", config.input_root);
    println!("Output:     {:?}", config.output_path());
    println!(
        "Features:   {} MFCCs at {} Hz ({} resampling)",
        config.n_mfcc, config.sample_rate, config.resample_mode
    );

    let builder =
        DatasetBuilder::from_config(&config).context("Failed to configure dataset builder")?;
    let report = builder.build().context("Failed to build feature table")?;

    println!(
        "\nProcessed {}/{} files successfully across {} actor directories",
        report.extracted, report.audio_files, report.actors
    );
    if report.skipped() > 0 {
        println!(
            "Skipped {} malformed, {} unrecognized, {} failed",
            report.malformed, report.unrecognized, report.failed
        );
    }
    let artifact = report
        .artifact
        .as_deref()
        .unwrap_or_else(|| builder.output_path());
    println!("Saved features to {:?}", artifact);

    let table = CorpusTable::load(artifact).context("Failed to reload feature table")?;
    print_preview(&table, args.preview);
    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let table = CorpusTable::load(&args.artifact)
        .with_context(|| format!("Failed to load feature table {:?}", args.artifact))?;
    print_summary(&args.artifact, &table);
    print_preview(&table, args.rows);
    Ok(())
}

fn handle_split(args: &SplitArgs) -> Result<()> {
    let options = args.dataset_options()?;
    let dataset = LabeledTableDataset::open_with(&args.artifact, options)
        .with_context(|| format!("Failed to open dataset {:?}", args.artifact))?;

    println!(
        "Split {}: {} rows, {} features per row",
        dataset.split().as_str(),
        dataset.len(),
        dataset.feature_dim()
    );
    for (id, label) in dataset.labels().iter().enumerate() {
        println!("  {:>2} -> {}", id, label);
    }
    Ok(())
}

fn print_summary(path: &Path, table: &CorpusTable) {
    println!("Table {:?}", path);
    println!(
        "  {} rows, {} features per row",
        table.len(),
        table.feature_dim().unwrap_or(0)
    );
    for (label, count) in table.label_counts() {
        println!("  {:<10} {}", label, count);
    }
}

fn print_preview(table: &CorpusTable, rows: usize) {
    let head = table.head(rows);
    if head.is_empty() {
        return;
    }
    println!("\n{:<4} {:<10} {:<48} features", "row", "label", "file");
    for (index, row) in head.iter().enumerate() {
        let leading: Vec<String> = row
            .features
            .iter()
            .take(3)
            .map(|value| format!("{:.3}", value))
            .collect();
        println!(
            "{:<4} {:<10} {:<48} [{}, ...]",
            index,
            row.label,
            row.file,
            leading.join(", ")
        );
    }
}
