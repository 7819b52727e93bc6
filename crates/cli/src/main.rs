//! # txstream-cli
//!
//! Streams a transaction dataset through a predictive model and writes
//! aligned (timestamp, actual, prediction, anomaly score) tuples to an
//! output file, or renders them as a live chart with `--plot`.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stream_facade::{
    CsvRecordSource, FileOutput, ModelParams, OutputSink, PriorValueModel, RunConfig,
    StreamRunner,
};
use txstream_tui::PlotOutput;

#[derive(Parser)]
#[command(name = "txstream")]
#[command(about = "Streaming transaction anomaly pipeline", long_about = None)]
struct Cli {
    /// Dataset name; keys both <dataset>.csv and its model params
    dataset: String,

    /// Render a live chart instead of writing an output file
    #[arg(long)]
    plot: bool,

    /// Directory containing <dataset>.csv
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory containing <dataset>_model_params.json
    #[arg(long, default_value = "model_params")]
    model_params_dir: PathBuf,

    /// Rolling window size for error metrics
    #[arg(long, default_value = "1000")]
    window: usize,

    /// Prediction horizon whose values are emitted
    #[arg(long, default_value = "1")]
    horizon: usize,

    /// Emit raw (future-step) predictions without lag correction
    #[arg(long)]
    no_shift: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The live chart owns the terminal; keep logging out of its way.
    if !cli.plot {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let mut config = RunConfig::new(cli.dataset);
    config.data_dir = cli.data_dir;
    config.model_params_dir = cli.model_params_dir;
    config.metric_window = cli.window;
    config.primary_horizon = cli.horizon;
    config.align = !cli.no_shift;

    let params = ModelParams::load(&config.model_params_dir, &config.dataset)?;
    let target = params.predicted_field().unwrap_or("class").to_string();

    tracing::info!(dataset = %config.dataset, target = %target, "creating model");
    let model = PriorValueModel::from_params(&params, config.primary_horizon);

    let input = config.input_path();
    let source = CsvRecordSource::open(&input, &target)?;

    let sink: Box<dyn OutputSink> = if cli.plot {
        Box::new(PlotOutput::new(&config.dataset)?)
    } else {
        let output = config.output_path();
        tracing::info!(path = %output.display(), "writing output file");
        Box::new(FileOutput::create(&output)?)
    };

    let summary = StreamRunner::new(source, model, sink)
        .with_primary_horizon(config.primary_horizon)
        .with_metrics(config.default_metrics(&target))
        .with_alignment(config.align)
        .run()?;

    println!("Processed {} records.", summary.records);
    for (name, value) in &summary.metrics {
        println!("  {} = {:.6}", name, value);
    }

    Ok(())
}
