extern crate hipe_features;

use anyhow::anyhow;
use clap::Parser;
use hipe_features::core::aggregation::AggregationLevel;
use hipe_features::{run_pipeline, ExtractionVariant, RunConfig};
use std::path::PathBuf;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct HipeArgs {
    /// Directory the HIPE archive is downloaded to and output archives are
    /// written to
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Window size to aggregate over: minute, 10minutes, 15minutes, 1hour
    /// or 1day; repeat for several runs (default: 15minutes and 1hour)
    #[arg(long = "aggregation", value_name = "LEVEL")]
    aggregations: Vec<String>,
    /// Which rows to extract from: all or only-on; repeat for several runs
    /// (default: both)
    #[arg(long = "variant", value_name = "VARIANT")]
    variants: Vec<String>,
    /// Number of worker threads for the feature calculation
    #[arg(long, default_value_t = 1)]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = HipeArgs::parse();
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let defaults = RunConfig::default();
    let aggregations = if args.aggregations.is_empty() {
        defaults.aggregations
    } else {
        args.aggregations
            .iter()
            .map(|level| {
                level
                    .parse::<AggregationLevel>()
                    .map_err(|_| anyhow!("Unsupported aggregation level '{level}'."))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    let variants = if args.variants.is_empty() {
        defaults.variants
    } else {
        args.variants
            .iter()
            .map(|variant| {
                variant
                    .parse::<ExtractionVariant>()
                    .map_err(|_| anyhow!("Unsupported extraction variant '{variant}'."))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    run_pipeline(&RunConfig {
        data_dir: args.data_dir,
        aggregations,
        variants,
    })?;

    Ok(())
}
