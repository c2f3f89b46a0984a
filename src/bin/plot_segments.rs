use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use polygon_plot::config::Config;
use polygon_plot::{convert_all, logging};
use tracing::info;

/// Plots segment files `<base>.txt` as `<base>.png`: red vertices, blue edges
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// base names to convert, defaults to output1 output2 output3
    inputs: Vec<String>,

    /// JSON config file, command line options take precedence
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// image width in pixels
    #[clap(long)]
    width: Option<u32>,

    /// image height in pixels
    #[clap(long)]
    height: Option<u32>,

    /// convert inputs in parallel
    #[clap(short, long)]
    parallel: bool,

    /// debug logging, unless RUST_LOG says otherwise
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let config = config.with_overrides(args.inputs, args.width, args.height, args.parallel);

    let results = convert_all(&config);
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!(converted = results.len() - failed, failed, "done");
    if failed > 0 {
        bail!("{failed} of {} inputs could not be plotted", results.len());
    }
    Ok(())
}
