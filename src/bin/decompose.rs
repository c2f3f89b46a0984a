use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use polygon_plot::{convert, io, logging, partition};
use tracing::info;

/// Convex decomposition of a simple polygon.
/// Writes the polygon, the split and the merged result as segment files
/// `<output>1.txt`, `<output>2.txt` and `<output>3.txt`.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// polygon base name, `<input>.txt` is read
    #[clap(short, long, default_value = "input")]
    input: String,

    /// prefix of the three output base names
    #[clap(short, long, default_value = "output")]
    output: String,

    /// timing log, one `vertices seconds` line is appended per run
    #[clap(short, long, default_value = "analysis.txt")]
    analysis: String,

    /// also render every output as png
    #[clap(long)]
    plot: bool,

    /// debug logging, unless RUST_LOG says otherwise
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let polygon = io::read_polygon_file(&args.input)?;
    let start = Instant::now();
    let result = partition::decompose(polygon)?;
    let elapsed = start.elapsed().as_secs_f64();
    info!(seconds = elapsed, "decomposition finished");

    let stages = [&result.polygon, &result.split, &result.merged];
    for (i, dcel) in stages.iter().enumerate() {
        let base = format!("{}{}", args.output, i + 1);
        io::save_segment_file(&base, &dcel.to_segment_file())?;
        if args.plot {
            convert(&base, polygon_plot::render::DEFAULT_WIDTH, polygon_plot::render::DEFAULT_HEIGHT)
                .with_context(|| format!("plotting {base}"))?;
        }
    }
    io::append_timing(&args.analysis, result.polygon.nvertices(), elapsed)?;
    Ok(())
}
