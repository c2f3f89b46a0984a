use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, error, info};

pub mod io;

pub mod geometry;
pub mod dcel;
pub mod partition;

pub mod render;
use render::{Canvas, Plot};

pub mod config;
use config::Config;

pub mod logging;

mod error;
pub use error::{Error, ParseError, Result};

/// Reads `<base>.txt`, draws it on a fresh canvas and writes `<base>.png`.
/// On failure no png is written.
/// ```no_run
/// let png = polygon_plot::convert("output1", 640, 480).unwrap();
/// assert_eq!(png.to_str(), Some("output1.png"));
/// ```
pub fn convert(base: &str, width: u32, height: u32) -> Result<PathBuf> {
    let data = io::read_segment_file(base)?;
    debug!(base, vertices = data.vertices.len(), edges = data.edges.len(), "read segment file");
    let plot = Plot::new(data)?;
    let mut canvas = Canvas::new(width, height)?;
    canvas.draw(&plot);
    let path = io::png_path(base);
    canvas.save_png(&path)?;
    info!(path = %path.display(), "saved plot");
    return Ok(path);
}

/// Converts every input of `config`. A failing input is logged and does not stop the others.
/// Results come back in input order.
pub fn convert_all(config: &Config) -> Vec<(String, Result<PathBuf>)> {
    let run = |base: &String| {
        let r = convert(base, config.width, config.height);
        if let Err(e) = &r {
            error!(base = base.as_str(), "{e}");
        }
        (base.clone(), r)
    };
    if config.parallel {
        config.inputs.par_iter().map(run).collect()
    } else {
        config.inputs.iter().map(run).collect()
    }
}

pub mod examples {
    use crate::geometry::{Edge, Vertex};
    use crate::io::SegmentFile;

    /// two vertices joined by one edge
    pub const SEGMENT_LINE: &str = "2 1\n0.0 0.0\n4.0 0.0\n0.0 0.0 4.0 0.0";

    pub fn segment_line() -> SegmentFile {
        let a = Vertex::new(0., 0.);
        let b = Vertex::new(4., 0.);
        return SegmentFile { vertices: vec![a, b], edges: vec![Edge::new(a, b)] };
    }

    fn polygon(corners: &[(f64, f64)]) -> Vec<Vertex> {
        corners.iter().map(|&(x, y)| Vertex::new(x, y)).collect()
    }

    /// unit square, clockwise
    pub fn square() -> Vec<Vertex> {
        polygon(&[(0., 0.), (0., 1.), (1., 1.), (1., 0.)])
    }

    /// clockwise arrow head with a single notch at vertex 3
    pub fn arrow() -> Vec<Vertex> {
        polygon(&[(0., 0.), (0., 4.), (4., 4.), (2., 2.), (4., 0.)])
    }

    /// clockwise comb with three teeth pointing up
    pub fn comb() -> Vec<Vertex> {
        polygon(&[
            (0., 0.), (0., 3.), (1., 3.), (1., 1.),
            (2., 1.), (2., 3.), (3., 3.), (3., 1.),
            (4., 1.), (4., 3.), (5., 3.), (5., 0.),
        ])
    }
}
