use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::io::BufReader;
use std::path::PathBuf;

use crate::error::{Error, ParseError, Result};
use crate::geometry::{Edge, Vertex};

/// Contents of a segment file: points to mark and segments to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentFile {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

/// `<base>.txt`, the base name is used as given (no extension handling)
pub fn txt_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{base}.txt"))
}

pub fn png_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{base}.png"))
}

fn next_line<R: BufRead>(lines: &mut std::io::Lines<R>, line: usize, expected: &'static str) -> std::result::Result<String, ParseError> {
    match lines.next() {
        Some(l) => Ok(l?),
        None => Err(ParseError::Truncated { line, expected }),
    }
}

fn fields<const N: usize>(text: &str, line: usize) -> std::result::Result<[&str; N], ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let found = tokens.len();
    tokens.try_into().map_err(|_| ParseError::FieldCount { line, expected: N, found })
}

fn number<T: std::str::FromStr>(token: &str, line: usize, kind: &'static str) -> std::result::Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::Number { line, token: token.to_string(), kind })
}

/// Parses the segment format:
/// ```text
/// m n
/// x y            (m lines)
/// x1 y1 x2 y2    (n lines)
/// ```
/// Anything after the last edge line is ignored.
pub fn parse_segments<R: BufRead>(reader: R) -> std::result::Result<SegmentFile, ParseError> {
    let mut lines = reader.lines();

    let header = next_line(&mut lines, 1, "header `m n`")?;
    let [m, n] = fields::<2>(&header, 1)?;
    let m: usize = number(m, 1, "vertex count")?;
    let n: usize = number(n, 1, "edge count")?;

    // counts come from the file, nothing is reserved up front
    let mut vertices = Vec::new();
    for i in 0..m {
        let line = i + 2;
        let text = next_line(&mut lines, line, "vertex `x y`")?;
        let [x, y] = fields::<2>(&text, line)?;
        vertices.push(Vertex::new(number(x, line, "float")?, number(y, line, "float")?));
    }

    let mut edges = Vec::new();
    for i in 0..n {
        let line = m + i + 2;
        let text = next_line(&mut lines, line, "edge `x1 y1 x2 y2`")?;
        let [x1, y1, x2, y2] = fields::<4>(&text, line)?;
        let from = Vertex::new(number(x1, line, "float")?, number(y1, line, "float")?);
        let to = Vertex::new(number(x2, line, "float")?, number(y2, line, "float")?);
        edges.push(Edge::new(from, to));
    }

    return Ok(SegmentFile { vertices, edges });
}

/// Reads `<base>.txt` as a segment file.
pub fn read_segment_file(base: &str) -> Result<SegmentFile> {
    let path = txt_path(base);
    let file = File::open(&path).map_err(|source| Error::Open { path: path.clone(), source })?;
    parse_segments(BufReader::new(file)).map_err(|source| Error::Parse { path, source })
}

pub fn write_segments<W: Write>(out: &mut W, segments: &SegmentFile) -> std::io::Result<()> {
    writeln!(out, "{} {}", segments.vertices.len(), segments.edges.len())?;
    for v in &segments.vertices {
        writeln!(out, "{} {}", v.x, v.y)?;
    }
    for e in &segments.edges {
        writeln!(out, "{} {} {} {}", e.from.x, e.from.y, e.to.x, e.to.y)?;
    }
    Ok(())
}

/// Writes `<base>.txt`, replacing an existing file.
pub fn save_segment_file(base: &str, segments: &SegmentFile) -> Result<PathBuf> {
    let path = txt_path(base);
    let mut content = Vec::new();
    write_segments(&mut content, segments).map_err(|source| Error::Write { path: path.clone(), source })?;
    std::fs::write(&path, content).map_err(|source| Error::Write { path: path.clone(), source })?;
    return Ok(path);
}

/// Parses a polygon: a vertex count followed by that many `x y` pairs.
/// Tokens may be split across lines arbitrarily.
pub fn parse_polygon<R: BufRead>(reader: R) -> std::result::Result<Vec<Vertex>, ParseError> {
    // (line number, token)
    let mut tokens = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        tokens.extend(line.split_whitespace().map(|t| (i + 1, t.to_string())));
    }
    let last_line = tokens.last().map(|(l, _)| *l).unwrap_or(1);
    let mut tokens = tokens.into_iter();
    let mut next = |expected: &'static str| tokens.next().ok_or(ParseError::Truncated { line: last_line, expected });

    let (line, count) = next("vertex count")?;
    let count: usize = number(&count, line, "vertex count")?;
    let mut polygon = Vec::new();
    for _ in 0..count {
        let (lx, x) = next("x coordinate")?;
        let (ly, y) = next("y coordinate")?;
        polygon.push(Vertex::new(number(&x, lx, "float")?, number(&y, ly, "float")?));
    }
    return Ok(polygon);
}

/// Reads the polygon stored in `<base>.txt`.
pub fn read_polygon_file(base: &str) -> Result<Vec<Vertex>> {
    let path = txt_path(base);
    let file = File::open(&path).map_err(|source| Error::Open { path: path.clone(), source })?;
    parse_polygon(BufReader::new(file)).map_err(|source| Error::Parse { path, source })
}

/// Appends `nvertices seconds` to the timing log at `path`.
pub fn append_timing(path: &str, nvertices: usize, seconds: f64) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::Write { path: path.into(), source })?;
    writeln!(file, "{nvertices} {seconds}").map_err(|source| Error::Write { path: path.into(), source })
}
