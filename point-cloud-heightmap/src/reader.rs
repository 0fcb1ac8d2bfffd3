/// Whitespace-delimited `x y z` point file reader
use crate::error::LoadError;
use crate::point::Point3D;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a point file from disk, optionally showing a byte progress bar.
pub fn read_points(file_path: &Path, show_progress: bool) -> Result<Vec<Point3D>, LoadError> {
    let file = File::open(file_path).map_err(|source| LoadError::Open {
        path: file_path.to_path_buf(),
        source,
    })?;

    let pb = if show_progress {
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}")
        {
            pb.set_style(style.progress_chars("▉▊▋▌▍▎▏ "));
        }
        pb.set_message("Loading points");
        pb
    } else {
        ProgressBar::hidden()
    };

    let points = parse_points(BufReader::new(pb.wrap_read(file)))?;
    pb.finish_with_message("Points loaded");

    info!("Loaded {} points from {}", points.len(), file_path.display());
    Ok(points)
}

/// Parse points from any buffered source.
///
/// Blank lines and lines starting with `#` are skipped. Every other line must
/// hold exactly three finite numbers.
pub fn parse_points<R: BufRead>(reader: R) -> Result<Vec<Point3D>, LoadError> {
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        points.push(parse_line(trimmed, idx + 1)?);
    }

    Ok(points)
}

fn parse_line(line: &str, line_number: usize) -> Result<Point3D, LoadError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(LoadError::Parse {
            line: line_number,
            reason: format!("expected 3 fields, found {}", fields.len()),
        });
    }

    let mut values = [0.0f64; 3];
    for (slot, token) in values.iter_mut().zip(&fields) {
        let value: f64 = token.parse().map_err(|_| LoadError::Parse {
            line: line_number,
            reason: format!("invalid number `{}`", token),
        })?;
        if !value.is_finite() {
            return Err(LoadError::Parse {
                line: line_number,
                reason: format!("non-finite value `{}`", token),
            });
        }
        *slot = value;
    }

    Ok(Point3D::new(values[0], values[1], values[2]))
}
