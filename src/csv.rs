//! Minimal hand-rolled CSV reader/writer for worker-side training data.
//!
//! No csv crate anywhere in this workspace's lineage writes CSV through
//! a dependency — files are built line by line with `write!`, the same
//! way the fleet's telemetry replay tooling does it. Quoting support is
//! deliberately narrow: training feature/label files are plain numeric
//! or short categorical columns, not free text.

use std::fmt::Write as _;

use crate::scalar::{Frame, Scalar};

pub fn read_frame(contents: &str) -> Result<Frame, String> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or_else(|| "empty CSV: no header row".to_string())?;
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != columns.len() {
            return Err(format!(
                "row {} has {} cells, expected {} to match header",
                i + 2,
                cells.len(),
                columns.len()
            ));
        }
        rows.push(cells.iter().map(|c| parse_cell(c.trim())).collect());
    }

    Ok(Frame { columns, rows })
}

fn parse_cell(raw: &str) -> Scalar {
    if let Ok(i) = raw.parse::<i64>() {
        return Scalar::Int(i);
    }
    if let Ok(r) = raw.parse::<f64>() {
        return Scalar::Real(r);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        _ => Scalar::Text(raw.to_string()),
    }
}

pub fn write_frame(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", frame.columns.join(","));
    for row in &frame.rows {
        let cells: Vec<String> = row.iter().map(Scalar::as_text).collect();
        let _ = writeln!(out, "{}", cells.join(","));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_frame() {
        let csv = "depth,rpm\n100,50\n200,60\n";
        let frame = read_frame(csv).unwrap();
        assert_eq!(frame.columns, vec!["depth", "rpm"]);
        assert_eq!(frame.n_rows(), 2);
        let back = write_frame(&frame);
        assert_eq!(back, csv);
    }

    #[test]
    fn rejects_ragged_rows() {
        let csv = "a,b\n1,2\n3\n";
        assert!(read_frame(csv).is_err());
    }

    #[test]
    fn skips_blank_trailing_lines() {
        let csv = "a,b\n1,2\n\n";
        let frame = read_frame(csv).unwrap();
        assert_eq!(frame.n_rows(), 1);
    }
}
