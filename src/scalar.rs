//! Wire representation of tabular data exchanged between master and
//! worker (`spec.md` §3 Data Model).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single table cell as it arrives over the wire. Untagged so JSON
/// numbers, strings, and booleans all round-trip without a wrapper key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl Scalar {
    /// Coerce to `f64` for feature/target arithmetic.
    ///
    /// Booleans map to 1.0/0.0. Strings are rejected here — they only
    /// ever flow through the classifier label path, which maps them to
    /// class indices before this is called (`spec.md` §9 Open Questions).
    pub fn as_f64(&self) -> Result<f64, String> {
        match self {
            Scalar::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(i) => Ok(*i as f64),
            Scalar::Real(r) => Ok(*r),
            Scalar::Text(s) => Err(format!("cannot coerce string scalar {s:?} to a number")),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Real(r) => r.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// A rectangular table: column headers plus row-major scalar cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl Frame {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Normalize headers to lowercase, trimmed form. Column order is
    /// otherwise preserved — callers that need PS's sorted-column
    /// contract use [`Frame::normalized_sorted`] instead.
    pub fn normalize_columns(&mut self) {
        for c in &mut self.columns {
            *c = c.trim().to_lowercase();
        }
    }

    /// Normalize headers and then sort columns (and the matching row
    /// cells) alphabetically — the parameter-server `FitInput` contract
    /// requires a stable column order regardless of what order the
    /// caller sent them in (`spec.md` §4.6).
    pub fn normalized_sorted(&self) -> Frame {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        let normalized: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();
        order.sort_by(|&a, &b| normalized[a].cmp(&normalized[b]));

        let columns = order.iter().map(|&i| normalized[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| order.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Frame { columns, rows }
    }

    /// Extract a single column as `f64`s by (already-normalized) name.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, String> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| format!("column {name:?} not found"))?;
        self.rows.iter().map(|row| row[idx].as_f64()).collect()
    }

    /// All columns except `exclude`, as a row-major `Vec<Vec<f64>>`.
    pub fn features_excluding(&self, exclude: &str) -> Result<Vec<Vec<f64>>, String> {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| *c != exclude)
            .map(|(i, _)| i)
            .collect();
        self.rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].as_f64()).collect())
            .collect()
    }
}

/// Maps first-seen string labels to integer class indices, in
/// first-seen order (`spec.md` §9 Open Questions: classifier `y`
/// labels map to class indices rather than being rejected).
#[derive(Debug, Default, Clone)]
pub struct LabelEncoder {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn fit_transform(&mut self, labels: &[Scalar]) -> Vec<f64> {
        labels
            .iter()
            .map(|l| match l {
                Scalar::Text(s) => {
                    if let Some(&idx) = self.index.get(s) {
                        idx as f64
                    } else {
                        let idx = self.order.len();
                        self.order.push(s.clone());
                        self.index.insert(s.clone(), idx);
                        idx as f64
                    }
                }
                other => other.as_f64().unwrap_or(0.0),
            })
            .collect()
    }

    pub fn class_label(&self, class_idx: usize) -> Scalar {
        self.order
            .get(class_idx)
            .map(|s| Scalar::Text(s.clone()))
            .unwrap_or(Scalar::Int(class_idx as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_columns_lowercases_and_trims() {
        let mut f = Frame {
            columns: vec![" Depth ".to_string(), "RPM".to_string()],
            rows: vec![],
        };
        f.normalize_columns();
        assert_eq!(f.columns, vec!["depth", "rpm"]);
    }

    #[test]
    fn normalized_sorted_reorders_rows_to_match_columns() {
        let f = Frame {
            columns: vec!["b".to_string(), "a".to_string()],
            rows: vec![vec![Scalar::Int(2), Scalar::Int(1)]],
        };
        let sorted = f.normalized_sorted();
        assert_eq!(sorted.columns, vec!["a", "b"]);
        assert_eq!(sorted.rows[0], vec![Scalar::Int(1), Scalar::Int(2)]);
    }

    #[test]
    fn bool_scalar_coerces_to_one_or_zero() {
        assert_eq!(Scalar::Bool(true).as_f64().unwrap(), 1.0);
        assert_eq!(Scalar::Bool(false).as_f64().unwrap(), 0.0);
    }

    #[test]
    fn text_scalar_rejected_for_numeric_coercion() {
        assert!(Scalar::Text("north".to_string()).as_f64().is_err());
    }

    #[test]
    fn label_encoder_assigns_first_seen_order() {
        let mut enc = LabelEncoder::default();
        let out = enc.fit_transform(&[
            Scalar::Text("b".to_string()),
            Scalar::Text("a".to_string()),
            Scalar::Text("b".to_string()),
        ]);
        assert_eq!(out, vec![0.0, 1.0, 0.0]);
        assert_eq!(enc.class_label(1), Scalar::Text("a".to_string()));
    }
}
