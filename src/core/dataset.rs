//! Wide-format tabular dataset: one row per entity, one column per month.

use crate::error::{DecompositionError, Result};

/// Name of the identity column in the municipal datasets.
pub const DEFAULT_KEY_COLUMN: &str = "Município";

/// What to do when a selection key matches more than one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Take the first matching row in file order.
    #[default]
    First,
    /// Fail with [`DecompositionError::AmbiguousSelection`].
    Unique,
}

/// Normalize an identity value for comparison (trim + uppercase).
pub fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// An already parsed table of string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    key_column: usize,
}

impl Dataset {
    /// Create a dataset from a header and rows.
    ///
    /// Every row must have as many cells as the header. The key column is
    /// [`DEFAULT_KEY_COLUMN`] when present, otherwise the first column.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(DecompositionError::InvalidDataset(
                "header row is empty".to_string(),
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DecompositionError::InvalidDataset(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }

        let key_column = find_header(&headers, DEFAULT_KEY_COLUMN).unwrap_or(0);

        Ok(Self {
            headers,
            rows,
            key_column,
        })
    }

    /// Use the named column as the identity column.
    pub fn with_key_column(mut self, name: &str) -> Result<Self> {
        self.key_column = find_header(&self.headers, name)
            .ok_or_else(|| DecompositionError::KeyColumnMissing(name.to_string()))?;
        Ok(self)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the identity column.
    pub fn key_column(&self) -> usize {
        self.key_column
    }

    pub fn key_column_name(&self) -> &str {
        &self.headers[self.key_column]
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// First `n` rows, for a quick look at the data.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Find the row whose identity value equals `key` after normalization.
    ///
    /// Returns the row index.
    pub fn select_row(&self, key: &str, policy: MatchPolicy) -> Result<usize> {
        let wanted = normalize_key(key);
        let matches: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| normalize_key(&row[self.key_column]) == wanted)
            .map(|(i, _)| i)
            .collect();

        match (matches.first(), matches.len(), policy) {
            (None, _, _) => Err(DecompositionError::NotFound { key: wanted }),
            (Some(&first), 1, _) => Ok(first),
            (Some(_), n, MatchPolicy::Unique) => Err(DecompositionError::AmbiguousSelection {
                key: wanted,
                matches: n,
            }),
            (Some(&first), n, MatchPolicy::First) => {
                tracing::warn!(
                    key = %wanted,
                    matches = n,
                    row = first,
                    "key is ambiguous, using first match"
                );
                Ok(first)
            }
        }
    }
}

fn find_header(headers: &[String], name: &str) -> Option<usize> {
    let name = name.trim();
    headers.iter().position(|h| h.trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Dataset {
        Dataset::new(
            strings(&["UF", "Município", "2008/Jan"]),
            vec![
                strings(&["RO", "110150 SERINGUEIRAS", "10"]),
                strings(&["RO", "999999 OTHERVILLE", "20"]),
                strings(&["SP", " 999999 otherville ", "30"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn uses_municipio_as_default_key() {
        let ds = sample();
        assert_eq!(ds.key_column(), 1);
        assert_eq!(ds.key_column_name(), "Município");
    }

    #[test]
    fn falls_back_to_first_column() {
        let ds = Dataset::new(strings(&["name", "2008/Jan"]), vec![strings(&["A", "1"])]).unwrap();
        assert_eq!(ds.key_column(), 0);
    }

    #[test]
    fn explicit_key_column() {
        let ds = sample().with_key_column("UF").unwrap();
        assert_eq!(ds.key_column(), 0);
        assert_eq!(ds.select_row("sp", MatchPolicy::First).unwrap(), 2);

        let err = sample().with_key_column("Estado").unwrap_err();
        assert_eq!(err, DecompositionError::KeyColumnMissing("Estado".to_string()));
    }

    #[test]
    fn selection_ignores_case_and_whitespace() {
        let ds = sample();
        assert_eq!(ds.select_row("  110150 seringueiras ", MatchPolicy::First).unwrap(), 0);
    }

    #[test]
    fn missing_key_is_not_found() {
        let err = sample().select_row("000000 NOWHERE", MatchPolicy::First).unwrap_err();
        assert_eq!(
            err,
            DecompositionError::NotFound {
                key: "000000 NOWHERE".to_string()
            }
        );
    }

    #[test]
    fn ambiguity_follows_policy() {
        let ds = sample();
        assert_eq!(ds.select_row("999999 OTHERVILLE", MatchPolicy::First).unwrap(), 1);
        let err = ds.select_row("999999 OTHERVILLE", MatchPolicy::Unique).unwrap_err();
        assert_eq!(
            err,
            DecompositionError::AmbiguousSelection {
                key: "999999 OTHERVILLE".to_string(),
                matches: 2
            }
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Dataset::new(strings(&["a", "b"]), vec![strings(&["1"])]).unwrap_err();
        assert!(matches!(err, DecompositionError::InvalidDataset(_)));
        assert!(Dataset::new(vec![], vec![]).is_err());
    }

    #[test]
    fn preview_is_bounded() {
        let ds = sample();
        assert_eq!(ds.preview(2).len(), 2);
        assert_eq!(ds.preview(10).len(), 3);
    }
}
