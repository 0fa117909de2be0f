//! Flat persistence for training scalars.
//!
//! Training loops periodically checkpoint a handful of scalars (the
//! exploration rate, the iteration counter) as `name,value` lines. The
//! format carries no versioning; values are restored in file order and
//! interpreting the names is the caller's concern.
use crate::error::DelveError;
use std::path::Path;

/// Writes `name,value` pairs, one per line, to `path`.
pub fn save_params(path: impl AsRef<Path>, params: &[(&str, f64)]) -> Result<(), DelveError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for (name, value) in params {
        writer.write_record(&[name.to_string(), value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads `name,value` pairs from `path`.
pub fn load_params(path: impl AsRef<Path>) -> Result<Vec<(String, f64)>, DelveError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut params = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record
            .get(0)
            .ok_or_else(|| DelveError::MalformedParam(format!("{:?}", record)))?;
        let value: f64 = record
            .get(1)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| DelveError::MalformedParam(format!("{:?}", record)))?;
        params.push((name.to_string(), value));
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn roundtrip() {
        let dir = TempDir::new("params").unwrap();
        let path = dir.path().join("parameters.csv");
        save_params(&path, &[("epsilon", 0.125), ("iteration", 40000.0)]).unwrap();
        let params = load_params(&path).unwrap();
        assert_eq!(
            params,
            vec![
                ("epsilon".to_string(), 0.125),
                ("iteration".to_string(), 40000.0)
            ]
        );
    }

    #[test]
    fn malformed_value_is_an_error() {
        let dir = TempDir::new("params").unwrap();
        let path = dir.path().join("parameters.csv");
        std::fs::write(&path, "epsilon,not_a_number\n").unwrap();
        assert!(load_params(&path).is_err());
    }
}
