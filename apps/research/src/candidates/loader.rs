//! CSV candidate loader.
//!
//! The header row names the fields; each data row becomes one
//! [`CandidateRecord`]. Cells are typed loosely: empty cells become `null`,
//! numeric-looking cells become numbers, everything else stays a string.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::errors::AppError;

/// One row of the candidate file, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    fields: Map<String, Value>,
}

impl CandidateRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The `id` field, or `"unknown"` when absent.
    pub fn id(&self) -> Value {
        self.field_or_unknown("id")
    }

    /// The `name` field, or `"unknown"` when absent.
    pub fn name(&self) -> Value {
        self.field_or_unknown("name")
    }

    /// Compact JSON rendering of the whole row, embedded in prompts.
    pub fn profile_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    fn field_or_unknown(&self, field: &str) -> Value {
        self.get(field)
            .cloned()
            .unwrap_or_else(|| Value::String("unknown".to_string()))
    }
}

/// Loads every row of the CSV file at `path`.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateRecord>, AppError> {
    let file = std::fs::File::open(path).map_err(|e| AppError::file_unreadable(path.display(), &e))?;
    parse_candidates(file).map_err(|e| AppError::FileUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_candidates<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).map(infer_cell).unwrap_or(Value::Null);
                (header.to_string(), value)
            })
            .collect();
        records.push(CandidateRecord { fields });
    }

    Ok(records)
}

fn infer_cell(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "\
id,name,years_experience,skills,location
1,Maya Cohen,7,\"Rust, Kubernetes\",Tel Aviv
2,Jonas Weber,3.5,Python,
";

    #[test]
    fn test_rows_keyed_by_header() {
        let records = parse_candidates(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("skills"), Some(&json!("Rust, Kubernetes")));
        assert_eq!(records[0].get("location"), Some(&json!("Tel Aviv")));
    }

    #[test]
    fn test_cells_are_typed() {
        let records = parse_candidates(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records[0].id(), json!(1));
        assert_eq!(records[0].get("years_experience"), Some(&json!(7)));
        assert_eq!(records[1].get("years_experience"), Some(&json!(3.5)));
        assert_eq!(records[1].get("location"), Some(&Value::Null));
    }

    #[test]
    fn test_missing_id_and_name_default_to_unknown() {
        let records = parse_candidates("email\na@example.com\n".as_bytes()).unwrap();
        assert_eq!(records[0].id(), json!("unknown"));
        assert_eq!(records[0].name(), json!("unknown"));
    }

    #[test]
    fn test_short_rows_padded_with_null() {
        let records = parse_candidates("id,name,skills\n7,Ana\n".as_bytes()).unwrap();
        assert_eq!(records[0].name(), json!("Ana"));
        assert_eq!(records[0].get("skills"), Some(&Value::Null));
    }

    #[test]
    fn test_profile_json_contains_fields() {
        let records = parse_candidates(SAMPLE.as_bytes()).unwrap();
        let profile: Value = serde_json::from_str(&records[1].profile_json()).unwrap();
        assert_eq!(profile["name"], "Jonas Weber");
        assert_eq!(profile["skills"], "Python");
    }

    #[test]
    fn test_non_finite_numbers_stay_strings() {
        assert_eq!(infer_cell("NaN"), json!("NaN"));
        assert_eq!(infer_cell("inf"), json!("inf"));
        assert_eq!(infer_cell("-12"), json!(-12));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_candidates(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, AppError::FileUnreadable { ref path, .. } if path.ends_with("nope.csv")));
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, b"id,name\n1,\xff\xfe\n").unwrap();
        assert!(matches!(
            load_candidates(&path),
            Err(AppError::FileUnreadable { .. })
        ));
    }
}
