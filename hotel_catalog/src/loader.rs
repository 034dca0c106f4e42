// hotel_catalog/src/loader.rs

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use search_core::{AttributeKind, AttributeValue, Catalog, Hotel};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Column holding the unique hotel name. It becomes the hotel id and is not
/// kept as an attribute.
pub const IDENTIFIER_COLUMN: &str = "hotel_name";

// A cell as read from the source, before its column type is known.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

struct RawRecord {
    id: String,
    cells: Vec<(String, RawCell)>,
}

/// Loads a catalog file, picking the parser from the extension.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let catalog = match extension.as_deref() {
        Some("csv") => {
            let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_csv(file)?
        }
        Some("json") => {
            let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_json_str(&text)?
        }
        _ => {
            return Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!(path = %path.display(), hotels = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Finds `<stem>.csv` or `<stem>.json`, in that order.
pub fn resolve_catalog_file(stem: &Path) -> Option<PathBuf> {
    ["csv", "json"]
        .iter()
        .map(|ext| stem.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let id_pos = headers
        .iter()
        .position(|h| h.trim() == IDENTIFIER_COLUMN)
        .ok_or(CatalogError::MissingIdentifier { column: IDENTIFIER_COLUMN })?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let id = record.get(id_pos).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(CatalogError::InvalidIdentifier { row, column: IDENTIFIER_COLUMN });
        }

        let cells = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(pos, _)| *pos != id_pos)
            .map(|(_, (name, field))| (name.trim().to_string(), parse_text_cell(field)))
            .collect();
        records.push(RawRecord { id: id.to_string(), cells });
    }

    Ok(build_catalog(records))
}

pub fn parse_json_str(text: &str) -> Result<Catalog, CatalogError> {
    let rows: Vec<Value> = serde_json::from_str(text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.into_iter().enumerate() {
        let Value::Object(object) = value else {
            return Err(CatalogError::InvalidRecord { row });
        };

        let id = match object.get(IDENTIFIER_COLUMN) {
            None => return Err(CatalogError::MissingIdentifier { column: IDENTIFIER_COLUMN }),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(_) => return Err(CatalogError::InvalidIdentifier { row, column: IDENTIFIER_COLUMN }),
        };

        let mut cells = Vec::with_capacity(object.len());
        for (name, value) in object {
            if name == IDENTIFIER_COLUMN {
                continue;
            }
            let cell = match value {
                Value::Null => RawCell::Null,
                Value::Bool(b) => RawCell::Bool(b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => RawCell::Int(i),
                    None => n.as_f64().map_or(RawCell::Null, RawCell::Float),
                },
                Value::String(s) => RawCell::Text(s),
                Value::Array(_) | Value::Object(_) => return Err(CatalogError::InvalidRecord { row }),
            };
            cells.push((name, cell));
        }
        records.push(RawRecord { id, cells });
    }

    Ok(build_catalog(records))
}

fn parse_text_cell(field: &str) -> RawCell {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("nan") || field.eq_ignore_ascii_case("null") {
        return RawCell::Null;
    }
    if field.eq_ignore_ascii_case("true") {
        return RawCell::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return RawCell::Bool(false);
    }
    if let Ok(i) = field.parse::<i64>() {
        return RawCell::Int(i);
    }
    match field.parse::<f64>() {
        Ok(f) if f.is_finite() => RawCell::Float(f),
        _ => RawCell::Text(field.to_string()),
    }
}

/// Decides the column type from every cell of the column: any text makes it
/// text, only 0/1/true/false makes it boolean, other numbers make it numeric.
fn classify_column<'a>(cells: impl Iterator<Item = &'a RawCell>) -> AttributeKind {
    let mut kind = AttributeKind::Null;
    for cell in cells {
        kind = match (kind, cell) {
            (_, RawCell::Text(_)) => return AttributeKind::Text,
            (k, RawCell::Null) => k,
            (AttributeKind::Null | AttributeKind::Boolean, RawCell::Bool(_)) => AttributeKind::Boolean,
            (AttributeKind::Null | AttributeKind::Boolean, RawCell::Int(0 | 1)) => AttributeKind::Boolean,
            _ => AttributeKind::Number,
        };
    }
    kind
}

fn convert(cell: RawCell, kind: AttributeKind) -> AttributeValue {
    match (kind, cell) {
        (_, RawCell::Null) | (AttributeKind::Null, _) => AttributeValue::Null,
        (AttributeKind::Boolean, RawCell::Bool(b)) => AttributeValue::Boolean(b),
        (AttributeKind::Boolean, RawCell::Int(i)) => AttributeValue::Boolean(i != 0),
        (AttributeKind::Number, RawCell::Bool(b)) => AttributeValue::Number(if b { 1.0 } else { 0.0 }),
        (AttributeKind::Number, RawCell::Int(i)) => AttributeValue::Number(i as f64),
        (AttributeKind::Number, RawCell::Float(f)) => AttributeValue::Number(f),
        (AttributeKind::Text, RawCell::Text(s)) => AttributeValue::Text(s),
        (AttributeKind::Text, RawCell::Bool(b)) => AttributeValue::Text(b.to_string()),
        (AttributeKind::Text, RawCell::Int(i)) => AttributeValue::Text(i.to_string()),
        (AttributeKind::Text, RawCell::Float(f)) => AttributeValue::Text(f.to_string()),
        // classify_column never yields these pairs
        (AttributeKind::Boolean, RawCell::Float(f)) => AttributeValue::Number(f),
        (_, RawCell::Text(s)) => AttributeValue::Text(s),
    }
}

fn build_catalog(records: Vec<RawRecord>) -> Catalog {
    let mut columns: HashMap<&str, Vec<&RawCell>> = HashMap::new();
    for record in &records {
        for (name, cell) in &record.cells {
            columns.entry(name.as_str()).or_default().push(cell);
        }
    }
    let kinds: HashMap<String, AttributeKind> = columns
        .into_iter()
        .map(|(name, cells)| (name.to_string(), classify_column(cells.into_iter())))
        .collect();

    let mut catalog = Catalog::new();
    for record in records {
        let attributes: Vec<(String, AttributeValue)> = record
            .cells
            .into_iter()
            .map(|(name, cell)| {
                let kind = kinds.get(&name).copied().unwrap_or(AttributeKind::Null);
                let value = convert(cell, kind);
                (name, value)
            })
            .collect();

        if catalog.insert(Hotel::new(record.id.clone(), attributes)).is_some() {
            warn!(hotel = %record.id, "duplicate hotel name in catalog, keeping the later record");
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
hotel_name,Sauna,pricepernight,roomcategory,starcategory,ltr_score,empty
Sol,1,89.5,Suite,4,3.2,
Mar,0,120,Apartment,5,7.1,
Playa,1,,Suite,3,0.5,
";

    #[test]
    fn csv_columns_are_classified_once() {
        let catalog = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.kind_of("Sauna"), Some(AttributeKind::Boolean));
        assert_eq!(catalog.kind_of("pricepernight"), Some(AttributeKind::Number));
        assert_eq!(catalog.kind_of("roomcategory"), Some(AttributeKind::Text));
        assert_eq!(catalog.kind_of("starcategory"), Some(AttributeKind::Number));
        assert_eq!(catalog.kind_of("empty"), Some(AttributeKind::Null));
        assert_eq!(catalog.kind_of(IDENTIFIER_COLUMN), None);

        let mar = catalog.get("Mar").unwrap();
        assert_eq!(mar.get("Sauna"), Some(&AttributeValue::Boolean(false)));
        assert_eq!(mar.get("pricepernight"), Some(&AttributeValue::Number(120.0)));
        assert_eq!(mar.ltr_score(), 7.1);
        let playa = catalog.get("Playa").unwrap();
        assert_eq!(playa.get("pricepernight"), Some(&AttributeValue::Null));
    }

    #[test]
    fn records_keep_csv_column_order() {
        let catalog = parse_csv(CSV.as_bytes()).unwrap();
        let names: Vec<&str> = catalog.get("Sol").unwrap().attributes().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["Sauna", "pricepernight", "roomcategory", "starcategory", "ltr_score", "empty"]
        );
    }

    #[test]
    fn csv_without_identifier_is_rejected() {
        let err = parse_csv("name,Sauna\nSol,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingIdentifier { .. }));
    }

    #[test]
    fn csv_with_blank_identifier_is_rejected() {
        let err = parse_csv("hotel_name,Sauna\nSol,1\n ,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidIdentifier { row: 1, .. }));
    }

    #[test]
    fn mixed_text_column_keeps_numbers_as_text() {
        let catalog = parse_csv("hotel_name,locationname\nA,Palma\nB,42\n".as_bytes()).unwrap();
        assert_eq!(
            catalog.get("B").unwrap().get("locationname"),
            Some(&AttributeValue::Text("42".into()))
        );
    }

    #[test]
    fn json_catalog_loads_flat_objects() {
        let text = r#"[
            {"hotel_name": "Sol", "Pool": true, "rating": 8.4, "mealtype": "Frühstück", "ltr_score": 2},
            {"hotel_name": "Mar", "Pool": false, "rating": 9, "mealtype": null}
        ]"#;
        let catalog = parse_json_str(text).unwrap();
        assert_eq!(catalog.kind_of("Pool"), Some(AttributeKind::Boolean));
        assert_eq!(catalog.kind_of("rating"), Some(AttributeKind::Number));
        assert_eq!(catalog.kind_of("mealtype"), Some(AttributeKind::Text));
        assert_eq!(catalog.get("Sol").unwrap().ltr_score(), 2.0);
        assert_eq!(catalog.get("Mar").unwrap().get("ltr_score"), None);
    }

    #[test]
    fn json_record_without_identifier_is_rejected() {
        let err = parse_json_str(r#"[{"Pool": 1}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::MissingIdentifier { .. }));
        let err = parse_json_str(r#"[{"hotel_name": 3}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidIdentifier { row: 0, .. }));
        let err = parse_json_str(r#"[[1, 2]]"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord { row: 0 }));
    }

    #[test]
    fn load_catalog_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("resultlist_Mallorca.csv");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(CSV.as_bytes())
            .unwrap();

        assert_eq!(load_catalog(&csv_path).unwrap().len(), 3);
        assert_eq!(
            resolve_catalog_file(&dir.path().join("resultlist_Mallorca")),
            Some(csv_path)
        );
        assert_eq!(resolve_catalog_file(&dir.path().join("resultlist_Kopenhagen")), None);

        let err = load_catalog(dir.path().join("hotels.parquet")).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
        let err = load_catalog(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
