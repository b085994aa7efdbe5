//! Shapes already-fetched query rows (a JSON array) into node records.
//!
//! Each `[[sources]]` declaration of the configuration file names a layer and
//! how to read its records out of a row: where the items are (a JSON pointer,
//! or the row itself) and which fields hold the dbid, identifier and symbol.
//! A source may link every item back to the row it came from.
//!
//! ```toml
//! [[sources]]
//! layer = "Gene"
//! dbid = "objectId"
//! id = "primaryIdentifier"
//! symbol = "symbol"
//!
//! [[sources]]
//! layer = "Compound"
//! items = "/proteins/0/compounds"
//! dbid = "objectId"
//! id = ["compound", "originalId"]
//! symbol = ["compound", "name"]
//! link-to = "Gene"
//! ```

use layernet::core::io::records::LayerBatch;
use layernet::core::models::node::NodeRecord;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("Expected a JSON array at '{path}'")]
    NotAnArray { path: String },

    #[error("Item {index} of layer '{layer}' has no usable '{field}' field")]
    MissingField {
        layer: String,
        field: String,
        index: usize,
    },
}

/// Accessor for one field of a row item: a direct field, or a field of a
/// nested object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldPath {
    Direct(String),
    Nested(String, String),
}

impl FieldPath {
    pub fn resolve<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        let value = match self {
            FieldPath::Direct(name) => item.get(name),
            FieldPath::Nested(object, name) => item.get(object)?.get(name),
        };
        value.filter(|value| !value.is_null())
    }

    fn integer(&self, item: &Value) -> Option<i64> {
        match self.resolve(item)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn text(&self, item: &Value) -> Option<String> {
        match self.resolve(item)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Direct(name) => write!(f, "{}", name),
            FieldPath::Nested(object, name) => write!(f, "{}.{}", object, name),
        }
    }
}

fn default_parent_dbid() -> FieldPath {
    FieldPath::Direct("objectId".to_string())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SourceSpec {
    pub layer: String,
    /// JSON pointer to the array of items inside a row. The row itself is the
    /// item when absent.
    pub items: Option<String>,
    pub dbid: FieldPath,
    pub id: FieldPath,
    pub symbol: FieldPath,
    /// Layer of the row the items were found in; every item links to it.
    pub link_to: Option<String>,
    /// Field of the row holding the dbid the items link to.
    #[serde(default = "default_parent_dbid")]
    pub parent_dbid: FieldPath,
}

/// Maps every row through every source, batching the records per layer in
/// the order the layers first appear among the sources.
///
/// Rows where a source's item pointer is absent or `null` contribute nothing
/// to that source.
pub fn ingest_rows(rows: &Value, sources: &[SourceSpec]) -> Result<Vec<LayerBatch>, IngestError> {
    let rows = rows.as_array().ok_or_else(|| IngestError::NotAnArray {
        path: "/".to_string(),
    })?;

    let mut batches: Vec<LayerBatch> = Vec::new();
    for source in sources {
        let mut records = Vec::new();
        for row in rows {
            let items: Vec<&Value> = match &source.items {
                None => vec![row],
                Some(pointer) => match row.pointer(pointer) {
                    None | Some(Value::Null) => continue,
                    Some(Value::Array(items)) => items.iter().collect(),
                    Some(_) => {
                        return Err(IngestError::NotAnArray {
                            path: pointer.clone(),
                        });
                    }
                },
            };

            let parent = match &source.link_to {
                Some(_) => Some(source.parent_dbid.integer(row).ok_or_else(|| {
                    IngestError::MissingField {
                        layer: source.layer.clone(),
                        field: source.parent_dbid.to_string(),
                        index: records.len(),
                    }
                })?),
                None => None,
            };

            for item in items {
                let index = records.len();
                let missing = |field: &FieldPath| IngestError::MissingField {
                    layer: source.layer.clone(),
                    field: field.to_string(),
                    index,
                };
                let dbid = source.dbid.integer(item).ok_or_else(|| missing(&source.dbid))?;
                let id = source.id.text(item).ok_or_else(|| missing(&source.id))?;
                let symbol = source
                    .symbol
                    .text(item)
                    .ok_or_else(|| missing(&source.symbol))?;

                let mut record = NodeRecord::new(dbid, &id, &symbol);
                if let (Some(target), Some(layer)) = (parent, &source.link_to) {
                    record = record.linked(target, layer);
                }
                records.push(record);
            }
        }

        debug!(layer = %source.layer, records = records.len(), "Ingested source.");
        match batches.iter_mut().find(|batch| batch.layer == source.layer) {
            Some(batch) => batch.records.extend(records),
            None => batches.push(LayerBatch {
                layer: source.layer.clone(),
                records,
            }),
        }
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOURCES: &str = r#"
        [[sources]]
        layer = "Gene"
        dbid = "objectId"
        id = "primaryIdentifier"
        symbol = "symbol"

        [[sources]]
        layer = "Compound"
        items = "/proteins/0/compounds"
        dbid = "objectId"
        id = ["compound", "originalId"]
        symbol = ["compound", "name"]
        link-to = "Gene"

        [[sources]]
        layer = "miRNA"
        items = "/miRNAInteractions"
        dbid = "objectId"
        id = ["miRNA", "primaryIdentifier"]
        symbol = ["miRNA", "symbol"]
        link-to = "Gene"
    "#;

    #[derive(Deserialize)]
    struct Sources {
        sources: Vec<SourceSpec>,
    }

    fn sources() -> Vec<SourceSpec> {
        toml::from_str::<Sources>(SOURCES).unwrap().sources
    }

    fn rows() -> Value {
        json!([
            {
                "objectId": 1,
                "primaryIdentifier": "7157",
                "symbol": "TP53",
                "proteins": [{
                    "compounds": [
                        { "objectId": 100, "compound": { "originalId": "CHEBI:15365", "name": "aspirin" } },
                        { "objectId": 101, "compound": { "originalId": "CHEBI:5855", "name": "ibuprofen" } }
                    ]
                }],
                "miRNAInteractions": null
            },
            {
                "objectId": "2",
                "primaryIdentifier": "1956",
                "symbol": "EGFR",
                "miRNAInteractions": [
                    { "objectId": 300, "miRNA": { "primaryIdentifier": "MIMAT0000062", "symbol": "hsa-let-7a" } }
                ]
            }
        ])
    }

    #[test]
    fn field_paths_deserialize_from_strings_and_pairs() {
        let specs = sources();
        assert_eq!(specs[0].dbid, FieldPath::Direct("objectId".to_string()));
        assert_eq!(
            specs[1].id,
            FieldPath::Nested("compound".to_string(), "originalId".to_string())
        );
        assert_eq!(specs[1].parent_dbid, default_parent_dbid());
        assert_eq!(specs[1].id.to_string(), "compound.originalId");
    }

    #[test]
    fn rows_become_linked_records_per_layer() {
        let batches = ingest_rows(&rows(), &sources()).unwrap();
        let layers: Vec<&str> = batches.iter().map(|b| b.layer.as_str()).collect();
        assert_eq!(layers, vec!["Gene", "Compound", "miRNA"]);

        assert_eq!(
            batches[0].records,
            vec![
                NodeRecord::new(1, "7157", "TP53"),
                NodeRecord::new(2, "1956", "EGFR"),
            ]
        );
        assert_eq!(
            batches[1].records,
            vec![
                NodeRecord::new(100, "CHEBI:15365", "aspirin").linked(1, "Gene"),
                NodeRecord::new(101, "CHEBI:5855", "ibuprofen").linked(1, "Gene"),
            ]
        );
        assert_eq!(
            batches[2].records,
            vec![NodeRecord::new(300, "MIMAT0000062", "hsa-let-7a").linked(2, "Gene")]
        );
    }

    #[test]
    fn missing_fields_are_reported_with_their_path() {
        let rows = json!([{ "objectId": 1, "symbol": "TP53" }]);
        let err = ingest_rows(&rows, &sources()[..1]).unwrap_err();
        assert_eq!(
            err,
            IngestError::MissingField {
                layer: "Gene".to_string(),
                field: "primaryIdentifier".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn non_array_inputs_are_rejected() {
        assert!(matches!(
            ingest_rows(&json!({ "rows": [] }), &sources()),
            Err(IngestError::NotAnArray { .. })
        ));
        let rows = json!([{ "objectId": 1, "primaryIdentifier": "7157", "symbol": "TP53", "miRNAInteractions": 5 }]);
        assert_eq!(
            ingest_rows(&rows, &sources()),
            Err(IngestError::NotAnArray {
                path: "/miRNAInteractions".to_string()
            })
        );
    }
}
