use super::LoadError;
use crate::core::models::node::NodeRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of a flat record file: a node record tagged with its layer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct RecordRow {
    layer: String,
    dbid: i64,
    id: String,
    symbol: String,
    #[serde(default)]
    linked_to: Option<i64>,
    #[serde(default)]
    linked_layer: Option<String>,
}

/// Node records of one layer, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBatch {
    pub layer: String,
    pub records: Vec<NodeRecord>,
}

/// Loads a CSV file with the columns
/// `layer,dbid,id,symbol,linked_to,linked_layer` (the last two may be empty).
///
/// Rows are batched per layer; batches appear in the order their layer is
/// first seen, so parents listed first are inserted first.
pub fn load_records_csv(path: &Path) -> Result<Vec<LayerBatch>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_records_csv(file).map_err(|e| LoadError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

pub fn read_records_csv<R: Read>(reader: R) -> Result<Vec<LayerBatch>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut batches: Vec<LayerBatch> = Vec::new();
    for result in reader.deserialize::<RecordRow>() {
        let row = result?;
        let record = NodeRecord {
            dbid: row.dbid,
            id: row.id,
            symbol: row.symbol,
            linked_to: row.linked_to,
            linked_layer: row.linked_layer.filter(|layer| !layer.is_empty()),
        };
        match batches.iter_mut().find(|batch| batch.layer == row.layer) {
            Some(batch) => batch.records.push(record),
            None => batches.push(LayerBatch {
                layer: row.layer,
                records: vec![record],
            }),
        }
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
layer,dbid,id,symbol,linked_to,linked_layer
Gene,1,ENSG1,TP53,,
Compound,10,CHEBI:15365,aspirin,1,Gene
Gene,2,ENSG2,EGFR,,
Compound,11,CHEBI:5855,ibuprofen,2,Gene
";

    #[test]
    fn rows_are_batched_by_layer_in_first_seen_order() {
        let batches = read_records_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].layer, "Gene");
        assert_eq!(batches[0].records.len(), 2);
        assert_eq!(batches[0].records[1], NodeRecord::new(2, "ENSG2", "EGFR"));
        assert_eq!(batches[1].layer, "Compound");
        assert_eq!(
            batches[1].records[0],
            NodeRecord::new(10, "CHEBI:15365", "aspirin").linked(1, "Gene")
        );
    }

    #[test]
    fn load_from_file_succeeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let batches = load_records_csv(&path).unwrap();
        assert_eq!(batches.iter().map(|b| b.records.len()).sum::<usize>(), 4);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = load_records_csv(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn malformed_dbid_reports_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "layer,dbid,id,symbol,linked_to,linked_layer\nGene,abc,X,Y,,\n")
            .unwrap();
        assert!(matches!(load_records_csv(&path), Err(LoadError::Csv { .. })));
    }
}
