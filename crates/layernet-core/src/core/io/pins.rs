use super::LoadError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// A saved manual position of one node inside a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinRow {
    pub dbid: i64,
    pub x: f64,
    pub y: f64,
}

/// Pinned positions of one layer, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPins {
    pub layer: String,
    pub pins: Vec<PinRow>,
}

#[derive(Debug, Deserialize)]
struct Row {
    layer: String,
    dbid: i64,
    x: f64,
    y: f64,
}

/// Loads a CSV file with the columns `layer,dbid,x,y`.
pub fn load_pins_csv(path: &Path) -> Result<Vec<LayerPins>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_pins_csv(file).map_err(|e| LoadError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

pub fn read_pins_csv<R: Read>(reader: R) -> Result<Vec<LayerPins>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut layers: Vec<LayerPins> = Vec::new();
    for result in reader.deserialize::<Row>() {
        let Row { layer, dbid, x, y } = result?;
        let pin = PinRow { dbid, x, y };
        match layers.iter_mut().find(|entry| entry.layer == layer) {
            Some(entry) => entry.pins.push(pin),
            None => layers.push(LayerPins {
                layer,
                pins: vec![pin],
            }),
        }
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_are_grouped_by_layer() {
        let csv = "layer,dbid,x,y\nGene,1,30,20\nCompound,10,5.5,80\nGene,2,60,20\n";
        let layers = read_pins_csv(csv.as_bytes()).unwrap();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].layer, "Gene");
        let ids: Vec<i64> = layers[0].pins.iter().map(|p| p.dbid).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!((layers[1].pins[0].x, layers[1].pins[0].y), (5.5, 80.0));
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let csv = "layer,dbid,x,y\nGene,1,left,20\n";
        assert!(read_pins_csv(csv.as_bytes()).is_err());
    }
}
