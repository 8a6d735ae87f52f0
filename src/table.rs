use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::Value;

use crate::error::Result;
use crate::store::Decode;

/// A decoded shard: named columns over rows of JSON values.
///
/// Values are owned by the caller; nothing refers back to the archive the
/// shard came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(move |row| row.get(index)))
    }
}

/// Decodes parquet blobs into [`Table`]s.
pub struct ParquetDecoder;

impl Decode for ParquetDecoder {
    type Output = Table;

    fn decode(&self, bytes: Vec<u8>) -> Result<Table> {
        let reader = SerializedFileReader::new(Bytes::from(bytes))?;
        let columns: Vec<String> = reader
            .metadata()
            .file_metadata()
            .schema()
            .get_fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        let mut rows = Vec::new();
        for row in reader.get_row_iter(None)? {
            let row = row?;
            rows.push(
                row.get_column_iter()
                    .map(|(_, field)| field.to_json_value())
                    .collect(),
            );
        }
        Ok(Table { columns, rows })
    }
}
