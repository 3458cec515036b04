//! `config.csv`: free-form `key,value` settings.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::DataError;
use crate::files::{CONFIG_HEADER, ensure_csv};

#[derive(Debug, Deserialize)]
struct ConfigRow {
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// Reads settings, creating an empty file first if there is none. Rows with a
/// blank key are ignored; a later row overrides an earlier one.
pub fn load_config(path: &Path) -> Result<HashMap<String, String>, DataError> {
    ensure_csv(path, &CONFIG_HEADER)?;
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    read_config(file)
}

pub fn read_config<R: Read>(reader: R) -> Result<HashMap<String, String>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut settings = HashMap::new();
    for result in csv_reader.deserialize::<ConfigRow>() {
        let row = result?;
        if let Some(key) = row.key.filter(|k| !k.is_empty()) {
            settings.insert(key, row.value.unwrap_or_default());
        }
    }

    Ok(settings)
}
