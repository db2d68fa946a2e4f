use crate::error::{Error, Result};
use crate::filter::Filter;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_filters(path: &Path) -> Result<Vec<Filter>> {
    match read_document(path)? {
        Value::Sequence(docs) => Ok(docs.iter().map(Filter::from_value).collect()),
        _ => Err(Error::NotAList {
            path: path.to_path_buf(),
        }),
    }
}

pub fn read_records(path: &Path) -> Result<Value> {
    let doc = read_document(path)?;
    tracing::debug!(path = %path.display(), "Loaded records");
    Ok(doc)
}
