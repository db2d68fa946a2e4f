use crate::error::{Error, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

const FENCE: &str = "---";

pub fn read_frontmatter(path: &Path) -> Result<Option<Value>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(block) = frontmatter_block(&content) else {
        return Ok(None);
    };

    match serde_yaml::from_str::<Value>(block) {
        Ok(record) if record.is_mapping() => Ok(Some(record)),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping file with malformed frontmatter");
            Ok(None)
        }
    }
}

fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content.trim_start().strip_prefix(FENCE)?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}
