use std::fs;
use std::path::Path;

use layup_index::IndexerConfig;

use crate::error::Result;

/// Read an [`IndexerConfig`] from a JSON file; missing keys take their
/// defaults
pub fn load_config(path: impl AsRef<Path>) -> Result<IndexerConfig> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let config: IndexerConfig = serde_json::from_slice(&bytes)?;
    log::debug!("Loaded indexer config {}: {:?}", path.display(), config);
    Ok(config)
}
