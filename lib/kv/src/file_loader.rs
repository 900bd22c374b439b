use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::KVError;
use crate::overlay::OverlayKV;
use crate::traits::KVStore;

/// FileLoader scans a data directory and populates the file layer of an
/// OverlayKV. The directory structure determines the key namespace:
///
/// ```text
/// data-dir/
/// ├── items/ring.yaml       → config:item:ring
/// ├── items/pendant.yaml    → config:item:pendant
/// └── karigars.yaml         → config:karigars
/// ```
///
/// File stems are lowercased so lookups by item name are
/// case-insensitive. All loaded entries become read-only in the overlay.
pub struct FileLoader;

impl FileLoader {
    /// Load all YAML files from `data_dir` into the overlay's file layer.
    /// Returns the number of entries loaded.
    pub fn load<DB: KVStore>(
        data_dir: &Path,
        overlay: &OverlayKV<DB>,
    ) -> Result<usize, KVError> {
        if !data_dir.is_dir() {
            debug!("FileLoader: data dir {:?} does not exist, skipping", data_dir);
            return Ok(0);
        }

        let mut count = 0;

        // Top-level YAML files (e.g. karigars.yaml → config:karigars)
        count += Self::load_top_level(data_dir, overlay)?;

        // items/ directory
        let items_dir = data_dir.join("items");
        if items_dir.is_dir() {
            count += Self::load_directory(&items_dir, "config:item:", overlay)?;
        }

        debug!("FileLoader: loaded {} entries from {:?}", count, data_dir);
        Ok(count)
    }

    /// Load top-level YAML files: karigars.yaml → config:karigars
    fn load_top_level<DB: KVStore>(
        data_dir: &Path,
        overlay: &OverlayKV<DB>,
    ) -> Result<usize, KVError> {
        let mut count = 0;
        let entries =
            fs::read_dir(data_dir).map_err(|e| KVError::Storage(e.to_string()))?;

        for entry in entries {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() || !Self::is_yaml(&path) {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_lowercase();

            let key = format!("config:{}", stem);
            let data =
                fs::read(&path).map_err(|e| KVError::Storage(e.to_string()))?;
            overlay.insert_file_entry(key, data);
            count += 1;
        }

        Ok(count)
    }

    /// Load a flat directory of YAML files with a key prefix.
    /// E.g. items/ring.yaml with prefix "config:item:" → key "config:item:ring"
    fn load_directory<DB: KVStore>(
        dir: &Path,
        prefix: &str,
        overlay: &OverlayKV<DB>,
    ) -> Result<usize, KVError> {
        let mut count = 0;
        let entries =
            fs::read_dir(dir).map_err(|e| KVError::Storage(e.to_string()))?;

        for entry in entries {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() || !Self::is_yaml(&path) {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_lowercase();

            let key = format!("{}{}", prefix, stem);
            let data =
                fs::read(&path).map_err(|e| KVError::Storage(e.to_string()))?;
            overlay.insert_file_entry(key, data);
            count += 1;
        }

        Ok(count)
    }

    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}
