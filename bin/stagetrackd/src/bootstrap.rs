//! Bootstrap — first-start checks before storage is opened.
//!
//! A misconfigured server refuses to start with an operator-visible
//! message rather than limping along against the wrong data directory.

use tracing::{info, warn};

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!(
            "Storage data-dir is empty in configuration.\n\
             Set [storage] data-dir to the directory holding the database and item config."
        );
    }
    Ok(())
}

/// Report how much static configuration the file layer picked up.
pub fn report_config_entries(loaded: usize) {
    if loaded == 0 {
        warn!("no item/karigar configuration found in data dir; stage selectors will be empty");
    } else {
        info!("loaded {} configuration entries into the file layer", loaded);
    }
}
