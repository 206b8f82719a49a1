use crate::config::ChallengeConfig;
use crate::error::PhResult;
use crate::validation::Validate;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reads and validates a challenge configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> PhResult<ChallengeConfig> {
    let path = path.as_ref();
    info!("Loading challenge config: {}", path.display());

    let content = fs::read_to_string(path)?;
    let config: ChallengeConfig = serde_json::from_str(&content)?;
    config.validate()?;

    debug!(
        "Loaded '{}' with {} criteria",
        config.name,
        config.pose.criteria.len()
    );
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &ChallengeConfig, path: P) -> PhResult<()> {
    let content = config.to_json_pretty()?;
    fs::write(path, content)?;
    Ok(())
}
