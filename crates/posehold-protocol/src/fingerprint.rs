use crate::config::ChallengeConfig;
use sha2::{Digest, Sha256};

/// Stable identifier for a challenge tuning, so recorded sessions can be
/// traced back to the exact configuration that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFingerprint {
    pub hash: String,
}

impl ConfigFingerprint {
    pub fn of(config: &ChallengeConfig) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(config.name.as_bytes());

        let pose_json = serde_json::to_string(&config.pose).unwrap_or_default();
        hasher.update(pose_json.as_bytes());

        let session_json = serde_json::to_string(&config.session).unwrap_or_default();
        hasher.update(session_json.as_bytes());

        let reward_json = serde_json::to_string(&config.reward).unwrap_or_default();
        hasher.update(reward_json.as_bytes());

        Self {
            hash: hex::encode(hasher.finalize()),
        }
    }

    pub fn short(&self) -> &str {
        &self.hash[..12.min(self.hash.len())]
    }
}

impl std::fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hash)
    }
}
