use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RECORDS_DIR: &str = "records";
pub const DEFAULT_HISCORES_URL: &str = "https://secure.runescape.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Root holding one directory per tracked account.
    pub records_dir: PathBuf,
    pub hiscores: HiscoresConfig,
}

#[derive(Debug, Clone)]
pub struct HiscoresConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            records_dir: PathBuf::from(DEFAULT_RECORDS_DIR),
            hiscores: HiscoresConfig::default(),
        }
    }
}

impl Default for HiscoresConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HISCORES_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
