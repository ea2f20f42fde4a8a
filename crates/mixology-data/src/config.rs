//! Mixer settings loaded from the optional `mixer` data file.

use mixology_core::mixer::{MixConfig, ProfitPolicy};
use std::path::Path;
use tracing::debug;

use crate::loader::{DataLoadError, deserialize_file};
use crate::schema::{MixerData, ProfitPolicyData};

impl From<ProfitPolicyData> for ProfitPolicy {
    fn from(data: ProfitPolicyData) -> Self {
        match data {
            ProfitPolicyData::SubstanceAndProductCost => ProfitPolicy::SubstanceAndProductCost,
            ProfitPolicyData::SubstanceCostOnly => ProfitPolicy::SubstanceCostOnly,
        }
    }
}

impl From<MixerData> for MixConfig {
    fn from(data: MixerData) -> Self {
        MixConfig {
            profit_policy: data.profit_policy.into(),
        }
    }
}

/// Load mixer settings from a RON, TOML, or JSON file.
pub fn load_mixer_config(path: &Path) -> Result<MixConfig, DataLoadError> {
    let data: MixerData = deserialize_file(path)?;
    let config = MixConfig::from(data);
    debug!(file = %path.display(), policy = ?config.profit_policy, "mixer settings loaded");
    Ok(config)
}
