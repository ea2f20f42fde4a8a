use serde::{Deserialize, Serialize};

/// Identifies an effect in the registry. Doubles as the effect's bit position
/// inside an [`EffectSet`](crate::effect_set::EffectSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u8);

/// Identifies a base product in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Identifies a mixing substance in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubstanceId(pub u32);
