//! The mix calculator.
//!
//! [`Mixer::mix`] folds an ordered substance list into a product's effect
//! set, running each substance's rules before merging its own effects, then
//! prices the result. Every call owns its effect set; nothing survives across
//! calls, so a single [`Registry`] can back any number of mixers.

use crate::effect_set::{EffectSet, MAX_EFFECTS};
use crate::id::{EffectId, ProductId, SubstanceId};
use crate::registry::Registry;
use crate::rule::apply_rules;
use crate::serialize::{MixState, decode_mix_state};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which costs are subtracted from the sell price when computing profit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitPolicy {
    /// `sell_price - substance cost - product price`.
    #[default]
    SubstanceAndProductCost,
    /// `sell_price - substance cost`.
    SubstanceCostOnly,
}

/// Tunables for a [`Mixer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixConfig {
    #[serde(default)]
    pub profit_policy: ProfitPolicy,
}

// ---------------------------------------------------------------------------
// Results and errors
// ---------------------------------------------------------------------------

/// The outcome of one mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixResult {
    /// Final effects in canonical order, at most [`MAX_EFFECTS`].
    pub effects: Vec<EffectId>,
    /// Total price of the recognised substances.
    pub cost: u64,
    pub sell_price: u64,
    pub profit: i64,
    /// `profit / sell_price`, rounded to two decimals. `0.0` when the sell
    /// price is zero.
    pub profit_margin: f64,
    /// Summed effect addictiveness, rounded to two decimals.
    pub addiction: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum MixError {
    #[error("unknown product: {0:?}")]
    UnknownProduct(ProductId),
    #[error("unknown product: {0}")]
    UnknownProductName(String),
    #[error("invalid mix token: {0}")]
    InvalidToken(String),
}

// ---------------------------------------------------------------------------
// Mixer
// ---------------------------------------------------------------------------

/// Computes mixes against a frozen registry.
#[derive(Debug, Clone, Copy)]
pub struct Mixer<'a> {
    registry: &'a Registry,
    config: MixConfig,
}

impl<'a> Mixer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self::with_config(registry, MixConfig::default())
    }

    pub fn with_config(registry: &'a Registry, config: MixConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn config(&self) -> MixConfig {
        self.config
    }

    /// Mix `substances`, in order, into `product`.
    ///
    /// Substance ids the registry does not know are skipped.
    pub fn mix(&self, product: ProductId, substances: &[SubstanceId]) -> Result<MixResult, MixError> {
        let product_def = self
            .registry
            .product(product)
            .ok_or(MixError::UnknownProduct(product))?;
        debug!(
            product = %product_def.name,
            substances = substances.len(),
            "computing mix"
        );

        let mut effects = EffectSet::from_ids(product_def.effects.iter().copied());
        let mut cost: u64 = 0;

        for &id in substances {
            let Some(substance) = self.registry.substance(id) else {
                trace!(substance = id.0, "skipping unknown substance");
                continue;
            };
            cost = cost.saturating_add(u64::from(substance.price));

            let outcome = apply_rules(&substance.rules, &mut effects);
            if !outcome.is_noop() {
                trace!(
                    substance = %substance.name,
                    initial = outcome.initial.len(),
                    cascaded = outcome.cascaded.len(),
                    "rules applied"
                );
            }

            for &effect in &substance.effects {
                if effects.len() >= MAX_EFFECTS {
                    trace!(substance = %substance.name, "effect cap reached");
                    break;
                }
                effects.insert(effect);
            }
        }

        let final_effects: Vec<EffectId> = effects.iter().take(MAX_EFFECTS).collect();
        Ok(self.price(product_def.price, final_effects, cost))
    }

    /// Mix by catalog names.
    ///
    /// The product is looked up by name, then by short code; an unknown
    /// product is an error. Each substance key is a single-character code or
    /// a substance name; unknown keys are skipped.
    pub fn mix_named(&self, product: &str, substances: &[&str]) -> Result<MixResult, MixError> {
        let product_id = self
            .registry
            .product_id(product)
            .or_else(|| self.registry.product_by_short_code(product))
            .ok_or_else(|| MixError::UnknownProductName(product.to_string()))?;

        let ids: Vec<SubstanceId> = substances
            .iter()
            .filter_map(|key| {
                let id = self.resolve_substance(key);
                if id.is_none() {
                    trace!(substance = %key, "skipping unknown substance");
                }
                id
            })
            .collect();
        self.mix(product_id, &ids)
    }

    /// Mix a decoded state.
    pub fn mix_state(&self, state: &MixState) -> Result<MixResult, MixError> {
        self.mix(state.product, &state.substances)
    }

    /// Decode a token and mix it.
    pub fn mix_token(&self, token: &str) -> Result<MixResult, MixError> {
        let state = decode_mix_state(self.registry, token)
            .ok_or_else(|| MixError::InvalidToken(token.to_string()))?;
        self.mix_state(&state)
    }

    fn resolve_substance(&self, key: &str) -> Option<SubstanceId> {
        let mut chars = key.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            if let Some(id) = self.registry.substance_by_code(code) {
                return Some(id);
            }
        }
        self.registry.substance_id(key)
    }

    fn price(&self, base_price: u32, effects: Vec<EffectId>, cost: u64) -> MixResult {
        let (multiplier, addictiveness) = effects
            .iter()
            .filter_map(|&id| self.registry.effect(id))
            .fold((0u64, 0u64), |(m, a), e| {
                (
                    m.saturating_add(u64::from(e.multiplier)),
                    a.saturating_add(u64::from(e.addictiveness)),
                )
            });

        // base * (1 + multiplier / 100), rounded half up. Saturates on
        // absurd catalog values instead of overflowing.
        let sell_price = u64::from(base_price)
            .saturating_mul(multiplier.saturating_add(100))
            .saturating_add(50)
            / 100;

        let mut profit = to_i64(sell_price).saturating_sub(to_i64(cost));
        if self.config.profit_policy == ProfitPolicy::SubstanceAndProductCost {
            profit = profit.saturating_sub(i64::from(base_price));
        }

        let profit_margin = if sell_price == 0 {
            0.0
        } else {
            round_percent(profit.saturating_mul(100) as f64 / sell_price as f64)
        };
        let addiction = round_percent(addictiveness as f64 / 10.0);

        MixResult {
            effects,
            cost,
            sell_price,
            profit,
            profit_margin,
            addiction,
        }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Round a percentage to a whole number and return it as a fraction.
fn round_percent(percent: f64) -> f64 {
    percent.round() / 100.0
}
