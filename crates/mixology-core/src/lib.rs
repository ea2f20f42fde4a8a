//! Mixology Core -- the deterministic mixing engine.
//!
//! A mix starts from a base product's effects and folds in an ordered list of
//! substances. Each substance first rewrites the accumulated effects through
//! its transformation rules, then contributes its own effects, up to a cap
//! of eight. The final effect set prices the product.
//!
//! # Per-Substance Pipeline
//!
//! For every substance passed to [`mixer::Mixer::mix`]:
//!
//! 1. **Cost** -- Add the substance's price to the running cost.
//! 2. **Initial rules** -- Rules matching the pre-substance snapshot replace
//!    their source effects.
//! 3. **Cascade rules** -- Rules unblocked by a step-2 removal get one more
//!    chance against the live set.
//! 4. **Merge** -- The substance's own effects are added until the set holds
//!    [`effect_set::MAX_EFFECTS`] effects; the rest are dropped.
//!
//! ```rust,ignore
//! let mixer = Mixer::new(&registry);
//! let result = mixer.mix_named("OG Kush", &["B", "A"])?;
//! assert!(result.effects.contains(&registry.effect_id("Be").unwrap()));
//! ```
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- Immutable catalog of effects, products, and
//!   substances with their rules (frozen at startup).
//! - [`effect_set::EffectSet`] -- Bitmask effect collection with canonical
//!   ascending-id iteration.
//! - [`rule::EffectRule`] / [`rule::apply_rules`] -- Rule data and the
//!   two-phase evaluator.
//! - [`mixer::Mixer`] -- Mix calculator producing [`mixer::MixResult`].
//! - [`serialize`] -- URL-safe mix-state tokens.

pub mod effect_set;
pub mod id;
pub mod mixer;
pub mod registry;
pub mod rule;
pub mod serialize;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
