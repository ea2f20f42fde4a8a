//! Substance transformation rules and the two-phase rule evaluator.
//!
//! Each substance carries an ordered list of [`EffectRule`]s. When the
//! substance is added to a mix, [`apply_rules`] rewrites the live effect set
//! in two passes:
//!
//! 1. **Initial pass** -- every rule whose conditions hold against a snapshot
//!    of the effects taken before the substance was added replaces the
//!    snapshot's matching effects.
//! 2. **Cascade pass** -- rules skipped in the first pass get one more chance
//!    if an effect that blocked them was removed during the first pass and
//!    is still absent.
//!
//! The cascade is limited to a single extra pass, so evaluation is bounded by
//! `2 * rules.len()` rule checks.

use crate::effect_set::EffectSet;
use crate::id::EffectId;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A single `from -> to` effect substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: EffectId,
    pub to: EffectId,
}

/// A conditional effect rewrite attached to a substance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRule {
    /// Effects that must all be present.
    pub if_present: EffectSet,
    /// Effects that must all be absent.
    pub if_not_present: EffectSet,
    /// Ordered substitutions. `from` values are unique within a rule.
    pub replace: Vec<Replacement>,
}

impl EffectRule {
    /// A rule that replaces `from` with `to` whenever `from` is present.
    pub fn replace(from: EffectId, to: EffectId) -> Self {
        Self {
            if_present: EffectSet::from_ids([from]),
            if_not_present: EffectSet::new(),
            replace: vec![Replacement { from, to }],
        }
    }

    /// Add a required-absent effect.
    pub fn unless(mut self, effect: EffectId) -> Self {
        self.if_not_present.insert(effect);
        self
    }

    /// Add a required-present effect.
    pub fn requires(mut self, effect: EffectId) -> Self {
        self.if_present.insert(effect);
        self
    }

    /// Add another substitution.
    pub fn and_replace(mut self, from: EffectId, to: EffectId) -> Self {
        self.replace.push(Replacement { from, to });
        self
    }

    /// Returns `true` if any `from` effect is in `effects`.
    pub fn replaces_any(&self, effects: &EffectSet) -> bool {
        self.replace.iter().any(|r| effects.contains(r.from))
    }

    fn matches_initial(&self, initial: &EffectSet) -> bool {
        initial.contains_all(&self.if_present)
            && initial.is_disjoint(&self.if_not_present)
            && self.replaces_any(initial)
    }

    fn matches_cascade(&self, initial: &EffectSet, live: &EffectSet, removed: &EffectSet) -> bool {
        initial.contains_all(&self.if_present)
            && removed.contains_any(&self.if_not_present)
            && live.is_disjoint(&self.if_not_present)
    }
}

/// What one evaluation did to the effect set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Indices of rules that fired in the initial pass.
    pub initial: Vec<usize>,
    /// Indices of rules that fired in the cascade pass.
    pub cascaded: Vec<usize>,
    /// Every effect replaced by any rule.
    pub processed: EffectSet,
    /// Effects replaced during the initial pass; these unlock cascade rules.
    pub removed: EffectSet,
}

impl RuleOutcome {
    /// Returns `true` if no rule fired.
    pub fn is_noop(&self) -> bool {
        self.initial.is_empty() && self.cascaded.is_empty()
    }
}

/// Apply a substance's rules to the live effect set.
pub fn apply_rules(rules: &[EffectRule], effects: &mut EffectSet) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();
    if rules.is_empty() {
        return outcome;
    }

    let initial = *effects;
    let mut applied = vec![false; rules.len()];

    // Phase 1: conditions checked against the snapshot.
    for (index, rule) in rules.iter().enumerate() {
        if !rule.matches_initial(&initial) {
            continue;
        }
        for r in &rule.replace {
            // First-listed rule wins an effect both rules target.
            if !initial.contains(r.from) || outcome.processed.contains(r.from) {
                continue;
            }
            effects.remove(r.from);
            effects.insert(r.to);
            outcome.processed.insert(r.from);
            outcome.removed.insert(r.from);
        }
        applied[index] = true;
        outcome.initial.push(index);
        trace!(rule = index, "initial rule applied");
    }

    // Phase 2: rules unblocked by a phase-1 removal.
    for (index, rule) in rules.iter().enumerate() {
        if applied[index] {
            continue;
        }
        if !rule.matches_cascade(&initial, effects, &outcome.removed) {
            continue;
        }
        if !rule.replaces_any(effects) {
            continue;
        }
        for r in &rule.replace {
            if effects.contains(r.from) {
                effects.remove(r.from);
                effects.insert(r.to);
                outcome.processed.insert(r.from);
            }
        }
        outcome.cascaded.push(index);
        trace!(rule = index, "cascade rule applied");
    }

    outcome
}
