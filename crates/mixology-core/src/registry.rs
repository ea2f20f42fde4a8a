use crate::effect_set::{EffectSet, MAX_EFFECTS};
use crate::id::*;
use crate::rule::EffectRule;
use crate::serialize::TOKEN_SEPARATOR;
use std::collections::{HashMap, HashSet};

/// An effect definition in the registry.
#[derive(Debug, Clone)]
pub struct EffectDef {
    /// Two-letter code used by data files and rule tables, e.g. `"Ca"`.
    pub code: String,
    pub name: String,
    /// Display colour tag, e.g. `"#fdba74"`.
    pub color: String,
    /// Sell-price multiplier in hundredths (`0.22` is stored as `22`).
    pub multiplier: u32,
    /// Addictiveness in thousandths (`0.235` is stored as `235`).
    pub addictiveness: u32,
}

/// A base product definition.
#[derive(Debug, Clone)]
pub struct ProductDef {
    /// Textual form of the product; also its form inside mix tokens.
    pub name: String,
    pub price: u32,
    /// Starting effects, in declaration order.
    pub effects: Vec<EffectId>,
    /// Abbreviation, e.g. `"OH"` for OG Kush.
    pub short_code: String,
}

/// A mixing substance definition.
#[derive(Debug, Clone)]
pub struct SubstanceDef {
    pub name: String,
    /// Single-character code used in mix tokens.
    pub code: char,
    /// Unlock rank.
    pub rank: u8,
    pub price: u32,
    /// Effects contributed after the rules run, in merge order.
    pub effects: Vec<EffectId>,
    pub rules: Vec<EffectRule>,
}

/// Builder for constructing an immutable Registry.
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    effects: Vec<EffectDef>,
    effect_code_to_id: HashMap<String, EffectId>,
    products: Vec<ProductDef>,
    product_name_to_id: HashMap<String, ProductId>,
    substances: Vec<SubstanceDef>,
    substance_name_to_id: HashMap<String, SubstanceId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an effect. Returns its ID.
    pub fn register_effect(
        &mut self,
        code: &str,
        name: &str,
        color: &str,
        multiplier: u32,
        addictiveness: u32,
    ) -> EffectId {
        // Ids past the bitmask width are rejected by build().
        let id = EffectId(self.effects.len().min(u8::MAX as usize) as u8);
        self.effects.push(EffectDef {
            code: code.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            multiplier,
            addictiveness,
        });
        self.effect_code_to_id.entry(code.to_string()).or_insert(id);
        id
    }

    /// Phase 1: Register a base product. Returns its ID.
    pub fn register_product(
        &mut self,
        name: &str,
        price: u32,
        effects: Vec<EffectId>,
        short_code: &str,
    ) -> ProductId {
        let id = ProductId(self.products.len() as u32);
        self.products.push(ProductDef {
            name: name.to_string(),
            price,
            effects,
            short_code: short_code.to_string(),
        });
        self.product_name_to_id.entry(name.to_string()).or_insert(id);
        id
    }

    /// Phase 1: Register a substance. Returns its ID.
    pub fn register_substance(
        &mut self,
        name: &str,
        code: char,
        rank: u8,
        price: u32,
        effects: Vec<EffectId>,
        rules: Vec<EffectRule>,
    ) -> SubstanceId {
        let id = SubstanceId(self.substances.len() as u32);
        self.substances.push(SubstanceDef {
            name: name.to_string(),
            code,
            rank,
            price,
            effects,
            rules,
        });
        self.substance_name_to_id.entry(name.to_string()).or_insert(id);
        id
    }

    /// Phase 2: Mutate an existing substance by name.
    pub fn mutate_substance<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut SubstanceDef),
    {
        let id = self
            .substance_name_to_id
            .get(name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(&mut self.substances[id.0 as usize]);
        Ok(())
    }

    /// Phase 2: Mutate an existing product by name.
    pub fn mutate_product<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut ProductDef),
    {
        let id = self
            .product_name_to_id
            .get(name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(&mut self.products[id.0 as usize]);
        Ok(())
    }

    /// Lookup effect ID by code.
    pub fn effect_id(&self, code: &str) -> Option<EffectId> {
        self.effect_code_to_id.get(code).copied()
    }

    /// Lookup product ID by name.
    pub fn product_id(&self, name: &str) -> Option<ProductId> {
        self.product_name_to_id.get(name).copied()
    }

    /// Lookup substance ID by name.
    pub fn substance_id(&self, name: &str) -> Option<SubstanceId> {
        self.substance_name_to_id.get(name).copied()
    }

    /// Phase 3: Validate and build the immutable registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if self.effects.len() > EffectSet::CAPACITY {
            return Err(RegistryError::TooManyEffects(self.effects.len()));
        }
        let effect_count = self.effects.len();
        let check_effect = |id: EffectId| {
            if (id.0 as usize) < effect_count {
                Ok(())
            } else {
                Err(RegistryError::InvalidEffectRef(id))
            }
        };

        let mut seen = HashSet::new();
        for effect in &self.effects {
            if !seen.insert(effect.code.as_str()) {
                return Err(RegistryError::Duplicate {
                    kind: "effect code",
                    name: effect.code.clone(),
                });
            }
        }

        // Name maps are rebuilt from the final defs; mutation may rename.
        let mut product_name_to_id = HashMap::new();
        let mut product_short_to_id = HashMap::new();
        for (index, product) in self.products.iter().enumerate() {
            let id = ProductId(index as u32);
            if product.name.is_empty() || product.name.contains(TOKEN_SEPARATOR) {
                return Err(RegistryError::InvalidProductName(product.name.clone()));
            }
            if product_name_to_id.insert(product.name.clone(), id).is_some() {
                return Err(RegistryError::Duplicate {
                    kind: "product",
                    name: product.name.clone(),
                });
            }
            if product_short_to_id
                .insert(product.short_code.clone(), id)
                .is_some()
            {
                return Err(RegistryError::Duplicate {
                    kind: "product short code",
                    name: product.short_code.clone(),
                });
            }
            if product.effects.len() > MAX_EFFECTS {
                return Err(RegistryError::TooManyBaseEffects {
                    product: product.name.clone(),
                    count: product.effects.len(),
                });
            }
            for &effect in &product.effects {
                check_effect(effect)?;
            }
        }

        let mut substance_name_to_id = HashMap::new();
        let mut substance_code_to_id = HashMap::new();
        for (index, substance) in self.substances.iter().enumerate() {
            let id = SubstanceId(index as u32);
            if substance.code == TOKEN_SEPARATOR {
                return Err(RegistryError::InvalidSubstanceCode {
                    substance: substance.name.clone(),
                    code: substance.code,
                });
            }
            if substance_name_to_id
                .insert(substance.name.clone(), id)
                .is_some()
            {
                return Err(RegistryError::Duplicate {
                    kind: "substance",
                    name: substance.name.clone(),
                });
            }
            if substance_code_to_id.insert(substance.code, id).is_some() {
                return Err(RegistryError::Duplicate {
                    kind: "substance code",
                    name: substance.code.to_string(),
                });
            }
            for &effect in &substance.effects {
                check_effect(effect)?;
            }
            for rule in &substance.rules {
                for effect in rule.if_present.iter().chain(rule.if_not_present.iter()) {
                    check_effect(effect)?;
                }
                let mut sources = EffectSet::new();
                for r in &rule.replace {
                    check_effect(r.from)?;
                    check_effect(r.to)?;
                    if !sources.insert(r.from) {
                        return Err(RegistryError::DuplicateReplacement {
                            substance: substance.name.clone(),
                            effect: r.from,
                        });
                    }
                }
            }
        }

        let effect_name_to_id = self
            .effects
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), EffectId(i as u8)))
            .collect();

        Ok(Registry {
            effects: self.effects,
            effect_code_to_id: self.effect_code_to_id,
            effect_name_to_id,
            products: self.products,
            product_name_to_id,
            product_short_to_id,
            substances: self.substances,
            substance_name_to_id,
            substance_code_to_id,
        })
    }
}

/// Immutable registry. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Registry {
    effects: Vec<EffectDef>,
    effect_code_to_id: HashMap<String, EffectId>,
    effect_name_to_id: HashMap<String, EffectId>,
    products: Vec<ProductDef>,
    product_name_to_id: HashMap<String, ProductId>,
    product_short_to_id: HashMap<String, ProductId>,
    substances: Vec<SubstanceDef>,
    substance_name_to_id: HashMap<String, SubstanceId>,
    substance_code_to_id: HashMap<char, SubstanceId>,
}

impl Registry {
    pub fn effect(&self, id: EffectId) -> Option<&EffectDef> {
        self.effects.get(id.0 as usize)
    }

    pub fn product(&self, id: ProductId) -> Option<&ProductDef> {
        self.products.get(id.0 as usize)
    }

    pub fn substance(&self, id: SubstanceId) -> Option<&SubstanceDef> {
        self.substances.get(id.0 as usize)
    }

    pub fn effect_id(&self, code: &str) -> Option<EffectId> {
        self.effect_code_to_id.get(code).copied()
    }

    pub fn effect_by_name(&self, name: &str) -> Option<EffectId> {
        self.effect_name_to_id.get(name).copied()
    }

    pub fn product_id(&self, name: &str) -> Option<ProductId> {
        self.product_name_to_id.get(name).copied()
    }

    pub fn product_by_short_code(&self, short_code: &str) -> Option<ProductId> {
        self.product_short_to_id.get(short_code).copied()
    }

    pub fn substance_id(&self, name: &str) -> Option<SubstanceId> {
        self.substance_name_to_id.get(name).copied()
    }

    pub fn substance_by_code(&self, code: char) -> Option<SubstanceId> {
        self.substance_code_to_id.get(&code).copied()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn substance_count(&self) -> usize {
        self.substances.len()
    }

    pub fn effects(&self) -> impl Iterator<Item = (EffectId, &EffectDef)> {
        self.effects
            .iter()
            .enumerate()
            .map(|(i, e)| (EffectId(i as u8), e))
    }

    pub fn products(&self) -> impl Iterator<Item = (ProductId, &ProductDef)> {
        self.products
            .iter()
            .enumerate()
            .map(|(i, p)| (ProductId(i as u32), p))
    }

    pub fn substances(&self) -> impl Iterator<Item = (SubstanceId, &SubstanceDef)> {
        self.substances
            .iter()
            .enumerate()
            .map(|(i, s)| (SubstanceId(i as u32), s))
    }

    /// Effect codes for the given ids, skipping unknown ids.
    pub fn effect_codes<'a, I>(&'a self, effects: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = EffectId>,
    {
        effects
            .into_iter()
            .filter_map(|id| self.effect(id).map(|e| e.code.as_str()))
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid effect reference: {0:?}")]
    InvalidEffectRef(EffectId),
    #[error("too many effects: {0} (at most {max} supported)", max = EffectSet::CAPACITY)]
    TooManyEffects(usize),
    #[error("product '{product}' has {count} base effects (at most {MAX_EFFECTS})")]
    TooManyBaseEffects { product: String, count: usize },
    #[error("invalid product name: {0:?}")]
    InvalidProductName(String),
    #[error("substance '{substance}' has reserved code {code:?}")]
    InvalidSubstanceCode { substance: String, code: char },
    #[error("duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("substance '{substance}' has a rule replacing {effect:?} twice")]
    DuplicateReplacement { substance: String, effect: EffectId },
}
