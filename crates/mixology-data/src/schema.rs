//! Serde data file structs for catalog definitions.
//!
//! These structs define the on-disk format for effects, products,
//! substances and mixer settings. They are deserialized from RON, JSON, or
//! TOML data files and then resolved into registry types by the loader.
//! Effects are referenced everywhere by their two-letter code.

use serde::Deserialize;

// ===========================================================================
// Effects
// ===========================================================================

/// An effect definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectData {
    pub code: String,
    pub name: String,
    /// Sell-price multiplier as a fraction, e.g. `0.22`.
    pub multiplier: f64,
    #[serde(default)]
    pub addictiveness: f64,
    #[serde(default)]
    pub color: String,
}

// ===========================================================================
// Products
// ===========================================================================

/// A base product definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub price: u32,
    #[serde(default)]
    pub effects: Vec<String>,
    pub short_code: String,
}

// ===========================================================================
// Substances
// ===========================================================================

/// A substance definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SubstanceData {
    pub name: String,
    /// Must be exactly one character.
    pub code: String,
    pub rank: u8,
    pub price: u32,
    pub effects: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleData>,
}

/// A transformation rule in a data file.
///
/// `replace` pairs are `(from, to)` effect codes. When `if_present` is
/// empty the rule requires every `from` effect, which is the common
/// single-replacement case.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleData {
    #[serde(default)]
    pub if_present: Vec<String>,
    #[serde(default)]
    pub if_not_present: Vec<String>,
    pub replace: Vec<(String, String)>,
}

// ===========================================================================
// Mixer settings
// ===========================================================================

/// Optional mixer settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MixerData {
    #[serde(default)]
    pub profit_policy: ProfitPolicyData,
}

/// Which costs profit subtracts from the sell price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitPolicyData {
    #[default]
    SubstanceAndProductCost,
    SubstanceCostOnly,
}

// ===========================================================================
// TOML wrappers
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TomlEffects {
    pub effects: Vec<EffectData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlProducts {
    pub products: Vec<ProductData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlSubstances {
    pub substances: Vec<SubstanceData>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_data_from_ron() {
        let ron_str = r##"(code: "En", name: "Energizing", multiplier: 0.22, addictiveness: 0.34, color: "#a3e635")"##;
        let effect: EffectData = ron::from_str(ron_str).unwrap();
        assert_eq!(effect.code, "En");
        assert_eq!(effect.name, "Energizing");
        assert_eq!(effect.multiplier, 0.22);
        assert_eq!(effect.addictiveness, 0.34);
        assert_eq!(effect.color, "#a3e635");
    }

    #[test]
    fn effect_data_defaults_from_ron() {
        let ron_str = r#"(code: "To", name: "Toxic", multiplier: 0.0)"#;
        let effect: EffectData = ron::from_str(ron_str).unwrap();
        assert_eq!(effect.addictiveness, 0.0);
        assert!(effect.color.is_empty());
    }

    #[test]
    fn product_data_from_ron() {
        let ron_str = r#"(name: "OG Kush", price: 35, effects: ["Ca"], short_code: "OH")"#;
        let product: ProductData = ron::from_str(ron_str).unwrap();
        assert_eq!(product.name, "OG Kush");
        assert_eq!(product.price, 35);
        assert_eq!(product.effects, vec!["Ca"]);
        assert_eq!(product.short_code, "OH");
    }

    #[test]
    fn product_without_effects_from_ron() {
        let ron_str = r#"(name: "Meth", price: 70, short_code: "MH")"#;
        let product: ProductData = ron::from_str(ron_str).unwrap();
        assert!(product.effects.is_empty());
    }

    #[test]
    fn substance_data_from_ron() {
        let ron_str = r#"(
            name: "Cuke",
            code: "A",
            rank: 1,
            price: 2,
            effects: ["En"],
            rules: [
                (replace: [("To", "Eu")]),
                (replace: [("Eu", "La")], if_not_present: ["To"]),
            ],
        )"#;
        let substance: SubstanceData = ron::from_str(ron_str).unwrap();
        assert_eq!(substance.code, "A");
        assert_eq!(substance.rules.len(), 2);
        assert!(substance.rules[0].if_present.is_empty());
        assert_eq!(substance.rules[1].if_not_present, vec!["To"]);
        assert_eq!(
            substance.rules[1].replace,
            vec![("Eu".to_string(), "La".to_string())]
        );
    }

    #[test]
    fn rule_with_explicit_conditions_from_ron() {
        let ron_str = r#"(if_present: ["Ca", "En"], replace: [("Ca", "Be"), ("En", "Tp")])"#;
        let rule: RuleData = ron::from_str(ron_str).unwrap();
        assert_eq!(rule.if_present, vec!["Ca", "En"]);
        assert_eq!(rule.replace.len(), 2);
    }

    #[test]
    fn substance_data_from_json() {
        let json_str = r#"{
            "name": "Gasoline",
            "code": "C",
            "rank": 5,
            "price": 5,
            "effects": ["To"],
            "rules": [{"replace": [["En", "Eu"]]}]
        }"#;
        let substance: SubstanceData = serde_json::from_str(json_str).unwrap();
        assert_eq!(substance.name, "Gasoline");
        assert_eq!(substance.rules[0].replace[0].0, "En");
    }

    #[test]
    fn effects_from_toml() {
        let toml_str = r#"
[[effects]]
code = "Ca"
name = "Calming"
multiplier = 0.1

[[effects]]
code = "Re"
name = "Refreshing"
multiplier = 0.14
addictiveness = 0.104
"#;
        let wrapper: TomlEffects = toml::from_str(toml_str).unwrap();
        assert_eq!(wrapper.effects.len(), 2);
        assert_eq!(wrapper.effects[1].code, "Re");
    }

    #[test]
    fn products_from_toml() {
        let toml_str = r#"
[[products]]
name = "Cocaine"
price = 150
short_code = "CE"
"#;
        let wrapper: TomlProducts = toml::from_str(toml_str).unwrap();
        assert_eq!(wrapper.products[0].price, 150);
    }

    #[test]
    fn substances_from_toml() {
        let toml_str = r#"
[[substances]]
name = "Donut"
code = "D"
rank = 1
price = 3
effects = ["Cd"]

[[substances.rules]]
replace = [["Cd", "Ex"]]
"#;
        let wrapper: TomlSubstances = toml::from_str(toml_str).unwrap();
        assert_eq!(wrapper.substances[0].rules.len(), 1);
        assert_eq!(wrapper.substances[0].rules[0].replace[0].1, "Ex");
    }

    #[test]
    fn mixer_data_from_ron() {
        let data: MixerData = ron::from_str("(profit_policy: substance_cost_only)").unwrap();
        assert_eq!(data.profit_policy, ProfitPolicyData::SubstanceCostOnly);
        let data: MixerData = ron::from_str("()").unwrap();
        assert_eq!(data.profit_policy, ProfitPolicyData::SubstanceAndProductCost);
    }

    #[test]
    fn mixer_data_from_toml() {
        let data: MixerData = toml::from_str(r#"profit_policy = "substance_cost_only""#).unwrap();
        assert_eq!(data.profit_policy, ProfitPolicyData::SubstanceCostOnly);
    }

    #[test]
    fn unknown_profit_policy_is_rejected() {
        let result: Result<MixerData, _> = ron::from_str("(profit_policy: everything)");
        assert!(result.is_err());
    }
}
