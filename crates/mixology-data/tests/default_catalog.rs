//! Integration tests against the built-in game catalog.

use mixology_core::effect_set::MAX_EFFECTS;
use mixology_core::mixer::MixResult;
use mixology_core::registry::Registry;
use mixology_core::serialize::{MixState, decode_mix_state, encode_mix_state};
use mixology_data::{Catalog, default_catalog};

fn catalog() -> Catalog {
    default_catalog().expect("built-in catalog loads")
}

fn codes<'a>(reg: &'a Registry, result: &MixResult) -> Vec<&'a str> {
    reg.effect_codes(result.effects.iter().copied())
}

// ===========================================================================
// Catalog contents
// ===========================================================================

#[test]
fn catalog_sizes() {
    let catalog = catalog();
    assert_eq!(catalog.registry.effect_count(), 34);
    assert_eq!(catalog.registry.product_count(), 6);
    assert_eq!(catalog.registry.substance_count(), 16);
}

#[test]
fn effect_values_are_scaled() {
    let catalog = catalog();
    let reg = &catalog.registry;
    let euphoric = reg.effect(reg.effect_id("Eu").unwrap()).unwrap();
    assert_eq!(euphoric.name, "Euphoric");
    assert_eq!(euphoric.multiplier, 18);
    assert_eq!(euphoric.addictiveness, 235);

    let shrinking = reg.effect(reg.effect_id("Sh").unwrap()).unwrap();
    assert_eq!(shrinking.multiplier, 60);
    assert_eq!(reg.effect_by_name("Shrinking"), reg.effect_id("Sh"));
}

#[test]
fn substance_codes_run_a_to_p() {
    let catalog = catalog();
    let reg = &catalog.registry;
    for code in 'A'..='P' {
        assert!(reg.substance_by_code(code).is_some(), "missing code {code}");
    }
    let battery = reg.substance(reg.substance_by_code('P').unwrap()).unwrap();
    assert_eq!(battery.name, "Battery");
    assert_eq!(battery.price, 8);
}

#[test]
fn products_resolve_by_short_code() {
    let catalog = catalog();
    let reg = &catalog.registry;
    assert_eq!(reg.product_by_short_code("GK"), reg.product_id("Green Crack"));
    assert_eq!(reg.product_by_short_code("CE"), reg.product_id("Cocaine"));
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn og_kush_with_cuke() {
    let catalog = catalog();
    let result = catalog.mixer().mix_named("OG Kush", &["Cuke"]).unwrap();
    assert_eq!(codes(&catalog.registry, &result), vec!["Ca", "En"]);
    assert_eq!(result.cost, 2);
    assert_eq!(result.sell_price, 46);
    assert_eq!(result.profit, 9);
    assert_eq!(result.profit_margin, 0.2);
    assert_eq!(result.addiction, 0.34);
}

#[test]
fn flu_medicine_then_cuke() {
    let catalog = catalog();
    let result = catalog.mixer().mix_named("OG Kush", &["B", "A"]).unwrap();
    assert_eq!(codes(&catalog.registry, &result), vec!["En", "Se", "Be"]);
    assert_eq!(result.cost, 7);
    assert_eq!(result.sell_price, 66);
    assert_eq!(result.profit, 24);
    assert_eq!(result.profit_margin, 0.36);
    assert_eq!(result.addiction, 0.54);
}

#[test]
fn motor_oil_cascade() {
    let catalog = catalog();
    // Motor Oil turns Munchies into Schizophrenia, which unblocks
    // Energizing -> Munchies.
    let result = catalog
        .mixer()
        .mix_named("GK", &["Flu Medicine", "Energy Drink", "Motor Oil"])
        .unwrap();
    assert_eq!(codes(&catalog.registry, &result), vec!["At", "Mu", "Sl", "Sc"]);
    assert_eq!(result.cost, 17);
    assert_eq!(result.sell_price, 62);
    assert_eq!(result.profit, 10);
    assert_eq!(result.profit_margin, 0.16);
}

#[test]
fn battery_cascade() {
    let catalog = catalog();
    // Battery turns Electrifying into Euphoric, then Euphoric (no longer
    // blocked) into Zombifying.
    let result = catalog
        .mixer()
        .mix_named("Meth", &["C", "A", "O", "M", "P"])
        .unwrap();
    assert_eq!(codes(&catalog.registry, &result), vec!["En", "Be", "Lf", "Zo"]);
    assert_eq!(result.cost, 33);
    assert_eq!(result.sell_price, 190);
    assert_eq!(result.profit, 87);
    assert_eq!(result.profit_margin, 0.46);
    // 0.34 + 0.2 + 0.607 + 0.598 = 1.745 rounds half away from zero.
    assert_eq!(result.addiction, 1.75);
}

#[test]
fn every_substance_stays_within_cap() {
    let catalog = catalog();
    let reg = &catalog.registry;
    let mut all: Vec<_> = reg.substances().map(|(id, _)| id).collect();
    let mixer = catalog.mixer();
    for (product, _) in reg.products() {
        let forward = mixer.mix(product, &all).unwrap();
        assert!(forward.effects.len() <= MAX_EFFECTS);
        all.reverse();
        let backward = mixer.mix(product, &all).unwrap();
        assert!(backward.effects.len() <= MAX_EFFECTS);
    }
}

// ===========================================================================
// Tokens
// ===========================================================================

#[test]
fn token_matches_known_encoding() {
    let catalog = catalog();
    let reg = &catalog.registry;
    let state = MixState::new(
        reg.product_id("OG Kush").unwrap(),
        vec![
            reg.substance_by_code('B').unwrap(),
            reg.substance_by_code('A').unwrap(),
        ],
    );
    assert_eq!(encode_mix_state(reg, &state).unwrap(), "T0cgS3VzaDpCQQ");
    assert_eq!(decode_mix_state(reg, "T0cgS3VzaDpCQQ"), Some(state));
}

#[test]
fn token_drives_the_mix() {
    let catalog = catalog();
    let mixer = catalog.mixer();
    let by_token = mixer.mix_token("TWV0aDpDQU9NUA").unwrap();
    let by_name = mixer.mix_named("Meth", &["C", "A", "O", "M", "P"]).unwrap();
    assert_eq!(by_token, by_name);
    assert!(mixer.mix_token("R3JlZW4gQ3JhY2s6QkVH").is_ok());
    assert!(mixer.mix_token("not a token").is_err());
}
