//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::id::*;
use crate::registry::{Registry, RegistryBuilder};
use crate::rule::EffectRule;

// ===========================================================================
// Fixture registry
// ===========================================================================

/// (code, name, multiplier in hundredths, addictiveness in thousandths)
const FIXTURE_EFFECTS: &[(&str, &str, u32, u32)] = &[
    ("Ca", "Calming", 10, 0),
    ("Re", "Refreshing", 14, 104),
    ("En", "Energizing", 22, 340),
    ("Se", "Sedating", 26, 0),
    ("Be", "Bright-Eyed", 40, 200),
    ("Cd", "Calorie-Dense", 28, 100),
    ("Eu", "Euphoric", 18, 235),
    ("To", "Toxic", 0, 0),
    ("At", "Athletic", 32, 607),
    ("Ba", "Balding", 30, 0),
    ("Sl", "Slippery", 34, 309),
    ("Gi", "Gingeritis", 20, 0),
    ("Sp", "Spicy", 38, 665),
    ("La", "Laxative", 0, 100),
    ("Mu", "Munchies", 12, 96),
    ("Ex", "Explosive", 0, 0),
];

/// A small catalog modelled on the game data: 16 effects, 3 products and
/// 9 substances (`A`..=`I`), with a couple of cascade rules.
pub fn test_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    for &(code, name, multiplier, addictiveness) in FIXTURE_EFFECTS {
        b.register_effect(code, name, "#ffffff", multiplier, addictiveness);
    }
    let e = |code: &str| b.effect_id(code).expect("fixture effect");
    let (ca, en, se, be, cd, eu, to, at, ba, sl, gi, sp, la, mu, ex) = (
        e("Ca"),
        e("En"),
        e("Se"),
        e("Be"),
        e("Cd"),
        e("Eu"),
        e("To"),
        e("At"),
        e("Ba"),
        e("Sl"),
        e("Gi"),
        e("Sp"),
        e("La"),
        e("Mu"),
        e("Ex"),
    );

    b.register_product("OG Kush", 35, vec![ca], "OH");
    b.register_product("Meth", 70, vec![], "MH");
    b.register_product("Cocaine", 150, vec![], "CE");

    b.register_substance(
        "Cuke",
        'A',
        1,
        2,
        vec![en],
        vec![
            EffectRule::replace(to, eu),
            EffectRule::replace(eu, la).unless(to),
            EffectRule::replace(mu, at),
        ],
    );
    b.register_substance(
        "Flu Medicine",
        'B',
        4,
        5,
        vec![se],
        vec![
            EffectRule::replace(ca, be),
            EffectRule::replace(at, mu),
            EffectRule::replace(la, eu),
            EffectRule::replace(eu, to).unless(la),
        ],
    );
    b.register_substance(
        "Gasoline",
        'C',
        5,
        5,
        vec![to],
        vec![EffectRule::replace(en, eu)],
    );
    b.register_substance(
        "Donut",
        'D',
        1,
        3,
        vec![cd],
        vec![EffectRule::replace(cd, ex)],
    );
    b.register_substance(
        "Energy Drink",
        'E',
        6,
        6,
        vec![at],
        vec![EffectRule::replace(se, mu), EffectRule::replace(eu, en)],
    );
    b.register_substance("Mouth Wash", 'F', 3, 4, vec![ba], vec![]);
    b.register_substance(
        "Motor Oil",
        'G',
        7,
        6,
        vec![sl],
        vec![EffectRule::replace(en, mu)],
    );
    b.register_substance("Banana", 'H', 1, 2, vec![gi], vec![]);
    b.register_substance(
        "Chili",
        'I',
        9,
        7,
        vec![sp],
        vec![EffectRule::replace(at, eu)],
    );

    b.build().expect("fixture registry is valid")
}

/// A rule-free catalog: `n` effects, one product (`"Base"`, price 100, no
/// base effects) and `n` substances coded `A`, `B`, ... each contributing its
/// own unique effect.
pub fn plain_registry(n: usize) -> Registry {
    let mut b = RegistryBuilder::new();
    b.register_product("Base", 100, vec![], "BA");
    for i in 0..n {
        let effect = b.register_effect(&format!("P{i}"), &format!("Plain {i}"), "#000000", 5, 10);
        let code = char::from(b'A' + i as u8);
        b.register_substance(&format!("Plain Substance {i}"), code, 1, 1, vec![effect], vec![]);
    }
    b.build().expect("plain registry is valid")
}

// ===========================================================================
// Lookup shortcuts
// ===========================================================================

pub fn effect(reg: &Registry, code: &str) -> EffectId {
    reg.effect_id(code).expect("fixture effect")
}

fn product(reg: &Registry, name: &str) -> ProductId {
    reg.product_id(name).expect("fixture product")
}

fn substance(reg: &Registry, name: &str) -> SubstanceId {
    reg.substance_id(name).expect("fixture substance")
}

pub fn og_kush(reg: &Registry) -> ProductId {
    product(reg, "OG Kush")
}
pub fn meth(reg: &Registry) -> ProductId {
    product(reg, "Meth")
}
pub fn cocaine(reg: &Registry) -> ProductId {
    product(reg, "Cocaine")
}

pub fn cuke(reg: &Registry) -> SubstanceId {
    substance(reg, "Cuke")
}
pub fn flu_medicine(reg: &Registry) -> SubstanceId {
    substance(reg, "Flu Medicine")
}
pub fn gasoline(reg: &Registry) -> SubstanceId {
    substance(reg, "Gasoline")
}
pub fn donut(reg: &Registry) -> SubstanceId {
    substance(reg, "Donut")
}
pub fn energy_drink(reg: &Registry) -> SubstanceId {
    substance(reg, "Energy Drink")
}
pub fn motor_oil(reg: &Registry) -> SubstanceId {
    substance(reg, "Motor Oil")
}
pub fn chili(reg: &Registry) -> SubstanceId {
    substance(reg, "Chili")
}

/// Every fixture substance in code order `A`..=`I`.
pub fn all_substances(reg: &Registry) -> Vec<SubstanceId> {
    ('A'..='I')
        .map(|code| reg.substance_by_code(code).expect("fixture substance code"))
        .collect()
}
