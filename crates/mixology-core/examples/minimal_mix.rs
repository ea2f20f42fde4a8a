//! Minimal mix example: one product, two substances, one rule.
//!
//! Registers three effects, a base product and two substances, mixes them
//! in both orders, then prints the effects, pricing and shareable token.
//!
//! Run with: `cargo run -p mixology-core --example minimal_mix`

use mixology_core::mixer::{MixResult, Mixer};
use mixology_core::registry::{Registry, RegistryBuilder};
use mixology_core::rule::EffectRule;
use mixology_core::serialize::MixState;

fn print_result(registry: &Registry, label: &str, result: &MixResult) {
    let names: Vec<&str> = result
        .effects
        .iter()
        .filter_map(|&id| registry.effect(id))
        .map(|e| e.name.as_str())
        .collect();
    println!("{label}");
    println!("  effects:  {}", names.join(", "));
    println!(
        "  cost {} | sells for {} | profit {} ({:.0}%) | addiction {:.2}",
        result.cost,
        result.sell_price,
        result.profit,
        result.profit_margin * 100.0,
        result.addiction
    );
}

fn main() {
    // --- Step 1: Build the registry ---

    let mut builder = RegistryBuilder::new();
    // Multipliers are hundredths of the base price, addictiveness thousandths.
    let calming = builder.register_effect("Ca", "Calming", "#fdba74", 10, 0);
    let energizing = builder.register_effect("En", "Energizing", "#a3e635", 22, 340);
    let sedating = builder.register_effect("Se", "Sedating", "#818cf8", 26, 0);
    let bright_eyed = builder.register_effect("Be", "Bright-Eyed", "#67e8f9", 40, 200);

    let og_kush = builder.register_product("OG Kush", 35, vec![calming], "OH");
    let cuke = builder.register_substance("Cuke", 'A', 1, 2, vec![energizing], vec![]);
    let flu = builder.register_substance(
        "Flu Medicine",
        'B',
        4,
        5,
        vec![sedating],
        vec![EffectRule::replace(calming, bright_eyed)],
    );

    let registry = match builder.build() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("invalid registry: {e}");
            return;
        }
    };

    // --- Step 2: Mix in both orders ---

    let mixer = Mixer::new(&registry);
    for (label, order) in [
        ("Cuke, then Flu Medicine", vec![cuke, flu]),
        ("Flu Medicine, then Cuke", vec![flu, cuke]),
    ] {
        match mixer.mix(og_kush, &order) {
            Ok(result) => print_result(&registry, label, &result),
            Err(e) => eprintln!("{label}: {e}"),
        }
    }

    // --- Step 3: Share a mix as a token ---

    let state = MixState::new(og_kush, vec![flu, cuke]);
    match state.to_token(&registry) {
        Ok(token) => {
            println!("token: {token}");
            let decoded = MixState::from_token(&registry, &token);
            println!("decodes back: {}", decoded.as_ref() == Some(&state));
        }
        Err(e) => eprintln!("cannot encode: {e}"),
    }
}
