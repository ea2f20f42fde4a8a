#![no_main]
use arbitrary::Arbitrary;
use mixology_core::effect_set::MAX_EFFECTS;
use mixology_core::id::*;
use mixology_core::mixer::Mixer;
use mixology_core::test_utils::test_registry;
use libfuzzer_sys::fuzz_target;

/// Top-level fuzz input: a product and a substance sequence.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    product: u8,
    substances: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let reg = test_registry();
    let mixer = Mixer::new(&reg);

    // Limit the sequence to prevent timeouts.
    let max = input.substances.len().min(256);
    let substances: Vec<SubstanceId> = input.substances[..max]
        .iter()
        .map(|&raw| SubstanceId(u32::from(raw % 12)))
        .collect();
    let product = ProductId(u32::from(input.product % 4));

    match mixer.mix(product, &substances) {
        Ok(result) => {
            assert!(result.effects.len() <= MAX_EFFECTS);
            assert!(result.effects.windows(2).all(|w| w[0] < w[1]));
        }
        // Product id 3 is outside the fixture.
        Err(_) => assert!(reg.product(product).is_none()),
    }
});
