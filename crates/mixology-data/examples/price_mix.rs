//! Price a mix from the built-in catalog.
//!
//! Takes a product name (or short code) followed by substance codes or
//! names; with no arguments, prices OG Kush with Flu Medicine and Cuke.
//! A single argument is treated as a mix token.
//!
//! Run with: `cargo run -p mixology-data --example price_mix -- "OG Kush" B A`

use mixology_data::default_catalog;

fn main() {
    let catalog = match default_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("failed to load catalog: {e}");
            std::process::exit(1);
        }
    };
    let mixer = catalog.mixer();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => mixer.mix_named("OG Kush", &["Flu Medicine", "Cuke"]),
        [token] => mixer.mix_token(token),
        [product, substances @ ..] => {
            let keys: Vec<&str> = substances.iter().map(String::as_str).collect();
            mixer.mix_named(product, &keys)
        }
    };

    match result {
        Ok(result) => {
            let names: Vec<&str> = result
                .effects
                .iter()
                .filter_map(|&id| catalog.registry.effect(id))
                .map(|e| e.name.as_str())
                .collect();
            println!("effects:     {}", names.join(", "));
            println!("cost:        {}", result.cost);
            println!("sell price:  {}", result.sell_price);
            println!("profit:      {} ({:.2})", result.profit, result.profit_margin);
            println!("addiction:   {:.2}", result.addiction);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
