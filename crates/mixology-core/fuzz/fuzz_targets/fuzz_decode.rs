#![no_main]
use libfuzzer_sys::fuzz_target;
use mixology_core::mixer::Mixer;
use mixology_core::serialize::{decode_mix_state, encode_mix_state};
use mixology_core::test_utils::test_registry;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary text to the token decoder.
    // Must not panic -- returning None is fine.
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let reg = test_registry();
    if let Some(state) = decode_mix_state(&reg, token) {
        // Anything that decodes must re-encode and mix cleanly.
        let reencoded = encode_mix_state(&reg, &state).expect("decoded state re-encodes");
        assert_eq!(decode_mix_state(&reg, &reencoded), Some(state.clone()));
        Mixer::new(&reg).mix_state(&state).expect("decoded state mixes");
    }
});
