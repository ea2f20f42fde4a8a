//! Compact, URL-safe tokens for mix states.
//!
//! A token is `"<product name>:<substance codes>"` encoded as base64url
//! without padding, e.g. OG Kush with Cuke and Flu Medicine is
//! `"OG Kush:AB"` before encoding. Decoding never fails loudly: any token
//! that does not resolve against the registry decodes to `None`.

use crate::id::{ProductId, SubstanceId};
use crate::registry::Registry;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Separates the product name from the substance codes in a decoded token.
pub const TOKEN_SEPARATOR: char = ':';

// ---------------------------------------------------------------------------
// Mix state
// ---------------------------------------------------------------------------

/// A product plus the ordered substances mixed into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixState {
    pub product: ProductId,
    pub substances: Vec<SubstanceId>,
}

impl MixState {
    pub fn new(product: ProductId, substances: Vec<SubstanceId>) -> Self {
        Self {
            product,
            substances,
        }
    }

    /// Encode this state as a token. See [`encode_mix_state`].
    pub fn to_token(&self, registry: &Registry) -> Result<String, EncodeError> {
        encode_mix_state(registry, self)
    }

    /// Decode a token. See [`decode_mix_state`].
    pub fn from_token(registry: &Registry, token: &str) -> Option<Self> {
        decode_mix_state(registry, token)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while encoding a mix state.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("unknown product: {0:?}")]
    UnknownProduct(ProductId),
    #[error("unknown substance: {0:?}")]
    UnknownSubstance(SubstanceId),
}

// ---------------------------------------------------------------------------
// Encoding / decoding
// ---------------------------------------------------------------------------

/// Encode a mix state into a URL-safe token.
pub fn encode_mix_state(registry: &Registry, state: &MixState) -> Result<String, EncodeError> {
    let product = registry
        .product(state.product)
        .ok_or(EncodeError::UnknownProduct(state.product))?;

    let mut payload = String::with_capacity(product.name.len() + 1 + state.substances.len());
    payload.push_str(&product.name);
    payload.push(TOKEN_SEPARATOR);
    for &id in &state.substances {
        let substance = registry
            .substance(id)
            .ok_or(EncodeError::UnknownSubstance(id))?;
        payload.push(substance.code);
    }

    Ok(URL_SAFE_NO_PAD.encode(payload.as_bytes()))
}

/// Decode a token produced by [`encode_mix_state`].
///
/// Trailing `=` padding is tolerated. Returns `None` for malformed base64url,
/// non-UTF-8 payloads, a payload without exactly one separator, or a product
/// or substance code the registry does not know.
pub fn decode_mix_state(registry: &Registry, token: &str) -> Option<MixState> {
    let token = token.trim_end_matches('=');
    if token.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let payload = String::from_utf8(bytes).ok()?;

    let mut parts = payload.split(TOKEN_SEPARATOR);
    let (Some(product_name), Some(codes), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if product_name.is_empty() {
        return None;
    }

    let product = registry.product_id(product_name)?;
    let substances = codes
        .chars()
        .map(|code| registry.substance_by_code(code))
        .collect::<Option<Vec<_>>>()?;

    Some(MixState {
        product,
        substances,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn raw_token(payload: &str) -> String {
        URL_SAFE_NO_PAD.encode(payload.as_bytes())
    }

    #[test]
    fn encode_produces_documented_payload() {
        let reg = test_registry();
        let state = MixState::new(og_kush(&reg), vec![cuke(&reg), flu_medicine(&reg)]);
        let token = encode_mix_state(&reg, &state).unwrap();
        assert_eq!(token, raw_token("OG Kush:AB"));
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn round_trip() {
        let reg = test_registry();
        let state = MixState::new(
            og_kush(&reg),
            vec![cuke(&reg), flu_medicine(&reg), gasoline(&reg)],
        );
        let token = state.to_token(&reg).unwrap();
        assert_eq!(MixState::from_token(&reg, &token), Some(state));
    }

    #[test]
    fn round_trip_empty_substances() {
        let reg = test_registry();
        let state = MixState::new(og_kush(&reg), vec![]);
        let token = encode_mix_state(&reg, &state).unwrap();
        assert_eq!(token, raw_token("OG Kush:"));
        assert_eq!(decode_mix_state(&reg, &token), Some(state));
    }

    #[test]
    fn round_trip_repeated_substances() {
        let reg = test_registry();
        let state = MixState::new(og_kush(&reg), vec![cuke(&reg), cuke(&reg), cuke(&reg)]);
        let token = encode_mix_state(&reg, &state).unwrap();
        assert_eq!(decode_mix_state(&reg, &token), Some(state));
    }

    #[test]
    fn decode_tolerates_padding() {
        let reg = test_registry();
        // A 10-byte payload carries "==" in padded form.
        let token = format!("{}==", raw_token("OG Kush:AB"));
        let state = decode_mix_state(&reg, &token).unwrap();
        assert_eq!(state.substances, vec![cuke(&reg), flu_medicine(&reg)]);
    }

    #[test]
    fn encode_unknown_product_fails() {
        let reg = test_registry();
        let state = MixState::new(ProductId(999), vec![]);
        assert!(matches!(
            encode_mix_state(&reg, &state),
            Err(EncodeError::UnknownProduct(ProductId(999)))
        ));
    }

    #[test]
    fn encode_unknown_substance_fails() {
        let reg = test_registry();
        let state = MixState::new(og_kush(&reg), vec![cuke(&reg), SubstanceId(999)]);
        let err = encode_mix_state(&reg, &state).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownSubstance(SubstanceId(999))));
        assert!(err.to_string().contains("unknown substance"));
    }

    #[test]
    fn decode_rejects_empty() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, ""), None);
        assert_eq!(decode_mix_state(&reg, "=="), None);
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, "not base64!"), None);
        assert_eq!(decode_mix_state(&reg, "a"), None);
        // Standard-alphabet characters are not valid base64url.
        assert_eq!(decode_mix_state(&reg, "T0cgS3VzaDpB+/"), None);
    }

    #[test]
    fn decode_rejects_non_utf8() {
        let reg = test_registry();
        let token = URL_SAFE_NO_PAD.encode([0xFF, 0xFE, b':', b'A']);
        assert_eq!(decode_mix_state(&reg, &token), None);
    }

    #[test]
    fn decode_rejects_missing_separator() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, &raw_token("OG Kush")), None);
    }

    #[test]
    fn decode_rejects_extra_separator() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, &raw_token("OG Kush:A:B")), None);
    }

    #[test]
    fn decode_rejects_unknown_product() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, &raw_token("Purple Haze:A")), None);
        assert_eq!(decode_mix_state(&reg, &raw_token(":A")), None);
    }

    #[test]
    fn decode_rejects_unknown_substance_code() {
        let reg = test_registry();
        assert_eq!(decode_mix_state(&reg, &raw_token("OG Kush:AZ")), None);
        assert_eq!(decode_mix_state(&reg, &raw_token("OG Kush:a")), None);
    }
}
