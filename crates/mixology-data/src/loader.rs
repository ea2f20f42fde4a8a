//! Resolution pipeline: reads catalog files, resolves effect codes, builds the registry.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and deserialization
//! helpers, plus [`load_catalog`] for a data directory and [`default_catalog`]
//! for the built-in game data.

use mixology_core::effect_set::EffectSet;
use mixology_core::id::EffectId;
use mixology_core::mixer::{MixConfig, Mixer};
use mixology_core::registry::{Registry, RegistryBuilder, RegistryError};
use mixology_core::rule::{EffectRule, Replacement};
use mixology_core::serialize::TOKEN_SEPARATOR;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::load_mixer_config;
use crate::schema::{EffectData, ProductData, RuleData, SubstanceData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A substance code is not exactly one character.
    #[error("substance '{name}' in {file} has code '{code}' (expected one character)")]
    InvalidCode {
        file: PathBuf,
        name: String,
        code: String,
    },

    /// A numeric field is negative, non-finite, or too large.
    #[error("invalid {field} {value} for '{name}' in {file}")]
    InvalidValue {
        file: PathBuf,
        name: String,
        field: &'static str,
        value: f64,
    },

    /// The resolved catalog failed registry validation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse<T: DeserializeOwned>(content: &str, format: Format, file: &Path) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse(&content, format, path)
}

/// Deserialize a list from in-memory text. For TOML, extracts the array at
/// `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`. `origin` names the source in error messages.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    toml_key: &str,
    origin: &Path,
) -> Result<Vec<T>, DataLoadError> {
    if format != Format::Toml {
        return parse(content, format, origin);
    }

    let mut table: toml::Table = parse(content, format, origin)?;
    let array = table.remove(toml_key).ok_or_else(|| DataLoadError::Parse {
        file: origin.to_path_buf(),
        detail: format!("missing key '{toml_key}' in TOML file"),
    })?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| DataLoadError::Parse {
            file: origin.to_path_buf(),
            detail: e.to_string(),
        })
}

/// Deserialize a list from a file. See [`parse_list`].
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, toml_key, path)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Catalog
// ===========================================================================

/// A resolved catalog: the frozen registry plus mixer settings.
#[derive(Debug)]
pub struct Catalog {
    pub registry: Registry,
    pub config: MixConfig,
}

impl Catalog {
    /// A mixer over this catalog using its configured settings.
    pub fn mixer(&self) -> Mixer<'_> {
        Mixer::with_config(&self.registry, self.config)
    }
}

/// Parsed entries of one catalog file, tagged with where they came from.
struct Source<T> {
    file: PathBuf,
    items: Vec<T>,
}

impl<T: DeserializeOwned> Source<T> {
    fn read(dir: &Path, base_name: &'static str) -> Result<Self, DataLoadError> {
        let file = require_data_file(dir, base_name)?;
        let items = deserialize_list(&file, base_name)?;
        Ok(Self { file, items })
    }

    fn embedded(content: &str, base_name: &'static str) -> Result<Self, DataLoadError> {
        let file = PathBuf::from(format!("{base_name}.ron"));
        let items = parse_list(content, Format::Ron, base_name, &file)?;
        Ok(Self { file, items })
    }
}

/// Load a catalog from a directory.
///
/// Requires `effects`, `products` and `substances` files; an optional
/// `mixer` file supplies [`MixConfig`]. Each may be RON, TOML, or JSON.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let effects = Source::read(dir, "effects")?;
    let products = Source::read(dir, "products")?;
    let substances = Source::read(dir, "substances")?;
    let registry = resolve_registry(&effects, &products, &substances)?;

    let config = match find_data_file(dir, "mixer")? {
        Some(path) => load_mixer_config(&path)?,
        None => MixConfig::default(),
    };

    debug!(
        dir = %dir.display(),
        effects = registry.effect_count(),
        products = registry.product_count(),
        substances = registry.substance_count(),
        "catalog loaded"
    );
    Ok(Catalog { registry, config })
}

const DEFAULT_EFFECTS: &str = include_str!("../data/effects.ron");
const DEFAULT_PRODUCTS: &str = include_str!("../data/products.ron");
const DEFAULT_SUBSTANCES: &str = include_str!("../data/substances.ron");

/// The built-in game catalog: 34 effects, 6 products and 16 substances.
pub fn default_catalog() -> Result<Catalog, DataLoadError> {
    let effects = Source::embedded(DEFAULT_EFFECTS, "effects")?;
    let products = Source::embedded(DEFAULT_PRODUCTS, "products")?;
    let substances = Source::embedded(DEFAULT_SUBSTANCES, "substances")?;
    let registry = resolve_registry(&effects, &products, &substances)?;
    Ok(Catalog {
        registry,
        config: MixConfig::default(),
    })
}

fn resolve_registry(
    effects: &Source<EffectData>,
    products: &Source<ProductData>,
    substances: &Source<SubstanceData>,
) -> Result<Registry, DataLoadError> {
    let mut builder = RegistryBuilder::new();

    let mut effect_codes: HashMap<String, EffectId> = HashMap::new();
    for effect in &effects.items {
        check_duplicate(&effect_codes, &effect.code, &effects.file)?;
        let multiplier = scaled(effect.multiplier, 100, "multiplier", &effect.name, &effects.file)?;
        let addictiveness = scaled(
            effect.addictiveness,
            1000,
            "addictiveness",
            &effect.name,
            &effects.file,
        )?;
        let id = builder.register_effect(
            &effect.code,
            &effect.name,
            &effect.color,
            multiplier,
            addictiveness,
        );
        effect_codes.insert(effect.code.clone(), id);
    }

    let mut product_names = HashMap::new();
    for product in &products.items {
        check_duplicate(&product_names, &product.name, &products.file)?;
        let base = resolve_effects(&product.effects, &effect_codes, &products.file)?;
        let id = builder.register_product(&product.name, product.price, base, &product.short_code);
        product_names.insert(product.name.clone(), id);
    }

    let mut substance_names = HashMap::new();
    for substance in &substances.items {
        check_duplicate(&substance_names, &substance.name, &substances.file)?;
        let code = single_char(&substance.code).ok_or_else(|| DataLoadError::InvalidCode {
            file: substances.file.clone(),
            name: substance.name.clone(),
            code: substance.code.clone(),
        })?;
        let own = resolve_effects(&substance.effects, &effect_codes, &substances.file)?;
        let rules = substance
            .rules
            .iter()
            .map(|rule| resolve_rule(rule, &effect_codes, &substances.file))
            .collect::<Result<Vec<_>, DataLoadError>>()?;
        let id = builder.register_substance(
            &substance.name,
            code,
            substance.rank,
            substance.price,
            own,
            rules,
        );
        substance_names.insert(substance.name.clone(), id);
    }

    Ok(builder.build()?)
}

fn resolve_effects(
    codes: &[String],
    effect_codes: &HashMap<String, EffectId>,
    file: &Path,
) -> Result<Vec<EffectId>, DataLoadError> {
    codes
        .iter()
        .map(|code| resolve_name(effect_codes, code, file, "effect").copied())
        .collect()
}

fn resolve_rule(
    rule: &RuleData,
    effect_codes: &HashMap<String, EffectId>,
    file: &Path,
) -> Result<EffectRule, DataLoadError> {
    let replace = rule
        .replace
        .iter()
        .map(|(from, to)| {
            Ok(Replacement {
                from: *resolve_name(effect_codes, from, file, "effect")?,
                to: *resolve_name(effect_codes, to, file, "effect")?,
            })
        })
        .collect::<Result<Vec<_>, DataLoadError>>()?;

    let if_present: EffectSet = if rule.if_present.is_empty() {
        replace.iter().map(|r| r.from).collect()
    } else {
        resolve_effects(&rule.if_present, effect_codes, file)?
            .into_iter()
            .collect()
    };
    let if_not_present: EffectSet = resolve_effects(&rule.if_not_present, effect_codes, file)?
        .into_iter()
        .collect();

    Ok(EffectRule {
        if_present,
        if_not_present,
        replace,
    })
}

/// A substance code: exactly one character, never the token separator.
fn single_char(code: &str) -> Option<char> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != TOKEN_SEPARATOR => Some(c),
        _ => None,
    }
}

/// Convert a fractional value to integer units of `1 / scale`.
fn scaled(
    value: f64,
    scale: u32,
    field: &'static str,
    name: &str,
    file: &Path,
) -> Result<u32, DataLoadError> {
    let units = (value * f64::from(scale)).round();
    if !value.is_finite() || value < 0.0 || units > f64::from(u32::MAX) {
        return Err(DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            name: name.to_string(),
            field,
            value,
        });
    }
    Ok(units as u32)
}

// ===========================================================================
// Tests
// ===========================================================================
