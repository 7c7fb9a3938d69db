//! Run configuration from the environment or one YAML file.
//!
//! | Key              | Required | Default          | Example                                |
//! |------------------|----------|------------------|----------------------------------------|
//! | `INPUT_MAP`      | yes      |                  | `habitat.tif`                          |
//! | `INPUT_DIR`      | no       | `/code/outputs`  | `/data`                                |
//! | `COMPUTED_AREA`  | yes      |                  | `[4_506_779, 3_052_929, 4_855_174, 3_353_689]` |
//! | `RELEASE_COORDS` | yes      |                  | `[4_650_000, 3_200_000]`               |
//! | `FENCE_COORDS`   | no       | no fence         | `{type: Polygon, coordinates: …}`      |
//! | `OUTPUT_DIR`     | yes      |                  | `/out`                                 |
//! | `TARGET_CRS`     | no       | `EPSG:3035`      | `EPSG:3035`                            |
//! | `RESOLUTION`     | no       | `2000`           | `1000`                                 |
//! | `NUM_TICKS`      | no       | `scenario.num_ticks` | `520`                              |
//! | `SEED`           | no       | `42`             | `7`                                    |
//!
//! When `CONFIG_FILE` is set and non-empty the same keys are read from that
//! YAML mapping instead, which may also hold a `scenario:` block (see
//! [`Scenario`]).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use sw_core::{BoundingBox, Crs, GeoPoint};

use crate::{ConfigError, Scenario};

pub const DEFAULT_INPUT_DIR: &str = "/code/outputs";
pub const DEFAULT_RESOLUTION: f64 = 2_000.0;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Landscape raster, already joined onto `INPUT_DIR`.
    pub input_map:      PathBuf,
    pub computed_area:  BoundingBox,
    /// Release point in `target_crs` coordinates.
    pub release_coords: GeoPoint,
    /// Raw fence text; `None` when absent or empty.
    pub fence_coords:   Option<String>,
    pub output_dir:     PathBuf,
    pub target_crs:     Crs,
    /// Map units per cell.
    pub resolution:     f64,
    pub seed:           u64,
    pub scenario:       Scenario,
}

impl RunConfig {
    /// Read `CONFIG_FILE` if set, else the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml(Path::new(&path)),
            _ => Self::from_lookup(|key| std::env::var(key).ok()),
        }
    }

    pub fn from_yaml(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "reading config file");
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let Value::Mapping(mut doc) = serde_yaml::from_str::<Value>(text)? else {
            return Err(ConfigError::Invalid { key: "CONFIG_FILE", message: "top level must be a mapping".into() });
        };
        let scenario = match doc.remove("scenario") {
            Some(value) => serde_yaml::from_value(value)?,
            None => Scenario::default(),
        };
        let mut keys = BTreeMap::new();
        for (key, value) in doc {
            let Value::String(key) = key else { continue };
            if let Some(text) = yaml_text(&value) {
                keys.insert(key, text);
            }
        }
        Self::build(|key| keys.get(key).cloned(), scenario)
    }

    /// Read keys through `lookup` (e.g. `std::env::var`), with the default
    /// scenario.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::build(lookup, Scenario::default())
    }

    fn build(lookup: impl Fn(&str) -> Option<String>, mut scenario: Scenario) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let input_dir = get("INPUT_DIR").unwrap_or_else(|| DEFAULT_INPUT_DIR.to_owned());
        let input_map = Path::new(&input_dir).join(required("INPUT_MAP")?);

        let area = parse_numbers("COMPUTED_AREA", &required("COMPUTED_AREA")?, 4)?;
        let computed_area = BoundingBox::from_slice(&area)
            .map_err(|e| ConfigError::Invalid { key: "COMPUTED_AREA", message: e.to_string() })?;

        let release = parse_numbers("RELEASE_COORDS", &required("RELEASE_COORDS")?, 2)?;
        let release_coords = GeoPoint::new(release[0], release[1]);

        let target_crs = match get("TARGET_CRS") {
            Some(text) => text
                .parse::<Crs>()
                .map_err(|e| ConfigError::Invalid { key: "TARGET_CRS", message: e.to_string() })?,
            None => Crs::LAEA_EUROPE,
        };

        let resolution = match get("RESOLUTION") {
            Some(text) => parse_scalar::<f64>("RESOLUTION", &text)?,
            None => DEFAULT_RESOLUTION,
        };
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ConfigError::Invalid { key: "RESOLUTION", message: format!("must be > 0, got {resolution}") });
        }

        if let Some(text) = get("NUM_TICKS") {
            scenario.num_ticks = parse_scalar("NUM_TICKS", &text)?;
        }
        let seed = get("SEED").map_or(Ok(DEFAULT_SEED), |text| parse_scalar("SEED", &text))?;

        Ok(Self {
            input_map,
            computed_area,
            release_coords,
            fence_coords: get("FENCE_COORDS"),
            output_dir: PathBuf::from(required("OUTPUT_DIR")?),
            target_crs,
            resolution,
            seed,
            scenario,
        })
    }
}

/// Parse a list literal such as `[4_506_779, 3_052_929]` or `(1, 2)` holding
/// exactly `count` numbers.  Digit-group underscores are allowed.
pub fn parse_numbers(key: &'static str, text: &str, count: usize) -> Result<Vec<f64>, ConfigError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .or_else(|| trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
        .unwrap_or(trimmed);
    let numbers = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_scalar::<f64>(key, s))
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.len() != count {
        return Err(ConfigError::Invalid {
            key,
            message: format!("expected {count} numbers, got {} in {trimmed:?}", numbers.len()),
        });
    }
    if let Some(bad) = numbers.iter().find(|v| !v.is_finite()) {
        return Err(ConfigError::Invalid { key, message: format!("non-finite value {bad}") });
    }
    Ok(numbers)
}

fn parse_scalar<T: std::str::FromStr>(key: &'static str, text: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let cleaned: String = text.trim().chars().filter(|&c| c != '_').collect();
    cleaned
        .parse()
        .map_err(|e| ConfigError::Invalid { key, message: format!("{text:?}: {e}") })
}

/// Render a YAML scalar or sequence the way the environment would carry it.
fn yaml_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().filter_map(yaml_text).collect();
            Some(format!("[{}]", parts.join(", ")))
        }
        Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
