//! Extract a fence polygon from repaired GeoJSON-like text.
//!
//! # Accepted envelopes
//!
//! | Top-level `type`      | Ring source                                              |
//! |-----------------------|----------------------------------------------------------|
//! | `Polygon`             | `coordinates[0]` as `[[x, y], …]`; other rings ignored   |
//! | `Polygon`             | `coordinates` as a list of Point features / geometries   |
//! | `Feature`             | its `geometry`, recursively                              |
//! | `FeatureCollection`   | the first Polygon feature, else a ring of Point features |

use geo::{Coord, LineString, Polygon};
use serde_json::Value;
use tracing::debug;

use crate::{FenceError, FenceResult, repair_geometry_text};

/// A ring needs at least three distinct vertices to enclose anything.
const MIN_RING_VERTICES: usize = 3;

/// Repair `text` and extract the fence polygon it describes.
///
/// # Errors
///
/// [`FenceError::Json`] if the repaired text still fails to parse,
/// [`FenceError::MalformedGeometry`] if it parses but holds no usable
/// polygon (unknown envelope, non-numeric coordinates, too few vertices).
pub fn parse_fence(text: &str) -> FenceResult<Polygon<f64>> {
    let repaired = repair_geometry_text(text);
    let value: Value = serde_json::from_str(&repaired)?;
    let polygon = polygon_from_value(&value)?;
    debug!(vertices = polygon.exterior().0.len(), "fence parsed");
    Ok(polygon)
}

fn polygon_from_value(value: &Value) -> FenceResult<Polygon<f64>> {
    match type_of(value)? {
        "Polygon" => polygon_from_coordinates(field(value, "coordinates")?),
        "Feature" => polygon_from_value(field(value, "geometry")?),
        "FeatureCollection" => polygon_from_collection(field(value, "features")?),
        other => Err(malformed(format!("unsupported geometry type {other:?}"))),
    }
}

fn polygon_from_coordinates(coords: &Value) -> FenceResult<Polygon<f64>> {
    let items = as_array(coords, "coordinates")?;
    match items.first() {
        // A list of Point features or Point geometries.
        Some(Value::Object(_)) => {
            let ring = items.iter().map(point_of_feature).collect::<FenceResult<Vec<_>>>()?;
            Ok(Polygon::new(ring_from(ring)?, Vec::new()))
        }
        Some(exterior) => {
            if items.len() > 1 {
                debug!(ignored = items.len() - 1, "fence interior rings ignored");
            }
            let ring = as_array(exterior, "ring")?.iter().map(coord_of).collect::<FenceResult<Vec<_>>>()?;
            Ok(Polygon::new(ring_from(ring)?, Vec::new()))
        }
        None => Err(malformed("polygon has no coordinates")),
    }
}

fn polygon_from_collection(features: &Value) -> FenceResult<Polygon<f64>> {
    let features = as_array(features, "features")?;
    let first_polygon = features.iter().find(|f| {
        f.get("geometry").and_then(|g| g.get("type")).and_then(Value::as_str) == Some("Polygon")
    });
    match first_polygon {
        Some(feature) => polygon_from_value(feature),
        None => {
            let ring = features.iter().map(point_of_feature).collect::<FenceResult<Vec<_>>>()?;
            Ok(Polygon::new(ring_from(ring)?, Vec::new()))
        }
    }
}

/// `[x, y]` of a Point feature (`geometry.coordinates`) or a bare Point
/// geometry (`coordinates`).
fn point_of_feature(value: &Value) -> FenceResult<Coord<f64>> {
    let geometry = value.get("geometry").unwrap_or(value);
    coord_of(field(geometry, "coordinates")?)
}

fn coord_of(value: &Value) -> FenceResult<Coord<f64>> {
    match as_array(value, "coordinate")?.as_slice() {
        [x, y, ..] => Ok(Coord { x: number(x)?, y: number(y)? }),
        _ => Err(malformed(format!("coordinate needs two numbers, got {value}"))),
    }
}

fn ring_from(coords: Vec<Coord<f64>>) -> FenceResult<LineString<f64>> {
    let distinct = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    };
    if distinct < MIN_RING_VERTICES {
        return Err(malformed(format!(
            "ring has {distinct} vertices, needs at least {MIN_RING_VERTICES}"
        )));
    }
    Ok(LineString::new(coords))
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

fn type_of(value: &Value) -> FenceResult<&str> {
    field(value, "type")?
        .as_str()
        .ok_or_else(|| malformed("\"type\" is not a string"))
}

fn field<'a>(value: &'a Value, key: &str) -> FenceResult<&'a Value> {
    value.get(key).ok_or_else(|| malformed(format!("missing {key:?} in {}", abbreviate(value))))
}

fn as_array<'a>(value: &'a Value, what: &str) -> FenceResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| malformed(format!("{what} is not an array: {}", abbreviate(value))))
}

fn number(value: &Value) -> FenceResult<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(format!("expected a number, got {value}")))
}

fn malformed(msg: impl Into<String>) -> FenceError {
    FenceError::MalformedGeometry(msg.into())
}

fn abbreviate(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 60 {
        let cut = (0..=60).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        text.truncate(cut);
        text.push('…');
    }
    text
}
