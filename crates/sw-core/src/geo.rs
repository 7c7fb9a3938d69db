//! Projected coordinates, bounding boxes, and coordinate reference systems.
//!
//! All geographic quantities are `f64`: landscapes span hundreds of
//! kilometres in metre-based projections, where `f32` would lose whole
//! cells at the far edge.
//!
//! # Supported reprojection
//!
//! Only the pair the scenario inputs actually use is implemented:
//! WGS-84 longitude/latitude (EPSG:4326) ↔ ETRS89-extended / LAEA Europe
//! (EPSG:3035), via the ellipsoidal Lambert azimuthal equal-area formulas
//! (IOGP guidance note 7-2, §3.1.3).  Same-CRS transforms are the identity.

use std::fmt;
use std::str::FromStr;

use crate::{SwError, SwResult};

// ── GeoPoint ─────────────────────────────────────────────────────────────────

/// A coordinate pair in some CRS.  For geographic CRSs `x` is longitude and
/// `y` is latitude, both in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned extent `(x_min, y_min, x_max, y_max)` in a projected CRS.
///
/// Construction validates `x_min < x_max`, `y_min < y_max`, and finiteness,
/// so every `BoundingBox` in circulation has a strictly positive extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> SwResult<Self> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(SwError::Config(format!(
                "bounding box has non-finite values: [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }
        if x_min >= x_max || y_min >= y_max {
            return Err(SwError::Config(format!(
                "bounding box must satisfy x_min < x_max and y_min < y_max, \
                 got [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }
        Ok(Self { x_min, y_min, x_max, y_max })
    }

    /// Build from a `[x_min, y_min, x_max, y_max]` slice (config input order).
    pub fn from_slice(values: &[f64]) -> SwResult<Self> {
        match values {
            [x_min, y_min, x_max, y_max] => Self::new(*x_min, *y_min, *x_max, *y_max),
            other => Err(SwError::Config(format!(
                "bounding box needs exactly 4 numbers, got {}",
                other.len()
            ))),
        }
    }

    #[inline] pub fn x_min(&self) -> f64 { self.x_min }
    #[inline] pub fn y_min(&self) -> f64 { self.y_min }
    #[inline] pub fn x_max(&self) -> f64 { self.x_max }
    #[inline] pub fn y_max(&self) -> f64 { self.y_max }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

// ── Crs ───────────────────────────────────────────────────────────────────────

/// A coordinate reference system identified by its EPSG code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Crs(pub u16);

impl Crs {
    /// WGS-84 geographic longitude/latitude.
    pub const WGS84: Crs = Crs(4326);
    /// ETRS89-extended / LAEA Europe, the default simulation CRS.
    pub const LAEA_EUROPE: Crs = Crs(3035);

    #[inline]
    pub fn epsg(self) -> u16 {
        self.0
    }

    /// `true` for angular (degree-based) systems.
    #[inline]
    pub fn is_geographic(self) -> bool {
        self == Self::WGS84
    }

    /// `true` if points can be transformed from `self` into `target`.
    pub fn can_transform_to(self, target: Crs) -> bool {
        self == target
            || matches!((self, target), (Crs::WGS84, Crs::LAEA_EUROPE) | (Crs::LAEA_EUROPE, Crs::WGS84))
    }

    /// Transform `p` from `self` into `target`.
    ///
    /// Returns `None` for unsupported CRS pairs or points the projection
    /// cannot represent (e.g. the antipode of the LAEA centre).
    pub fn transform(self, target: Crs, p: GeoPoint) -> Option<GeoPoint> {
        match (self, target) {
            (a, b) if a == b => Some(p),
            (Crs::WGS84, Crs::LAEA_EUROPE) => laea::forward(p),
            (Crs::LAEA_EUROPE, Crs::WGS84) => laea::inverse(p),
            _ => None,
        }
    }
}

impl FromStr for Crs {
    type Err = SwError;

    /// Parse `"EPSG:3035"` (case-insensitive prefix) or a bare code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .split_once(':')
            .map(|(authority, code)| {
                if authority.eq_ignore_ascii_case("epsg") {
                    Ok(code)
                } else {
                    Err(SwError::Parse(format!("unsupported CRS authority in {trimmed:?}")))
                }
            })
            .transpose()?
            .unwrap_or(trimmed);
        code.trim()
            .parse::<u16>()
            .map(Crs)
            .map_err(|_| SwError::Parse(format!("invalid EPSG code in {trimmed:?}")))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

// ── LAEA Europe ───────────────────────────────────────────────────────────────

/// Ellipsoidal Lambert azimuthal equal-area on GRS80, parameterised for
/// EPSG:3035.
pub mod laea {
    use super::GeoPoint;

    const A: f64 = 6_378_137.0;
    const INV_F: f64 = 298.257_222_101;
    const LAT0_DEG: f64 = 52.0;
    const LON0_DEG: f64 = 10.0;
    const FALSE_EASTING: f64 = 4_321_000.0;
    const FALSE_NORTHING: f64 = 3_210_000.0;

    /// Derived ellipsoid and origin constants, computed once per call site.
    struct Params {
        e:     f64,
        e2:    f64,
        qp:    f64,
        rq:    f64,
        d:     f64,
        beta0: f64,
    }

    fn q(e: f64, e2: f64, sin_phi: f64) -> f64 {
        (1.0 - e2)
            * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
                - (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
    }

    fn params() -> Params {
        let f = 1.0 / INV_F;
        let e2 = 2.0 * f - f * f;
        let e = e2.sqrt();
        let phi0 = LAT0_DEG.to_radians();
        let qp = q(e, e2, 1.0);
        let q0 = q(e, e2, phi0.sin());
        let beta0 = (q0 / qp).asin();
        let rq = A * (qp / 2.0).sqrt();
        let d = A * (phi0.cos() / (1.0 - e2 * phi0.sin().powi(2)).sqrt()) / (rq * beta0.cos());
        Params { e, e2, qp, rq, d, beta0 }
    }

    /// Longitude/latitude in degrees → easting/northing in metres.
    pub fn forward(p: GeoPoint) -> Option<GeoPoint> {
        let k = params();
        let phi = p.y.to_radians();
        let dlon = (p.x - LON0_DEG).to_radians();

        let beta = (q(k.e, k.e2, phi.sin()) / k.qp).clamp(-1.0, 1.0).asin();
        let denom = 1.0 + k.beta0.sin() * beta.sin() + k.beta0.cos() * beta.cos() * dlon.cos();
        if denom <= f64::EPSILON {
            return None;
        }
        let b = k.rq * (2.0 / denom).sqrt();

        let easting = FALSE_EASTING + b * k.d * beta.cos() * dlon.sin();
        let northing = FALSE_NORTHING
            + (b / k.d) * (k.beta0.cos() * beta.sin() - k.beta0.sin() * beta.cos() * dlon.cos());
        Some(GeoPoint::new(easting, northing))
    }

    /// Easting/northing in metres → longitude/latitude in degrees.
    pub fn inverse(p: GeoPoint) -> Option<GeoPoint> {
        let k = params();
        let de = p.x - FALSE_EASTING;
        let dn = p.y - FALSE_NORTHING;

        let rho = ((de / k.d).powi(2) + (k.d * dn).powi(2)).sqrt();
        if rho < 1e-9 {
            return Some(GeoPoint::new(LON0_DEG, LAT0_DEG));
        }
        let ratio = rho / (2.0 * k.rq);
        if ratio > 1.0 {
            return None;
        }
        let c = 2.0 * ratio.asin();

        let beta_p = (c.cos() * k.beta0.sin() + (k.d * dn * c.sin() * k.beta0.cos()) / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = LON0_DEG.to_radians()
            + (de * c.sin()).atan2(
                k.d * rho * k.beta0.cos() * c.cos() - k.d * k.d * dn * k.beta0.sin() * c.sin(),
            );

        let e4 = k.e2 * k.e2;
        let e6 = e4 * k.e2;
        let lat = beta_p
            + (k.e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta_p).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta_p).sin()
            + (761.0 * e6 / 45360.0) * (6.0 * beta_p).sin();

        Some(GeoPoint::new(lon.to_degrees(), lat.to_degrees()))
    }
}
