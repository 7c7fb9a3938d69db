//! Minimal single-band GeoTIFF reader and writer.
//!
//! # What is read
//!
//! | Tag                    | Required | Use                                   |
//! |------------------------|----------|---------------------------------------|
//! | `ModelPixelScaleTag`   | yes      | pixel width / height in map units     |
//! | `ModelTiepointTag`     | yes      | map coordinate of a raster pixel      |
//! | `GeoKeyDirectoryTag`   | no       | EPSG code of the raster's CRS         |
//!
//! Rotated rasters (`ModelTransformationTag`) are not supported and fail with
//! [`LandscapeError::GeoProcessing`].  Multi-band rasters are rejected for the
//! same reason: a breeding-capacity map is one value per cell.
//!
//! # What is written
//!
//! `write_geotiff` emits one image with the pixel scale, a tiepoint at the
//! top-left corner of the grid, and a three-key GeoKey directory
//! (model type, raster-is-area, CRS code).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{TiffEncoder, TiffValue, colortype};
use tiff::tags::Tag;
use tiff::ColorType;

use sw_core::{Crs, GeoPoint, GridSpec};

use crate::{LandscapeError, LandscapeResult};

// ── GeoKey constants ──────────────────────────────────────────────────────────

const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const USER_DEFINED: u32 = 32767;

// ── SourceRaster ──────────────────────────────────────────────────────────────

/// A decoded, north-up raster in its own CRS.
#[derive(Clone, Debug)]
pub struct SourceRaster {
    pub width:      usize,
    pub height:     usize,
    /// Row-major sample values, first row is the northernmost.
    pub data:       Vec<f64>,
    /// Map coordinate of the top-left corner of pixel (0, 0).
    pub origin:     GeoPoint,
    /// `(pixel_width, pixel_height)` in map units, both positive.
    pub pixel_size: (f64, f64),
    /// CRS from the GeoKey directory, if declared with an EPSG code.
    pub crs:        Option<Crs>,
}

impl SourceRaster {
    /// Nearest-pixel sample at map coordinate `p`, or `None` outside the
    /// raster's extent.
    pub fn sample(&self, p: GeoPoint) -> Option<f64> {
        let col = ((p.x - self.origin.x) / self.pixel_size.0).floor();
        let row = ((self.origin.y - p.y) / self.pixel_size.1).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some(self.data[row as usize * self.width + col as usize])
    }
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Decode a single-band GeoTIFF.
pub fn read_geotiff(path: &Path) -> LandscapeResult<SourceRaster> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(LandscapeError::GeoProcessing(format!(
                "{}: expected a single-band raster, found {other:?}",
                path.display()
            )));
        }
    }

    if decoder.find_tag(Tag::ModelTransformationTag)?.is_some() {
        return Err(LandscapeError::GeoProcessing(format!(
            "{}: rotated rasters (ModelTransformationTag) are not supported",
            path.display()
        )));
    }

    let scale = required_f64_tag(&mut decoder, Tag::ModelPixelScaleTag, path)?;
    let tiepoint = required_f64_tag(&mut decoder, Tag::ModelTiepointTag, path)?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(LandscapeError::GeoProcessing(format!(
            "{}: malformed georeferencing tags",
            path.display()
        )));
    }
    let pixel_size = (scale[0], scale[1]);
    if !(pixel_size.0 > 0.0 && pixel_size.1 > 0.0) {
        return Err(LandscapeError::GeoProcessing(format!(
            "{}: non-positive pixel scale {pixel_size:?}",
            path.display()
        )));
    }
    // Tiepoint (i, j, k, x, y, z): raster pixel (i, j) sits at map (x, y).
    let origin = GeoPoint::new(
        tiepoint[3] - tiepoint[0] * pixel_size.0,
        tiepoint[4] + tiepoint[1] * pixel_size.1,
    );

    let crs = match decoder.find_tag(Tag::GeoKeyDirectoryTag)? {
        Some(value) => crs_from_geokeys(&value.into_u32_vec()?),
        None => None,
    };

    let data = to_f64(decoder.read_image()?)?;
    if data.len() != width * height {
        return Err(LandscapeError::GeoProcessing(format!(
            "{}: decoded {} samples for a {width}×{height} raster",
            path.display(),
            data.len()
        )));
    }

    Ok(SourceRaster { width, height, data, origin, pixel_size, crs })
}

fn required_f64_tag<R>(decoder: &mut Decoder<R>, tag: Tag, path: &Path) -> LandscapeResult<Vec<f64>>
where
    R: std::io::Read + std::io::Seek,
{
    match decoder.find_tag(tag)? {
        Some(value) => Ok(value.into_f64_vec()?),
        None => Err(LandscapeError::GeoProcessing(format!(
            "{}: missing {tag:?}; raster is not geo-referenced",
            path.display()
        ))),
    }
}

/// Extract the EPSG code from a GeoKey directory.
///
/// Directory layout: a 4-entry header whose last entry is the key count,
/// then `(key_id, tag_location, count, value)` quadruples.  Only keys stored
/// inline (`tag_location == 0`) are considered.
fn crs_from_geokeys(dir: &[u32]) -> Option<Crs> {
    let count = *dir.get(3)? as usize;
    dir.get(4..4 + count * 4)?
        .chunks_exact(4)
        .filter(|key| key[1] == 0)
        .find(|key| key[0] == PROJECTED_CS_TYPE as u32 || key[0] == GEOGRAPHIC_TYPE as u32)
        .filter(|key| key[3] != USER_DEFINED)
        .and_then(|key| u16::try_from(key[3]).ok())
        .map(Crs)
}

fn to_f64(decoded: DecodingResult) -> LandscapeResult<Vec<f64>> {
    #[allow(unreachable_patterns)]
    let data = match decoded {
        DecodingResult::U8(v)  => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v)  => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        _ => {
            return Err(LandscapeError::GeoProcessing(
                "unsupported raster sample format".into(),
            ));
        }
    };
    Ok(data)
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write `data` (row-major, `grid.cell_count()` samples) as a single-band
/// GeoTIFF aligned to `grid` in `crs`.
///
/// The sample type follows the colour type, e.g.
/// `write_geotiff::<colortype::GrayI16>(…, &[i16])`.
pub fn write_geotiff<C>(path: &Path, grid: &GridSpec, crs: Crs, data: &[C::Inner]) -> LandscapeResult<()>
where
    C: colortype::ColorType,
    [C::Inner]: TiffValue,
{
    if data.len() != grid.cell_count() {
        return Err(LandscapeError::GeoProcessing(format!(
            "raster data has {} samples, grid needs {}",
            data.len(),
            grid.cell_count()
        )));
    }

    let (cs_x, cs_y) = grid.cell_size();
    let bounds = grid.bounds();
    let pixel_scale = [cs_x, cs_y, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, bounds.x_min(), bounds.y_max(), 0.0];
    let geokeys = geokey_directory(crs);

    let mut encoder = TiffEncoder::new(File::create(path)?)?;
    let mut image = encoder.new_image::<C>(grid.width() as u32, grid.height() as u32)?;
    image.encoder().write_tag(Tag::ModelPixelScaleTag, &pixel_scale[..])?;
    image.encoder().write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;
    image.encoder().write_tag(Tag::GeoKeyDirectoryTag, &geokeys[..])?;
    image.write_data(data)?;
    Ok(())
}

fn geokey_directory(crs: Crs) -> [u16; 16] {
    let (model_type, crs_key) = if crs.is_geographic() {
        (MODEL_TYPE_GEOGRAPHIC, GEOGRAPHIC_TYPE)
    } else {
        (MODEL_TYPE_PROJECTED, PROJECTED_CS_TYPE)
    };
    [
        1, 1, 0, 3,
        GT_MODEL_TYPE, 0, 1, model_type,
        GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA,
        crs_key, 0, 1, crs.epsg(),
    ]
}
