//! Unit tests for sw-landscape.
//!
//! Rasters are written to a temporary directory with `write_geotiff` and
//! read back, so no fixture files are needed.

#[cfg(test)]
mod helpers {
    use std::path::{Path, PathBuf};

    use sw_core::{BoundingBox, Crs, GridSpec};
    use tiff::encoder::colortype;

    use crate::write_geotiff;

    /// 10×10 grid over [0, 0, 20 000, 20 000]: 2 km cells.
    pub fn small_grid() -> GridSpec {
        let bounds = BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0).unwrap();
        GridSpec::new(bounds, 10, 10).unwrap()
    }

    /// Write a float raster where cell `i` holds `f(i)`.
    pub fn write_raster(dir: &Path, grid: &GridSpec, crs: Crs, f: impl Fn(usize) -> f32) -> PathBuf {
        let path = dir.join("landscape.tif");
        let data: Vec<f32> = (0..grid.cell_count()).map(f).collect();
        write_geotiff::<colortype::Gray32Float>(&path, grid, crs, &data).unwrap();
        path
    }
}

// ── GeoTIFF I/O ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod geotiff {
    use std::fs::File;

    use sw_core::{Crs, GeoPoint};
    use tiff::decoder::Decoder;
    use tiff::encoder::colortype;
    use tiff::tags::Tag;

    use super::helpers::{small_grid, write_raster};
    use crate::{LandscapeError, read_geotiff, write_geotiff};

    #[test]
    fn round_trip_preserves_georeference() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = write_raster(dir.path(), &grid, Crs::LAEA_EUROPE, |i| i as f32);

        let raster = read_geotiff(&path).unwrap();
        assert_eq!((raster.width, raster.height), (10, 10));
        assert_eq!(raster.origin, GeoPoint::new(0.0, 20_000.0));
        assert_eq!(raster.pixel_size, (2_000.0, 2_000.0));
        assert_eq!(raster.crs, Some(Crs::LAEA_EUROPE));
        assert_eq!(raster.data[37], 37.0);
    }

    #[test]
    fn sample_is_north_up() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = write_raster(dir.path(), &grid, Crs::LAEA_EUROPE, |i| i as f32);
        let raster = read_geotiff(&path).unwrap();

        // Top-left pixel is row 0; bottom-left is row 9.
        assert_eq!(raster.sample(GeoPoint::new(1.0, 19_999.0)), Some(0.0));
        assert_eq!(raster.sample(GeoPoint::new(1.0, 1.0)), Some(90.0));
        assert_eq!(raster.sample(GeoPoint::new(-1.0, 1.0)), None);
        assert_eq!(raster.sample(GeoPoint::new(1.0, 20_001.0)), None);
    }

    #[test]
    fn written_tags_are_readable() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = dir.path().join("int.tif");
        let data = vec![7i16; grid.cell_count()];
        write_geotiff::<colortype::GrayI16>(&path, &grid, Crs::LAEA_EUROPE, &data).unwrap();

        let mut decoder = Decoder::new(File::open(&path).unwrap()).unwrap();
        let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap();
        assert_eq!(&scale[..2], &[2_000.0, 2_000.0]);
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).unwrap();
        assert_eq!(&tiepoint[3..5], &[0.0, 20_000.0]);
        let keys = decoder.get_tag_u32_vec(Tag::GeoKeyDirectoryTag).unwrap();
        assert!(keys.chunks_exact(4).any(|k| k[0] == 3072 && k[3] == 3035));
    }

    #[test]
    fn geographic_crs_uses_geographic_key() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = write_raster(dir.path(), &grid, Crs::WGS84, |_| 1.0);
        assert_eq!(read_geotiff(&path).unwrap().crs, Some(Crs::WGS84));
    }

    #[test]
    fn length_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tif");
        let err = write_geotiff::<colortype::Gray32Float>(&path, &small_grid(), Crs::LAEA_EUROPE, &[1.0; 3])
            .unwrap_err();
        assert!(matches!(err, LandscapeError::GeoProcessing(_)));
    }

    #[test]
    fn plain_tiff_is_not_georeferenced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        let mut encoder = tiff::encoder::TiffEncoder::new(File::create(&path).unwrap()).unwrap();
        encoder.write_image::<colortype::Gray8>(2, 2, &[0, 1, 2, 3]).unwrap();

        let err = read_geotiff(&path).unwrap_err();
        assert!(matches!(err, LandscapeError::GeoProcessing(_)), "{err}");
    }
}

// ── Warp ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod warp {
    use sw_core::{BoundingBox, Crs, GridSpec};

    use super::helpers::{small_grid, write_raster};
    use crate::{LandscapeError, read_geotiff, warp::warp};

    #[test]
    fn identity_warp_copies_values() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = write_raster(dir.path(), &grid, Crs::LAEA_EUROPE, |i| i as f32);
        let raster = read_geotiff(&path).unwrap();

        let values = warp(&raster, &grid, Crs::LAEA_EUROPE).unwrap();
        let expected: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn cells_outside_source_are_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raster(dir.path(), &small_grid(), Crs::LAEA_EUROPE, |_| 4.0);
        let raster = read_geotiff(&path).unwrap();

        // Twice as wide: the eastern half has no source coverage.
        let wide = GridSpec::new(BoundingBox::new(0.0, 0.0, 40_000.0, 20_000.0).unwrap(), 20, 10).unwrap();
        let values = warp(&raster, &wide, Crs::LAEA_EUROPE).unwrap();
        assert_eq!(values[0], 4.0);
        assert_eq!(values[19], 0.0);
    }

    #[test]
    fn nan_samples_become_zero() {
        let dir = tempfile::tempdir().unwrap();
        let grid = small_grid();
        let path = write_raster(dir.path(), &grid, Crs::LAEA_EUROPE, |i| if i == 0 { f32::NAN } else { 1.0 });
        let raster = read_geotiff(&path).unwrap();
        let values = warp(&raster, &grid, Crs::LAEA_EUROPE).unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0);
    }

    #[test]
    fn wgs84_source_onto_laea_grid() {
        let dir = tempfile::tempdir().unwrap();
        // 2°×2° geographic raster centred on the LAEA Europe origin.
        let geo_grid = GridSpec::new(BoundingBox::new(9.0, 51.0, 11.0, 53.0).unwrap(), 20, 20).unwrap();
        let path = write_raster(dir.path(), &geo_grid, Crs::WGS84, |_| 2.0);
        let raster = read_geotiff(&path).unwrap();

        let target = GridSpec::with_resolution(
            BoundingBox::new(4_311_000.0, 3_200_000.0, 4_331_000.0, 3_220_000.0).unwrap(),
            2_000.0,
        )
        .unwrap();
        let values = warp(&raster, &target, Crs::LAEA_EUROPE).unwrap();
        assert_eq!(values.len(), 100);
        assert!(values.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn unsupported_pair_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raster(dir.path(), &small_grid(), Crs(32633), |_| 1.0);
        let raster = read_geotiff(&path).unwrap();
        let err = warp(&raster, &small_grid(), Crs::LAEA_EUROPE).unwrap_err();
        assert!(matches!(err, LandscapeError::GeoProcessing(_)));
    }
}

// ── Landscape & loader ────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use sw_core::{BoundingBox, CellCoord, Crs, GeoPoint};

    use super::helpers::{small_grid, write_raster};
    use crate::{Capacity, FallbackGrid, LandscapeError, LandscapeLoader, breeding_capacity};

    fn bounds() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0).unwrap()
    }

    #[test]
    fn capacity_transform() {
        assert_eq!(breeding_capacity(2.0), 3.0);
        assert_eq!(breeding_capacity(0.0), 0.0);
        assert_eq!(breeding_capacity(-1.0), -1.5);
        assert_eq!(breeding_capacity(-40.0), -1.5);
    }

    #[test]
    fn load_applies_capacity_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raster(dir.path(), &small_grid(), Crs::LAEA_EUROPE, |_| 2.0);

        let landscape = LandscapeLoader::new(path, Crs::LAEA_EUROPE, bounds(), 2_000.0).load().unwrap();
        assert_eq!((landscape.width(), landscape.height()), (10, 10));
        assert!(!landscape.is_synthetic());
        assert!(landscape.raw().unwrap().iter().all(|&c| c == 3.0));
        assert_eq!(landscape.capacity_at(CellCoord::new(9, 9)), Some(3.0));
        assert_eq!(landscape.capacity_at(CellCoord::new(10, 0)), None);
    }

    #[test]
    fn resolution_sets_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raster(dir.path(), &small_grid(), Crs::LAEA_EUROPE, |_| 1.0);
        let landscape = LandscapeLoader::new(path, Crs::LAEA_EUROPE, bounds(), 4_000.0).load().unwrap();
        assert_eq!((landscape.width(), landscape.height()), (5, 5));
    }

    #[test]
    fn coordinate_conversion_uses_axis_flip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raster(dir.path(), &small_grid(), Crs::LAEA_EUROPE, |_| 1.0);
        let landscape = LandscapeLoader::new(path, Crs::LAEA_EUROPE, bounds(), 2_000.0).load().unwrap();

        assert_eq!(landscape.coord_to_cell(GeoPoint::new(3_000.0, 19_000.0)), CellCoord::new(1, 0));
        assert_eq!(landscape.coord_to_cell(GeoPoint::new(3_000.0, 1_000.0)), CellCoord::new(1, 9));
        assert_eq!(landscape.cell_to_coord(CellCoord::new(0, 0)), GeoPoint::new(0.0, 20_000.0));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = LandscapeLoader::new(dir.path().join("absent.tif"), Crs::LAEA_EUROPE, bounds(), 2_000.0);
        assert!(matches!(loader.load(), Err(LandscapeError::NotFound(_))));
    }

    #[test]
    fn missing_file_falls_back_to_uniform() {
        let dir = tempfile::tempdir().unwrap();
        let loader = LandscapeLoader::new(dir.path().join("absent.tif"), Crs::LAEA_EUROPE, bounds(), 2_000.0);
        let landscape = loader.load_or_fallback(&FallbackGrid::default()).unwrap();

        assert!(landscape.is_synthetic());
        assert_eq!((landscape.width(), landscape.height()), (100, 100));
        assert_eq!(landscape.capacity(), &Capacity::Uniform { limits: (0.0, 5.0) });
        assert!(landscape.raw().is_none());
        // 200 m cells over the same bounding box.
        assert_eq!(landscape.coord_to_cell(GeoPoint::new(100.0, 19_900.0)), CellCoord::new(0, 0));
    }

    #[test]
    fn corrupt_file_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.tif");
        std::fs::write(&path, b"not a tiff").unwrap();
        let loader = LandscapeLoader::new(path, Crs::LAEA_EUROPE, bounds(), 2_000.0);
        assert!(loader.load_or_fallback(&FallbackGrid::default()).is_err());
    }
}
