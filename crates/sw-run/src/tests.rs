//! Tests for sw-run: configuration parsing and whole scenario runs.

#[cfg(test)]
mod helpers {
    use std::collections::HashMap;
    use std::path::Path;

    use sw_core::{BoundingBox, Crs, GridSpec};
    use sw_landscape::write_geotiff;
    use tiff::encoder::colortype;

    use crate::{ConfigError, RunConfig};

    /// Left half of the [0, 0, 20 000, 20 000] test area, bare-word keys.
    pub const LEFT_HALF_FENCE: &str =
        "{type: Polygon, coordinates: [[[0, 0], [10000, 0], [10000, 20000], [0, 20000], [0, 0]]]}";

    pub fn lookup(pairs: &[(&str, &str)]) -> Result<RunConfig, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        RunConfig::from_lookup(|key| env.get(key).cloned())
    }

    pub fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("INPUT_MAP", "habitat.tif"),
            ("COMPUTED_AREA", "[0, 0, 20_000, 20_000]"),
            ("RELEASE_COORDS", "[5_000, 15_000]"),
            ("OUTPUT_DIR", "/tmp/out"),
        ]
    }

    /// 10×10 uniform raster with 2 km cells in EPSG:3035.
    pub fn write_landscape(dir: &Path, value: f32) {
        let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0).unwrap(), 10, 10).unwrap();
        let data = vec![value; grid.cell_count()];
        write_geotiff::<colortype::Gray32Float>(&dir.join("habitat.tif"), &grid, Crs::LAEA_EUROPE, &data).unwrap();
    }

    /// Configuration for a run inside `root`: raster in `root`, outputs in
    /// `root/out`.
    pub fn run_config(root: &Path, num_ticks: u64, fence: Option<&str>) -> RunConfig {
        let mut config = lookup(&[
            ("INPUT_DIR", root.to_str().unwrap()),
            ("INPUT_MAP", "habitat.tif"),
            ("COMPUTED_AREA", "[0, 0, 20_000, 20_000]"),
            ("RELEASE_COORDS", "[5_000, 15_000]"),
            ("OUTPUT_DIR", root.join("out").to_str().unwrap()),
            ("RESOLUTION", "2000"),
            ("SEED", "11"),
        ])
        .unwrap();
        config.scenario.num_ticks = num_ticks;
        config.fence_coords = fence.map(str::to_owned);
        config
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::path::PathBuf;

    use sw_core::{Crs, GeoPoint};

    use super::helpers::{lookup, minimal};
    use crate::config::parse_numbers;
    use crate::{ConfigError, RunConfig, Scenario};

    #[test]
    fn defaults_fill_optional_keys() {
        let config = lookup(&minimal()).unwrap();
        assert_eq!(config.input_map, PathBuf::from("/code/outputs/habitat.tif"));
        assert_eq!(config.computed_area.x_max(), 20_000.0);
        assert_eq!(config.release_coords, GeoPoint::new(5_000.0, 15_000.0));
        assert_eq!(config.fence_coords, None);
        assert_eq!(config.target_crs, Crs::LAEA_EUROPE);
        assert_eq!(config.resolution, 2_000.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.scenario, Scenario::default());
        assert_eq!(config.scenario.num_ticks, 120);
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let pairs: Vec<_> = minimal().into_iter().filter(|(k, _)| *k != "OUTPUT_DIR").collect();
        assert!(matches!(lookup(&pairs), Err(ConfigError::Missing("OUTPUT_DIR"))));
    }

    #[test]
    fn empty_fence_means_no_fence() {
        let mut pairs = minimal();
        pairs.push(("FENCE_COORDS", "  "));
        assert_eq!(lookup(&pairs).unwrap().fence_coords, None);

        let mut pairs = minimal();
        pairs.push(("FENCE_COORDS", "{type: Polygon}"));
        assert_eq!(lookup(&pairs).unwrap().fence_coords.as_deref(), Some("{type: Polygon}"));
    }

    #[test]
    fn numbers_accept_digit_separators_and_tuples() {
        let area = parse_numbers("COMPUTED_AREA", "[4_506_779, 3_052_929, 4_855_174, 3_353_689]", 4).unwrap();
        assert_eq!(area, [4_506_779.0, 3_052_929.0, 4_855_174.0, 3_353_689.0]);
        assert_eq!(parse_numbers("RELEASE_COORDS", "(1.5, -2)", 2).unwrap(), [1.5, -2.0]);
        assert_eq!(parse_numbers("RELEASE_COORDS", "3, 4", 2).unwrap(), [3.0, 4.0]);
    }

    #[test]
    fn wrong_count_or_garbage_is_invalid() {
        assert!(matches!(
            parse_numbers("RELEASE_COORDS", "[1, 2, 3]", 2),
            Err(ConfigError::Invalid { key: "RELEASE_COORDS", .. })
        ));
        assert!(matches!(
            parse_numbers("RELEASE_COORDS", "[1, x]", 2),
            Err(ConfigError::Invalid { key: "RELEASE_COORDS", .. })
        ));
    }

    #[test]
    fn inverted_area_is_invalid() {
        let mut pairs = minimal();
        pairs[1] = ("COMPUTED_AREA", "[10, 0, 0, 10]");
        assert!(matches!(lookup(&pairs), Err(ConfigError::Invalid { key: "COMPUTED_AREA", .. })));
    }

    #[test]
    fn optional_keys_override_defaults() {
        let mut pairs = minimal();
        pairs.extend([
            ("INPUT_DIR", "/data"),
            ("TARGET_CRS", "epsg:4326"),
            ("RESOLUTION", "500"),
            ("NUM_TICKS", "520"),
            ("SEED", "7"),
        ]);
        let config = lookup(&pairs).unwrap();
        assert_eq!(config.input_map, PathBuf::from("/data/habitat.tif"));
        assert_eq!(config.target_crs, Crs::WGS84);
        assert_eq!(config.resolution, 500.0);
        assert_eq!(config.scenario.num_ticks, 520);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn bad_scalars_are_invalid() {
        for (key, value) in [("RESOLUTION", "0"), ("NUM_TICKS", "-1"), ("SEED", "seven"), ("TARGET_CRS", "ESRI:1")] {
            let mut pairs = minimal();
            pairs.push((key, value));
            match lookup(&pairs) {
                Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
                other => panic!("{key}={value}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn yaml_accepts_sequences_and_scenario_overrides() {
        let text = r#"
INPUT_MAP: habitat.tif
INPUT_DIR: /maps
COMPUTED_AREA: [0, 0, 20000, 20000]
RELEASE_COORDS: "[5000, 15000]"
FENCE_COORDS: ""
OUTPUT_DIR: /out
NUM_TICKS: 10
scenario:
  release_radius: 2
  hunting: { start: 104, duration: 52, target_share: 0.6 }
"#;
        let config = RunConfig::from_yaml_str(text).unwrap();
        assert_eq!(config.input_map, PathBuf::from("/maps/habitat.tif"));
        assert_eq!(config.computed_area.y_max(), 20_000.0);
        assert_eq!(config.release_coords, GeoPoint::new(5_000.0, 15_000.0));
        assert_eq!(config.fence_coords, None);
        assert_eq!(config.scenario.release_radius, 2);
        assert_eq!(config.scenario.hunting.start, 104);
        assert_eq!(config.scenario.num_ticks, 10);
        // Untouched scenario fields keep their defaults.
        assert_eq!(config.scenario.release_factor, 5.0);
    }

    #[test]
    fn yaml_rejects_unknown_scenario_fields() {
        let text = "INPUT_MAP: a.tif\nCOMPUTED_AREA: [0, 0, 1, 1]\nRELEASE_COORDS: [0, 0]\nOUTPUT_DIR: o\nscenario:\n  hunt_everything: true\n";
        assert!(matches!(RunConfig::from_yaml_str(text), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn yaml_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "INPUT_MAP: a.tif\nCOMPUTED_AREA: [0, 0, 1, 1]\nRELEASE_COORDS: [0, 0]\nOUTPUT_DIR: o\n",
        )
        .unwrap();
        assert_eq!(RunConfig::from_yaml(&path).unwrap().output_dir, PathBuf::from("o"));
        assert!(matches!(RunConfig::from_yaml(&dir.path().join("nope.yaml")), Err(ConfigError::Io(_))));
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use std::sync::Arc;

    use sw_core::{BoundingBox, CellCoord, Crs, GridSpec, Tick};
    use sw_fence::FenceClassifier;
    use sw_landscape::Landscape;
    use sw_pipeline::MapInit;

    use crate::Scenario;
    use geo::polygon;

    fn map_init() -> (MapInit, GridSpec) {
        let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0).unwrap(), 10, 10).unwrap();
        let landscape = Arc::new(Landscape::from_capacities(grid, Crs::LAEA_EUROPE, vec![1.0; 100]).unwrap());
        (MapInit::from_landscape(landscape), grid)
    }

    fn names(scenario: &Scenario, fenced: bool) -> Vec<&'static str> {
        let (init, grid) = map_init();
        let release = scenario.release_schedule(CellCoord::new(2, 2), &grid).unwrap();
        let fence = fenced.then(|| {
            let square = geo::polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 5.0, y: 10.0), (x: 0.0, y: 10.0)];
            FenceClassifier::new(square)
        });
        scenario.pipeline(init, release, fence).unwrap().systems().iter().map(|s| s.name()).collect()
    }

    #[test]
    fn fence_systems_only_with_fence() {
        let scenario = Scenario::default();
        let unfenced = names(&scenario, false);
        assert!(!unfenced.contains(&"fence_zones"));
        assert_eq!(unfenced.first(), Some(&"disease_course"));
        assert_eq!(unfenced.last(), Some(&"terminate_fixed_tick"));

        let fenced = names(&scenario, true);
        assert_eq!(fenced[1..3], ["fence_zones", "fences"]);
        assert_eq!(fenced.len(), unfenced.len() + 2);
    }

    #[test]
    fn default_schedule_is_single_release() {
        let (_, grid) = map_init();
        let schedule = Scenario::default().release_schedule(CellCoord::new(2, 7), &grid).unwrap();
        assert_eq!(schedule.cells_at(Tick(3)), [CellCoord::new(2, 7)]);
        assert!(schedule.cells_at(Tick(2)).is_empty());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn release_csv_replaces_single_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releases.csv");
        std::fs::write(&path, "x,y,tick\n1000,19000,0\n19000,1000,8\n").unwrap();
        let scenario = Scenario { release_csv: Some(path), ..Scenario::default() };

        let (_, grid) = map_init();
        let schedule = scenario.release_schedule(CellCoord::new(5, 5), &grid).unwrap();
        assert_eq!(schedule.cells_at(Tick(0)), [CellCoord::new(0, 0)]);
        assert_eq!(schedule.cells_at(Tick(8)), [CellCoord::new(9, 9)]);
        assert!(schedule.cells_at(Tick(3)).is_empty());
    }

    #[test]
    fn invalid_management_values_fail_the_build() {
        let mut scenario = Scenario::default();
        scenario.hunting.target_share = 1.5;
        let (init, grid) = map_init();
        let release = scenario.release_schedule(CellCoord::new(0, 0), &grid).unwrap();
        assert!(scenario.pipeline(init, release, None).is_err());
    }
}

// ── Whole runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use std::time::Duration;

    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use tiff::decoder::Decoder;
    use tiff::tags::Tag;

    use sw_core::{CellCoord, Tick};
    use sw_sim::RunSummary;

    use super::helpers::{LEFT_HALF_FENCE, run_config, write_landscape};
    use crate::exports::{EPISTAT_VIDEO, FRAME_DELAY_MS, POPULATION_RASTER, TIME_SERIES, VARIANTS_VIDEO};
    use crate::{Orchestrator, RunError, RunReport, RunState};

    fn gif_frames(path: &Path) -> usize {
        decoded_gif(path).len()
    }

    fn decoded_gif(path: &Path) -> Vec<image::Frame> {
        let decoder = GifDecoder::new(BufReader::new(File::open(path).unwrap())).unwrap();
        decoder.into_frames().collect_frames().unwrap()
    }

    #[test]
    fn fenced_one_tick_run_writes_every_output() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 2.0);
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 1, Some(LEFT_HALF_FENCE)));
        assert_eq!(orchestrator.state(), RunState::Unconfigured);

        orchestrator.build().unwrap();
        assert_eq!(orchestrator.state(), RunState::Built);
        let report = orchestrator.run().unwrap();
        assert_eq!(orchestrator.state(), RunState::Completed);
        assert_eq!(report.summary.ticks, 1);
        assert!(report.fenced);
        assert!(!report.synthetic_landscape);
        assert!(report.summary.final_population > 0);

        let out = root.path().join("out");
        let mut rdr = csv::Reader::from_path(out.join("population.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "piglet", "yearling", "adult"]);
        assert!(rdr.records().count() >= 1);

        for (_, file) in TIME_SERIES {
            assert!(out.join(file).is_file(), "{file} missing");
        }
        for state in ["susceptible", "infected", "resistant"] {
            assert!(out.join(format!("epi_stat_outputs/epi_stat_{state}_tick_0.csv")).is_file());
        }
        assert!(out.join("sec_inf_outputs/secondary_infections_tick_0.csv").is_file());
        assert_eq!(gif_frames(&out.join(EPISTAT_VIDEO)), 1);
        assert_eq!(gif_frames(&out.join(VARIANTS_VIDEO)), 1);
        for video in [EPISTAT_VIDEO, VARIANTS_VIDEO] {
            let (numer, denom) = decoded_gif(&out.join(video))[0].delay().numer_denom_ms();
            assert_eq!(f64::from(numer) / f64::from(denom), f64::from(FRAME_DELAY_MS), "{video}");
        }

        let mut decoder = Decoder::new(File::open(out.join(POPULATION_RASTER)).unwrap()).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (10, 10));
        assert_eq!(decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap(), [2_000.0, 2_000.0, 0.0]);
        assert_eq!(
            decoder.get_tag_f64_vec(Tag::ModelTiepointTag).unwrap(),
            [0.0, 0.0, 0.0, 0.0, 20_000.0, 0.0]
        );
        let keys = decoder.get_tag_u32_vec(Tag::GeoKeyDirectoryTag).unwrap();
        assert_eq!(keys.last(), Some(&3035));
    }

    #[test]
    fn zero_tick_run_leaves_valid_single_frame_gifs() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 2.0);
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 0, None));
        let report = orchestrator.run().unwrap();
        assert_eq!(report.summary.ticks, 0);
        assert_eq!(report.summary.final_tick, Tick::ZERO);

        let out = root.path().join("out");
        assert_eq!(gif_frames(&out.join(EPISTAT_VIDEO)), 1);
        assert_eq!(gif_frames(&out.join(VARIANTS_VIDEO)), 1);
        let mut rdr = csv::Reader::from_path(out.join("epistat.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
        assert!(!out.join("epi_stat_outputs/epi_stat_infected_tick_0.csv").exists());
    }

    #[test]
    fn release_lands_on_configured_coordinates() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 2.0);
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 4, None));
        orchestrator.run().unwrap();

        let landscape = orchestrator.landscape().unwrap();
        let target = landscape.coord_to_cell(orchestrator.config().release_coords);
        assert_eq!(target, CellCoord::new(2, 2));

        let sim = orchestrator.engine();
        assert_eq!(sim.infected(target), Some(1));
        let (width, height) = sim.size();
        let total: u32 = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| CellCoord::new(x, y)))
            .filter_map(|cell| sim.infected(cell))
            .sum();
        assert_eq!(total, 1);

        let mut rdr = csv::Reader::from_path(root.path().join("out/new_infections.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[3][1], "1");
        assert_eq!(&rows[2][1], "0");
    }

    #[test]
    fn missing_raster_falls_back_to_synthetic_grid() {
        let root = tempfile::tempdir().unwrap();
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 1, Some(LEFT_HALF_FENCE)));
        let report = orchestrator.run().unwrap();
        assert!(report.synthetic_landscape);
        assert_eq!(orchestrator.engine().size(), (100, 100));

        let out = root.path().join("out");
        let mut decoder = Decoder::new(File::open(out.join(POPULATION_RASTER)).unwrap()).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (100, 100));
        assert_eq!(decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap(), [200.0, 200.0, 0.0]);
    }

    #[test]
    fn malformed_fence_aborts_before_any_output() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 2.0);
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 1, Some("{type: Polygon, coordinates: [[")));
        assert!(matches!(orchestrator.run(), Err(RunError::Fence(_))));
        assert_eq!(orchestrator.state(), RunState::Aborted);
        assert!(!root.path().join("out").join(EPISTAT_VIDEO).exists());
    }

    #[test]
    fn finished_orchestrator_cannot_run_again() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 1.0);
        let mut orchestrator = Orchestrator::new(run_config(root.path(), 0, None));
        orchestrator.run().unwrap();
        assert!(matches!(orchestrator.run(), Err(RunError::State(RunState::Completed))));
        assert!(matches!(orchestrator.build(), Err(RunError::State(RunState::Completed))));
    }

    #[test]
    fn existing_output_dir_is_reused() {
        let root = tempfile::tempdir().unwrap();
        write_landscape(root.path(), 1.0);
        std::fs::create_dir_all(root.path().join("out/epi_stat_outputs")).unwrap();
        Orchestrator::new(run_config(root.path(), 1, None)).run().unwrap();
        assert!(root.path().join("out/epi_stat_outputs/epi_stat_susceptible_tick_0.csv").is_file());
    }

    #[test]
    fn report_uses_runtime_format() {
        let report = RunReport {
            summary:             RunSummary { ticks: 120, final_tick: Tick(120), systems: 18, final_population: 0 },
            elapsed:             Duration::from_millis(2_500),
            synthetic_landscape: false,
            fenced:              false,
        };
        assert_eq!(report.to_string(), "Total runtime: 2.50s, Runtime per tick: 20.83ms (120 ticks)");

        let empty = RunReport { summary: RunSummary { ticks: 0, final_tick: Tick(0), ..report.summary }, ..report };
        assert_eq!(empty.to_string(), "Total runtime: 2.50s, Runtime per tick: 0.00ms (0 ticks)");
    }
}
