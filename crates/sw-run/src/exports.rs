//! The scenario's output directory layout.
//!
//! ```text
//! OUTPUT_DIR/
//! ├── epistat.gif                 S/I/R map, one frame per tick
//! ├── variants.gif                first variant per cell, colour-cycled
//! ├── epi_stat_outputs/           epi_stat_{susceptible|infected|resistant}_tick_{t}.csv
//! ├── sec_inf_outputs/            secondary_infections_tick_{t}.csv
//! ├── new_infections.csv
//! ├── population.csv
//! ├── deaths.csv
//! ├── carcasses.csv
//! ├── epistat.csv
//! └── population.tif              final population map
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use sw_landscape::Landscape;
use sw_output::frame::WHITE;
use sw_output::{
    ExportPipeline, FinalRasterSink, FrameAdapter, GridCsvSink, OutputResult, TimeSeriesCsvSink, VideoSink,
};
use sw_sim::Observation;

pub const EPISTAT_VIDEO: &str = "epistat.gif";
pub const VARIANTS_VIDEO: &str = "variants.gif";
pub const EPI_STAT_DIR: &str = "epi_stat_outputs";
pub const SEC_INF_DIR: &str = "sec_inf_outputs";
pub const POPULATION_RASTER: &str = "population.tif";

/// `(observation, file name)` of each time-series CSV.
pub const TIME_SERIES: [(Observation, &str); 5] = [
    (Observation::NewInfectionsTable, "new_infections.csv"),
    (Observation::AgeClassTable, "population.csv"),
    (Observation::CauseOfDeathTable, "deaths.csv"),
    (Observation::CarcassesTable, "carcasses.csv"),
    (Observation::EpiStatTable, "epistat.csv"),
];

/// Cells are drawn as `VIDEO_SCALE × VIDEO_SCALE` pixel blocks.
const VIDEO_SCALE: u32 = 2;

/// Display time of one tick in the exported videos.
pub const FRAME_DELAY_MS: u32 = 200;

/// Layer shown on red, green, blue: infected, resistant, susceptible.
const EPISTAT_CHANNELS: [usize; 3] = [1, 2, 0];
const EPISTAT_LIMITS: [(f64, f64); 3] = [(0.0, 5.0), (0.0, 25.0), (0.0, 25.0)];

/// Create the output directories and every sink, in callback order.
///
/// Video files exist once this returns, before any tick has run.
pub fn standard_exports(out: &Path, landscape: Arc<Landscape>) -> OutputResult<ExportPipeline> {
    let epi_dir = out.join(EPI_STAT_DIR);
    let sec_dir = out.join(SEC_INF_DIR);
    fs::create_dir_all(&epi_dir)?;
    fs::create_dir_all(&sec_dir)?;

    let epistat = Observation::EpiStatMap;
    let secondary = Observation::SecondaryInfections;
    let mut exports = ExportPipeline::new()
        .route(epistat, GridCsvSink::per_category(epi_dir, "epi_stat", epistat.columns().iter().copied()))
        .route(
            secondary,
            GridCsvSink::transposed(sec_dir, "secondary_infections", secondary.columns().iter().copied()),
        );

    for (observation, file) in TIME_SERIES {
        exports.push(observation, Box::new(TimeSeriesCsvSink::new(&out.join(file), &observation)?));
    }

    let epistat_video = VideoSink::new(
        &out.join(EPISTAT_VIDEO),
        FrameAdapter::channels(EPISTAT_CHANNELS, EPISTAT_LIMITS),
    )?
    .with_scale(VIDEO_SCALE)
    .with_frame_delay_ms(FRAME_DELAY_MS);
    let variants_video = VideoSink::new(&out.join(VARIANTS_VIDEO), FrameAdapter::color_cycle(WHITE))?
        .with_scale(VIDEO_SCALE)
        .with_frame_delay_ms(FRAME_DELAY_MS);

    let exports = exports
        .route(epistat, epistat_video)
        .route(Observation::VariantsMap { first_variant: true }, variants_video)
        .route(Observation::PopulationMap, FinalRasterSink::new(out.join(POPULATION_RASTER), landscape));

    debug!(dir = %out.display(), routes = exports.len(), "exports ready");
    Ok(exports)
}
