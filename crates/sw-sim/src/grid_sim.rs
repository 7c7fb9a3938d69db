//! `GridSim`: a headless, bookkeeping-only engine over a cell grid.

use tracing::{debug, info};

use sw_core::{CellCoord, SimRng, Tick, VariantId, ZoneId};
use sw_pipeline::{Classifier, MapInit, PopInit, ReleaseSchedule, System, ZoneFamily, check_zone_order};

use crate::{
    AgeClass, Engine, Grid3, Observation, RunSummary, SimError, SimObserver, SimResult, Snapshot,
    SnapshotSource,
};

/// Share of each initial cell population per age class; adults take the
/// rounding remainder.
const PIGLET_SHARE: f64 = 0.4;
const YEARLING_SHARE: f64 = 0.25;

// RNG stream offsets, one per independent consumer.
const STREAM_MAP: u64 = 1;
const STREAM_POP: u64 = 2;
const STREAM_MUTATION: u64 = 3;

// ── Per-cell state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct Cell {
    ages:          [u32; 3],
    infected:      u32,
    resistant:     u32,
    variant:       VariantId,
    first_variant: VariantId,
}

impl Cell {
    #[inline]
    fn population(&self) -> u32 {
        self.ages.iter().sum()
    }

    #[inline]
    fn susceptible(&self) -> u32 {
        self.population().saturating_sub(self.infected + self.resistant)
    }
}

/// Counters reset at the start of every tick.
#[derive(Clone, Debug, Default)]
struct TickCounters {
    /// release, within, between, carcass
    new_infections: [u64; 4],
    /// natural, disease, hunted
    deaths:         [u64; 3],
}

// ── GridSim ───────────────────────────────────────────────────────────────────

/// Headless reference [`Engine`].
///
/// Implements map and population initialisation, zone classification,
/// releases, counting mutation, ageing, and fixed-tick termination.  All
/// other systems are accepted and left inert.
pub struct GridSim {
    rng:      SimRng,
    map_init: Option<MapInit>,
    pop_init: Option<PopInit>,
    systems:  Vec<System>,

    width:        usize,
    height:       usize,
    capacity:     Vec<f64>,
    cells:        Vec<Cell>,
    zones:        Vec<(ZoneFamily, Vec<Option<ZoneId>>)>,
    tick:         Tick,
    next_variant: u32,
    counters:     TickCounters,
    /// Cumulative secondary-infection rows (total, within, between, carcass)
    /// for index cases that caused zero secondary infections.
    secondary:    [u64; 4],
}

impl GridSim {
    pub fn new(seed: u64) -> Self {
        Self {
            rng:          SimRng::new(seed),
            map_init:     None,
            pop_init:     None,
            systems:      Vec::new(),
            width:        0,
            height:       0,
            capacity:     Vec::new(),
            cells:        Vec::new(),
            zones:        Vec::new(),
            tick:         Tick::ZERO,
            next_variant: VariantId::FIRST.0 + 1,
            counters:     TickCounters::default(),
            secondary:    [0; 4],
        }
    }

    /// Current tick (the next one to execute).
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn capacity(&self, cell: CellCoord) -> Option<f64> {
        self.index(cell).map(|i| self.capacity[i])
    }

    pub fn population(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell).map(|i| self.cells[i].population())
    }

    pub fn infected(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell).map(|i| self.cells[i].infected)
    }

    pub fn variant(&self, cell: CellCoord) -> Option<VariantId> {
        self.index(cell).map(|i| self.cells[i].variant)
    }

    /// Zone assigned to `cell` by the classifier of `family`, as evaluated
    /// at run start.
    pub fn zone(&self, family: ZoneFamily, cell: CellCoord) -> Option<ZoneId> {
        let i = self.index(cell)?;
        self.zones.iter().find(|(f, _)| *f == family).and_then(|(_, z)| z[i])
    }

    pub fn total_population(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.population())).sum()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        (cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height)
            .then(|| cell.y as usize * self.width + cell.x as usize)
    }

    #[inline]
    fn cell_of(&self, index: usize) -> CellCoord {
        CellCoord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    fn setup(&mut self) -> SimResult<u64> {
        let num_ticks = self
            .systems
            .iter()
            .filter_map(|s| match s {
                System::TerminateFixedTick { num_ticks } => Some(*num_ticks),
                _ => None,
            })
            .min()
            .ok_or_else(|| SimError::Config("no termination system registered".into()))?;
        check_zone_order(&self.systems).map_err(|e| SimError::Config(e.to_string()))?;

        self.init_map()?;
        self.init_population()?;
        self.classify_zones();

        self.tick = Tick::ZERO;
        self.next_variant = VariantId::FIRST.0 + 1;
        self.secondary = [0; 4];
        Ok(num_ticks)
    }

    fn init_map(&mut self) -> SimResult<()> {
        let map_init = self
            .map_init
            .as_ref()
            .ok_or_else(|| SimError::Config("no map initializer set".into()))?;
        let (width, height) = map_init.size();
        let mut rng = self.rng.child(STREAM_MAP);

        let capacity = match map_init {
            MapInit::CallbackPoisson { landscape } => landscape
                .raw()
                .ok_or_else(|| {
                    SimError::Config("CallbackPoisson needs a raster-backed landscape".into())
                })?
                .to_vec(),
            MapInit::RandomUniform { limits: (lo, hi), .. } => (0..width * height)
                .map(|_| if lo < hi { rng.gen_range(*lo..*hi) } else { *lo })
                .collect(),
        };

        self.width = width;
        self.height = height;
        self.capacity = capacity;
        Ok(())
    }

    fn init_population(&mut self) -> SimResult<()> {
        let PopInit::Default { release_factor } = self
            .pop_init
            .ok_or_else(|| SimError::Config("no population initializer set".into()))?;
        let mut rng = self.rng.child(STREAM_POP);

        self.cells = self
            .capacity
            .iter()
            .map(|&cap| {
                let n = rng.poisson(cap.max(0.0) * release_factor);
                let piglets = (f64::from(n) * PIGLET_SHARE).floor() as u32;
                let yearlings = (f64::from(n) * YEARLING_SHARE).floor() as u32;
                Cell { ages: [piglets, yearlings, n - piglets - yearlings], ..Cell::default() }
            })
            .collect();

        info!(
            width = self.width,
            height = self.height,
            population = self.total_population(),
            "population initialised"
        );
        Ok(())
    }

    fn classify_zones(&mut self) {
        let (width, height) = (self.width, self.height);
        self.zones = self
            .systems
            .iter()
            .filter_map(System::classifier)
            .map(|(family, classifier)| {
                let zones = classify(classifier, width, height);
                debug!(
                    family = ?family,
                    managed = zones.iter().filter(|z| z.is_some()).count(),
                    "zones classified"
                );
                (family, zones)
            })
            .collect();
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    fn step(&mut self, now: Tick) {
        self.counters = TickCounters::default();
        let systems = std::mem::take(&mut self.systems);
        for system in &systems {
            match system {
                System::Release { schedule, radius } => self.release(schedule, *radius, now),
                System::Mutation { probability } => self.mutate(*probability),
                System::Ageing if now.is_year_end() => self.age(),
                _ => {}
            }
        }
        self.systems = systems;
    }

    fn release(&mut self, schedule: &ReleaseSchedule, radius: u32, now: Tick) {
        for target in schedule.cells_at(now) {
            match self.nearest_susceptible(target, radius) {
                Some(i) => {
                    let cell = &mut self.cells[i];
                    cell.infected += 1;
                    cell.variant = VariantId::FIRST;
                    if cell.first_variant.is_none() {
                        cell.first_variant = VariantId::FIRST;
                    }
                    self.counters.new_infections[0] += 1;
                    self.secondary[0] += 1;
                    debug!(tick = %now, target = %target, cell = %self.cell_of(i), "release");
                }
                None => debug!(tick = %now, target = %target, radius, "no susceptible host in release radius"),
            }
        }
    }

    /// Index of the closest cell (Euclidean, ties by row-major order) within
    /// `radius` of `target` that has a susceptible individual.
    fn nearest_susceptible(&self, target: CellCoord, radius: u32) -> Option<usize> {
        let r = i64::from(radius);
        let (tx, ty) = (i64::from(target.x), i64::from(target.y));
        let mut best: Option<(i64, usize)> = None;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > r * r {
                    continue;
                }
                let (x, y) = (tx + dx, ty + dy);
                let Ok(cell) = i32::try_from(x).and_then(|x| i32::try_from(y).map(|y| CellCoord::new(x, y))) else {
                    continue;
                };
                let Some(i) = self.index(cell) else { continue };
                if self.cells[i].susceptible() == 0 {
                    continue;
                }
                if best.is_none_or(|(bd, bi)| (d2, i) < (bd, bi)) {
                    best = Some((d2, i));
                }
            }
        }
        best.map(|(_, i)| i)
    }

    fn mutate(&mut self, probability: f64) {
        if probability <= 0.0 {
            return;
        }
        let mut rng = self.rng.child(STREAM_MUTATION);
        for cell in self.cells.iter_mut().filter(|c| c.infected > 0) {
            if rng.gen_bool(probability) {
                cell.variant = VariantId(self.next_variant);
                self.next_variant += 1;
            }
        }
    }

    fn age(&mut self) {
        for cell in &mut self.cells {
            let [piglets, yearlings, adults] = cell.ages;
            cell.ages = [0, piglets, yearlings + adults];
        }
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    fn grid_of(&self, layers: &[fn(&Cell) -> i64]) -> Grid3 {
        let mut grid = Grid3::zeros(layers.len(), self.height, self.width);
        for (i, cell) in self.cells.iter().enumerate() {
            let (row, col) = (i / self.width, i % self.width);
            for (l, f) in layers.iter().enumerate() {
                grid.set(l, row, col, f(cell));
            }
        }
        grid
    }

    fn totals(&self, f: impl Fn(&Cell) -> u32) -> i64 {
        self.cells.iter().map(|c| i64::from(f(c))).sum()
    }
}

impl SnapshotSource for GridSim {
    fn snapshot(&self, observation: &Observation) -> Snapshot {
        let to_row = |values: &[u64]| -> Vec<i64> { values.iter().map(|&v| v as i64).collect() };
        match observation {
            Observation::EpiStatMap => Snapshot::Grid(self.grid_of(&[
                |c| i64::from(c.susceptible()),
                |c| i64::from(c.infected),
                |c| i64::from(c.resistant),
            ])),
            Observation::SecondaryInfections => {
                let data = self.secondary.iter().map(|&v| v as i64).collect();
                Snapshot::Grid(Grid3::from_vec(1, 4, 1, data).unwrap_or_else(|| Grid3::zeros(1, 4, 1)))
            }
            Observation::VariantsMap { first_variant: true } => {
                Snapshot::Grid(self.grid_of(&[|c| i64::from(c.first_variant.0)]))
            }
            Observation::VariantsMap { first_variant: false } => {
                Snapshot::Grid(self.grid_of(&[|c| i64::from(c.variant.0)]))
            }
            Observation::PopulationMap => Snapshot::Grid(self.grid_of(&[|c| i64::from(c.population())])),
            Observation::NewInfectionsTable => Snapshot::Row(to_row(&self.counters.new_infections)),
            Observation::AgeClassTable => Snapshot::Row(
                AgeClass::ALL.iter().map(|a| self.totals(|c| c.ages[a.index()])).collect(),
            ),
            Observation::CauseOfDeathTable => Snapshot::Row(to_row(&self.counters.deaths)),
            Observation::CarcassesTable => Snapshot::Row(vec![0; observation.columns().len()]),
            Observation::EpiStatTable => Snapshot::Row(vec![
                self.totals(Cell::susceptible),
                self.totals(|c| c.infected),
                self.totals(|c| c.resistant),
            ]),
        }
    }
}

impl Engine for GridSim {
    fn set_map_init(&mut self, init: MapInit) {
        self.map_init = Some(init);
    }

    fn set_pop_init(&mut self, init: PopInit) {
        self.pop_init = Some(init);
    }

    fn add_system(&mut self, system: System) {
        debug!(system = system.name(), position = self.systems.len(), "system added");
        self.systems.push(system);
    }

    fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let num_ticks = self.setup()?;
        info!(num_ticks, systems = self.systems.len(), "run started");

        while self.tick.0 < num_ticks {
            let now = self.tick;
            self.step(now);
            observer
                .on_tick_end(now, &*self)
                .map_err(|source| SimError::Observer { tick: now, source })?;
            debug!(tick = %now, population = self.total_population(), "tick complete");
            self.tick = now.next();
        }

        let final_tick = self.tick;
        observer
            .on_sim_end(final_tick, &*self)
            .map_err(|source| SimError::Observer { tick: final_tick, source })?;

        let summary = RunSummary {
            ticks:            num_ticks,
            final_tick,
            systems:          self.systems.len(),
            final_population: self.total_population(),
        };
        info!(ticks = summary.ticks, population = summary.final_population, "run complete");
        Ok(summary)
    }
}

// ── Zone classification ───────────────────────────────────────────────────────

fn classify(classifier: &Classifier, width: usize, height: usize) -> Vec<Option<ZoneId>> {
    let cell_of = |i: usize| CellCoord::new((i % width) as i32, (i / width) as i32);

    #[cfg(not(feature = "parallel"))]
    {
        (0..width * height).map(|i| classifier.zone(cell_of(i))).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        (0..width * height).into_par_iter().map(|i| classifier.zone(cell_of(i))).collect()
    }
}
