//! Planet assembly: the full generation pass and the two-phase incremental
//! LOD pass.
//!
//! A full pass rebuilds the chunk grid, builds every chunk at its
//! LOD-selected resolution through one evaluator batch, classifies biomes and
//! samples vegetation. An incremental pass only rebuilds the chunks whose
//! selected resolution changed and has no cached mesh; it is split into
//! [`Planet::begin_lod_update`], which issues the evaluator batch on a worker
//! thread, and [`Planet::finish_lod_update`], which applies the result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, bounded};
use glam::{Mat4, Vec3};
use hashbrown::HashMap;
use orbis_lod::{
    LodDecision, LodSelector, ViewerTracker, chunk_distance_to_viewer, decide_regeneration,
};
use orbis_sphere::{ChunkCoord, generate_patch};
use orbis_terrain::{
    BiomeClassifier, BiomeTexture, HeightParams, PlacementPoint, VegetationSampler, chunk_rng,
};
use tracing::{debug, info, warn};

use crate::context::{EvaluatedBatch, FieldJob, evaluate_batch};
use crate::{
    Chunk, ChunkGrid, Evaluators, GenerationContext, HeightRange, PlanetConfig, PlanetError,
};

/// Summary of a full pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationStats {
    pub chunks: usize,
    pub vertices: usize,
    pub height_range: HeightRange,
    pub placements: usize,
    pub elapsed_ms: f64,
}

/// Summary of an incremental pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LodUpdateStats {
    /// Chunks rebuilt at a new resolution.
    pub regenerated: usize,
    /// Chunks switched to a cached variant.
    pub reused: usize,
    /// Chunks due for a change but too far away to rebuild.
    pub deferred: usize,
    /// Chunks already at their selected resolution.
    pub unchanged: usize,
    /// Vertices evaluated.
    pub vertices: usize,
    pub elapsed_ms: f64,
}

/// Texture and height range the renderer shades the planet with.
#[derive(Clone, Copy, Debug)]
pub struct ShadingData<'a> {
    /// Biome ramps, water last.
    pub texture: &'a BiomeTexture,
    /// Raw height range of the last full pass.
    pub height_range: HeightRange,
}

/// Clears the planet's in-flight flag when the pending update goes away.
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An incremental pass whose evaluator batch has been issued.
///
/// Hand it back to [`Planet::finish_lod_update`] on the planet that issued
/// it. Dropping it abandons the pass; the planet keeps its previous meshes
/// for the affected chunks.
#[derive(Debug)]
pub struct PendingLodUpdate {
    context: GenerationContext,
    receiver: Receiver<Result<EvaluatedBatch, PlanetError>>,
    worker: JoinHandle<()>,
    stats: LodUpdateStats,
    issued_at: Instant,
    _guard: InFlightGuard,
}

impl PendingLodUpdate {
    /// True once the evaluator batch has been delivered, or the worker has
    /// exited without delivering it.
    pub fn is_ready(&self) -> bool {
        !self.receiver.is_empty() || self.worker.is_finished()
    }

    /// Chunks being rebuilt.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.context.coords()
    }
}

/// A chunked planet and its generation state.
pub struct Planet {
    config: PlanetConfig,
    selector: LodSelector,
    sampler: VegetationSampler,
    evaluators: Evaluators,
    classifier: BiomeClassifier,
    texture: BiomeTexture,
    grid: ChunkGrid,
    height_range: Option<HeightRange>,
    placements: HashMap<ChunkCoord, Vec<PlacementPoint>>,
    viewer: ViewerTracker,
    in_flight: Arc<AtomicBool>,
}

impl Planet {
    /// Validate `config` and create a planet with no chunks yet.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::Lod`] for an invalid detail table and
    /// [`PlanetError::Biome`] for an empty biome grid.
    pub fn new(config: PlanetConfig, evaluators: Evaluators) -> Result<Self, PlanetError> {
        let selector = LodSelector::new(config.lod.detail_levels.clone())?;
        let classifier = BiomeClassifier::new(&config.biomes)?;
        let texture = BiomeTexture::build(&config.biomes);
        Ok(Self {
            sampler: VegetationSampler::new(config.vegetation.clone()),
            viewer: ViewerTracker::new(config.lod.viewer_move_threshold),
            config,
            selector,
            evaluators,
            classifier,
            texture,
            grid: ChunkGrid::default(),
            height_range: None,
            placements: HashMap::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// The biome table and shading texture are rebuilt at once, and every
    /// cached mesh variant and placement is reclassified against the new
    /// biomes. Terrain changes take effect at the next pass; a changed chunk
    /// resolution makes the next incremental pass rebuild the grid.
    pub fn set_config(&mut self, config: PlanetConfig) -> Result<(), PlanetError> {
        self.ensure_idle()?;
        let selector = LodSelector::new(config.lod.detail_levels.clone())?;
        let classifier = BiomeClassifier::new(&config.biomes)?;
        self.selector = selector;
        self.texture = BiomeTexture::build(&config.biomes);
        self.classifier = classifier;
        self.reclassify();
        self.sampler = VegetationSampler::new(config.vegetation.clone());
        self.viewer = ViewerTracker::new(config.lod.viewer_move_threshold);
        self.config = config;
        Ok(())
    }

    /// Planet-local to world transform.
    pub fn transform(&self) -> Mat4 {
        self.config.planet.transform()
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn chunk(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.grid.get(coord)
    }

    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Height range of the last full pass.
    pub fn height_range(&self) -> Option<HeightRange> {
        self.height_range
    }

    pub fn shading(&self) -> ShadingData<'_> {
        ShadingData {
            texture: &self.texture,
            height_range: self.height_range.unwrap_or_default(),
        }
    }

    /// Vegetation points of one chunk.
    pub fn placements_for(&self, coord: &ChunkCoord) -> &[PlacementPoint] {
        self.placements.get(coord).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every vegetation point of the planet.
    pub fn placements(&self) -> impl Iterator<Item = &PlacementPoint> {
        self.placements.values().flatten()
    }

    /// True while an incremental update is pending.
    pub fn is_pass_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn ensure_idle(&self) -> Result<(), PlanetError> {
        if self.is_pass_in_flight() {
            Err(PlanetError::PassInFlight)
        } else {
            Ok(())
        }
    }

    fn field_job(&self, fixed_range: Option<HeightRange>) -> FieldJob {
        FieldJob {
            height_params: HeightParams::new(&self.config.terrain, self.config.planet.seed),
            climate: self.config.climate.clone(),
            planet_up: self.config.planet.planet_up(),
            fixed_range,
        }
    }

    /// Run a full pass for a viewer at `viewer` (world space).
    ///
    /// # Errors
    ///
    /// [`PlanetError::PassInFlight`] while an incremental update is pending,
    /// [`PlanetError::EvaluatorLength`] if an evaluator misbehaves.
    pub fn generate(&mut self, viewer: Vec3) -> Result<GenerationStats, PlanetError> {
        self.ensure_idle()?;
        let start = Instant::now();
        let chunk_resolution = self.config.planet.chunk_resolution;
        info!(chunk_resolution, seed = self.config.planet.seed, "Full generation pass started");

        let classifier = BiomeClassifier::new(&self.config.biomes)?;
        let texture = BiomeTexture::build(&self.config.biomes);
        let mut grid = ChunkGrid::build(chunk_resolution);

        let transform = self.transform();
        let mut context = GenerationContext::new();
        for chunk in grid.iter_mut() {
            let resolution = match chunk.refresh_bounds(&transform) {
                Some(bounds) => self.selector.select_for_bounds(&bounds, viewer),
                None => self.selector.finest_resolution(),
            };
            let coord = chunk.coord();
            context.push_patch(coord, resolution, generate_patch(coord, chunk_resolution, resolution));
        }

        let vertices = context.vertex_count();
        let chunks = context.chunk_count();
        let batch = evaluate_batch(&self.evaluators, context.positions(), &self.field_job(None))?;
        let range = batch.range;
        for (coord, variant) in context.into_variants(batch, &classifier)? {
            if let Some(chunk) = grid.get_mut(&coord) {
                chunk.insert_variant(variant);
            }
        }

        // The previous planet stays intact until the new one is complete.
        self.classifier = classifier;
        self.texture = texture;
        self.grid = grid;
        self.height_range = range;
        self.placements.clear();
        let height_range = range.unwrap_or_default();

        let placements = self.sample_vegetation(&transform);
        self.viewer.mark_checked(viewer);

        let stats = GenerationStats {
            chunks,
            vertices,
            height_range,
            placements,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        info!(
            chunks,
            vertices,
            min_height = height_range.min,
            max_height = height_range.max,
            placements,
            elapsed_ms = stats.elapsed_ms,
            "Full generation pass finished"
        );
        Ok(stats)
    }

    fn reclassify(&mut self) {
        for chunk in self.grid.iter_mut() {
            chunk.reclassify(&self.classifier);
        }
        for point in self.placements.values_mut().flatten() {
            let biome = self
                .grid
                .get(&point.chunk)
                .and_then(|chunk| chunk.variant(point.resolution))
                .and_then(|variant| variant.biomes.get(point.vertex_index as usize));
            if let Some(&biome) = biome {
                point.biome_index = biome;
            }
        }
        debug!(chunks = self.grid.len(), "Reclassified cached meshes");
    }

    fn sample_vegetation(&mut self, transform: &Mat4) -> usize {
        let seed = self.config.planet.seed;
        let mut total = 0;
        for chunk in self.grid.iter() {
            let Some(variant) = chunk.active_variant() else {
                continue;
            };
            let coord = chunk.coord();
            let mut rng = chunk_rng(seed, &coord);
            let points = self
                .sampler
                .sample(&variant.surface(), transform, coord, &mut rng);
            total += points.len();
            self.placements.insert(coord, points);
        }
        total
    }

    /// Start an incremental pass if the viewer moved far enough since the
    /// last check.
    pub fn update_viewer(&mut self, viewer: Vec3) -> Result<Option<PendingLodUpdate>, PlanetError> {
        self.ensure_idle()?;
        if !self.viewer.should_check(viewer) {
            return Ok(None);
        }
        self.begin_lod_update(viewer)
    }

    /// Issue phase of an incremental pass.
    ///
    /// Chunks whose selected resolution is cached switch to it immediately.
    /// Chunks that need a new mesh are batched and sent to the evaluators on
    /// a worker thread; the returned handle completes the pass. Returns
    /// `None` when nothing needs rebuilding. If the grid no longer matches
    /// the configured chunk resolution, a full pass runs instead and `None`
    /// is returned.
    pub fn begin_lod_update(
        &mut self,
        viewer: Vec3,
    ) -> Result<Option<PendingLodUpdate>, PlanetError> {
        self.ensure_idle()?;
        let chunk_resolution = self.config.planet.chunk_resolution;
        if !self.grid.matches(chunk_resolution) {
            warn!(
                expected = chunk_resolution,
                actual = self.grid.chunk_resolution(),
                "Chunk grid does not match configuration, rebuilding planet"
            );
            self.generate(viewer)?;
            return Ok(None);
        }

        let start = Instant::now();
        let transform = self.transform();
        let far_cutoff = self.config.lod.far_regeneration_distance;
        let mut stats = LodUpdateStats::default();
        let mut context = GenerationContext::new();

        for chunk in self.grid.iter_mut() {
            let Some(bounds) = chunk.refresh_bounds(&transform) else {
                continue;
            };
            let resolution = self.selector.select_for_bounds(&bounds, viewer);
            let distance = chunk_distance_to_viewer(&bounds, viewer);
            let decision = decide_regeneration(
                chunk.active_resolution(),
                resolution,
                chunk.has_variant(resolution),
                distance,
                far_cutoff,
            );
            match decision {
                LodDecision::Unchanged => stats.unchanged += 1,
                LodDecision::Reuse(r) => {
                    chunk.activate(r);
                    stats.reused += 1;
                }
                LodDecision::Deferred => stats.deferred += 1,
                LodDecision::Regenerate(r) => {
                    let coord = chunk.coord();
                    context.push_patch(coord, r, generate_patch(coord, chunk_resolution, r));
                }
            }
        }

        stats.regenerated = context.chunk_count();
        stats.vertices = context.vertex_count();
        if context.is_empty() {
            stats.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            debug!(
                reused = stats.reused,
                deferred = stats.deferred,
                "LOD update needs no rebuild"
            );
            return Ok(None);
        }

        let (sender, receiver) = bounded(1);
        let evaluators = self.evaluators.clone();
        let positions = context.positions().to_vec();
        let job = self.field_job(self.height_range);
        let worker = std::thread::Builder::new()
            .name("orbis-lod-eval".into())
            .spawn(move || {
                let _ = sender.send(evaluate_batch(&evaluators, &positions, &job));
            })
            .map_err(PlanetError::WorkerSpawn)?;

        self.in_flight.store(true, Ordering::Release);
        info!(
            regenerate = stats.regenerated,
            reused = stats.reused,
            deferred = stats.deferred,
            vertices = stats.vertices,
            "LOD update issued"
        );
        Ok(Some(PendingLodUpdate {
            context,
            receiver,
            worker,
            stats,
            issued_at: start,
            _guard: InFlightGuard(Arc::clone(&self.in_flight)),
        }))
    }

    /// Resume phase of an incremental pass: wait for the batch, then
    /// displace, classify and activate the rebuilt chunks.
    ///
    /// # Errors
    ///
    /// [`PlanetError::EvaluatorDisconnected`] if the worker died,
    /// [`PlanetError::EvaluatorLength`] if an evaluator misbehaved. Affected
    /// chunks keep their previous meshes either way.
    pub fn finish_lod_update(
        &mut self,
        pending: PendingLodUpdate,
    ) -> Result<LodUpdateStats, PlanetError> {
        let PendingLodUpdate {
            context,
            receiver,
            worker: _,
            mut stats,
            issued_at,
            _guard,
        } = pending;

        let batch = receiver
            .recv()
            .map_err(|_| PlanetError::EvaluatorDisconnected)??;
        for (coord, variant) in context.into_variants(batch, &self.classifier)? {
            if let Some(chunk) = self.grid.get_mut(&coord) {
                chunk.insert_variant(variant);
            }
        }

        stats.elapsed_ms = issued_at.elapsed().as_secs_f64() * 1000.0;
        info!(
            regenerated = stats.regenerated,
            reused = stats.reused,
            vertices = stats.vertices,
            elapsed_ms = stats.elapsed_ms,
            "LOD update applied"
        );
        Ok(stats)
    }

    /// Issue and immediately finish an incremental pass.
    pub fn run_lod_update(&mut self, viewer: Vec3) -> Result<Option<LodUpdateStats>, PlanetError> {
        match self.begin_lod_update(viewer)? {
            Some(pending) => self.finish_lod_update(pending).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planet")
            .field("chunks", &self.grid.len())
            .field("height_range", &self.height_range)
            .field("in_flight", &self.is_pass_in_flight())
            .finish_non_exhaustive()
    }
}
