//! Planet generation error types.

use orbis_lod::LodError;
use orbis_terrain::BiomeError;

/// Errors raised by generation passes.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    /// The LOD detail table is invalid.
    #[error("invalid LOD configuration: {0}")]
    Lod(#[from] LodError),

    /// The biome grid is invalid.
    #[error("invalid biome configuration: {0}")]
    Biome(#[from] BiomeError),

    /// A pass was issued while an incremental update is still pending.
    #[error("a generation pass is already in flight")]
    PassInFlight,

    /// An evaluator returned a batch of the wrong size.
    #[error("{evaluator} evaluator returned {actual} values for {expected} positions")]
    EvaluatorLength {
        /// Which evaluator misbehaved.
        evaluator: &'static str,
        /// Number of positions submitted.
        expected: usize,
        /// Number of values returned.
        actual: usize,
    },

    /// The evaluation worker exited without delivering its batch.
    #[error("evaluation worker disconnected before delivering its batch")]
    EvaluatorDisconnected,

    /// The evaluation worker thread could not be started.
    #[error("failed to spawn evaluation worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
