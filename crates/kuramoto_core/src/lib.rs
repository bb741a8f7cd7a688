pub mod analysis;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod model;
pub mod order_parameter;
pub mod simulation;
pub mod solvers;
pub mod sweep;
pub mod trajectory;
/// The `kuramoto_core` crate simulates populations of Kuramoto phase oscillators
/// and measures their synchronization.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem` (vector fields), `Steppable` (solvers).
/// - **Models**: pairwise (`DirectKuramoto`) and order-parameter (`MeanFieldKuramoto`) couplings.
/// - **Simulation**: fixed-step Euler drivers producing N×T phase trajectories.
/// - **Analysis**: order parameter, long-run estimator, drift frequencies.
/// - **Sweep**: coupling sweeps tracing the synchronization transition.
pub mod traits;

pub use analysis::long_run_order_parameter;
pub use config::{SimulationConfig, SweepConfig, DEFAULT_LONG_RUN_FRACTION};
pub use ensemble::{seeded_rng, Ensemble};
pub use error::{KuramotoError, Result};
pub use order_parameter::{order_parameter, OrderParameterSeries};
pub use simulation::{simulate_direct, simulate_mean_field};
pub use sweep::{bifurcation_sweep, BifurcationPoint, BifurcationRecord, PointOutcome};
pub use trajectory::PhaseTrajectory;
