//! WASM bindings for `kuramoto_core`.
//!
//! Exposes a frame-by-frame oscillator stepper, batch simulations returning
//! playback payloads, trajectory analysis helpers and a stepped coupling sweep.

mod analysis;
mod simulation;
mod sweep_runner;
mod system;

pub use analysis::{
    critical_coupling, effective_frequencies, long_run_order_parameter, order_parameter_series,
};
pub use simulation::WasmSimulation;
pub use sweep_runner::WasmSweepRunner;
pub use system::WasmOscillators;

