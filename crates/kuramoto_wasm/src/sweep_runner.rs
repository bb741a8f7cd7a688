//! Stepped bifurcation sweep runner.

use kuramoto_core::config::SweepConfig;
use kuramoto_core::sweep::{estimate_critical_coupling, SweepRunner};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// WASM-exported runner for coupling sweeps.
/// Allows progress reporting by running batches of coupling values at a time.
#[wasm_bindgen]
pub struct WasmSweepRunner {
    runner: Option<SweepRunner>,
}

#[wasm_bindgen]
impl WasmSweepRunner {
    /// Create a new stepped sweep over `k_values`.
    #[wasm_bindgen(constructor)]
    pub fn new(k_values: Vec<f64>, settings_val: JsValue) -> Result<WasmSweepRunner, JsValue> {
        console_error_panic_hook::set_once();

        let settings: SweepConfig = from_value(settings_val)
            .map_err(|e| JsValue::from_str(&format!("Invalid sweep settings: {}", e)))?;

        let runner = SweepRunner::new(k_values, settings)
            .map_err(|e| JsValue::from_str(&format!("Sweep init failed: {}", e)))?;

        Ok(WasmSweepRunner {
            runner: Some(runner),
        })
    }

    /// Check if every coupling value has been simulated.
    pub fn is_done(&self) -> bool {
        self.runner.as_ref().map_or(true, |runner| runner.is_done())
    }

    /// Run a batch of coupling values and return progress.
    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        let result = runner.run_steps(batch_size as usize);

        to_value(&result).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Get progress information.
    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        let result = runner.step_result();

        to_value(&result).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Get the bifurcation record. Consumes the runner.
    pub fn get_result(&mut self) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .take()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        let record = runner.take_result();

        to_value(&record).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Interpolated coupling where the completed part of the sweep first
    /// crosses `threshold`, if it does.
    pub fn critical_coupling(&self, threshold: f64) -> Option<f64> {
        let runner = self.runner.as_ref()?;
        estimate_critical_coupling(&runner.record(), threshold)
    }
}
