//! Order-parameter analysis of trajectories held on the JavaScript side.

use crate::simulation::trajectory_from_row_major;
use kuramoto_core::analysis::{
    effective_frequencies as core_effective_frequencies, gaussian_critical_coupling,
    long_run_order_parameter as core_long_run,
};
use kuramoto_core::order_parameter::order_parameter;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

/// `{ r, psi }` for a row-major phase buffer of `oscillators` rows.
#[wasm_bindgen]
pub fn order_parameter_series(
    phases: Vec<f64>,
    oscillators: u32,
    dt: f64,
) -> Result<JsValue, JsValue> {
    let trajectory = trajectory_from_row_major(&phases, oscillators as usize, dt)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    let series = order_parameter(&trajectory)
        .map_err(|e| JsValue::from_str(&format!("Order parameter computation failed: {}", e)))?;
    to_value(&series).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
pub fn long_run_order_parameter(
    phases: Vec<f64>,
    oscillators: u32,
    dt: f64,
    fraction: f64,
) -> Result<f64, JsValue> {
    let trajectory = trajectory_from_row_major(&phases, oscillators as usize, dt)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    core_long_run(&trajectory, fraction)
        .map_err(|e| JsValue::from_str(&format!("Long-run estimate failed: {}", e)))
}

#[wasm_bindgen]
pub fn effective_frequencies(
    phases: Vec<f64>,
    oscillators: u32,
    dt: f64,
    fraction: f64,
) -> Result<Vec<f64>, JsValue> {
    let trajectory = trajectory_from_row_major(&phases, oscillators as usize, dt)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    core_effective_frequencies(&trajectory, fraction)
        .map_err(|e| JsValue::from_str(&format!("Effective frequency estimate failed: {}", e)))
}

/// Theoretical onset of synchronization for Gaussian natural frequencies.
#[wasm_bindgen]
pub fn critical_coupling(std_omega: f64) -> Result<f64, JsValue> {
    gaussian_critical_coupling(std_omega).map_err(|e| JsValue::from_str(&e.to_string()))
}
