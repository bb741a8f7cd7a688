//! Live oscillator population that a renderer advances frame by frame.

use kuramoto_core::ensemble::{seeded_rng, Ensemble};
use kuramoto_core::model::{DirectKuramoto, MeanFieldKuramoto};
use kuramoto_core::order_parameter::order_parameter_of;
use kuramoto_core::solvers::Euler;
use kuramoto_core::traits::{PhaseModel, Steppable};
use wasm_bindgen::prelude::*;

enum ModelType {
    Direct(DirectKuramoto),
    MeanField(MeanFieldKuramoto),
}

impl ModelType {
    fn as_phase_model(&self) -> &dyn PhaseModel {
        match self {
            ModelType::Direct(m) => m,
            ModelType::MeanField(m) => m,
        }
    }
}

fn build_model(
    model_name: &str,
    frequencies: &[f64],
    coupling: f64,
) -> Option<ModelType> {
    match model_name {
        "direct" => Some(ModelType::Direct(DirectKuramoto::new(frequencies, coupling))),
        "mean_field" => Some(ModelType::MeanField(MeanFieldKuramoto::new(
            frequencies,
            coupling,
        ))),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WasmOscillators {
    model: ModelType,
    state: Vec<f64>,
    t: f64,
    solver: Euler<f64>,
}

#[wasm_bindgen]
impl WasmOscillators {
    /// Draws a population from `Normal(mean_omega, std_omega)` with uniform
    /// initial phases.
    #[wasm_bindgen(constructor)]
    pub fn new(
        oscillators: u32,
        coupling: f64,
        mean_omega: f64,
        std_omega: f64,
        seed: u32,
        model_name: &str,
    ) -> Result<WasmOscillators, JsValue> {
        console_error_panic_hook::set_once();

        if !coupling.is_finite() {
            return Err(JsValue::from_str("Coupling must be finite."));
        }
        let ensemble = Ensemble::draw(
            oscillators as usize,
            mean_omega,
            std_omega,
            &mut seeded_rng(seed as u64),
        )
        .map_err(|e| JsValue::from_str(&format!("Ensemble initialization failed: {}", e)))?;

        let model = build_model(model_name, &ensemble.frequencies, coupling)
            .ok_or_else(|| JsValue::from_str("Unknown model"))?;
        let dim = ensemble.len();

        Ok(WasmOscillators {
            model,
            state: ensemble.phases,
            t: 0.0,
            solver: Euler::new(dim),
        })
    }

    pub fn set_state(&mut self, state: &[f64]) -> Result<(), JsValue> {
        if state.len() != self.state.len() {
            return Err(JsValue::from_str("State dimension mismatch."));
        }
        self.state = state.to_vec();
        Ok(())
    }

    pub fn get_state(&self) -> Vec<f64> {
        self.state.clone()
    }

    pub fn get_frequencies(&self) -> Vec<f64> {
        self.model.as_phase_model().frequencies().to_vec()
    }

    pub fn get_coupling(&self) -> f64 {
        self.model.as_phase_model().coupling()
    }

    pub fn get_model_name(&self) -> String {
        self.model.as_phase_model().name().to_string()
    }

    pub fn set_t(&mut self, t: f64) {
        self.t = t;
    }

    pub fn get_t(&self) -> f64 {
        self.t
    }

    pub fn step(&mut self, dt: f64) {
        match &self.model {
            ModelType::Direct(m) => self.solver.step(m, &mut self.t, &mut self.state, dt),
            ModelType::MeanField(m) => self.solver.step(m, &mut self.t, &mut self.state, dt),
        }
    }

    /// Current `[r, ψ]`.
    pub fn order_parameter(&self) -> Vec<f64> {
        // The state always holds at least one oscillator, see `new`.
        match order_parameter_of(&self.state) {
            Ok((r, psi)) => vec![r, psi],
            Err(_) => vec![f64::NAN, f64::NAN],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillators_step_advances_state_and_time() {
        let mut system =
            WasmOscillators::new(8, 0.0, 2.0, 0.0, 1, "mean_field").expect("system");
        let before = system.get_state();
        system.step(0.5);
        let after = system.get_state();
        assert!((system.get_t() - 0.5).abs() < 1e-15);
        for (a, b) in before.iter().zip(&after) {
            assert!((b - a - 1.0).abs() < 1e-12);
        }
        assert_eq!(system.get_frequencies(), vec![2.0; 8]);
        assert_eq!(system.get_coupling(), 0.0);
        assert_eq!(system.get_model_name(), "mean_field");
    }

    #[test]
    fn direct_and_mean_field_steppers_agree() {
        let mut direct = WasmOscillators::new(6, 0.7, 1.0, 0.2, 9, "direct").expect("direct");
        let mut mean_field =
            WasmOscillators::new(6, 0.7, 1.0, 0.2, 9, "mean_field").expect("mean field");
        for _ in 0..20 {
            direct.step(0.1);
            mean_field.step(0.1);
        }
        for (a, b) in direct.get_state().iter().zip(&mean_field.get_state()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn equal_state_reports_full_synchronization() {
        let mut system = WasmOscillators::new(3, 1.0, 1.0, 0.1, 2, "direct").expect("system");
        system.set_state(&[0.4, 0.4, 0.4]).expect("set state");
        let op = system.order_parameter();
        assert!((op[0] - 1.0).abs() < 1e-12);
        assert!((op[1] - 0.4).abs() < 1e-12);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::WasmOscillators;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn oscillators_reject_unknown_model() {
        let result = WasmOscillators::new(4, 1.0, 1.0, 0.1, 0, "rk4");
        assert!(result.is_err());
        let message = result.err().and_then(|err| err.as_string()).unwrap_or_default();
        assert!(message.contains("Unknown model"));
    }

    #[wasm_bindgen_test]
    fn oscillators_reject_wrong_state_length() {
        let mut system = WasmOscillators::new(3, 0.5, 1.0, 0.1, 1, "direct").expect("system");
        assert!(system.set_state(&[0.0, 1.0]).is_err());
    }
}
