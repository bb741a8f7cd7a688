use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Fixed-step explicit Euler solver.
///
/// The derivative is evaluated once from the state at the start of the step
/// and written to a scratch buffer, so every component update reads only the
/// previous step's values.
pub struct Euler<T: Scalar> {
    rate: Vec<T>,
}

impl<T: Scalar> Euler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            rate: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for Euler<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let t0 = *t;

        // rate = f(t, y)
        system.apply(t0, state, &mut self.rate);

        // y_next = y + dt * rate
        for (value, rate) in state.iter_mut().zip(&self.rate) {
            *value = *value + dt * *rate;
        }

        *t = t0 + dt;
    }
}
