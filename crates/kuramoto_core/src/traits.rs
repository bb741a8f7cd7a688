use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Numeric types the solvers can integrate with.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A vector field `dx/dt = f(t, x)` on a fixed-dimensional state space.
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Writes `f(t, x)` into `out`. `x` and `out` both have `dimension()` entries.
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// Phase dynamics of a globally coupled oscillator population: one state
/// component per oscillator, each with a fixed natural frequency.
pub trait PhaseModel: DynamicalSystem<f64> {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Natural frequencies, one per oscillator.
    fn frequencies(&self) -> &[f64];

    /// Global coupling strength K.
    fn coupling(&self) -> f64;
}

/// A fixed-step integrator.
pub trait Steppable<T: Scalar> {
    /// Advances `state` from `t` to `t + dt` in place and updates `t`.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}
