//! Concrete engines for the frost heave core.
//!
//! # Modules
//!
//! - [`newton`]: damped Newton iteration for residuals assembled from linear
//!   elements, with a banded finite-difference Jacobian
//! - [`sampling`]: samplers that map fields onto uniform sample grids
//!
//! Both implement traits from [`frost_core`] so the simulation core stays
//! independent of how systems are solved or sampled.

pub mod newton;
pub mod sampling;

pub use newton::Newton;
pub use sampling::UniformSampler;
