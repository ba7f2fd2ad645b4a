//! Core types and collaborator traits for frost heave simulation.
//!
//! This crate defines the data model and the seams the simulation core is
//! written against:
//!
//! - [`Domain`]: the interval between the fringe base and the ice lens
//! - [`Field`]: nodal values of a piecewise-linear function on a domain
//! - [`Material`]: constitutive closures (porosity, diffusivity, local fields)
//! - [`Residual`] and [`NonlinearSolver`]: the discretization engine contract
//! - [`Sampler`]: maps fields onto fixed-length sample arrays
//! - [`Observer`]: receives events and optionally returns control actions

mod domain;
mod element;
mod engine;
mod field;
mod material;
mod observer;
mod sampler;

pub use domain::{Domain, DomainError, uniform_points};
pub use element::{Element, QUADRATURE};
pub use engine::{Dirichlet, NonlinearSolver, Outcome, Residual};
pub use field::{Field, FieldPoint};
pub use material::{LocalFields, Material};
pub use observer::Observer;
pub use sampler::{Samples, Sampler};
