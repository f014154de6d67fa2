//! Scoring primitives shared by the retrieval models.

pub mod dirichlet;

pub use dirichlet::{DEFAULT_MU, DirichletSmoothing, dirichlet_smoothed};
