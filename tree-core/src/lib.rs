//! Procedural 3-D tree generation library.
//!
//! Main components:
//! - [`curve`] — seed spiral and trunk helix sampling.
//! - [`branch`] — recursive two-way branching with jitter.
//! - [`canopy`] — uniform point cloud filling a sphere.
//! - [`scene`] — composition of all parts plus drawing style.
//! - [`config`] — generation parameters and validation.
//! - [`error`] — error type for config loading and validation.
//! - [`types`] — shared geometry types and IDs.

pub mod branch;
pub mod canopy;
pub mod config;
pub mod curve;
pub mod error;
pub mod scene;
pub mod types;
