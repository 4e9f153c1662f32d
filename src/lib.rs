//! # spline_motion
//!
//! Time parameterization of multi-joint waypoint paths in Rust.
//!
//! Given ordered waypoints and per-joint velocity / acceleration / jerk limits,
//! the library assigns a duration to every segment and fits clamped cubic
//! splines so that every joint stays within its limits at every waypoint while
//! matching the prescribed boundary velocity and acceleration.
//!
//! This library provides the following modules:
//! - `spline` for the tridiagonal clamped cubic spline solver.
//! - `timing` for seeding segment durations and stretching them until bounds hold.
//! - `reconcile` for moving the near-endpoint waypoints onto boundary accelerations.
//! - `joint_trajectory` for the per-joint state and refinement loop.
//! - `parameterization` for the multi-joint orchestrator and its configuration.
//! - `trajectory` / `limits` for the waypoint and joint-limit data contract.
//! - `motion_polynomial` / `sampler` for evaluating the result at a fixed rate.
//!
//! Author: Anton Khrustalev, creapunk

pub mod error;
pub mod joint_trajectory;
pub mod limits;
pub mod motion_polynomial;
pub mod parameterization;
pub mod reconcile;
pub mod sampler;
pub mod spline;
pub mod timing;
pub mod trajectory;

// Re-export main structs for convenience:
pub use error::*;
pub use joint_trajectory::*;
pub use limits::*;
pub use motion_polynomial::*;
pub use parameterization::*;
pub use sampler::*;
pub use trajectory::*;
