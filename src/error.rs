use std::fmt;

use thiserror::Error;

/// Which end of the path a boundary condition belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryEnd {
    Initial,
    Final,
}

impl fmt::Display for BoundaryEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryEnd::Initial => write!(f, "initial"),
            BoundaryEnd::Final => write!(f, "final"),
        }
    }
}

/// Which derivative a boundary condition prescribes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryQuantity {
    Velocity,
    Acceleration,
}

impl fmt::Display for BoundaryQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryQuantity::Velocity => write!(f, "velocity"),
            BoundaryQuantity::Acceleration => write!(f, "acceleration"),
        }
    }
}

/// The repeat-until-stable loop that ran out of iterations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefinementStage {
    /// Bound checking right after seeding.
    InitialFit,
    /// Reconcile + bound check cycle matching boundary accelerations.
    BoundaryAcceleration,
    /// Outer pass over all joints sharing the duration array.
    CrossJoint,
}

impl fmt::Display for RefinementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefinementStage::InitialFit => write!(f, "initial fit"),
            RefinementStage::BoundaryAcceleration => write!(f, "boundary acceleration"),
            RefinementStage::CrossJoint => write!(f, "cross-joint"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterizationError {
    #[error("trajectory carries no joint group to resolve limits from")]
    MissingGroupContext,
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("trajectory needs at least 4 waypoints, got {0}")]
    InsufficientWaypoints(usize),
    #[error("waypoint {waypoint} carries {found} joint values, expected {expected}")]
    JointCountMismatch {
        waypoint: usize,
        expected: usize,
        found: usize,
    },
    #[error("{end} {quantity} {value} of joint '{joint}' is out of bounds (limit {limit})")]
    InfeasibleBoundary {
        joint: String,
        end: BoundaryEnd,
        quantity: BoundaryQuantity,
        value: f64,
        limit: f64,
    },
    #[error("refinement of joint '{joint}' did not converge in the {stage} loop after {iterations} iterations")]
    RefinementDidNotConverge {
        joint: String,
        stage: RefinementStage,
        iterations: usize,
    },
}
