use tracing::{debug, warn};

use crate::error::{BoundaryEnd, BoundaryQuantity, ParameterizationError, RefinementStage};
use crate::limits::JointLimits;
use crate::reconcile::adjust_two_positions;
use crate::timing::{fit_spline_and_adjust_times, init_times};

/// The path of a single joint: positions, velocities and accelerations at every
/// waypoint, plus the limits and boundary conditions that shape it.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleJointTrajectory {
    pub name: String,
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
    /// (initial, final) velocity, fixed for the whole computation
    pub boundary_velocity: (f64, f64),
    /// (initial, final) acceleration, fixed for the whole computation
    pub boundary_acceleration: (f64, f64),
    pub limits: JointLimits,
}

/// Knobs the refinement loops need; a subset of the parameterization config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefinementSettings {
    pub time_factor: f64,
    pub match_boundary_acceleration: bool,
    pub max_iterations: usize,
}

impl SingleJointTrajectory {
    /// Builds the state for one joint. Boundary conditions are read from the
    /// first and last entries of `velocities` / `accelerations`.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<f64>,
        velocities: Vec<f64>,
        accelerations: Vec<f64>,
        limits: JointLimits,
    ) -> Self {
        let last = positions.len().saturating_sub(1);
        let boundary_velocity = (
            velocities.first().copied().unwrap_or(0.0),
            velocities.get(last).copied().unwrap_or(0.0),
        );
        let boundary_acceleration = (
            accelerations.first().copied().unwrap_or(0.0),
            accelerations.get(last).copied().unwrap_or(0.0),
        );
        Self {
            name: name.into(),
            positions,
            velocities,
            accelerations,
            boundary_velocity,
            boundary_acceleration,
            limits,
        }
    }

    /// Checks everything [`refine`](Self::refine) relies on: usable limits,
    /// finite positions and boundary values, and boundary values inside the limits.
    pub fn validate(&self) -> Result<(), ParameterizationError> {
        self.limits.validate(&self.name)?;

        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!("joint {}: position {} at waypoint {i} is not finite", self.name, self.positions[i]),
            });
        }
        let boundary = [
            self.boundary_velocity.0,
            self.boundary_velocity.1,
            self.boundary_acceleration.0,
            self.boundary_acceleration.1,
        ];
        if boundary.iter().any(|v| !v.is_finite()) {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!(
                    "joint {}: boundary velocity {:?} / acceleration {:?} must be finite",
                    self.name, self.boundary_velocity, self.boundary_acceleration
                ),
            });
        }

        self.validate_boundary()
    }

    /// Rejects boundary conditions that already break the joint limits; no
    /// amount of time stretching can fix those.
    fn validate_boundary(&self) -> Result<(), ParameterizationError> {
        let checks = [
            (BoundaryEnd::Initial, BoundaryQuantity::Velocity, self.boundary_velocity.0, self.limits.max_velocity),
            (BoundaryEnd::Final, BoundaryQuantity::Velocity, self.boundary_velocity.1, self.limits.max_velocity),
            (BoundaryEnd::Initial, BoundaryQuantity::Acceleration, self.boundary_acceleration.0, self.limits.max_acceleration),
            (BoundaryEnd::Final, BoundaryQuantity::Acceleration, self.boundary_acceleration.1, self.limits.max_acceleration),
        ];
        for (end, quantity, value, limit) in checks {
            if !(value.abs() <= limit) {
                warn!(joint = %self.name, "{end} {quantity} {value} out of bounds (limit {limit})");
                return Err(ParameterizationError::InfeasibleBoundary {
                    joint: self.name.clone(),
                    end,
                    quantity,
                    value,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// One bound-check pass over the shared durations; see [`fit_spline_and_adjust_times`].
    pub fn fit_and_adjust(&mut self, dt: &mut [f64], time_factor: f64) -> bool {
        fit_spline_and_adjust_times(
            dt,
            &self.positions,
            self.boundary_velocity,
            &mut self.velocities,
            &mut self.accelerations,
            &self.limits,
            time_factor,
        )
    }

    /// Repeats bound checking until a pass leaves `dt` untouched.
    /// Returns `true` if any pass stretched a duration.
    fn fit_until_stable(
        &mut self,
        dt: &mut [f64],
        settings: &RefinementSettings,
        stage: RefinementStage,
    ) -> Result<bool, ParameterizationError> {
        for iteration in 0..settings.max_iterations {
            if !self.fit_and_adjust(dt, settings.time_factor) {
                return Ok(iteration > 0);
            }
        }
        Err(self.not_converged(stage, settings.max_iterations))
    }

    /// Runs the full refinement of this joint against the shared durations:
    /// 1. seed durations from the velocity limit,
    /// 2. stretch until velocity, acceleration and jerk bounds hold,
    /// 3. if enabled, alternate moving waypoints 1 and n-2 onto the boundary
    ///    accelerations with further stretching until nothing changes.
    ///
    /// Durations only ever grow. Returns `true` if this call grew any of them,
    /// which tells the caller other joints need another look.
    ///
    /// Expects a state that passed [`validate`](Self::validate); the
    /// cross-joint loop calls this many times per joint and does not re-check.
    pub fn refine(
        &mut self,
        dt: &mut [f64],
        settings: &RefinementSettings,
    ) -> Result<bool, ParameterizationError> {
        let mut changed = init_times(dt, &self.positions, self.limits.max_velocity);
        changed |= self.fit_until_stable(dt, settings, RefinementStage::InitialFit)?;

        if settings.match_boundary_acceleration {
            let mut converged = false;
            for _ in 0..settings.max_iterations {
                adjust_two_positions(
                    dt,
                    &mut self.positions,
                    self.boundary_velocity,
                    self.boundary_acceleration,
                );
                if !self.fit_until_stable(dt, settings, RefinementStage::BoundaryAcceleration)? {
                    converged = true;
                    break;
                }
                changed = true;
            }
            if !converged {
                return Err(self.not_converged(
                    RefinementStage::BoundaryAcceleration,
                    settings.max_iterations,
                ));
            }
        }

        debug!(joint = %self.name, changed, "refined joint");
        Ok(changed)
    }

    fn not_converged(&self, stage: RefinementStage, iterations: usize) -> ParameterizationError {
        warn!(joint = %self.name, "refinement gave up in the {stage} loop after {iterations} iterations");
        ParameterizationError::RefinementDidNotConverge {
            joint: self.name.clone(),
            stage,
            iterations,
        }
    }
}
