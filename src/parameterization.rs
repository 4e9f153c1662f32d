use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParameterizationError, RefinementStage};
use crate::joint_trajectory::{RefinementSettings, SingleJointTrajectory};
use crate::limits::{resolve_scaling_factor, JointLimits};
use crate::timing::MIN_SEGMENT_DURATION;
use crate::trajectory::{Trajectory, Waypoint};

/// Construction-time settings of [`IterativeSplineParameterization`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterizationConfig {
    /// Factor an offending segment duration is multiplied by per retry. Must exceed 1.0.
    pub time_scale_factor: f64,
    /// Insert a synthetic waypoint right after the first and right before the last one,
    /// giving the boundary-acceleration matching room to work. Only used together
    /// with `match_boundary_acceleration`.
    pub add_points: bool,
    /// Move waypoints 1 and n-2 so the path starts and ends with the prescribed accelerations.
    pub match_boundary_acceleration: bool,
    /// Cap on every repeat-until-stable loop.
    pub max_iterations: usize,
}

impl Default for ParameterizationConfig {
    fn default() -> Self {
        Self {
            time_scale_factor: 1.01,
            add_points: true,
            match_boundary_acceleration: true,
            max_iterations: 100_000,
        }
    }
}

impl ParameterizationConfig {
    fn validate(&self) -> Result<(), ParameterizationError> {
        if !(self.time_scale_factor.is_finite() && self.time_scale_factor > 1.0) {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!(
                    "time scale factor must be a finite value greater than 1.0, got {}",
                    self.time_scale_factor
                ),
            });
        }
        if self.max_iterations == 0 {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: "max iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn inserts_points(&self) -> bool {
        self.add_points && self.match_boundary_acceleration
    }
}

/// Time-parameterizes a multi-joint waypoint path into clamped cubic splines
/// that respect per-joint velocity, acceleration and jerk limits.
///
/// All joints share one array of segment durations, since every joint has to
/// pass through a waypoint at the same instant. Each joint may only stretch
/// those durations, so the joints are revisited until a full pass leaves the
/// array untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IterativeSplineParameterization {
    config: ParameterizationConfig,
}

impl IterativeSplineParameterization {
    /// Fewest waypoints the spline fit and the boundary matching can work with.
    pub const MIN_WAYPOINTS: usize = 4;

    // Weights of the synthetic waypoints: 90% endpoint, 10% neighbour
    const ENDPOINT_WEIGHT: f64 = 9.0;
    const NEIGHBOUR_WEIGHT: f64 = 1.0;

    pub fn new(config: ParameterizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParameterizationConfig {
        &self.config
    }

    /// Computes segment durations and knot derivatives for `trajectory`.
    ///
    /// The scaling factors shrink every velocity / acceleration limit; values
    /// outside `(0, 1]` fall back to 1.0 with a diagnostic. The returned
    /// trajectory carries `duration_from_previous` on every waypoint after the
    /// first and fitted velocities / accelerations everywhere. When synthetic
    /// waypoints are inserted it is two waypoints longer than the input.
    ///
    /// An empty trajectory is returned unchanged.
    pub fn compute_time_stamps(
        &self,
        trajectory: &Trajectory,
        max_velocity_scaling_factor: f64,
        max_acceleration_scaling_factor: f64,
    ) -> Result<Trajectory, ParameterizationError> {
        if trajectory.is_empty() {
            return Ok(trajectory.clone());
        }

        let group = trajectory
            .group
            .as_ref()
            .ok_or(ParameterizationError::MissingGroupContext)?;
        self.config.validate()?;

        let num_points = trajectory.len();
        if num_points < Self::MIN_WAYPOINTS {
            return Err(ParameterizationError::InsufficientWaypoints(num_points));
        }
        trajectory.check_joint_counts(group.joint_count())?;

        let velocity_scale =
            resolve_scaling_factor("max_velocity_scaling_factor", max_velocity_scaling_factor);
        let acceleration_scale = resolve_scaling_factor(
            "max_acceleration_scaling_factor",
            max_acceleration_scaling_factor,
        );

        let waypoints = if self.config.inserts_points() {
            Self::with_boundary_points(&trajectory.waypoints)
        } else {
            trajectory.waypoints.clone()
        };

        // Waypoints are stored [point][joint]; the solver wants [joint][point]
        let mut joints: Vec<SingleJointTrajectory> = group
            .joints
            .iter()
            .enumerate()
            .map(|(j, variable)| {
                let limits =
                    JointLimits::from_bounds(&variable.bounds, velocity_scale, acceleration_scale);
                SingleJointTrajectory::new(
                    variable.name.clone(),
                    waypoints.iter().map(|w| w.positions[j]).collect(),
                    waypoints.iter().map(|w| w.velocities[j]).collect(),
                    waypoints.iter().map(|w| w.accelerations[j]).collect(),
                    limits,
                )
            })
            .collect();

        // Fail on degenerate inputs and infeasible boundaries before any refinement work
        for joint in &joints {
            joint.validate()?;
        }

        let mut time_diff = vec![MIN_SEGMENT_DURATION; waypoints.len() - 1];
        self.refine_joints(&group.name, &mut joints, &mut time_diff)?;

        let mut output = waypoints;
        for (i, waypoint) in output.iter_mut().enumerate() {
            waypoint.duration_from_previous = if i == 0 { 0.0 } else { time_diff[i - 1] };
            for (j, joint) in joints.iter().enumerate() {
                waypoint.positions[j] = joint.positions[i];
                waypoint.velocities[j] = joint.velocities[i];
                waypoint.accelerations[j] = joint.accelerations[i];
            }
        }

        Ok(Trajectory {
            group: trajectory.group.clone(),
            waypoints: output,
        })
    }

    /// Refines every joint against the shared durations until one full pass
    /// over all joints grows nothing.
    fn refine_joints(
        &self,
        group_name: &str,
        joints: &mut [SingleJointTrajectory],
        time_diff: &mut [f64],
    ) -> Result<(), ParameterizationError> {
        let settings = RefinementSettings {
            time_factor: self.config.time_scale_factor,
            match_boundary_acceleration: self.config.match_boundary_acceleration,
            max_iterations: self.config.max_iterations,
        };

        for pass in 0..self.config.max_iterations {
            let mut changed = false;
            for joint in joints.iter_mut() {
                changed |= joint.refine(time_diff, &settings)?;
            }
            debug!(pass, changed, total = time_diff.iter().sum::<f64>(), "cross-joint pass");
            if !changed {
                return Ok(());
            }
        }

        Err(ParameterizationError::RefinementDidNotConverge {
            joint: group_name.to_string(),
            stage: RefinementStage::CrossJoint,
            iterations: self.config.max_iterations,
        })
    }

    /// Inserts a waypoint 10% of the way into the first segment and one 90% of
    /// the way into the last segment.
    fn with_boundary_points(waypoints: &[Waypoint]) -> Vec<Waypoint> {
        let n = waypoints.len();
        let head = Waypoint::blend(
            &waypoints[0],
            Self::ENDPOINT_WEIGHT,
            &waypoints[1],
            Self::NEIGHBOUR_WEIGHT,
        );
        let tail = Waypoint::blend(
            &waypoints[n - 2],
            Self::NEIGHBOUR_WEIGHT,
            &waypoints[n - 1],
            Self::ENDPOINT_WEIGHT,
        );

        let mut out = Vec::with_capacity(n + 2);
        out.push(waypoints[0].clone());
        out.push(head);
        out.extend_from_slice(&waypoints[1..n - 1]);
        out.push(tail);
        out.push(waypoints[n - 1].clone());
        out
    }
}
