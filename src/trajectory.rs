use serde::{Deserialize, Serialize};

use crate::error::ParameterizationError;
use crate::limits::VariableBounds;

/// One sampled configuration along the path.
///
/// `velocities` and `accelerations` are only read at the first and last waypoint
/// (boundary conditions); everywhere else they are outputs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
    /// Time between the previous waypoint and this one. Always 0.0 for the first waypoint.
    pub duration_from_previous: f64,
}

impl Waypoint {
    /// A waypoint at rest: zero velocity and acceleration on every joint.
    pub fn at_rest(positions: Vec<f64>) -> Self {
        let joints = positions.len();
        Self {
            positions,
            velocities: vec![0.0; joints],
            accelerations: vec![0.0; joints],
            duration_from_previous: 0.0,
        }
    }

    pub fn new(positions: Vec<f64>, velocities: Vec<f64>, accelerations: Vec<f64>) -> Self {
        Self {
            positions,
            velocities,
            accelerations,
            duration_from_previous: 0.0,
        }
    }

    /// Weighted blend `(w_a * a + w_b * b) / (w_a + w_b)` of two waypoints,
    /// joint by joint, for positions, velocities and accelerations.
    pub fn blend(a: &Waypoint, w_a: f64, b: &Waypoint, w_b: f64) -> Self {
        let total = w_a + w_b;
        let mix = |x: &[f64], y: &[f64]| -> Vec<f64> {
            x.iter()
                .zip(y)
                .map(|(x, y)| (w_a * x + w_b * y) / total)
                .collect()
        };
        Self {
            positions: mix(&a.positions, &b.positions),
            velocities: mix(&a.velocities, &b.velocities),
            accelerations: mix(&a.accelerations, &b.accelerations),
            duration_from_previous: 0.0,
        }
    }
}

/// A named joint variable of a group together with its declared bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointVariable {
    pub name: String,
    #[serde(default)]
    pub bounds: VariableBounds,
}

impl JointVariable {
    pub fn new(name: impl Into<String>, bounds: VariableBounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// The joint group a trajectory was planned for. Joint `j` of every waypoint
/// corresponds to `joints[j]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointGroup {
    pub name: String,
    pub joints: Vec<JointVariable>,
}

impl JointGroup {
    pub fn new(name: impl Into<String>, joints: Vec<JointVariable>) -> Self {
        Self {
            name: name.into(),
            joints,
        }
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

/// Ordered waypoints plus the group needed to resolve joint limits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub group: Option<JointGroup>,
    pub waypoints: Vec<Waypoint>,
}

impl Trajectory {
    pub fn new(group: JointGroup, waypoints: Vec<Waypoint>) -> Self {
        Self {
            group: Some(group),
            waypoints,
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Segment durations, one per adjacent waypoint pair.
    pub fn durations(&self) -> Vec<f64> {
        self.waypoints
            .iter()
            .skip(1)
            .map(|w| w.duration_from_previous)
            .collect()
    }

    /// Cumulative time stamp of every waypoint, starting at 0.0.
    pub fn time_from_start(&self) -> Vec<f64> {
        let mut time = 0.0;
        self.waypoints
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if i > 0 {
                    time += w.duration_from_previous;
                }
                time
            })
            .collect()
    }

    pub fn total_duration(&self) -> f64 {
        self.durations().iter().sum()
    }

    /// Fails on the first waypoint whose positions, velocities or
    /// accelerations do not hold exactly `expected` joint values.
    pub fn check_joint_counts(&self, expected: usize) -> Result<(), ParameterizationError> {
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            let found = [
                waypoint.positions.len(),
                waypoint.velocities.len(),
                waypoint.accelerations.len(),
            ]
            .into_iter()
            .find(|&len| len != expected);
            if let Some(found) = found {
                return Err(ParameterizationError::JointCountMismatch {
                    waypoint: i,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_nine_to_one() {
        let a = Waypoint::new(vec![0.0, 10.0], vec![1.0, 0.0], vec![0.0, 2.0]);
        let b = Waypoint::at_rest(vec![1.0, 0.0]);
        let mid = Waypoint::blend(&a, 9.0, &b, 1.0);
        assert!((mid.positions[0] - 0.1).abs() < 1e-12);
        assert!((mid.positions[1] - 9.0).abs() < 1e-12);
        assert!((mid.velocities[0] - 0.9).abs() < 1e-12);
        assert!((mid.accelerations[1] - 1.8).abs() < 1e-12);
        assert_eq!(mid.duration_from_previous, 0.0);
    }

    #[test]
    fn test_time_from_start_ignores_first_duration() {
        let mut waypoints: Vec<Waypoint> = (0..3).map(|i| Waypoint::at_rest(vec![i as f64])).collect();
        waypoints[0].duration_from_previous = 5.0;
        waypoints[1].duration_from_previous = 1.5;
        waypoints[2].duration_from_previous = 0.5;
        let trajectory = Trajectory {
            group: None,
            waypoints,
        };
        assert_eq!(trajectory.time_from_start(), vec![0.0, 1.5, 2.0]);
        assert_eq!(trajectory.durations(), vec![1.5, 0.5]);
        assert!((trajectory.total_duration() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_check_joint_counts_reports_ragged_waypoint() {
        let mut waypoints: Vec<Waypoint> = (0..3).map(|i| Waypoint::at_rest(vec![i as f64, 0.0])).collect();
        waypoints[2].accelerations.pop();
        let trajectory = Trajectory {
            group: None,
            waypoints,
        };
        assert_eq!(
            trajectory.check_joint_counts(2),
            Err(ParameterizationError::JointCountMismatch {
                waypoint: 2,
                expected: 2,
                found: 1,
            })
        );
    }
}
