use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ParameterizationError;

/// Bounds declared for one joint variable. `None` means the quantity is unbounded.
///
/// Each range is `(min, max)`; only the smaller magnitude of the two is usable
/// since the spline may move in either direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableBounds {
    pub velocity: Option<(f64, f64)>,
    pub acceleration: Option<(f64, f64)>,
    pub jerk: Option<(f64, f64)>,
}

impl VariableBounds {
    /// Symmetric bounds `[-max, max]` on all three quantities.
    pub fn symmetric(max_velocity: f64, max_acceleration: f64, max_jerk: f64) -> Self {
        Self {
            velocity: Some((-max_velocity, max_velocity)),
            acceleration: Some((-max_acceleration, max_acceleration)),
            jerk: Some((-max_jerk, max_jerk)),
        }
    }

    fn magnitude(range: Option<(f64, f64)>, fallback: f64) -> f64 {
        match range {
            Some((min, max)) => min.abs().min(max.abs()),
            None => fallback,
        }
    }
}

/// Resolved per-joint limits, all strictly positive magnitudes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimits {
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub max_jerk: f64,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            max_velocity: Self::DEFAULT_MAX_VELOCITY,
            max_acceleration: Self::DEFAULT_MAX_ACCELERATION,
            max_jerk: Self::DEFAULT_MAX_JERK,
        }
    }
}

impl JointLimits {
    // Fallbacks for unbounded variables
    pub const DEFAULT_MAX_VELOCITY: f64 = 1.0;
    pub const DEFAULT_MAX_ACCELERATION: f64 = 3.0;
    pub const DEFAULT_MAX_JERK: f64 = 9.0;

    pub fn new(max_velocity: f64, max_acceleration: f64, max_jerk: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            max_jerk,
        }
    }

    /// Resolves declared bounds into usable magnitudes.
    /// Velocity and acceleration are shrunk by the (already resolved) scaling factors;
    /// jerk is never scaled.
    pub fn from_bounds(bounds: &VariableBounds, velocity_scale: f64, acceleration_scale: f64) -> Self {
        let max_velocity =
            VariableBounds::magnitude(bounds.velocity, Self::DEFAULT_MAX_VELOCITY) * velocity_scale;
        let max_acceleration =
            VariableBounds::magnitude(bounds.acceleration, Self::DEFAULT_MAX_ACCELERATION)
                * acceleration_scale;
        let max_jerk = VariableBounds::magnitude(bounds.jerk, Self::DEFAULT_MAX_JERK);
        Self::new(max_velocity, max_acceleration, max_jerk)
    }

    /// Every limit must be finite and strictly positive.
    pub fn validate(&self, joint: &str) -> Result<(), ParameterizationError> {
        let checks = [
            ("velocity", self.max_velocity),
            ("acceleration", self.max_acceleration),
            ("jerk", self.max_jerk),
        ];
        for (quantity, limit) in checks {
            if !(limit.is_finite() && limit > 0.0) {
                warn!(joint, "unusable max {quantity} {limit}");
                return Err(ParameterizationError::InvalidConfiguration {
                    reason: format!("joint {joint}: max {quantity} must be finite and positive, got {limit}"),
                });
            }
        }
        Ok(())
    }
}

/// Resolves a user supplied velocity or acceleration scaling factor.
///
/// Values in `(0, 1]` are used as given. Anything else falls back to 1.0:
/// exactly 0.0 is treated as "unset" and only noted at debug level, other
/// values are reported as a warning.
pub fn resolve_scaling_factor(name: &str, requested: f64) -> f64 {
    let fallback = 1.0;
    if requested > 0.0 && requested <= 1.0 {
        requested
    } else if requested == 0.0 {
        debug!("A {name} of 0.0 was specified, defaulting to {fallback} instead.");
        fallback
    } else {
        warn!("Invalid {name} {requested} specified, defaulting to {fallback} instead.");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_variable_uses_defaults() {
        let limits = JointLimits::from_bounds(&VariableBounds::default(), 1.0, 1.0);
        assert_eq!(limits, JointLimits::default());
        assert_eq!(limits.max_acceleration, 3.0);
        assert_eq!(limits.max_jerk, 9.0);
    }

    #[test]
    fn test_asymmetric_range_uses_smaller_magnitude() {
        let bounds = VariableBounds {
            velocity: Some((-0.5, 2.0)),
            acceleration: Some((-4.0, 3.0)),
            jerk: None,
        };
        let limits = JointLimits::from_bounds(&bounds, 1.0, 1.0);
        assert_eq!(limits.max_velocity, 0.5);
        assert_eq!(limits.max_acceleration, 3.0);
    }

    #[test]
    fn test_scaling_applies_to_velocity_and_acceleration_only() {
        let bounds = VariableBounds::symmetric(2.0, 4.0, 8.0);
        let limits = JointLimits::from_bounds(&bounds, 0.5, 0.25);
        assert!((limits.max_velocity - 1.0).abs() < 1e-12);
        assert!((limits.max_acceleration - 1.0).abs() < 1e-12);
        assert!((limits.max_jerk - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_bound_is_rejected() {
        let limits = JointLimits::from_bounds(&VariableBounds::symmetric(0.0, 1.0, 1.0), 1.0, 1.0);
        assert_eq!(limits.max_velocity, 0.0);
        assert!(matches!(
            limits.validate("j0"),
            Err(ParameterizationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_nan_and_infinite_bounds_are_rejected() {
        let bounds = VariableBounds {
            velocity: None,
            acceleration: Some((f64::NAN, f64::NAN)),
            jerk: None,
        };
        assert!(JointLimits::from_bounds(&bounds, 1.0, 1.0).validate("j0").is_err());

        assert!(JointLimits::new(1.0, f64::NAN, 1.0).validate("j0").is_err());
        assert!(JointLimits::new(1.0, 1.0, f64::INFINITY).validate("j0").is_err());
        assert!(JointLimits::new(-1.0, 1.0, 1.0).validate("j0").is_err());
        assert!(JointLimits::default().validate("j0").is_ok());
    }

    #[test]
    fn test_resolve_scaling_factor() {
        assert_eq!(resolve_scaling_factor("velocity scaling factor", 0.3), 0.3);
        assert_eq!(resolve_scaling_factor("velocity scaling factor", 1.0), 1.0);
        assert_eq!(resolve_scaling_factor("velocity scaling factor", 0.0), 1.0);
        assert_eq!(resolve_scaling_factor("velocity scaling factor", 1.5), 1.0);
        assert_eq!(resolve_scaling_factor("velocity scaling factor", -0.2), 1.0);
        assert_eq!(resolve_scaling_factor("velocity scaling factor", f64::NAN), 1.0);
    }
}
