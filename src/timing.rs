use tracing::trace;

use crate::limits::JointLimits;
use crate::spline::fit_cubic_spline;

/// Smallest duration a segment may hold; keeps the spline solver away from division by zero.
pub const MIN_SEGMENT_DURATION: f64 = f64::EPSILON;

/// Relative slack allowed when comparing a value against its limit, so a
/// boundary value sitting exactly on a limit is not re-scaled forever.
const LIMIT_TOLERANCE: f64 = 1e-9;

fn exceeds(value: f64, limit: f64) -> bool {
    value.abs() > limit * (1.0 + LIMIT_TOLERANCE)
}

/// Raises every segment duration to at least the time needed to cover the
/// segment at `max_velocity`. Durations are never lowered.
///
/// Returns `true` if any duration was raised.
pub fn init_times(dt: &mut [f64], pos: &[f64], max_velocity: f64) -> bool {
    let mut changed = false;
    for (i, segment) in dt.iter_mut().enumerate() {
        let min_dt = (pos[i + 1] - pos[i]).abs() / max_velocity + MIN_SEGMENT_DURATION;
        if *segment < min_dt {
            *segment = min_dt;
            changed = true;
        }
    }
    changed
}

/// Fits the spline, then checks every segment against the joint limits.
///
/// A segment whose end knots exceed the velocity or acceleration limit has its
/// duration multiplied by `time_factor`. Only a segment that passes those checks
/// is tested for jerk, which is constant per segment:
/// `(acc[i+1] - acc[i]) / dt[i]`.
///
/// `velocities` and `accelerations` hold the fit for the durations as they were
/// on entry. Returns `true` if any duration was scaled.
pub fn fit_spline_and_adjust_times(
    dt: &mut [f64],
    pos: &[f64],
    vel: (f64, f64),
    velocities: &mut [f64],
    accelerations: &mut [f64],
    limits: &JointLimits,
    time_factor: f64,
) -> bool {
    fit_cubic_spline(dt, pos, vel, velocities, accelerations);

    let mut changed = false;
    for i in 0..dt.len() {
        let vel_over = exceeds(velocities[i], limits.max_velocity)
            || exceeds(velocities[i + 1], limits.max_velocity);
        let acc_over = exceeds(accelerations[i], limits.max_acceleration)
            || exceeds(accelerations[i + 1], limits.max_acceleration);

        if vel_over || acc_over {
            dt[i] *= time_factor;
            changed = true;
            trace!(segment = i, duration = dt[i], vel_over, acc_over, "stretched segment");
        } else {
            let jrk = (accelerations[i + 1] - accelerations[i]) / dt[i];
            if exceeds(jrk, limits.max_jerk) {
                dt[i] *= time_factor;
                changed = true;
                trace!(segment = i, duration = dt[i], jrk, "stretched segment for jerk");
            }
        }
    }
    changed
}
