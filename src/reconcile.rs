use tracing::trace;

use crate::spline::fit_cubic_spline;

/// Moves `pos[1]` and `pos[n-2]` so the fitted spline starts and ends with the
/// accelerations `acc = (init, exit)`.
///
/// For fixed durations the end accelerations of a clamped spline are affine in
/// those two positions. The spline is fitted with waypoint 1 collapsed onto
/// waypoint 0 and waypoint n-2 collapsed onto n-3 (the base), then with each of
/// them collapsed onto its other neighbour (waypoint 2, waypoint n-1). The new
/// positions follow from the two-point form on each end; the small coupling
/// between the ends is solved together so both targets are hit at once.
///
/// An end whose acceleration does not respond to its waypoint (a2 == a0, e.g.
/// both neighbours coincide) keeps its current position.
///
/// Returns which ends were moved, `(init, exit)`.
pub fn adjust_two_positions(
    dt: &[f64],
    pos: &mut [f64],
    vel: (f64, f64),
    acc: (f64, f64),
) -> (bool, bool) {
    let n = pos.len();
    debug_assert!(n >= 4);
    let (first, last) = (1, n - 2);

    // Anchors captured up front: for n == 4 the two moved waypoints are each other's anchors
    let (p_lo, p_hi) = (pos[0], pos[2]);
    let (q_lo, q_hi) = (pos[n - 3], pos[n - 1]);

    let mut velocities = vec![0.0; n];
    let mut accelerations = vec![0.0; n];
    let mut end_acc = |trial: &[f64]| -> (f64, f64) {
        fit_cubic_spline(dt, trial, vel, &mut velocities, &mut accelerations);
        (accelerations[0], accelerations[n - 1])
    };

    let mut trial = pos.to_vec();
    trial[first] = p_lo;
    trial[last] = q_lo;
    let (a0, b0) = end_acc(&trial);

    trial[first] = p_hi;
    let (a2, b_first) = end_acc(&trial);
    trial[first] = p_lo;

    trial[last] = q_hi;
    let (a_last, b2) = end_acc(&trial);

    // Response of (init, exit) acceleration to a full collapse of each waypoint
    let (s_ff, s_lf) = (a2 - a0, b_first - b0);
    let (s_fl, s_ll) = (a_last - a0, b2 - b0);
    let (r_f, r_l) = (acc.0 - a0, acc.1 - b0);

    let move_first = s_ff != 0.0;
    let move_last = s_ll != 0.0;

    match (move_first, move_last) {
        (true, true) => {
            let det = s_ff * s_ll - s_fl * s_lf;
            let (s, u) = if det != 0.0 {
                ((r_f * s_ll - s_fl * r_l) / det, (s_ff * r_l - s_lf * r_f) / det)
            } else {
                (r_f / s_ff, r_l / s_ll)
            };
            pos[first] = p_lo + s * (p_hi - p_lo);
            pos[last] = q_lo + u * (q_hi - q_lo);
        }
        (true, false) => {
            // exit waypoint stays put; measure the init end against it
            trial[last] = pos[last];
            let (a_base, _) = end_acc(&trial);
            pos[first] = p_lo + (acc.0 - a_base) / s_ff * (p_hi - p_lo);
            trace!("exit acceleration does not respond to waypoint {last}, left in place");
        }
        (false, true) => {
            trial[first] = pos[first];
            trial[last] = q_lo;
            let (_, b_base) = end_acc(&trial);
            pos[last] = q_lo + (acc.1 - b_base) / s_ll * (q_hi - q_lo);
            trace!("init acceleration does not respond to waypoint {first}, left in place");
        }
        (false, false) => {
            trace!("neither boundary acceleration responds to its waypoint, nothing moved");
        }
    }

    (move_first, move_last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::fitted_derivatives;

    #[test]
    fn test_consistent_straight_line_is_unchanged() {
        let mut pos = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let dt = [1.0; 5];
        let moved = adjust_two_positions(&dt, &mut pos, (1.0, 1.0), (0.0, 0.0));
        assert_eq!(moved, (true, true));
        for (i, p) in pos.iter().enumerate() {
            assert!((p - i as f64).abs() < 1e-9, "waypoint {i} moved to {p}");
        }
    }

    #[test]
    fn test_hits_prescribed_end_accelerations() {
        let mut pos = [0.0, 0.1, 1.0, 2.0, 2.9, 3.0];
        let dt = [0.4, 1.2, 1.0, 0.8, 0.5];
        adjust_two_positions(&dt, &mut pos, (0.0, 0.2), (0.3, -0.6));
        let (_, acc) = fitted_derivatives(&dt, &pos, (0.0, 0.2));
        assert!((acc[0] - 0.3).abs() < 1e-9, "init acceleration {}", acc[0]);
        assert!((acc[5] + 0.6).abs() < 1e-9, "exit acceleration {}", acc[5]);
        // only the two near-endpoint waypoints move
        assert_eq!(pos[0], 0.0);
        assert_eq!(pos[2], 1.0);
        assert_eq!(pos[3], 2.0);
        assert_eq!(pos[5], 3.0);
    }

    #[test]
    fn test_four_waypoints_do_not_clobber_anchors() {
        let mut pos = [0.0, 1.0, 2.0, 3.0];
        let dt = [1.0, 2.0, 1.0];
        adjust_two_positions(&dt, &mut pos, (0.0, 0.0), (0.0, 0.0));
        let (_, acc) = fitted_derivatives(&dt, &pos, (0.0, 0.0));
        assert!(acc[0].abs() < 1e-9);
        assert!(acc[3].abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_end_is_skipped() {
        // waypoints 0..=2 coincide: the init end has nothing to interpolate along
        let mut pos = [1.0, 1.0, 1.0, 2.0, 3.0];
        let dt = [1.0; 4];
        let moved = adjust_two_positions(&dt, &mut pos, (0.0, 0.0), (0.0, 0.0));
        assert_eq!(moved, (false, true));
        assert_eq!(pos[1], 1.0);
        let (_, acc) = fitted_derivatives(&dt, &pos, (0.0, 0.0));
        assert!(acc[4].abs() < 1e-9);
    }

    #[test]
    fn test_stationary_joint_is_untouched() {
        let mut pos = [0.5; 6];
        let dt = [1.0; 5];
        let moved = adjust_two_positions(&dt, &mut pos, (0.0, 0.0), (0.0, 0.0));
        assert_eq!(moved, (false, false));
        assert_eq!(pos, [0.5; 6]);
    }
}
