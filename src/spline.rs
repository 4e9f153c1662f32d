//! Clamped cubic spline fitting over a sequence of timed positions.
//!
//! A cubic spline keeps position, velocity and acceleration continuous across
//! interior knots. "Clamped" means the velocity at both ends is prescribed.
//! The knot accelerations solve a tridiagonal system:
//!
//! ```text
//! row 0:      2*dt0*a0 + dt0*a1                       = 6*((x1-x0)/dt0 - v_init)
//! row i:      dt[i-1]*a[i-1] + 2*(dt[i-1]+dt[i])*a[i]
//!               + dt[i]*a[i+1]                        = 6*((x[i+1]-x[i])/dt[i] - (x[i]-x[i-1])/dt[i-1])
//! row n-1:    dt[n-2]*a[n-2] + 2*dt[n-2]*a[n-1]       = 6*(v_exit - (x[n-1]-x[n-2])/dt[n-2])
//! ```
//!
//! which is solved in O(n) with one forward elimination sweep and one
//! back-substitution sweep.

/// Fits a clamped cubic spline through `pos` with segment durations `dt`.
///
/// `vel` is the `(init, exit)` velocity pair the spline must start and end with.
/// Fills `velocities` and `accelerations` (both `pos.len()` long) with the knot
/// derivatives. Every duration must be strictly positive; the caller guarantees
/// it, and `pos` must hold at least two knots.
pub fn fit_cubic_spline(
    dt: &[f64],
    pos: &[f64],
    vel: (f64, f64),
    velocities: &mut [f64],
    accelerations: &mut [f64],
) {
    let n = pos.len();
    debug_assert!(n >= 2);
    debug_assert_eq!(dt.len(), n - 1);
    debug_assert_eq!(velocities.len(), n);
    debug_assert_eq!(accelerations.len(), n);

    let (v_init, v_exit) = vel;

    // Forward sweep: every row normalized to a unit diagonal
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = 0.5;
    d[0] = 3.0 * ((pos[1] - pos[0]) / dt[0] - v_init) / dt[0];
    for i in 1..n - 1 {
        let dt2 = dt[i - 1] + dt[i];
        let a = dt[i - 1] / dt2; // sub-diagonal weight after dividing the row by dt2
        let denom = 2.0 - a * c[i - 1];
        c[i] = (1.0 - a) / denom;
        let rhs = 6.0 * ((pos[i + 1] - pos[i]) / dt[i] - (pos[i] - pos[i - 1]) / dt[i - 1]) / dt2;
        d[i] = (rhs - a * d[i - 1]) / denom;
    }
    let last = dt[n - 2];
    let rhs = 6.0 * (v_exit - (pos[n - 1] - pos[n - 2]) / last);
    d[n - 1] = (rhs - last * d[n - 2]) / (last * (2.0 - c[n - 2]));

    // Back substitution: accelerations
    accelerations[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        accelerations[i] = d[i] - c[i] * accelerations[i + 1];
    }

    // Velocities follow from positions and accelerations on each segment
    velocities[0] = v_init;
    for i in 1..n - 1 {
        velocities[i] = (pos[i + 1] - pos[i]) / dt[i]
            - (2.0 * accelerations[i] + accelerations[i + 1]) * dt[i] / 6.0;
    }
    velocities[n - 1] = v_exit;
}

/// Convenience wrapper returning freshly allocated `(velocities, accelerations)`.
pub fn fitted_derivatives(dt: &[f64], pos: &[f64], vel: (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let mut velocities = vec![0.0; pos.len()];
    let mut accelerations = vec![0.0; pos.len()];
    fit_cubic_spline(dt, pos, vel, &mut velocities, &mut accelerations);
    (velocities, accelerations)
}
