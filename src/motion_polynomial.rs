/// One cubic segment of a single joint: starts at `pos` / `vel` / `acc` and
/// lasts `time` seconds under constant jerk `jrk`.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct MotionPolynomial {
    pub time: f64,
    pub pos: f64,
    pub vel: f64,
    pub acc: f64,
    pub jrk: f64,
}

impl MotionPolynomial {
    /// Creates a new MotionPolynomial.
    pub fn new(time: f64, pos: f64, vel: f64, acc: f64, jrk: f64) -> Self {
        Self {
            time,
            pos,
            vel,
            acc,
            jrk,
        }
    }

    /// The segment between two fitted knots. Jerk is the constant slope of
    /// acceleration across the segment.
    pub fn between_knots(time: f64, pos: f64, vel: f64, acc: (f64, f64)) -> Self {
        let jrk = if time > 0.0 { (acc.1 - acc.0) / time } else { 0.0 };
        Self::new(time, pos, vel, acc.0, jrk)
    }

    /// `(pos, vel, acc)` at offset `t` into the segment.
    pub fn state_at(&self, t: f64) -> (f64, f64, f64) {
        // acc(t) = a0 + j0*t
        let acc = self.acc + self.jrk * t;

        // vel(t) = v0 + a0*t + j0*t^2/2
        let vel = self.vel + (self.acc + acc) * t * 0.5;

        // pos(t) = s0 + v0*t + a0*t^2/2 + j0*t^3/6, written with the average velocity
        let vel_avg = self.vel + (2.0 * self.acc + acc) * t / 6.0;
        let pos = self.pos + vel_avg * t;

        (pos, vel, acc)
    }

    /// `(pos, vel, acc)` at the end of the segment.
    pub fn end_state(&self) -> (f64, f64, f64) {
        self.state_at(self.time)
    }
}
