use crate::error::ParameterizationError;
use crate::motion_polynomial::MotionPolynomial;
use crate::trajectory::Trajectory;

/// State of every joint at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
}

/// Samples a time-parameterized trajectory at a fixed rate by evaluating the
/// cubic segment each tick falls in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySampler {
    /// Sampling frequency in Hz
    freq: f64,
}

impl TrajectorySampler {
    /// Upper bound on the number of samples one call may produce
    pub const MAX_SAMPLES: usize = 10_000_000;

    /// Creates a new sampler with a given frequency (Hz).
    pub fn new(freq: f64) -> Self {
        Self { freq }
    }

    /// Splits the trajectory into per-joint cubic segments, `[joint][segment]`.
    /// Every waypoint must carry as many joint values as the first one.
    pub fn segments(trajectory: &Trajectory) -> Vec<Vec<MotionPolynomial>> {
        let joints = trajectory
            .waypoints
            .first()
            .map_or(0, |w| w.positions.len());
        (0..joints)
            .map(|j| {
                trajectory
                    .waypoints
                    .windows(2)
                    .map(|pair| {
                        let (from, to) = (&pair[0], &pair[1]);
                        MotionPolynomial::between_knots(
                            to.duration_from_previous,
                            from.positions[j],
                            from.velocities[j],
                            (from.accelerations[j], to.accelerations[j]),
                        )
                    })
                    .collect()
            })
            .collect()
    }

    /// Samples every `1 / freq` seconds from 0 up to the total duration; the
    /// final instant is always included.
    pub fn sample(&self, trajectory: &Trajectory) -> Result<Vec<Sample>, ParameterizationError> {
        if !(self.freq.is_finite() && self.freq > 0.0) {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!("sampling frequency must be positive, got {}", self.freq),
            });
        }
        let Some(first) = trajectory.waypoints.first() else {
            return Ok(Vec::new());
        };
        trajectory.check_joint_counts(first.positions.len())?;
        if let Some(duration) = trajectory
            .durations()
            .into_iter()
            .find(|d| !(d.is_finite() && *d >= 0.0))
        {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!("segment durations must be finite and non-negative, got {duration}"),
            });
        }

        let times = trajectory.time_from_start();
        let total = times.last().copied().unwrap_or(0.0);
        if !(total * self.freq < Self::MAX_SAMPLES as f64) {
            return Err(ParameterizationError::InvalidConfiguration {
                reason: format!(
                    "{total} s at {} Hz exceeds {} samples",
                    self.freq,
                    Self::MAX_SAMPLES
                ),
            });
        }

        let segments = Self::segments(trajectory);
        if trajectory.len() < 2 || total <= 0.0 {
            return Ok(vec![Sample {
                time: 0.0,
                positions: first.positions.clone(),
                velocities: first.velocities.clone(),
                accelerations: first.accelerations.clone(),
            }]);
        }

        let ticks = (total * self.freq).floor() as usize;
        let mut samples = Vec::with_capacity(ticks + 2);
        let mut segment = 0;
        for tick in 0..=ticks {
            let time = tick as f64 / self.freq;
            samples.push(Self::sample_at(&segments, &times, &mut segment, time));
        }
        if (ticks as f64 / self.freq) < total {
            samples.push(Self::sample_at(&segments, &times, &mut segment, total));
        }
        Ok(samples)
    }

    /// Evaluates all joints at `time`. `segment` is a cursor that only moves forward.
    fn sample_at(
        segments: &[Vec<MotionPolynomial>],
        times: &[f64],
        segment: &mut usize,
        time: f64,
    ) -> Sample {
        let last_segment = times.len() - 2;
        while *segment < last_segment && time >= times[*segment + 1] {
            *segment += 1;
        }
        let offset = time - times[*segment];

        let joints = segments.len();
        let mut sample = Sample {
            time,
            positions: Vec::with_capacity(joints),
            velocities: Vec::with_capacity(joints),
            accelerations: Vec::with_capacity(joints),
        };
        for joint in segments {
            let (pos, vel, acc) = joint[*segment].state_at(offset);
            sample.positions.push(pos);
            sample.velocities.push(vel);
            sample.accelerations.push(acc);
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::Waypoint;

    fn timed_line() -> Trajectory {
        // x(t) = t on one joint, three one-second segments
        let waypoints = (0..4)
            .map(|i| Waypoint {
                positions: vec![i as f64],
                velocities: vec![1.0],
                accelerations: vec![0.0],
                duration_from_previous: if i == 0 { 0.0 } else { 1.0 },
            })
            .collect();
        Trajectory {
            group: None,
            waypoints,
        }
    }

    #[test]
    fn test_samples_cover_whole_duration() {
        let samples = TrajectorySampler::new(4.0).sample(&timed_line()).unwrap();
        assert_eq!(samples.len(), 13);
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(samples[12].time, 3.0);
        for s in &samples {
            assert!((s.positions[0] - s.time).abs() < 1e-12);
            assert!((s.velocities[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_final_instant_is_appended() {
        let samples = TrajectorySampler::new(0.4).sample(&timed_line()).unwrap();
        // ticks at 0 and 2.5, then the end at 3.0
        assert_eq!(samples.len(), 3);
        assert!((samples[2].positions[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_untimed_trajectory_yields_single_sample() {
        let mut trajectory = timed_line();
        for w in &mut trajectory.waypoints {
            w.duration_from_previous = 0.0;
        }
        let samples = TrajectorySampler::new(100.0).sample(&trajectory).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_zero_frequency_is_rejected() {
        assert!(TrajectorySampler::new(0.0).sample(&timed_line()).is_err());
    }

    #[test]
    fn test_ragged_waypoint_is_rejected() {
        let mut trajectory = timed_line();
        trajectory.waypoints[2].velocities.push(0.0);
        assert_eq!(
            TrajectorySampler::new(10.0).sample(&trajectory),
            Err(ParameterizationError::JointCountMismatch {
                waypoint: 2,
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn test_infinite_duration_is_rejected() {
        let mut trajectory = timed_line();
        for w in trajectory.waypoints.iter_mut().skip(1) {
            w.duration_from_previous = f64::INFINITY;
        }
        assert!(matches!(
            TrajectorySampler::new(10.0).sample(&trajectory),
            Err(ParameterizationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let mut trajectory = timed_line();
        trajectory.waypoints[1].duration_from_previous = -1.0;
        assert!(TrajectorySampler::new(10.0).sample(&trajectory).is_err());
    }

    #[test]
    fn test_too_many_samples_is_rejected() {
        let mut trajectory = timed_line();
        trajectory.waypoints[3].duration_from_previous = 1e12;
        assert!(matches!(
            TrajectorySampler::new(1000.0).sample(&trajectory),
            Err(ParameterizationError::InvalidConfiguration { .. })
        ));
    }
}
