use std::error::Error;

use gnuplot::*;
use spline_motion::{
    IterativeSplineParameterization, JointGroup, JointVariable, ParameterizationConfig, Trajectory,
    TrajectorySampler, VariableBounds, Waypoint,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    // -----------------------
    // 1. Set up the path
    // -----------------------
    // Two joints sharing the same waypoints in time; the elbow is the slower one.
    let group = JointGroup::new(
        "arm",
        vec![
            JointVariable::new("shoulder", VariableBounds::symmetric(2.0, 4.0, 10.0)),
            JointVariable::new("elbow", VariableBounds::symmetric(1.0, 2.0, 5.0)),
        ],
    );
    let shoulder = [0.0, 0.5, 1.5, 2.0, 1.0, 0.0];
    let elbow = [0.0, -1.0, -1.5, -1.0, 0.0, 1.0];
    let waypoints = shoulder
        .iter()
        .zip(elbow.iter())
        .map(|(&s, &e)| Waypoint::at_rest(vec![s, e]))
        .collect();
    let trajectory = Trajectory::new(group, waypoints);

    // -------------------------
    // 2. Parameterize
    // -------------------------
    let parameterization = IterativeSplineParameterization::new(ParameterizationConfig::default());
    let timed = parameterization.compute_time_stamps(&trajectory, 1.0, 1.0)?;
    let total_time = timed.total_duration();
    println!(
        "{} waypoints, durations {:?}",
        timed.len(),
        timed.durations()
    );

    // -------------------------
    // 3. Sample at a fixed rate
    // -------------------------
    let sampling_rate = 1000.0; // points per second
    let samples = TrajectorySampler::new(sampling_rate).sample(&timed)?;

    let time_axis: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let series = |joint: usize, pick: fn(&spline_motion::Sample) -> &Vec<f64>| -> Vec<f64> {
        samples.iter().map(|s| pick(s)[joint]).collect()
    };

    // --------------
    // 4. Plot data
    // --------------
    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Joint position, velocity, acceleration vs. Time", &[]);
        axes.set_x_label("Time (s)", &[]);
        axes.set_y_label("Position derivatives", &[]);
        for (joint, name) in ["shoulder", "elbow"].iter().enumerate() {
            let pos = series(joint, |s| &s.positions);
            let vel = series(joint, |s| &s.velocities);
            let acc = series(joint, |s| &s.accelerations);
            axes.lines(&time_axis, &pos, &[Caption(format!("{name} position").as_str())]);
            axes.lines(&time_axis, &vel, &[Caption(format!("{name} velocity").as_str())]);
            axes.lines(&time_axis, &acc, &[Caption(format!("{name} acceleration").as_str())]);
        }
    }

    // Attempt to show in a pop-up window (might require gnuplot installed)
    fg.show().map_err(|e| format!("Failed to display plot: {e}"))?;

    println!("Plot generated. Total motion time: {:.3} seconds.", total_time);
    Ok(())
}
