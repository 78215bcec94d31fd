use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// `HH:MM:SS.mmm` as written by the instrument.
fn format_timestamp(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    let (h, rem) = (millis / 3_600_000, millis % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    format!("{h:02}:{m:02}:{:02}.{:03}", rem / 1000, rem % 1000)
}

struct RunSpec {
    procedure: &'static str,
    folder_prefix: &'static str,
    sample: &'static str,
    vial: &'static str,
    date: &'static str,
    time: &'static str,
    /// Nominal flow in µL/min.
    flow: f64,
    /// Gradient length in seconds.
    duration: f64,
}

/// (file name, header label, signal at time t for the given run)
type MetricSpec = (&'static str, &'static str, fn(&RunSpec, f64) -> f64);

fn hp_pressure(run: &RunSpec, t: f64) -> f64 {
    let ramp = (t / run.duration).min(1.0);
    180.0 + 120.0 * ramp + 15.0 * (t / 30.0).sin()
}

fn hp_flow(run: &RunSpec, t: f64) -> f64 {
    if t < 5.0 {
        run.flow * t / 5.0
    } else {
        run.flow
    }
}

fn hp_setpoint(run: &RunSpec, _t: f64) -> f64 {
    run.flow
}

fn hp_speed(run: &RunSpec, t: f64) -> f64 {
    0.8 * hp_flow(run, t)
}

fn lp_pressure(_run: &RunSpec, t: f64) -> f64 {
    2.0 + 0.5 * (t / 45.0).cos()
}

fn lp_flow(run: &RunSpec, t: f64) -> f64 {
    4.0 * hp_flow(run, t)
}

const METRICS: [MetricSpec; 6] = [
    ("Pump-HP_Pressure.txt", "Pressure(bar)", hp_pressure),
    ("Pump-HP_Actual-flow.txt", "Flow(uL/min)", hp_flow),
    ("Pump-HP_Flow-setpoint.txt", "Flow(uL/min)", hp_setpoint),
    ("Pump-HP_Motor-speed.txt", "Speed(rpm)", hp_speed),
    ("Pump-LP_Pressure.txt", "Pressure(bar)", lp_pressure),
    ("Pump-LP_Actual-flow.txt", "Flow(uL/min)", lp_flow),
];

const RUNS: [RunSpec; 4] = [
    RunSpec {
        procedure: "200 samples per day",
        folder_prefix: "200-SPD",
        sample: "QC01",
        vial: "S1-A1",
        date: "2025-12-11",
        time: "12-27-48",
        flow: 2.0,
        duration: 360.0,
    },
    RunSpec {
        procedure: "200 samples per day",
        folder_prefix: "200-SPD",
        sample: "HeLa_200ng",
        vial: "S1-A2",
        date: "2025-12-11",
        time: "12-35-10",
        flow: 2.0,
        duration: 360.0,
    },
    RunSpec {
        procedure: "Whisper 40 SPD",
        folder_prefix: "Whisper40",
        sample: "HeLa_50ng",
        vial: "S2-B1",
        date: "2025-12-12",
        time: "08-00-03",
        flow: 0.1,
        duration: 1800.0,
    },
    RunSpec {
        procedure: "60 samples per day",
        folder_prefix: "60-SPD",
        sample: "Blank",
        vial: "S3-C4",
        date: "2025-12-13",
        time: "17-42-55",
        flow: 1.0,
        duration: 1260.0,
    },
];

fn write_run(root: &Path, run: &RunSpec, rng: &mut SimpleRng) -> Result<PathBuf> {
    let dir = root.join(format!("{}_{}_{}", run.folder_prefix, run.date, run.time));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let journal = format!(
        "Instrument: Evosep Eno\n\
         Procedure.Name: {}\n\
         Procedure.Logname: {}\n\
         Procedure.Samplename: {}\n\
         Procedure.Vialposition: {}\n",
        run.procedure, run.folder_prefix, run.sample, run.vial
    );
    fs::write(dir.join("journal.txt"), journal).context("writing journal.txt")?;

    let step = 0.5;
    let n_samples = (run.duration / step) as usize;
    for (file_name, label, signal) in METRICS {
        let mut body = format!("Time\t{label}\n");
        for i in 0..n_samples {
            let t = i as f64 * step;
            let value = signal(run, t) + rng.gauss(0.0, 0.01 * signal(run, t).abs().max(0.1));
            writeln!(body, "{}\t{value:.4}", format_timestamp(t))?;
        }
        // Instruments leave a trailing blank line when a log is closed.
        body.push('\n');
        fs::write(dir.join(file_name), body).with_context(|| format!("writing {file_name}"))?;
    }

    Ok(dir)
}

fn main() -> Result<()> {
    env_logger::init();

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let mut rng = SimpleRng::new(42);

    for run in &RUNS {
        let dir = write_run(&output_dir, run, &mut rng)?;
        log::info!("Wrote {}", dir.display());
    }

    println!(
        "Wrote {} runs ({} metric files each) to {}",
        RUNS.len(),
        METRICS.len(),
        output_dir.display()
    );
    Ok(())
}
