//! Fireball fountain demo.
//!
//! ```text
//! sparkfall [CONFIG.json] [--headless STEPS]
//! ```
//!
//! Set `RUST_LOG=debug` for pipeline details.

use std::process::ExitCode;

use sparkfall::prelude::*;

const HEADLESS_DELTA: f32 = 1.0 / 60.0;

struct Args {
    config: Option<String>,
    headless_steps: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        headless_steps: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--headless" => {
                let steps = iter
                    .next()
                    .ok_or("--headless needs a step count")?
                    .parse::<u64>()
                    .map_err(|e| format!("invalid step count: {e}"))?;
                args.headless_steps = Some(steps);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            path => args.config = Some(path.to_string()),
        }
    }
    Ok(args)
}

fn run_headless(options: EmitterOptions, steps: u64) -> Result<(), Box<dyn std::error::Error>> {
    let noise = NoiseTable::default();
    options.validate(noise.capacity())?;

    let mut store = ParticleStore::new(&options);
    let params = options.step_params(HEADLESS_DELTA);

    let mut totals = StepStats::default();
    for step in 0..steps {
        let stats = store.step(&params, &noise);
        log::info!(
            "step {}: {} respawned, {} integrated",
            step + 1,
            stats.respawned,
            stats.integrated
        );
        totals = totals.merge(stats);
    }

    println!(
        "{} steps over {} particles: {} respawns, {} integrations",
        store.generation(),
        store.capacity(),
        totals.respawned,
        totals.integrated
    );
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let options = match &args.config {
        Some(path) => EmitterOptions::load(path)?,
        None => EmitterOptions::default().with_gravity(Vec3::new(0.0, -0.8, 0.0)),
    };

    if let Some(steps) = args.headless_steps {
        return run_headless(options, steps);
    }

    Simulation::new()
        .with_emitter(options)
        .with_gradient(Gradient::fireball())
        .with_title("Sparkfall - Fireball")
        .run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Usage: sparkfall [CONFIG.json] [--headless STEPS]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
