use sph2d::{EnergyHistory, Simulation, SimulationStatistics, SphParameters, SphSimulation};

use structopt::StructOpt;
use tracing::{debug, info, Level};

#[derive(StructOpt, Debug)]
#[structopt(name = "sph2d")]
struct Opt {
    /// JSON file with simulation parameters. Uses the built in defaults if not given.
    #[structopt(short, long)]
    input_file: Option<std::path::PathBuf>,
    /// Where to write the kinetic energy history as JSON
    #[structopt(short, long)]
    energy_output: Option<std::path::PathBuf>,
    #[structopt(short, long, default_value = "600")]
    frames: usize,
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    use eyre::WrapErr;

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let params = match &opt.input_file {
        Some(input_file) => SphParameters::from_json_file(input_file)?,
        None => {
            let params = SphParameters::default();
            params.validate()?;
            params
        }
    };

    info!(
        num_particles = params.num_particles,
        substeps = params.substeps,
        frames = opt.frames,
        "Starting simulation"
    );

    // One sample per horizontal pixel of the overlay.
    let mut history = EnergyHistory::new(params.width as usize);
    let mut sim = SphSimulation::new(params);

    for frame in 0..opt.frames {
        sim.simulate_frame();

        let energy = sim.total_kinetic_energy();
        history.push(energy);

        debug!(frame, energy, time = sim.time(), "Finished frame");
        if frame % 60 == 0 {
            info!(frame, energy, "Kinetic energy");
        }
    }

    info!(
        steps = sim.step_count(),
        time = sim.time(),
        energy = sim.total_kinetic_energy(),
        "Simulation finished"
    );

    if let Some(path) = opt.energy_output {
        let json = serde_json::to_vec_pretty(&history)
            .wrap_err("Failed to serialize energy history")?;
        std::fs::write(&path, json)
            .wrap_err_with(|| format!("Failed to write energy history to {:?}", &path))?;
    }

    Ok(())
}
