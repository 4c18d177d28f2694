use railsim::{ScenarioConfig, Scenario};
use railsim::simulation::scenario::OutputTarget;
use railsim::{bench_path_query, bench_integrator};

use clap::Parser;
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up in `scenarios/` when not an existing path
    #[arg(short, default_value = "parabola.yaml")]
    file_name: String,

    /// Override the output table of the scenario
    #[arg(short)]
    output: Option<PathBuf>,

    /// Run the benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,

    /// Debug-level logging
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    }
}

// load here to keep main clean
fn load_scenario_from_yaml(config_path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.bench {
        bench_path_query();
        bench_integrator();
        return Ok(());
    }

    let config_path = scenario_path(&args.file_name);
    let scenario_cfg = load_scenario_from_yaml(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let mut scenario = Scenario::build(scenario_cfg, base_dir)
        .with_context(|| format!("invalid scenario {}", config_path.display()))?;

    if let Some(file) = args.output {
        let energy_columns = scenario.output.as_ref().is_some_and(|o| o.energy_columns);
        scenario.output = Some(OutputTarget { file, energy_columns });
    }

    let output = scenario.run();
    scenario.save(&output).context("failed to write trajectory")?;

    if let Some(cmp) = scenario.compare(&output).context("failed to read reference data")? {
        info!(
            samples = cmp.samples,
            s_rms = format!("{:.5}", cmp.arc_length.rms),
            s_max = format!("{:.5}", cmp.arc_length.max_abs),
            vs_rms = format!("{:.5}", cmp.speed.rms),
            vs_max = format!("{:.5}", cmp.speed.max_abs),
            "Reference comparison"
        );
    }

    Ok(())
}
