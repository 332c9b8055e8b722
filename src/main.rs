use eddsim::{run_3d, Scenario, ScenarioScript};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "aura_intro.toon")]
    file_name: String,
}

// load here to keep main clean
fn load_script() -> Result<ScenarioScript> {
    let args = Args::parse();

    let script_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(&args.file_name);
    let text = fs::read_to_string(&script_path)
        .with_context(|| format!("reading scenario script {}", script_path.display()))?;
    let script = ScenarioScript::parse(&text)
        .with_context(|| format!("parsing scenario script {}", script_path.display()))?;

    Ok(script)
}

fn main() -> Result<()> {
    let script = load_script()?;
    let scenario = Scenario::from_script(&script);
    run_3d(scenario);

    Ok(())
}
