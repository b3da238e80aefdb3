//! Headless session runner.
//!
//! Usage: `r3form-demo [BLUEPRINT.json] [STEPS.json]`

use std::{env, fs, process};

use r3form_demo::{DEFAULT_BLUEPRINT, DEFAULT_STEPS, Session, Step};
use r3form_widgets::FormBlueprint;

fn read_or(path: Option<String>, fallback: &str) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => Ok(fallback.to_string()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let blueprint = FormBlueprint::from_json(&read_or(args.next(), DEFAULT_BLUEPRINT)?)?;
    let steps: Vec<Step> = serde_json::from_str(&read_or(args.next(), DEFAULT_STEPS)?)?;

    let mut session = Session::new(blueprint)?;
    session.run(&steps)?;

    let report = session.report()?;
    log::info!(
        "Session finished after {} frames with {} submission(s)",
        report.frames,
        report.submissions.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting R3Form demo");

    if let Err(err) = run() {
        log::error!("Session failed: {err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}
