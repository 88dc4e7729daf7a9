//! dijkflow batch driver
//!
//! Builds solver-ready seepage models for every scenario in an input set,
//! writing one build log and one model file per scenario plus a summary CSV.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dijkflow::{
    build_model, BuildOptions, GeometrySettings, InputSet, SoilLibrary, SoilParameters,
    SolverOutput,
};

#[derive(Parser)]
#[command(name = "dijkflow")]
#[command(about = "Seepage model generation for dike safety assessments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build models for every scenario in an input set
    Run(RunArgs),
    /// Parse and validate an input set without writing anything
    Check(CheckArgs),
    /// Print the pipe length from a solver result file
    Result(ResultArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Input JSON with scenarios and soil profiles
    input: PathBuf,
    /// Output directory for logs, models and the summary CSV
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// TOML file overriding settings, build options and soil parameters
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Aquifer sand horizontal conductivity (m/day)
    #[arg(long)]
    k_sand: Option<f64>,
    /// Anisotropy factor (vertical = horizontal / factor)
    #[arg(long)]
    anisotropy: Option<f64>,
    /// Sea level rise added to the river-side heads (m)
    #[arg(long)]
    sea_level_rise: Option<f64>,
    /// Leave out the surface-level boundary condition
    #[arg(long)]
    no_surface_boundary: bool,
    /// Do not raise the polder head by the 0.3d uplift rule
    #[arg(long)]
    no_03d_rule: bool,
    /// Only build scenarios whose name contains this substring
    #[arg(long)]
    select: Option<String>,
    /// Generate models only; solver execution is external either way
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Input JSON with scenarios and soil profiles
    input: PathBuf,
    /// TOML file overriding settings, build options and soil parameters
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args)]
struct ResultArgs {
    /// Solver result JSON
    file: PathBuf,
}

/// Optional TOML overrides for a run. Every section may be partial.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    geometry: GeometrySettings,
    options: BuildOptions,
    soils: SoilOverrides,
}

/// Soil parameter table overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SoilOverrides {
    /// Replacement parameters per soil code.
    parameters: HashMap<String, SoilParameters>,
    /// Additional codes that take the sand calibration conductivity.
    sand: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_batch(&args),
        Commands::Check(args) => check_input(&args),
        Commands::Result(args) => show_result(&args),
    }
}

fn load_configuration(
    path: Option<&Path>,
) -> Result<(GeometrySettings, BuildOptions, SoilLibrary)> {
    let file = match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("reading settings file {}", p.display()))?;
            toml::from_str::<SettingsFile>(&text)
                .with_context(|| format!("parsing settings file {}", p.display()))?
        }
        None => SettingsFile::default(),
    };

    let mut soils = SoilLibrary::default();
    for (code, params) in &file.soils.parameters {
        soils.set(code.clone(), params.clone());
    }
    for code in &file.soils.sand {
        soils.mark_sand(code.clone());
    }
    Ok((file.geometry, file.options, soils))
}

fn run_batch(args: &RunArgs) -> Result<()> {
    let (settings, mut options, soils) = load_configuration(args.settings.as_deref())?;
    if let Some(v) = args.k_sand {
        options.k_sand = v;
    }
    if let Some(v) = args.anisotropy {
        options.anisotropy_factor = v;
    }
    if let Some(v) = args.sea_level_rise {
        options.sea_level_rise = v;
    }
    if args.no_surface_boundary {
        options.use_surface_boundary = false;
    }
    if args.no_03d_rule {
        options.apply_03d_rule = false;
    }
    settings.validate()?;
    options.validate()?;

    let set = InputSet::read(&args.input)
        .with_context(|| format!("reading input {}", args.input.display()))?;
    let (mut scenarios, input_errors) = set.scenarios(&settings);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    if !input_errors.is_empty() {
        for e in &input_errors {
            warn!("input record skipped: {e}");
        }
        let lines: Vec<String> = input_errors.iter().map(|e| e.to_string()).collect();
        fs::write(
            args.output.join("input_parsing.log"),
            format!("{}\n", lines.join("\n")),
        )?;
    }

    if let Some(filter) = &args.select {
        scenarios.retain(|s| s.name.contains(filter.as_str()));
    }
    info!(
        "building {} scenarios from {}",
        scenarios.len(),
        args.input.display()
    );

    let outcomes: Vec<_> = scenarios
        .par_iter()
        .map(|s| (s.name.clone(), build_model(s, &options, &settings, &soils)))
        .collect();

    let mut csv = String::from("scenario,status,detail\n");
    let mut built = 0usize;
    for (name, outcome) in outcomes {
        let report = outcome.with_context(|| format!("scenario '{name}'"))?;
        fs::write(
            args.output.join(format!("{name}.log")),
            format!("{}\n", report.log.join("\n")),
        )?;
        match report.model {
            Some(model) => {
                let path = args.output.join(format!("{name}.json"));
                model
                    .write(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                built += 1;
                let detail = format!(
                    "{} layers, {} boundary conditions",
                    model.layer_count(),
                    model.boundary_count()
                );
                csv.push_str(&format!("{},ok,{}\n", csv_field(&name), csv_field(&detail)));
            }
            None => {
                let detail = report
                    .log
                    .iter()
                    .rev()
                    .find(|l| l.starts_with("ERROR: "))
                    .map(|l| l.trim_start_matches("ERROR: ").to_string())
                    .unwrap_or_else(|| "no model produced".to_string());
                warn!("scenario '{name}' failed: {detail}");
                csv.push_str(&format!(
                    "{},failed,{}\n",
                    csv_field(&name),
                    csv_field(&detail)
                ));
            }
        }
    }
    fs::write(args.output.join("results.csv"), csv)?;

    info!(
        "built {} of {} scenarios, results in {}",
        built,
        scenarios.len(),
        args.output.display()
    );
    if args.dry_run {
        info!("dry run: models generated, solver execution is external");
    }
    Ok(())
}

fn check_input(args: &CheckArgs) -> Result<()> {
    let (settings, options, soils) = load_configuration(args.settings.as_deref())?;
    settings.validate()?;
    options.validate()?;

    let set = InputSet::read(&args.input)
        .with_context(|| format!("reading input {}", args.input.display()))?;
    let (scenarios, errors) = set.scenarios(&settings);

    println!("soil profiles:            {}", set.soilprofiles.len());
    println!("scenario records:         {}", set.scenarios.len());
    println!("scenarios ready to build: {}", scenarios.len());
    println!("soil parameter table:     {} entries", soils.len());
    if !errors.is_empty() {
        println!("input errors:");
        for e in &errors {
            println!("  {e}");
        }
    }
    Ok(())
}

fn show_result(args: &ResultArgs) -> Result<()> {
    let output = SolverOutput::read(&args.file)
        .with_context(|| format!("reading solver result {}", args.file.display()))?;
    if let Some(name) = &output.scenario {
        println!("scenario: {name}");
    }
    println!("pipe length: {} m", output.pipe_length);
    Ok(())
}

/// Quote a CSV field when it contains separators or quotes.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ====== tests ======
