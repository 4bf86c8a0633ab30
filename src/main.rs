use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use dotenv::dotenv;

use cuopt_json::report::{render_json, render_text};
use cuopt_json::{
    build_problem_model, default_engine, read_document, solve_with, EngineType, Error, Result,
    SolveConfig,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Read a cuOpt JSON file and solve the LP or MIP it describes"
)]
struct Cli {
    /// LP or MIP problem data in cuOpt JSON format
    #[arg(value_name = "cuopt_json_file")]
    file: PathBuf,

    /// Enable detailed performance timing output
    #[arg(short = 't', long)]
    timing: bool,

    /// Write problem to MPS file
    #[arg(long, value_name = "file")]
    mps_output: Option<PathBuf>,

    /// Engine wall-clock limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Absolute primal feasibility tolerance
    #[arg(long)]
    primal_tolerance: Option<f64>,

    /// Engine backend (cuopt, highs)
    #[arg(long)]
    engine: Option<String>,

    /// Report format for stdout
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl Cli {
    /// Environment defaults with command-line flags on top
    fn config(&self) -> SolveConfig {
        let mut config = SolveConfig::from_env();
        config.timing = self.timing;
        if let Some(path) = &self.mps_output {
            config.problem_output = Some(path.clone());
        }
        if let Some(seconds) = self.time_limit {
            config.time_limit = seconds;
        }
        if let Some(tolerance) = self.primal_tolerance {
            config.primal_tolerance = tolerance;
        }
        config
    }

    /// `--engine` wins over the environment, then the first compiled backend
    fn engine(&self, config: &SolveConfig) -> Result<EngineType> {
        match &self.engine {
            Some(name) => {
                EngineType::from_str(name).ok_or_else(|| Error::UnknownEngine(name.clone()))
            }
            None => config.engine.or_else(default_engine).ok_or(Error::NoEngine),
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let timing = config.timing();
    let _total = timing.phase("TOTAL_EXECUTION");

    let doc = read_document(&cli.file, timing)?;
    let model = build_problem_model(&doc, timing)?;
    drop(doc);

    let engine = cli.engine(&config)?;

    let results = solve_with(engine, &model, &config)?;
    match cli.format {
        ReportFormat::Text => print!("{}", render_text(&results, model.num_variables())),
        ReportFormat::Json => {
            let report = render_json(&results, model.num_variables());
            let text = serde_json::to_string_pretty(&report).map_err(Error::Report)?;
            println!("{}", text);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
