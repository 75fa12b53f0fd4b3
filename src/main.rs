use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use po2ftl::services::{convert, qa};
use po2ftl::ConvertRequest;

#[derive(Parser)]
#[command(name = "po2ftl", version, about = "Merge gettext translations into a Fluent document")]
struct Cli {
    /// Log filter (e.g. `debug`, `po2ftl=trace`); RUST_LOG takes precedence.
    #[arg(long, global = true, env = "PO2FTL_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Fluent document with the catalog's translations merged in.
    Convert {
        #[command(flatten)]
        inputs: Inputs,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List what would be dropped or unsupported, as JSON.
    Check {
        #[command(flatten)]
        inputs: Inputs,
    },
}

#[derive(Args)]
struct Inputs {
    /// Gettext catalog (.po).
    #[arg(long = "catalog", value_name = "PO")]
    catalog: PathBuf,

    /// Source Fluent document (.ftl).
    #[arg(long = "fluent", value_name = "FTL")]
    fluent: PathBuf,
}

impl From<Inputs> for ConvertRequest {
    fn from(inputs: Inputs) -> Self {
        ConvertRequest::new(inputs.catalog, inputs.fluent)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Command::Convert { inputs, output } => run_convert(inputs.into(), output),
        Command::Check { inputs } => run_check(inputs.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("po2ftl: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_convert(request: ConvertRequest, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let text = convert::convert(&request)?;

    match output {
        Some(path) => std::fs::write(&path, text)?,
        None => io::stdout().write_all(text.as_bytes())?,
    }

    Ok(())
}

fn run_check(request: ConvertRequest) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = convert::load_catalog(&request.catalog_path)?;
    let resource = convert::load_fluent(&request.fluent_path)?;
    let issues = qa::run(&resource.body, convert::default_translations(&catalog));

    println!("{}", serde_json::to_string_pretty(&issues)?);
    Ok(())
}
