//! generate-config - commented reference configuration from a config CRD

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "generate-config")]
#[command(version)]
#[command(
    about = "Generate a commented reference configuration from a config CustomResourceDefinition",
    long_about = None
)]
struct Cli {
    /// Output file for the rendered template (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output file for the OpenAPI JSON of the config schema
    #[arg(short = 'a', long = "api-output")]
    api_output: Option<PathBuf>,

    /// CRD file to read (default: stdin)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Template file (default: built-in config template)
    #[arg(short = 't', long = "template")]
    template: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let args = GenerateArgs {
        file: cli.file,
        output: cli.output,
        api_output: cli.api_output,
        template: cli.template,
    };

    let code = match commands::generate::run(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}
