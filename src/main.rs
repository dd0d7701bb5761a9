//! autoinstall-lint - validate Ubuntu autoinstall NoCloud seed bundles
//!
//! Exit status: 0 when every host profile is valid, 1 when any profile
//! fails, 2 when the run itself cannot proceed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use autoinstall_lint::{EXIT_FATAL, Validator, ValidatorConfig, config::DEFAULT_HOSTS_DIR};

#[derive(Parser)]
#[command(name = "autoinstall-lint")]
#[command(author, version, about = "Validate Ubuntu autoinstall NoCloud seeds", long_about = None)]
struct Cli {
    /// Hosts directory (overrides --hosts-dir)
    #[arg(value_name = "HOSTS_DIR")]
    hosts_dir_arg: Option<PathBuf>,

    /// Path to hosts directory
    #[arg(long, env = "AUTOINSTALL_HOSTS_DIR", default_value = DEFAULT_HOSTS_DIR)]
    hosts_dir: PathBuf,

    /// Autoinstall JSON schema file (default: vendored schema)
    #[arg(long, env = "AUTOINSTALL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Stop at the first failing profile
    #[arg(long)]
    fail_fast: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let hosts_dir = cli.hosts_dir_arg.unwrap_or(cli.hosts_dir);

    let mut config = ValidatorConfig::new()
        .with_hosts_dir(&hosts_dir)
        .fail_fast(cli.fail_fast);
    if let Some(schema) = &cli.schema {
        config = config.with_schema_file(schema);
    }
    debug!("Resolved config: {:?}", config);

    let report = Validator::new(config)?.run()?;

    match cli.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", report.to_json()?),
    }

    info!(
        "Checked {} profile(s) in {}, {} failed",
        report.profiles.len(),
        hosts_dir.display(),
        report.failed()
    );
    Ok(report.exit_code())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("autoinstall-lint: {:#}", e);
            EXIT_FATAL
        }
    };

    ExitCode::from(code as u8)
}
