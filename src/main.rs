use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use rpmsync::reconcile::{Outcome, PackageSpec, Reconciler};
use rpmsync::runtime::RealRuntime;

/// rpmsync - RPM package state reconciler
///
/// Converge a single package towards a declared desired state using the
/// local rpm tool as the sole source of truth and the sole mutation
/// mechanism. Each invocation runs exactly one reconciliation pass and
/// issues at most one mutating rpm command.
///
/// Examples:
///   rpmsync install mypackage --source /tmp/mypackage-1.0-1.rpm
///   rpmsync remove mypackage
#[derive(Parser, Debug)]
#[command(author, version = env!("RPMSYNC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// rpm binary to invoke (also via RPMSYNC_RPM)
    #[arg(
        long = "rpm",
        env = "RPMSYNC_RPM",
        value_name = "BIN",
        default_value = "rpm",
        global = true
    )]
    pub rpm: String,

    /// Timeout in seconds for every rpm invocation (also via RPMSYNC_TIMEOUT)
    #[arg(
        long = "timeout",
        env = "RPMSYNC_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = 900,
        global = true
    )]
    pub timeout: u64,

    /// Emit the outcome as JSON on stdout
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ensure a package is installed at the desired version
    Install(InstallArgs),

    /// Ensure a package is removed
    Remove(RemoveArgs),

    /// Print the installed version of a package
    Query(QueryArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Package name (may itself be a path to the package file)
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Artifact source: local path or http/https/ftp/file URI
    #[arg(long, short = 's', value_name = "PATH|URI")]
    pub source: Option<String>,

    /// Desired version-release (e.g. "1.0-1"); defaults to whatever the
    /// source artifact provides
    #[arg(long, short = 'v', value_name = "VERSION-RELEASE")]
    pub version: Option<String>,

    /// Extra flags passed verbatim to rpm before the mode flag
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Permit converging to a version older than the installed one
    #[arg(long)]
    pub allow_downgrade: bool,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Package name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Extra flags passed verbatim to rpm before the mode flag
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub options: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Package name
    #[arg(value_name = "NAME")]
    pub name: String,
}

fn report(outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        match &outcome.version {
            Some(version) => println!("{} {}", outcome.action, version),
            None => println!("{}", outcome.action),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let reconciler =
        Reconciler::new(&runtime, cli.rpm.as_str(), Duration::from_secs(cli.timeout));

    match cli.command {
        Commands::Install(args) => {
            let spec = PackageSpec {
                name: args.name,
                source: args.source,
                version: args.version,
                options: args.options,
                allow_downgrade: args.allow_downgrade,
            };
            let outcome = reconciler.ensure_installed(&spec).await?;
            report(&outcome, cli.json)?;
        }
        Commands::Remove(args) => {
            let spec = PackageSpec {
                name: args.name,
                options: args.options,
                ..Default::default()
            };
            let outcome = reconciler.ensure_removed(&spec).await?;
            report(&outcome, cli.json)?;
        }
        Commands::Query(args) => match reconciler.installed_version(&args.name).await? {
            Some(version) => println!("{}", version),
            None => println!("{} is not installed", args.name),
        },
    }
    Ok(())
}
