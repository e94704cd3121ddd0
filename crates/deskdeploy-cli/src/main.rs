//! deskdeploy - installs a desktop application for the current user.
//!
//! Run from the directory the application was unpacked into (or point
//! `--installer-dir` at it). The binary wires the real package manager,
//! xdg-utils and size probe into the core installer and maps failures to
//! distinct exit codes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deskdeploy_core::config::{InstallerConfig, ToolConfig};
use deskdeploy_core::deploy::{inspect, required_tools, Installer, Pip};
use deskdeploy_core::desktop::{HeaderProbe, IconSizeProbe, IdentifyProbe, XdgUtils};
use deskdeploy_core::{DeployError, InstallTarget, Slug, XdgDirs};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "deskdeploy")]
#[command(about = "Install a desktop application for the current user")]
struct Args {
    /// Directory holding the application files (defaults to $DESKDEPLOY_ROOT,
    /// then the directory of this executable)
    #[arg(long, global = true)]
    installer_dir: Option<PathBuf>,

    /// Application slug (defaults to the installer directory's name)
    #[arg(long, global = true)]
    slug: Option<String>,

    /// pip executable used to provision dependencies
    #[arg(long, global = true, default_value = ToolConfig::PIP)]
    pip: String,

    /// How icon sizes are determined
    #[arg(long, global = true, value_enum, default_value_t = SizeProbe::Header)]
    size_probe: SizeProbe,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Run all installation steps (default)
    Install,
    /// Show what is installed without changing anything
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SizeProbe {
    /// Read the PNG header
    Header,
    /// Ask ImageMagick's identify
    Identify,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug, args.log_json);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_logging(debug: bool, json: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    // RUST_LOG wins over --debug when set
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn run(args: Args) -> Result<()> {
    let installer_dir = resolve_installer_dir(args.installer_dir.as_deref())?;
    let slug = match args.slug {
        Some(slug) => Slug::new(slug)?,
        None => default_slug(&installer_dir)?,
    };
    let xdg = XdgDirs::from_env()?;
    let target = InstallTarget::new(slug, &installer_dir, &xdg);

    debug!("Resolved target: {:?}", target);

    match args.command.unwrap_or(Command::Install) {
        Command::Install => {
            let pip = Pip::with_program(&args.pip);
            let desktop = XdgUtils::new();
            let probe: Box<dyn IconSizeProbe> = match args.size_probe {
                SizeProbe::Header => Box::new(HeaderProbe),
                SizeProbe::Identify => Box::new(IdentifyProbe::new()),
            };

            let report = Installer::new(&target, &pip, &desktop, &desktop, probe.as_ref()).run()?;

            info!(
                "{} installed: {} package(s), config {:?}, {} icon(s)",
                target.slug,
                report.packages,
                report.config,
                report.icons.len()
            );
            println!("Installed {} to {}", target.slug, target.launcher_path.display());
        }
        Command::Status { json } => {
            let status = inspect(&target, &required_tools(&args.pip))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", status);
            }
        }
    }

    Ok(())
}

/// Installer directory from the flag, the environment or the executable's location.
///
/// Made absolute so the launcher symlink does not depend on the working directory.
fn resolve_installer_dir(flag: Option<&Path>) -> Result<PathBuf> {
    let dir = match flag {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::var_os(InstallerConfig::ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let exe_path = std::env::current_exe().context("Failed to locate the running executable")?;
                exe_path
                    .parent()
                    .map(Path::to_path_buf)
                    .context("Executable path has no parent directory")?
            }
        },
    };

    dir.canonicalize()
        .map_err(|e| DeployError::io("resolve installer directory", &dir, e))
        .context("Installer directory is not accessible")
}

fn default_slug(installer_dir: &Path) -> Result<Slug> {
    let name = installer_dir
        .file_name()
        .with_context(|| format!("Cannot derive a slug from {}", installer_dir.display()))?;
    Slug::new(name.to_string_lossy()).context("Pass --slug explicitly")
}

/// Exit code of the first deployment error in the chain, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DeployError>())
        .map(DeployError::exit_code)
        .unwrap_or(1)
}
