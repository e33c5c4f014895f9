//! Development automation tasks for the BadgeKit client workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};
use badgekit_infra::{config, BadgeKitClient};

/// A task named on the command line.
#[derive(Debug, PartialEq, Eq)]
enum Task {
    Ci,
    Fmt,
    Clippy,
    Test,
    CheckServer { minimum: Option<String> },
    Help,
}

impl Task {
    fn parse(name: Option<&str>, argument: Option<String>) -> anyhow::Result<Self> {
        Ok(match name {
            Some("ci") => Self::Ci,
            Some("fmt") => Self::Fmt,
            Some("clippy") => Self::Clippy,
            Some("test") => Self::Test,
            Some("check-server") => Self::CheckServer { minimum: argument },
            Some("help") | None => Self::Help,
            Some(unknown) => bail!("Unknown task: {unknown}"),
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Ci => run_ci(),
            Self::Fmt => cargo("fmt", &["--all", "--", "--check"], "Run 'cargo fmt --all'."),
            Self::Clippy => cargo(
                "clippy",
                &["--workspace", "--all-targets", "--", "-D", "warnings"],
                "See Clippy output above.",
            ),
            Self::Test => cargo("test", &["--workspace"], "See test output above."),
            Self::CheckServer { minimum } => run_check_server(minimum.as_deref()),
            Self::Help => {
                print_help();
                Ok(())
            }
        }
    }
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let name = args.next();

    let result = Task::parse(name.as_deref(), args.next()).and_then(Task::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("BadgeKit Client Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci            Run fmt, clippy and test in sequence");
    println!("    fmt           Check Rust code formatting");
    println!("    clippy        Run Clippy lints");
    println!("    test          Run all tests");
    println!("    check-server [MIN_VERSION]");
    println!("                  Ping the configured BadgeKit API server and report its version");
    println!("    help          Show this help message");
}

fn run_ci() -> anyhow::Result<()> {
    let steps = [Task::Fmt, Task::Clippy, Task::Test];
    let total = steps.len();
    for (index, step) in steps.into_iter().enumerate() {
        println!("==> Step {}/{total}: {step:?}", index + 1);
        step.run()?;
    }
    println!("\n✓ All CI checks passed!");
    Ok(())
}

/// Run `cargo <subcommand> <args>`, failing with `hint` on a non-zero exit.
fn cargo(subcommand: &str, args: &[&str], hint: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .arg(subcommand)
        .args(args)
        .status()
        .with_context(|| format!("Failed to spawn cargo {subcommand}"))?;

    if !status.success() {
        bail!("cargo {subcommand} failed. {hint}");
    }
    Ok(())
}

/// Ping the server named by the loaded configuration
///
/// Configuration comes from `BADGEKIT_*` environment variables or a
/// `badgekit.{json,toml}` file; set `RUST_LOG=debug` to see each request.
fn run_check_server(minimum: Option<&str>) -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = config::load().context("Failed to load BadgeKit configuration")?;
    let client = BadgeKitClient::new(config).context("Failed to build BadgeKit client")?;
    println!("Checking {}...", client.base_url());

    if !client.ping().context("Ping failed")? {
        bail!("{} is not a reachable BadgeKit API server", client.base_url());
    }

    let version = client.server_version().context("Failed to read server version")?;
    println!("✓ BadgeKit API {version}");

    if let Some(minimum) = minimum {
        client.require_server_version(minimum)?;
        println!("✓ Server satisfies minimum version {minimum}");
    }

    Ok(())
}
