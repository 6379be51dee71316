//! galaxyctl CLI - Galaxy admin account provisioning
//!
//! Entry point for the `galaxyctl` command-line tool:
//! - Register an admin user directly in the Galaxy database (`register`)
//! - Shell completion scripts (`completions`)
//!
//! All failures surface here as `anyhow` errors; returning one from `main`
//! prints the cause chain and exits with a non-zero status.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "galaxyctl",
    author,
    version,
    about = "Provision Galaxy admin accounts directly in the Galaxy database",
    long_about = "Create a Galaxy user with a PBKDF2 password hash and grant it the admin role. \
                  Re-running with the same username is safe: existing rows are left untouched."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a user in the Galaxy database and grant it the admin role
    Register(commands::register::RegisterArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values never override variables already set in the environment
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing(&TracingConfig {
        debug: cli.debug,
        quiet: cli.quiet,
    })
    .ok();

    if let Ok(path) = dotenv {
        debug!("Loaded .env from {}", path.display());
    }

    match cli.command {
        Commands::Register(args) => commands::run_register(args).await?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
