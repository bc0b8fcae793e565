//! Awakening CLI - guided programs and enrollment tracking
//!
//! Plays the host-ledger role for the core state machine: resolves the caller,
//! supplies the block height, and runs one transaction per invocation against a
//! SQLite store.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::AppContext;
use crate::cli::{Cli, Commands, EnrollmentSubcommand, ProgramSubcommand};
use crate::commands::{enrollments, init, maintenance, programs};
use crate::errors::{exit_code_for, CliError};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("AWAKENING_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // Rejections were already printed as results on stdout.
        if !matches!(e.downcast_ref::<CliError>(), Some(CliError::Rejected(_))) {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(exit_code_for(&e));
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions(ref args) = cli.command {
        return maintenance::handle_completions(args);
    }

    let ctx = AppContext::load(cli)?;

    match &cli.command {
        Commands::Init(args) => init::handle_init(&ctx, cli, args),
        Commands::Program(sub) => match sub {
            ProgramSubcommand::Create(args) => programs::handle_create(&ctx, args),
            ProgramSubcommand::Show(args) => programs::handle_show(&ctx, args),
            ProgramSubcommand::List(args) => programs::handle_list(&ctx, args),
            ProgramSubcommand::Activate(args) => programs::handle_set_active(&ctx, args, true),
            ProgramSubcommand::Deactivate(args) => programs::handle_set_active(&ctx, args, false),
            ProgramSubcommand::Stats(args) => programs::handle_stats(&ctx, args),
        },
        Commands::Enroll(args) => enrollments::handle_enroll(&ctx, args),
        Commands::Progress(args) => enrollments::handle_progress(&ctx, args),
        Commands::Enrollment(sub) => match sub {
            EnrollmentSubcommand::Show(args) => enrollments::handle_show(&ctx, args),
            EnrollmentSubcommand::List(args) => enrollments::handle_list(&ctx, args),
        },
        Commands::Check => maintenance::handle_check(&ctx),
        Commands::Completions(args) => maintenance::handle_completions(args),
    }
}
