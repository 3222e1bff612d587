//! Balances CLI - track the value history of bank accounts, properties and
//! vehicles.
//!
//! This is the command-line interface for Balances. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod helpers;
mod output;

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use balances_core::BalancesError;

use app::AppContext;
use cli::{Cli, Commands};
use commands::assets::handle_asset;
use commands::init::handle_init;
use commands::values::handle_value;
use constants::{exit_code, exit_codes};
use output::failure_json;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        std::process::exit(report(&cli, &err));
    }
}

/// `BALANCES_LOG` selects the filter (default `warn`); `-v` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("BALANCES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli);

    match &cli.command {
        Some(Commands::Init(args)) => handle_init(&ctx, args),
        Some(Commands::Account(command)) => {
            handle_asset(&ctx, &ctx.services()?.bank_accounts, command.action())
        }
        Some(Commands::Property(command)) => {
            handle_asset(&ctx, &ctx.services()?.properties, command.action())
        }
        Some(Commands::Vehicle(command)) => {
            handle_asset(&ctx, &ctx.services()?.vehicles, command.action())
        }
        Some(Commands::Value(command)) => handle_value(&ctx, command),
        Some(Commands::Completions(args)) => {
            let mut command = Cli::command();
            clap_complete::generate(args.shell, &mut command, "balances", &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Print the error and pick the exit code.
fn report(cli: &Cli, err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BalancesError>() {
        Some(failure) => {
            if cli.json {
                eprintln!("{}", failure_json(failure));
            } else {
                eprintln!("Error: {}", failure);
            }
            exit_code(failure.code())
        }
        None => {
            eprintln!("Error: {:#}", err);
            exit_codes::GENERAL
        }
    }
}
