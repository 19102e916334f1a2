use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;
use vsfilters::approval::{Approver, AutoApprove, TerminalApprover};
use vsfilters::cli::{Cli, Commands};
use vsfilters::commands::generate::GenerateOptions;
use vsfilters::output::{self, Verbosity};
use vsfilters::{LOG_ENV, RunContext, commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::set_verbosity(if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    });

    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    let mut ctx = RunContext::new()?;
    output::set_color(ctx.config.output.color);

    match cli.command {
        Commands::Generate {
            dir,
            project,
            yes,
            dry_run,
        } => {
            let opts = GenerateOptions {
                root: dir,
                project,
                dry_run,
            };
            let mut approver: Box<dyn Approver> = if yes {
                Box::new(AutoApprove)
            } else {
                Box::new(TerminalApprover::stdio())
            };
            commands::generate::execute(&ctx, &opts, approver.as_mut())?;
        }
        Commands::Preview { dir } => {
            commands::preview::execute(&ctx, &dir)?;
        }
        Commands::Detect { dir } => {
            commands::detect::execute(&ctx, &dir)?;
        }
        Commands::Config {
            key,
            value,
            unset,
            list,
        } => commands::config::execute(&mut ctx, key.as_deref(), value, unset, list)?,
        Commands::Completion { .. } => {}
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
