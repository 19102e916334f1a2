//! xtask for vsfilters - build automation and tooling
//!
//! This binary provides development tasks like man page generation.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for vsfilters")]
enum Task {
    /// Generate man pages from clap definitions
    GenerateManPages {
        /// Output directory for man pages (default: ./man)
        #[arg(short, long, default_value = "man")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let task = Task::parse();

    match task {
        Task::GenerateManPages { output } => generate_man_pages(&output)?,
    }

    Ok(())
}

fn render_page(cmd: clap::Command, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create man page: {}", path.display()))?;
    clap_mangen::Man::new(cmd).render(&mut std::io::BufWriter::new(file))?;
    println!("✓ Generated: {}", path.display());
    Ok(())
}

fn generate_man_pages(output_dir: &Path) -> Result<()> {
    println!("Generating man pages...");

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let cmd = vsfilters::cli::Cli::command();
    render_page(cmd.clone(), &output_dir.join("vsf.1"))?;

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let page = sub.clone().name(format!("vsf-{name}"));
        render_page(page, &output_dir.join(format!("vsf-{name}.1")))?;
    }

    println!("\nTo install man pages system-wide:");
    println!(
        "  sudo cp {}/*.1 /usr/share/man/man1/",
        output_dir.display()
    );
    println!("  sudo mandb");

    Ok(())
}
