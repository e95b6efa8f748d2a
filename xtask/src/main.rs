//! xtask - Build tasks for castplay
//!
//! Run with: cargo xtask <command>
//!
//! Commands:
//! - gen-docs: Generate documentation (man pages, COMMANDS.md)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, CommandFactory, Parser, Subcommand};

use castplay::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build tasks for castplay")]
struct Xtask {
    #[command(subcommand)]
    command: XtaskCommand,
}

#[derive(Subcommand)]
enum XtaskCommand {
    /// Generate documentation from CLI definitions
    #[command(name = "gen-docs")]
    GenDocs {
        /// Output directory (default: docs/)
        #[arg(long, short, default_value = "docs")]
        output: PathBuf,

        /// Generate man pages
        #[arg(long)]
        man: bool,

        /// Generate COMMANDS.md
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> Result<()> {
    let args = Xtask::parse();

    match args.command {
        XtaskCommand::GenDocs {
            output,
            man,
            markdown,
        } => {
            let gen_all = !man && !markdown;
            if gen_all || man {
                generate_man_pages(&output)?;
            }
            if gen_all || markdown {
                generate_markdown(&output)?;
            }
        }
    }

    Ok(())
}

/// Generate man pages using clap_mangen
fn generate_man_pages(output: &Path) -> Result<()> {
    use clap_mangen::Man;

    let man_dir = output.join("man");
    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;

    let cmd = Cli::command();

    let mut buffer = Vec::new();
    Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(man_dir.join("castplay.1"), buffer)?;
    println!("Generated: {}/castplay.1", man_dir.display());

    for subcommand in cmd.get_subcommands() {
        if subcommand.is_hide_set() {
            continue;
        }
        let name = subcommand.get_name();
        let mut buffer = Vec::new();
        Man::new(subcommand.clone()).render(&mut buffer)?;
        fs::write(man_dir.join(format!("castplay-{}.1", name)), buffer)?;
        println!("Generated: {}/castplay-{}.1", man_dir.display(), name);
    }

    println!("Man pages generated in {}", man_dir.display());
    Ok(())
}

fn is_builtin(arg: &Arg) -> bool {
    let id = arg.get_id().as_str();
    id == "help" || id == "version"
}

fn flag_label(arg: &Arg) -> Option<String> {
    let long = arg.get_long().map(|l| format!("--{}", l));
    let short = arg.get_short().map(|s| format!("-{}", s));
    match (long, short) {
        (Some(l), Some(s)) => Some(format!("{}, {}", s, l)),
        (Some(l), None) => Some(l),
        (None, Some(s)) => Some(s),
        _ => None,
    }
}

/// Generate COMMANDS.md markdown documentation
fn generate_markdown(output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let cmd = Cli::command();
    let mut markdown = String::new();

    markdown.push_str("# castplay Command Reference\n\n");
    markdown.push_str("This document is auto-generated from the CLI definitions.\n\n");
    markdown.push_str("## Table of Contents\n\n");
    for subcommand in cmd.get_subcommands() {
        if subcommand.is_hide_set() {
            continue;
        }
        let name = subcommand.get_name();
        markdown.push_str(&format!("- [{}](#castplay-{})\n", name, name));
    }
    markdown.push_str("\n---\n\n");

    markdown.push_str("## castplay\n\n");
    if let Some(about) = cmd.get_about() {
        markdown.push_str(&format!("{}\n\n", about));
    }
    if let Some(long_about) = cmd.get_long_about() {
        markdown.push_str(&format!("```\n{}\n```\n\n", long_about));
    }

    for subcommand in cmd.get_subcommands() {
        if subcommand.is_hide_set() {
            continue;
        }

        let name = subcommand.get_name();
        markdown.push_str(&format!("## castplay {}\n\n", name));
        if let Some(about) = subcommand.get_about() {
            markdown.push_str(&format!("{}\n\n", about));
        }

        let positional: Vec<_> = subcommand
            .get_arguments()
            .filter(|a| a.is_positional() && !is_builtin(a))
            .collect();
        if !positional.is_empty() {
            markdown.push_str("### Arguments\n\n");
            for arg in positional {
                markdown.push_str(&format!("- `<{}>`: ", arg.get_id().as_str().to_uppercase()));
                if let Some(help) = arg.get_help() {
                    markdown.push_str(&help.to_string());
                }
                markdown.push('\n');
            }
            markdown.push('\n');
        }

        let options: Vec<_> = subcommand
            .get_arguments()
            .filter(|a| !a.is_positional() && !is_builtin(a))
            .filter_map(|a| flag_label(a).map(|flag| (flag, a)))
            .collect();
        if !options.is_empty() {
            markdown.push_str("### Options\n\n");
            for (flag, arg) in options {
                markdown.push_str(&format!("- `{}`: ", flag));
                if let Some(help) = arg.get_help() {
                    markdown.push_str(&help.to_string());
                }
                markdown.push('\n');
            }
            markdown.push('\n');
        }

        if let Some(long_about) = subcommand.get_long_about() {
            markdown.push_str("### Description\n\n");
            markdown.push_str(&format!("```\n{}\n```\n\n", long_about));
        }

        markdown.push_str("---\n\n");
    }

    markdown.push_str("\n*Generated by `cargo xtask gen-docs`*\n");

    let output_path = output.join("COMMANDS.md");
    fs::write(&output_path, markdown)?;
    println!("Generated: {}", output_path.display());

    Ok(())
}
