//! Minimal CLI: resolve → introspect → emit schema
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::assemble;
use crate::loader::DefaultLoader;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// inspect a module's exported bindings and emit a JSON Schema describing their shapes
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compute and print the JSON Schema document for a module's exports
    Schema(SchemaOut),
    /// list the module's exported binding names, one per line
    Exports(ExportsOut),
}

#[derive(Args, Debug, Clone)]
struct TargetSettings {
    /// local file or directory, github blob URL, or github repository root
    ///
    /// Directories and repository roots resolve their module through the
    /// manifest's "main" field. Set GITHUB_TOKEN to fetch through the
    /// authenticated contents API instead of anonymous raw content.
    target: String,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    target_settings: TargetSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ExportsOut {
    #[command(flatten)]
    target_settings: TargetSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        // credentials are read once here and threaded in explicitly; their
        // absence only downgrades remote fetches to public raw content
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        let loader = DefaultLoader::new(token);

        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let schema = assemble::compute_schema(&target.target_settings.target, &loader)?;
                let schema_src = serde_json::to_string_pretty(&schema)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &schema_src)?;
                } else {
                    println!("{schema_src}");
                }
            }
            Command::Exports(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let names = assemble::list_exports(&target.target_settings.target, &loader)?;
                if names.is_empty() {
                    eprintln!("{} module has no exported bindings", "note:".cyan().bold());
                }
                for name in names {
                    println!("{name}");
                }
            }
        }
        Ok(())
    }
}
