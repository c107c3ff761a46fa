//! Pipeline configuration commands.

use anyhow::Context;
use clap::{Args, Subcommand};
use dosimeter_config::{PipelineConfig, default_config_path};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a configuration file with the default settings
    Init {
        /// Destination (default: the user config directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a configuration file with every default filled in
    Show {
        /// Configuration file (default: the user config file, or built-in defaults)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init { path, force } => {
            let path = path.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            PipelineConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigCommand::Show { path } => {
            let path = path.or_else(|| {
                let default = default_config_path();
                default.is_file().then_some(default)
            });
            let config = match &path {
                Some(p) => PipelineConfig::load(p)
                    .with_context(|| format!("loading configuration {}", p.display()))?,
                None => PipelineConfig::default(),
            };
            if let Err(e) = config.validate() {
                eprintln!("Warning: {e}");
            }
            match &path {
                Some(p) => println!("# {}", p.display()),
                None => println!("# built-in defaults"),
            }
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
