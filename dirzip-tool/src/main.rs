use anyhow::Context;
use clap::Parser;
use dirzip_lib::Config;
use log::info;
use std::{collections::HashMap, env, fs};

mod error;
mod fs_utils;
mod packaging;
mod process;

use fs_utils::{list_files, resolve_target_dir};
use process::{Outcome, process_files};

#[derive(Parser, Debug)]
#[command(name = "dirzip", author, version, about = "Pack a directory into <name>.zip", long_about = None)]
pub struct Cli {
    /// Directory the archive is written to (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Store files without compression
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub store: bool,

    /// Dry run (just list entries and the output path)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub dry: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,

    /// Directory to archive
    #[arg()]
    pub path: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Resolve, walk, write. Every failure comes back as an error; only `main`
/// decides how to report it.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let env_config = read_env();

    let mut file_config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config.config.clone()) {
        file_config = read_config_file(&path)?;
    }

    // env < file < CLI
    let merged = Config::merge(env_config, file_config, cli_to_config(&cli)).with_defaults();

    if cli.generate_yaml_config {
        let yaml = serde_yaml::to_string(&merged)?;
        println!("{yaml}");
        return Ok(());
    }

    let arg = cli.path.as_deref().unwrap_or_default();
    info!("resolving {arg:?}");
    let target = resolve_target_dir(arg)
        .with_context(|| format!("cannot get absolute path from {arg:?}"))?;

    info!("walking {}", target.display());
    let files = list_files(&target)?;
    info!("found {} files", files.len());

    match process_files(&merged, &target, files)? {
        Outcome::Written(path) => {
            info!("wrote {}", path.display());
            println!("ok");
        }
        Outcome::DryRun(_) => {}
    }
    Ok(())
}

/// Reads environment variables prefixed with DIRZIP_
fn read_env() -> Config {
    let vars: HashMap<String, String> = env::vars().collect();
    config_from_vars(&vars)
}

fn config_from_vars(vars: &HashMap<String, String>) -> Config {
    macro_rules! get_env {
        ($key:expr) => {
            vars.get(&format!("DIRZIP_{}", $key)).cloned()
        };
    }
    let flag =
        |v: String| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes");

    Config {
        output_dir: get_env!("OUTPUT_DIR"),
        config: get_env!("CONFIG"),
        compress: get_env!("COMPRESS").map(flag),
        dry: get_env!("DRY").map(flag),
    }
}

/// Reads YAML or JSON config from file
fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config file {path:?}"))?;
    let lower = path.to_lowercase();
    let cfg = if lower.ends_with(".json") {
        serde_json::from_str(&content).with_context(|| format!("parsing {path:?} as JSON"))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parsing {path:?} as YAML"))?
    };
    Ok(cfg)
}

/// Converts CLI struct into Config; flags that were not given stay unset.
fn cli_to_config(cli: &Cli) -> Config {
    Config {
        output_dir: cli.output_dir.clone(),
        config: cli.config.clone(),
        compress: cli.store.then_some(false),
        dry: cli.dry.then_some(true),
    }
}
