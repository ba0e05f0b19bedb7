use serde::{Deserialize, Serialize};

pub mod naming;

/// Settings shared by every `dirzip` front end.
///
/// Every field is optional so that partial configs (env, file, CLI) can be
/// merged before defaults are applied.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output_dir: Option<String>,
    pub config: Option<String>,
    pub compress: Option<bool>,
    pub dry: Option<bool>,
}

impl Config {
    pub const DEFAULT_OUTPUT_DIR: &'static str = ".";

    /// Merge configs by priority: env < file < cli
    pub fn merge(env: Config, file: Config, cli: Config) -> Config {
        fn pick<T>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
            cli.or(file).or(env)
        }

        Config {
            output_dir: pick(env.output_dir, file.output_dir, cli.output_dir),
            config: pick(env.config, file.config, cli.config),
            compress: pick(env.compress, file.compress, cli.compress),
            dry: pick(env.dry, file.dry, cli.dry),
        }
    }

    /// Fill every unset field with its default.
    pub fn with_defaults(mut self) -> Config {
        if self.output_dir.is_none() {
            self.output_dir = Some(Self::DEFAULT_OUTPUT_DIR.to_string());
        }
        if self.compress.is_none() {
            self.compress = Some(true);
        }
        if self.dry.is_none() {
            self.dry = Some(false);
        }
        self
    }
}
