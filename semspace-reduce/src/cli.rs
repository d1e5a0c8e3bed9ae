//! Command-line arguments and config resolution.

use clap::Parser;
use semspace_core::{ReduceConfig, ReduceError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "semspace-reduce")]
#[command(about = "Reduce text embeddings to 3D walk/scatter paths over stdin/stdout")]
#[command(version)]
pub struct Args {
    /// JSON config file (seed, dimensions, projection_scale, simple_scale, focus_lerp)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Projection matrix seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Expected embedding width (overrides config)
    #[arg(short, long)]
    pub dimensions: Option<usize>,

    /// Output radius for both methods (overrides config)
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Config file contents (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ReduceConfig, ReduceError> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ReduceError::InvalidConfig(format!("{}: {}", path.display(), e))
                })?;
                ReduceConfig::from_json(&json)?
            }
            None => ReduceConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dimensions) = self.dimensions {
            config.dimensions = dimensions;
        }
        if let Some(scale) = self.scale {
            config = config.with_scale(scale);
        }

        config.validate()?;
        Ok(config)
    }

    /// Default tracing filter for `--log-level`.
    pub fn log_filter(&self) -> &'static str {
        match self.log_level.as_str() {
            "debug" => "debug",
            "warn" => "warn",
            "error" => "error",
            _ => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["semspace-reduce"]).unwrap();
        assert_eq!(args.resolve_config().unwrap(), ReduceConfig::default());
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 9, "simple_scale": 2.0}}"#).unwrap();

        let path = file.path().to_str().unwrap();
        let args =
            Args::try_parse_from(["semspace-reduce", "--config", path, "--seed", "11"]).unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.simple_scale, 2.0);
        assert_eq!(config.projection_scale, 5.0);
    }

    #[test]
    fn scale_flag_sets_both_methods() {
        let args = Args::try_parse_from(["semspace-reduce", "--scale", "2"]).unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.projection_scale, 2.0);
        assert_eq!(config.simple_scale, 2.0);
    }

    #[test]
    fn invalid_values_rejected() {
        let args = Args::try_parse_from(["semspace-reduce", "--dimensions", "0"]).unwrap();
        assert!(args.resolve_config().is_err());

        let args =
            Args::try_parse_from(["semspace-reduce", "--config", "/nonexistent/semspace.json"])
                .unwrap();
        assert!(matches!(
            args.resolve_config(),
            Err(ReduceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let args = Args::try_parse_from(["semspace-reduce", "--log-level", "trace"]).unwrap();
        assert_eq!(args.log_filter(), "info");
    }
}
