//! Workload driver for the linear hashing index.
//!
//! Inserts a stream of `2^n` random keys under a cost threshold and prints
//! the resulting table statistics.

mod workload;

use clap::{Parser, ValueEnum};
use linhash_common::config::LinHashConfig;
use linhash_common::Result;
use std::path::PathBuf;
use workload::WorkloadSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "linhash")]
#[command(about = "Drive a linear hashing index with a random key stream")]
#[command(version)]
struct Cli {
    /// Maximum tolerated average page accesses per insertion
    #[arg(short = 'c', long)]
    cost_max: Option<f64>,

    /// Insert 2^N keys
    #[arg(short = 'n', long, value_name = "N")]
    log2_keys: Option<u32>,

    /// Keys per page
    #[arg(short = 'm', long)]
    page_capacity: Option<usize>,

    /// Keys are drawn uniformly from 0..=MAX_KEY
    #[arg(long)]
    max_key: Option<i64>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Check table invariants and key membership after the run
    #[arg(long)]
    verify: bool,
}

impl Cli {
    /// Builds the effective configuration: file (or defaults), then flags.
    fn resolve_config(&self) -> Result<LinHashConfig> {
        let mut config = match &self.config {
            Some(path) => LinHashConfig::load(path)?,
            None => LinHashConfig::default(),
        };

        if let Some(cost_max) = self.cost_max {
            config.index.cost_max = cost_max;
        }
        if let Some(page_capacity) = self.page_capacity {
            config.index.page_capacity = page_capacity;
        }
        if let Some(log2_keys) = self.log2_keys {
            config.workload.log2_keys = log2_keys;
        }
        if let Some(max_key) = self.max_key {
            config.workload.max_key = max_key;
        }
        if self.seed.is_some() {
            config.workload.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let (_, summary) = workload::run(&config, cli.verify)?;
    println!("{}", render(&summary, cli.format)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

fn render(summary: &WorkloadSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            let report = &summary.report;
            Ok(format!(
                "N: {}\n\
                 Maximum average cost: {}\n\
                 Real average cost: {:.6}\n\
                 Page fill percentage: {:.2}\n\
                 Final bucket count: {}\n\
                 Seed: {}\n\
                 \n\
                 {}",
                summary.keys_inserted,
                summary.cost_max,
                report.average_cost,
                report.fill_percentage,
                report.bucket_count,
                summary.seed,
                report
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linhash_common::LinHashError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["linhash"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.verify);

        let config = cli.resolve_config().unwrap();
        assert_eq!(config, LinHashConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&["-c", "1.5", "-n", "8", "-m", "16", "--seed", "4"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.index.cost_max, 1.5);
        assert_eq!(config.index.page_capacity, 16);
        assert_eq!(config.workload.log2_keys, 8);
        assert_eq!(config.workload.seed, Some(4));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "index": {{ "page_capacity": 32, "cost_max": 3.0 }}, "workload": {{ "seed": 11 }} }}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--config", &path, "--cost-max", "1.25"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.index.page_capacity, 32);
        assert_eq!(config.index.cost_max, 1.25);
        assert_eq!(config.workload.seed, Some(11));
    }

    #[test]
    fn test_invalid_flag_values_rejected() {
        let cli = parse(&["-m", "0"]);
        assert!(cli.resolve_config().is_err());

        let cli = parse(&["--max-key=-3"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_empty_config_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--config", &path]);

        let err = cli.resolve_config().unwrap_err();
        assert!(matches!(err, LinHashError::ConfigError(_)));
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = parse(&["--config", "/nonexistent/linhash.json"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_render_text_and_json() {
        let cli = parse(&["-n", "6", "-m", "4", "-c", "2", "--seed", "8"]);
        let config = cli.resolve_config().unwrap();
        let (_, summary) = workload::run(&config, true).unwrap();

        let text = render(&summary, OutputFormat::Text).unwrap();
        assert!(text.starts_with("N: 64\n"));
        assert!(text.contains("Maximum average cost: 2\n"));
        assert!(text.contains(&format!("Final bucket count: {}", summary.report.bucket_count)));
        assert!(text.contains("Seed: 8"));
        assert_eq!(summary.report.average_cost.fract(), 0.0);
        assert!(text.contains(&format!(
            "Real average cost: {:.6}\n",
            summary.report.average_cost
        )));

        let json = render(&summary, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["keys_inserted"], 64);
        assert_eq!(value["report"]["bucket_count"], summary.report.bucket_count);
    }
}
