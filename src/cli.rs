//! Command-line interface for the flashlight client

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use flashlight_shared::protocol;

use crate::pipeline::PipelineConfig;

/// Receive TLV commands from a device and apply them
#[derive(Debug, Parser)]
#[command(name = "flashlight", version, about)]
pub struct Cli {
    /// Device host name or address
    #[arg(default_value = protocol::DEFAULT_HOST)]
    pub hostname: String,

    /// Device port
    #[arg(default_value_t = protocol::DEFAULT_PORT)]
    pub port: u16,

    /// Maximum bytes read from the socket per chunk
    #[arg(
        long,
        default_value_t = protocol::DEFAULT_READ_WINDOW,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub read_window: usize,

    /// Largest partial frame, in bytes, kept between reads (unbounded by default)
    #[arg(long)]
    pub max_carry: Option<usize>,
}

impl Cli {
    /// Convert parsed arguments into a pipeline configuration
    pub fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            host: self.hostname,
            port: self.port,
            read_window: self.read_window,
            max_carry: self.max_carry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Cli::parse_from(["flashlight"]).into_config();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_positional_host_and_port() {
        let config = Cli::parse_from(["flashlight", "device.local", "7000"]).into_config();
        assert_eq!(config.host, "device.local");
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn test_options() {
        let config = Cli::parse_from([
            "flashlight",
            "--read-window",
            "64",
            "--max-carry",
            "1024",
        ])
        .into_config();
        assert_eq!(config.read_window, 64);
        assert_eq!(config.max_carry, Some(1024));
    }

    #[test]
    fn test_zero_read_window_rejected() {
        assert!(Cli::try_parse_from(["flashlight", "--read-window", "0"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
