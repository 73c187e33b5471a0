//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "ring-clock")]
#[command(about = "A state-managed countdown timer service with a circular progress-ring display model")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "9190")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Frame clock rate in frames per second
    #[arg(short, long, default_value = "60")]
    pub frame_rate: u32,

    /// Initially configured countdown minutes
    #[arg(short, long, default_value = "0")]
    pub minutes: u32,

    /// Initially configured countdown seconds
    #[arg(short, long, default_value = "0")]
    pub seconds: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
