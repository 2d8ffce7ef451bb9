use crate::configuration::Configuration;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(about = "Developer availability and booking calendar server")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(long, default_value = "3000")]
    port: String,

    /// Path of the persisted availability document
    #[arg(long, default_value = "data/availability.json")]
    data_file: PathBuf,

    /// Allowed requests per client IP per minute
    #[arg(long, default_value_t = 60)]
    rate_limit: u32,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone()
    }

    fn data_file(&self) -> PathBuf {
        self.data_file.clone()
    }

    fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit
    }
}
