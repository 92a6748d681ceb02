use clap::Parser;
use config::ConfigError;

use crate::{
    infrastructure::config::Config, integration::renderer::OutputFormat, utils::version,
};

/// Headless toast notification stack driven by JSON lines on stdin
#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Frame rate, i.e. number of timer frames per second
    #[arg(short, long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub frame_rate: Option<f64>,

    /// Maximum number of toasts kept on the stack
    #[arg(short, long, value_name = "COUNT")]
    pub capacity: Option<usize>,

    /// Output format of the rendered stack
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration and validate the result
    pub fn apply_to(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(frame_rate) = self.frame_rate {
            config.runtime.frame_rate = frame_rate;
        }
        if let Some(capacity) = self.capacity {
            config.queue.max_capacity = capacity;
        }
        if let Some(format) = self.format {
            config.runtime.format = format;
        }
        config.validate()
    }
}
