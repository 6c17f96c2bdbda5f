//! # Config Module
//!
//! Command-line configuration for the `hx711-uart` binary.
//!
//! ```text
//! hx711-uart [--port PATH] [--gain 128|64|32] [--baud RATE] [--log-level LEVEL] [--strict]
//! ```

use log::LevelFilter;

use crate::error::{Hx711Error, Result};
use crate::hx711::Gain;
use crate::serial::LineSettings;

/// Runtime configuration assembled from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub line: LineSettings,
    /// Raw gain value; validated by the request protocol.
    pub gain: u32,
    pub log_level: LevelFilter,
    /// Treat a failed request or read as a fatal error.
    pub strict: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            line: LineSettings::new(),
            gain: Gain::default().factor(),
            log_level: LevelFilter::Info,
            strict: false,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from the arguments following the program name.
    ///
    /// Unknown log levels fall back to `INFO`. Gain values are accepted as any
    /// unsigned integer so an unsupported one is reported by the protocol
    /// layer rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`Hx711Error::InvalidConfig`] for a flag without a value, a
    /// non-numeric gain or baud rate, or an unknown flag.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = AppConfig::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" => {
                    config.line.port_name = flag_value(&mut args, arg)?.clone();
                }
                "--gain" => {
                    let value = flag_value(&mut args, arg)?;
                    config.gain = value
                        .parse()
                        .map_err(|_| Hx711Error::invalid_config(format!("gain '{value}' is not a number")))?;
                }
                "--baud" => {
                    let value = flag_value(&mut args, arg)?;
                    config.line.baud_rate = value.parse().map_err(|_| {
                        Hx711Error::invalid_config(format!("baud rate '{value}' is not a number"))
                    })?;
                }
                "--log-level" => {
                    config.log_level = parse_log_level(flag_value(&mut args, arg)?);
                }
                "--strict" => config.strict = true,
                other => {
                    return Err(Hx711Error::invalid_config(format!("unknown argument '{other}'")));
                }
            }
        }

        config.line.validate()?;
        Ok(config)
    }
}

fn flag_value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a String> {
    args.next()
        .ok_or_else(|| Hx711Error::invalid_config(format!("{flag} requires a value")))
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => {
            eprintln!("Unknown log level: {level}. Using INFO");
            LevelFilter::Info
        }
    }
}
