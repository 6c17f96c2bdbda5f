use hx711_uart::app::{RunOutcome, run_with};
use hx711_uart::config::AppConfig;
use hx711_uart::serial::initialize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match AppConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    log::info!("HX711 UART reader");
    log::debug!("Configuration: {config:?}");

    match run_with(initialize, &config) {
        RunOutcome::Success(reply) => {
            if let Some(reply) = reply {
                println!("{}", hex::encode(reply));
            }
            log::info!("Successful termination");
            ExitCode::SUCCESS
        }
        RunOutcome::Failure => ExitCode::FAILURE,
    }
}
