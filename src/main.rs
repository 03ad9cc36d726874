use log::{error, info};

use ws980wifi_poller::config::StationConfig;
use ws980wifi_poller::models::Measurement;
use ws980wifi_poller::station::poller::StationPoller;
use ws980wifi_poller::station::SensorRegistry;

/// Registry that surfaces changes as log lines, keyed by the station's
/// unique-id scheme (`<prefix>-<measurement>`).
struct LoggingRegistry {
    unique_id_prefix: String,
}

impl SensorRegistry for LoggingRegistry {
    fn on_change(&mut self, key: Measurement, value: Option<f64>) {
        match value {
            Some(value) => info!("{}-{}: {}", self.unique_id_prefix, key, value),
            None => info!("{}-{}: unavailable", self.unique_id_prefix, key),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match StationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    info!(
        "Polling weather station at {}:{} every {} seconds ({} sensor(s))",
        config.host,
        config.port,
        config.poll_interval.as_secs(),
        config.monitored.len()
    );

    let registry = LoggingRegistry {
        unique_id_prefix: config.unique_id_prefix.clone(),
    };
    let mut handle = StationPoller::new(config, registry).spawn();

    // Handle Ctrl+C gracefully
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    info!("Program terminated by user. Exiting gracefully.");
    handle.stop();
    handle.join().await;

    Ok(())
}
