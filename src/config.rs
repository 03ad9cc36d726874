use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::models::Measurement;

const DEFAULT_PORT: u16 = 45000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;
// vendor-productid-sensorid
const DEFAULT_UNIQUE_ID: &str = "ELV-2504508-94";

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub monitored: Vec<Measurement>,
    pub unique_id_prefix: String,
}

impl StationConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let host =
            env::var("WS980_HOST").map_err(|_| "WS980_HOST environment variable not set")?;

        let port = match env::var("WS980_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| format!("WS980_PORT is not a valid port: '{}'", value))?,
            Err(_) => DEFAULT_PORT,
        };

        let timeout = Duration::from_secs(parse_secs("WS980_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let poll_interval = Duration::from_secs(parse_secs(
            "WS980_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let monitored = match env::var("WS980_SENSORS") {
            Ok(list) => {
                let mut monitored = Vec::new();
                for key in list.split(',') {
                    let key = key.trim();
                    if key.is_empty() {
                        continue;
                    }
                    let measurement = Measurement::from_str(key).map_err(|_| {
                        format!(
                            "WS980_SENSORS contains unknown measurement '{}'. Valid keys: {}",
                            key,
                            Measurement::ALL
                                .iter()
                                .map(|m| m.key())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    })?;
                    if !monitored.contains(&measurement) {
                        monitored.push(measurement);
                    }
                }
                monitored
            }
            Err(_) => vec![Measurement::InsideTemperature],
        };

        if monitored.is_empty() {
            return Err("WS980_SENSORS must name at least one measurement".into());
        }

        let unique_id_prefix =
            env::var("WS980_UNIQUE_ID").unwrap_or_else(|_| DEFAULT_UNIQUE_ID.to_string());

        Ok(StationConfig {
            host,
            port,
            timeout,
            poll_interval,
            monitored,
            unique_id_prefix,
        })
    }
}

fn parse_secs(name: &str, default: u64) -> Result<u64, String> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|_| format!("{} is not a valid number of seconds: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
