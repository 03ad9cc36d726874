/// Poll cycle and scheduling for the WS980WiFi station
use std::collections::HashMap;
use std::io;

use log::{debug, error, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration};

use crate::config::StationConfig;
use crate::error::PollError;
use crate::models::{DecodedReading, Measurement};
use crate::protocol::{decode_frame, FieldSpec, FIELD_SPECS};
use crate::station::SensorRegistry;
use crate::utils::hex_string;

/// Fixed status query understood by the station, sent verbatim every
/// cycle.
pub const QUERY: [u8; 8] = [0xFF, 0xFF, 0x0B, 0x00, 0x06, 0x04, 0x04, 0x19];

/// Size of the single read issued per cycle.
const BUFFER_SIZE: usize = 1024;

/// Polls the station and publishes value changes to a [`SensorRegistry`].
///
/// One poll cycle opens a fresh TCP connection, sends the query, reads
/// one response, decodes it and emits a notification for every
/// monitored field whose value differs from the last published one.
/// The station speaks a one-shot request/response protocol, so the
/// connection is never reused across cycles.
pub struct StationPoller<R: SensorRegistry> {
    config: StationConfig,
    fields: Vec<FieldSpec>,
    last_values: HashMap<Measurement, Option<f64>>,
    registry: R,
}

impl<R: SensorRegistry> StationPoller<R> {
    pub fn new(config: StationConfig, registry: R) -> Self {
        // Keep frame order so notifications are emitted in field order
        let fields: Vec<FieldSpec> = FIELD_SPECS
            .iter()
            .filter(|spec| config.monitored.contains(&spec.key))
            .copied()
            .collect();
        let last_values = fields.iter().map(|spec| (spec.key, None)).collect();
        StationPoller {
            config,
            fields,
            last_values,
            registry,
        }
    }

    /// Delay before the next attempt after a failed cycle: twice the
    /// poll interval.
    pub fn retry_interval(&self) -> Duration {
        self.config.poll_interval * 2
    }

    /// Delay before the next cycle given this cycle's outcome.
    fn delay_after(&self, result: &Result<(), PollError>) -> Duration {
        match result {
            Ok(()) => self.config.poll_interval,
            Err(_) => self.retry_interval(),
        }
    }

    /// Run exactly one connect -> query -> decode -> publish pass.
    ///
    /// Transport failures are returned for the caller to schedule a
    /// retry; a garbled or missing frame is not a failure and simply
    /// publishes nothing new (absent values stay absent, present ones
    /// transition to absent).
    pub async fn poll_once(&mut self) -> Result<(), PollError> {
        debug!("updating sensor values from weather station");
        let frame = self.exchange().await?;
        debug!(
            "Read data (raw): length ({}) - {}",
            frame.len(),
            hex_string(&frame)
        );
        let readings = decode_frame(&self.fields, &frame);
        self.publish(readings);
        Ok(())
    }

    /// One TCP round-trip. The socket lives only inside this call and
    /// is closed on every exit path.
    async fn exchange(&self) -> Result<Vec<u8>, PollError> {
        let addr = (self.config.host.as_str(), self.config.port);

        let mut stream = match timeout(self.config.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(self.connect_failed(err)),
            Err(_) => {
                return Err(self.connect_failed(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "connection attempt timed out",
                )))
            }
        };

        if let Err(err) = stream.write_all(&QUERY).await {
            return Err(PollError::SendFailed {
                host: self.config.host.clone(),
                port: self.config.port,
                source: err,
            });
        }

        let mut buffer = vec![0u8; BUFFER_SIZE];
        let received = match timeout(self.config.timeout, stream.read(&mut buffer)).await {
            Ok(Ok(n)) => n,
            Ok(Err(err)) => {
                // A reset mid-read is a transport failure, unlike a
                // clean zero-byte close which is just "no data".
                return Err(PollError::ReceiveFailed {
                    host: self.config.host.clone(),
                    port: self.config.port,
                    source: err,
                });
            }
            Err(_) => {
                return Err(PollError::ReadTimeout {
                    host: self.config.host.clone(),
                    port: self.config.port,
                    timeout: self.config.timeout,
                })
            }
        };
        buffer.truncate(received);
        Ok(buffer)
    }

    fn connect_failed(&self, source: io::Error) -> PollError {
        PollError::ConnectFailed {
            host: self.config.host.clone(),
            port: self.config.port,
            source,
        }
    }

    /// Emit a notification for every reading that differs from the last
    /// published value, in field order. `last_values` is updated before
    /// the registry is called, so the registry always observes the map
    /// already at the notified value.
    fn publish(&mut self, readings: Vec<DecodedReading>) {
        for reading in readings {
            if self.last_values.get(&reading.key) != Some(&reading.value) {
                self.last_values.insert(reading.key, reading.value);
                debug!("refresh {} to {:?}", reading.key, reading.value);
                self.registry.on_change(reading.key, reading.value);
            }
        }
    }

    /// Start the poll loop on the runtime. Each cycle runs to
    /// completion before the next is scheduled; a successful cycle
    /// sleeps for the poll interval and a failed one for the retry
    /// interval. The returned handle cancels the pending sleep on
    /// [`PollerHandle::stop`].
    pub fn spawn(mut self) -> PollerHandle
    where
        R: Send + Sync + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                let result = self.poll_once().await;
                if let Err(err) = &result {
                    error!("{}", err);
                    error!("Retrying in {} seconds", self.retry_interval().as_secs());
                }
                let delay = self.delay_after(&result);
                tokio::select! {
                    _ = &mut stop_rx => {
                        info!("Poller stopped");
                        return;
                    }
                    _ = sleep(delay) => {}
                }
            }
        });
        PollerHandle {
            stop_tx: Some(stop_tx),
            task,
        }
    }
}

/// Cancelable handle to a running poll loop.
pub struct PollerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Cancel the pending scheduled poll. Idempotent; a cycle already
    /// in flight finishes before the loop exits.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the poll loop to finish after [`stop`](Self::stop).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::EXPECTED_FRAME_LEN;

    /// Registry that records every notification it receives.
    #[derive(Default)]
    struct RecordingRegistry {
        changes: Vec<(Measurement, Option<f64>)>,
    }

    impl SensorRegistry for RecordingRegistry {
        fn on_change(&mut self, key: Measurement, value: Option<f64>) {
            self.changes.push((key, value));
        }
    }

    fn test_config(monitored: Vec<Measurement>) -> StationConfig {
        StationConfig {
            host: "127.0.0.1".to_string(),
            port: 45000,
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(20),
            monitored,
            unique_id_prefix: "ELV-2504508-94".to_string(),
        }
    }

    fn poller(monitored: Vec<Measurement>) -> StationPoller<RecordingRegistry> {
        StationPoller::new(test_config(monitored), RecordingRegistry::default())
    }

    fn frame_with(values: &[(Measurement, &[u8])]) -> Vec<u8> {
        let mut frame = vec![0u8; EXPECTED_FRAME_LEN];
        for (m, bytes) in values {
            let spec = m.spec();
            frame[spec.offset..spec.offset + spec.width].copy_from_slice(bytes);
        }
        frame
    }

    #[test]
    fn test_retry_interval_is_twice_poll_interval() {
        let poller = poller(vec![Measurement::InsideTemperature]);
        assert_eq!(poller.retry_interval(), Duration::from_secs(40));
    }

    #[test]
    fn test_delay_after_picks_interval_by_outcome() {
        let poller = poller(vec![Measurement::InsideTemperature]);
        assert_eq!(poller.delay_after(&Ok(())), Duration::from_secs(20));

        let failed = PollError::ConnectFailed {
            host: "127.0.0.1".to_string(),
            port: 45000,
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert_eq!(poller.delay_after(&Err(failed)), Duration::from_secs(40));
    }

    #[test]
    fn test_fields_follow_frame_order() {
        // Monitored order in the config must not affect publish order
        let poller = poller(vec![
            Measurement::Gust,
            Measurement::OutsideTemperature,
            Measurement::InsideHumidity,
        ]);
        let keys: Vec<Measurement> = poller.fields.iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec![
                Measurement::OutsideTemperature,
                Measurement::InsideHumidity,
                Measurement::Gust,
            ]
        );
    }

    #[test]
    fn test_publish_suppresses_unchanged_values() {
        let mut poller = poller(vec![
            Measurement::OutsideTemperature,
            Measurement::OutsideHumidity,
        ]);
        let frame = frame_with(&[
            (Measurement::OutsideTemperature, &[0x00, 0xE6]),
            (Measurement::OutsideHumidity, &[56]),
        ]);

        let readings = decode_frame(&poller.fields, &frame);
        poller.publish(readings.clone());
        assert_eq!(
            poller.registry.changes,
            vec![
                (Measurement::OutsideTemperature, Some(23.0)),
                (Measurement::OutsideHumidity, Some(56.0)),
            ]
        );

        // Identical decode again: nothing new to publish
        poller.publish(readings);
        assert_eq!(poller.registry.changes.len(), 2);
    }

    #[test]
    fn test_publish_emits_present_absent_transitions() {
        let mut poller = poller(vec![Measurement::OutsideTemperature]);
        let fields = poller.fields.clone();

        let present = frame_with(&[(Measurement::OutsideTemperature, &[0x00, 0xE6])]);
        poller.publish(decode_frame(&fields, &present));

        // Sensor drops out: sentinel pattern
        let absent = frame_with(&[(Measurement::OutsideTemperature, &[0x7F, 0xFF])]);
        poller.publish(decode_frame(&fields, &absent));

        assert_eq!(
            poller.registry.changes,
            vec![
                (Measurement::OutsideTemperature, Some(23.0)),
                (Measurement::OutsideTemperature, None),
            ]
        );
    }

    #[test]
    fn test_initial_all_sentinel_frame_emits_nothing() {
        let mut poller = poller(vec![Measurement::OutsideTemperature]);
        let fields = poller.fields.clone();
        let absent = frame_with(&[(Measurement::OutsideTemperature, &[0x7F, 0xFF])]);
        poller.publish(decode_frame(&fields, &absent));
        assert!(poller.registry.changes.is_empty());
    }

    #[test]
    fn test_last_values_updated_with_notification() {
        let mut poller = poller(vec![Measurement::WindSpeed]);
        let fields = poller.fields.clone();
        let frame = frame_with(&[(Measurement::WindSpeed, &[0x03, 0x84])]);
        poller.publish(decode_frame(&fields, &frame));
        assert_eq!(
            poller.last_values.get(&Measurement::WindSpeed),
            Some(&Some(90.0))
        );
    }
}
