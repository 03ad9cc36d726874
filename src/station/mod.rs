pub mod poller;

use crate::models::Measurement;

/// Downstream consumer of change notifications.
///
/// The registry owns display names, units and any other per-sensor
/// metadata; the poller only tells it which measurement changed and to
/// what. `None` means the station reported the sensor as absent.
pub trait SensorRegistry {
    fn on_change(&mut self, key: Measurement, value: Option<f64>);
}
