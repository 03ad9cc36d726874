use std::time::Duration;

use thiserror::Error;

/// Transport failures of a single poll cycle.
///
/// Every variant is recoverable: the poller logs the condition and
/// reschedules itself at the retry interval. A frame of the wrong
/// length is not an error at all; it decodes to all-absent readings.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("unable to connect to {host} on port {port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("unable to send to {host} on port {port}: {source}")]
    SendFailed {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("error receiving from {host} on port {port}: {source}")]
    ReceiveFailed {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("timeout ({timeout:?}) waiting for a response after sending to {host} on port {port}")]
    ReadTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },
}
