//! In-memory datagram sink for tests.
//!
//! Records every datagram with the (tokio) instant it was sent, so tests can
//! check both the bytes and the pacing without opening a socket.  Individual
//! datagrams can be made to fail to exercise the transport's send policies.

use std::collections::HashSet;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::time::Instant;

use super::DatagramSink;

#[derive(Debug, Default)]
struct Recorded {
    datagrams: Vec<Vec<u8>>,
    times: Vec<Instant>,
    attempts: usize,
}

/// A [`DatagramSink`] that keeps what it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    recorded: Mutex<Recorded>,
    failing_attempts: HashSet<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `n`-th send attempts (zero-based, counted across frames)
    /// fail with `ConnectionRefused`.
    pub fn failing_on(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            recorded: Mutex::default(),
            failing_attempts: attempts.into_iter().collect(),
        }
    }

    /// Datagrams that were sent successfully, in order.
    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.lock().datagrams.clone()
    }

    /// Send instants matching [`RecordingSink::datagrams`].
    pub fn send_times(&self) -> Vec<Instant> {
        self.lock().times.clone()
    }

    /// Number of send attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    /// Concatenated payloads with the marker bytes stripped.
    pub fn payload(&self) -> Vec<u8> {
        self.lock()
            .datagrams
            .iter()
            .flat_map(|d| d.iter().skip(1).copied())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DatagramSink for RecordingSink {
    async fn send_datagram(&self, datagram: &[u8]) -> io::Result<usize> {
        let mut recorded = self.lock();
        let attempt = recorded.attempts;
        recorded.attempts += 1;
        if self.failing_attempts.contains(&attempt) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("injected failure on attempt {attempt}"),
            ));
        }
        recorded.datagrams.push(datagram.to_vec());
        recorded.times.push(Instant::now());
        Ok(datagram.len())
    }
}
