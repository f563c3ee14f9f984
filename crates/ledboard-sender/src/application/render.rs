//! RenderLoop: draw, flatten, send, wait, repeat.
//!
//! The loop is the single owner of the board and the transport, so no locking
//! is needed: a frame is always drawn completely before it is flattened, and
//! always sent completely (or abandoned) before the next one is drawn.
//!
//! Frames are ephemeral.  A frame whose datagrams fail to send is logged and
//! counted, and the loop carries on with the next one.  Only errors that would
//! repeat on every frame (the board cannot be encoded) stop the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ledboard_core::LedBoard;
use tracing::{debug, info, warn};

use crate::application::patterns::Pattern;
use crate::infrastructure::network::{DatagramSink, FrameTransport, SendReport, TransportError};

/// Counters returned by [`RenderLoop::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames whose datagrams all went out.
    pub frames_sent: u64,
    /// Frames with at least one failed datagram.
    pub frames_failed: u64,
}

impl RenderStats {
    pub fn frames(&self) -> u64 {
        self.frames_sent + self.frames_failed
    }
}

/// Drives one board through one transport.
pub struct RenderLoop<S> {
    board: LedBoard,
    transport: FrameTransport<S>,
    frame_interval: Duration,
}

impl<S: DatagramSink> RenderLoop<S> {
    pub fn new(board: LedBoard, transport: FrameTransport<S>, frame_interval: Duration) -> Self {
        Self {
            board,
            transport,
            frame_interval,
        }
    }

    pub fn board(&self) -> &LedBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut LedBoard {
        &mut self.board
    }

    pub fn transport(&self) -> &FrameTransport<S> {
        &self.transport
    }

    /// Draws frame `index` of `pattern` and sends it.
    ///
    /// # Errors
    ///
    /// Propagates the [`TransportError`] of the send.
    pub async fn render_frame(
        &mut self,
        pattern: &mut dyn Pattern,
        index: u64,
    ) -> Result<SendReport, TransportError> {
        pattern.draw(&mut self.board, index);
        let frame = self.board.get_surface();
        self.transport.send_frame(&frame).await
    }

    /// Renders `pattern` until `frames` frames have been produced (forever
    /// when `None`) or `running` is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encode`] if the board cannot be encoded.
    /// Send failures are counted in [`RenderStats::frames_failed`] instead.
    pub async fn run(
        &mut self,
        pattern: &mut dyn Pattern,
        frames: Option<u64>,
        running: &AtomicBool,
    ) -> Result<RenderStats, TransportError> {
        let mut stats = RenderStats::default();
        info!("rendering '{}' on {}", pattern.name(), self.board);

        let mut index = 0u64;
        while running.load(Ordering::Relaxed) && frames.map_or(true, |n| index < n) {
            match self.render_frame(pattern, index).await {
                Ok(report) if report.is_complete() => stats.frames_sent += 1,
                Ok(report) => {
                    warn!(
                        "frame {index}: {} of {} datagrams failed",
                        report.failures.len(),
                        report.datagrams
                    );
                    stats.frames_failed += 1;
                }
                Err(e @ TransportError::Send { .. }) => {
                    warn!("frame {index} dropped: {e}");
                    stats.frames_failed += 1;
                }
                Err(e) => return Err(e),
            }
            index += 1;

            let more = frames.map_or(true, |n| index < n);
            if more && !self.frame_interval.is_zero() {
                tokio::time::sleep(self.frame_interval).await;
            }
        }

        debug!(
            "render loop finished: {} sent, {} failed",
            stats.frames_sent, stats.frames_failed
        );
        Ok(stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
