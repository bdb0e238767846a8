//! Capture-stream decode loop.
//!
//! The loop owns the frame source and releases it exactly once, whichever
//! of success, stop request, teardown or source exhaustion ends it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::payload;
use crate::domain::symbology::Symbology;
use crate::ports::outbound::{FrameSource, ImageDecoder};

/// How a capture session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A frame decoded to this text.
    Decoded(String),
    /// Stopped by request or teardown before anything decoded.
    Stopped,
    /// The device ran out of frames.
    SourceExhausted,
}

/// Handle to a running capture session.
///
/// `stop` may be called any number of times; only the first request is
/// forwarded. Dropping the handle stops the session.
pub struct CaptureHandle {
    stop_tx: watch::Sender<bool>,
    stop_requested: AtomicBool,
    outcome_rx: oneshot::Receiver<CaptureOutcome>,
    task: JoinHandle<()>,
}

impl CaptureHandle {
    pub(crate) fn spawn<S>(
        source: S,
        decoder: Arc<dyn ImageDecoder>,
        symbologies: Vec<Symbology>,
        frame_interval: Duration,
    ) -> Self
    where
        S: FrameSource + 'static,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let task = tokio::spawn(run_capture(
            source,
            decoder,
            symbologies,
            frame_interval,
            stop_rx,
            outcome_tx,
        ));

        Self {
            stop_tx,
            stop_requested: AtomicBool::new(false),
            outcome_rx,
            task,
        }
    }

    /// Request the session to stop.
    ///
    /// Returns true if this call issued the request, false if a stop was
    /// already requested.
    pub fn stop(&self) -> bool {
        if self.stop_requested.swap(true, Ordering::SeqCst) {
            debug!("[pc-02] Capture already stopping, ignoring stop request");
            return false;
        }
        // The loop may have ended already; nobody listening is fine.
        let _ = self.stop_tx.send(true);
        true
    }

    /// True once the capture loop has released the source.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end.
    pub async fn outcome(mut self) -> CaptureOutcome {
        (&mut self.outcome_rx)
            .await
            .unwrap_or(CaptureOutcome::Stopped)
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        if !self.stop_requested.swap(true, Ordering::SeqCst) {
            let _ = self.stop_tx.send(true);
        }
    }
}

async fn run_capture<S>(
    mut source: S,
    decoder: Arc<dyn ImageDecoder>,
    symbologies: Vec<Symbology>,
    frame_interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
    outcome_tx: oneshot::Sender<CaptureOutcome>,
) where
    S: FrameSource,
{
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames_seen: u64 = 0;

    let outcome = loop {
        tokio::select! {
            biased;

            // Fires on a stop request and when the handle is gone
            _ = stop_rx.changed() => break CaptureOutcome::Stopped,

            frame = async {
                ticker.tick().await;
                source.next_frame().await
            } => {
                let Some(image) = frame else {
                    break CaptureOutcome::SourceExhausted;
                };
                frames_seen += 1;

                match decoder.decode_image(&image, &symbologies).await {
                    Ok(symbol) => {
                        let text = payload::decode(&symbol.bytes);
                        if text.is_empty() {
                            debug!(frame = frames_seen, "[pc-02] Empty payload, scanning on");
                            continue;
                        }
                        break CaptureOutcome::Decoded(text);
                    }
                    Err(e) => {
                        debug!(frame = frames_seen, error = %e, "[pc-02] Frame miss, scanning on");
                    }
                }
            }
        }
    };

    if let Err(e) = source.stop().await {
        warn!(error = %e, "[pc-02] Failed to release capture device");
    }

    info!(frames = frames_seen, outcome = ?outcome, "[pc-02] Capture session ended");
    let _ = outcome_tx.send(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScannerConfig;
    use crate::ports::outbound::mocks::{EchoDecoder, ScriptedFrames};
    use crate::service::QrCodecService;

    fn fast_service() -> QrCodecService {
        let config = ScannerConfig {
            max_fps: 1000,
            ..Default::default()
        };
        QrCodecService::with_config(Arc::new(EchoDecoder), config)
    }

    #[tokio::test]
    async fn test_first_successful_frame_wins() {
        let frames = ScriptedFrames::new(&[b"!noise", b"!blur", b"1001", b"2002"]);
        let stops = Arc::clone(&frames.stops);

        let handle = fast_service().start_capture(frames);
        let outcome = handle.outcome().await;

        assert_eq!(outcome, CaptureOutcome::Decoded("1001".to_string()));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_above_limit_still_decodes() {
        let config = ScannerConfig {
            max_fps: 2000,
            ..Default::default()
        };
        let service = QrCodecService::with_config(Arc::new(EchoDecoder), config);
        let frames = ScriptedFrames::new(&[b"1001"]);
        let stops = Arc::clone(&frames.stops);

        let outcome = service.start_capture(frames).outcome().await;

        assert_eq!(outcome, CaptureOutcome::Decoded("1001".to_string()));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let frames = ScriptedFrames::new(&[b"!noise"]);
        let stops = Arc::clone(&frames.stops);

        let handle = fast_service().start_capture(frames);
        assert!(handle.stop());
        assert!(!handle.stop());
        assert!(!handle.stop());

        assert_eq!(handle.outcome().await, CaptureOutcome::Stopped);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_after_success_is_harmless() {
        let frames = ScriptedFrames::new(&[b"77"]);
        let stops = Arc::clone(&frames.stops);

        let handle = fast_service().start_capture(frames);
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }

        assert!(handle.stop());
        assert_eq!(handle.outcome().await, CaptureOutcome::Decoded("77".into()));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_tears_session_down() {
        let frames = ScriptedFrames::new(&[]);
        let stops = Arc::clone(&frames.stops);

        let handle = fast_service().start_capture(frames);
        drop(handle);

        for _ in 0..100 {
            if stops.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_source() {
        let mut frames = ScriptedFrames::new(&[b"!a", b"!b"]);
        frames.idle_when_empty = false;

        let handle = fast_service().start_capture(frames);
        assert_eq!(handle.outcome().await, CaptureOutcome::SourceExhausted);
    }
}
