//! Frame source replaying a recorded sequence.

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::debug;

use crate::ports::outbound::{CaptureError, FrameSource};

/// Replays recorded frames in order, then reports the stream as ended.
#[derive(Debug, Default)]
pub struct ReplayFrames {
    frames: VecDeque<Vec<u8>>,
    stopped: bool,
}

impl ReplayFrames {
    pub fn new(frames: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            stopped: false,
        }
    }

    /// One frame per line of `text`.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(|line| line.as_bytes().to_vec()))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FrameSource for ReplayFrames {
    async fn next_frame(&mut self) -> Option<Vec<u8>> {
        if self.stopped {
            return None;
        }
        self.frames.pop_front()
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        debug!(remaining = self.frames.len(), "[pc-02] Replay source released");
        self.stopped = true;
        Ok(())
    }
}
