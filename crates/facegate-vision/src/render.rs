//! Overlay renderer that writes to the tracing subscriber.

use facegate_types::Frame;
use tracing::{debug, info, trace};

use crate::{Overlay, OverlayRenderer};

/// Renders overlays as `debug` events instead of drawing on a window.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    pending: Vec<Overlay>,
    frames_presented: u64,
    closed: bool,
}

impl TracingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl OverlayRenderer for TracingRenderer {
    fn draw(&mut self, overlay: &Overlay) {
        let (x, y) = overlay.region.label_anchor();
        debug!(region = %overlay.region, x, y, label = %overlay.label, "Overlay");
        self.pending.push(overlay.clone());
    }

    fn present(&mut self, frame: &Frame) {
        trace!(
            sequence = frame.sequence,
            overlays = self.pending.len(),
            "Frame presented"
        );
        self.pending.clear();
        self.frames_presented += 1;
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!(frames = self.frames_presented, "Overlay display closed");
        }
    }
}
