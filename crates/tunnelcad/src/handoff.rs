//! Carrying the tunnel face frame into the coal-seam command.

use tunnelcad_math::LocalFrame;

use crate::report::TunnelReport;

/// The frame at the most recent tunnel face, owned by the caller and passed
/// from one command to the next.
#[derive(Debug, Clone, Default)]
pub struct FrameHandoff {
    frame: Option<LocalFrame>,
}

impl FrameHandoff {
    /// Nothing recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the end frame of a finished tunnel.
    pub fn record(&mut self, report: &TunnelReport) {
        self.frame = Some(report.end_frame.local_frame());
    }

    /// The recorded frame.
    pub fn frame(&self) -> Option<&LocalFrame> {
        self.frame.as_ref()
    }
}
