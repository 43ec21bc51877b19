//! One-shot capture of the first top-level SELECT of a parse call.

use crate::ast::Select;
use crate::error::AstResult;
use crate::json::WriterOptions;
use crate::parser::SelectHook;
use crate::projector::Projector;

/// Latch state. Transitions: `Disabled -> Armed` on [`CaptureBridge::arm`],
/// `Armed -> Captured` on the first offer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Disabled,
    Armed,
    Captured(String),
}

#[derive(Debug, Default)]
pub struct CaptureBridge {
    state: CaptureState,
    options: WriterOptions,
}

impl CaptureBridge {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            state: CaptureState::Disabled,
            options,
        }
    }

    /// Reset for a new parse call. Any earlier document is dropped.
    pub fn arm(&mut self) {
        if matches!(self.state, CaptureState::Captured(_)) {
            tracing::debug!("re-arming capture, dropping previous document");
        }
        self.state = CaptureState::Armed;
    }

    /// Project `select` if the bridge is armed. Later offers are ignored.
    pub fn offer(&mut self, select: &Select) -> AstResult<()> {
        match self.state {
            CaptureState::Armed => {
                let document = Projector::new(self.options).project(select)?;
                tracing::debug!(bytes = document.len(), "captured SELECT");
                self.state = CaptureState::Captured(document);
            }
            CaptureState::Captured(_) => tracing::debug!("already captured, ignoring SELECT"),
            CaptureState::Disabled => tracing::debug!("capture disabled, ignoring SELECT"),
        }
        Ok(())
    }

    /// Take the captured document, leaving the bridge disabled.
    pub fn finish(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            CaptureState::Captured(document) => Some(document),
            _ => None,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }
}

impl SelectHook for CaptureBridge {
    fn on_select(&mut self, select: &Select) -> AstResult<()> {
        self.offer(select)
    }
}
