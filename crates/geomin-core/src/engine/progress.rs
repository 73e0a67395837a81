use std::sync::Arc;

/// One progress event emitted during an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A named phase of the run is starting.
    PhaseStart { name: &'static str },
    /// The current phase finished.
    PhaseFinish,
    /// The clash relaxer finished after the given number of sweeps.
    ClashRelaxation { iterations: usize },
    /// One FIRE iteration completed.
    FireStep {
        iteration: usize,
        energy: f64,
        rms_force: f64,
    },
    /// A free-form status message.
    Message(String),
}

type Callback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// A shareable progress sink. The default reporter discards all events, so
/// callers that do not care about progress pay nothing.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<Callback>,
}

impl ProgressReporter {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn report(&self, progress: Progress) {
        if let Some(callback) = &self.callback {
            callback(&progress);
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("attached", &self.callback.is_some())
            .finish()
    }
}
