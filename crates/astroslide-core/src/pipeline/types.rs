/// Enhancement stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnhanceStage {
    Decoding,
    Enhancing,
    Blending,
    StarSpikes,
    Encoding,
}

impl std::fmt::Display for EnhanceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding image"),
            Self::Enhancing => write!(f, "Running preset"),
            Self::Blending => write!(f, "Blending intensity"),
            Self::StarSpikes => write!(f, "Adding star spikes"),
            Self::Encoding => write!(f, "Encoding output"),
        }
    }
}

/// Thread-safe progress reporting for enhancement runs.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g., batch size), if known.
    fn begin_stage(&self, _stage: EnhanceStage, _total_items: Option<usize>) {}

    /// Work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `enhance` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
