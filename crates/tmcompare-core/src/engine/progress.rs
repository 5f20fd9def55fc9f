/// Progress events emitted by the comparison workflow. Front-ends decide
/// how to render them; the engine never prints.
#[derive(Debug, Clone)]
pub enum Progress {
    /// The per-structure SASA pass is starting.
    SasaStart { total: u64 },
    /// One structure's SASA finished (successfully or not).
    SasaTick,
    /// The pairwise sweep is starting.
    SweepStart { total_pairs: u64 },
    /// One pair finished; `failed` marks isolated per-pair failures.
    PairDone { label: String, failed: bool },
    /// The whole run is finished.
    Finished,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
