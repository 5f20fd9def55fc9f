use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use tmcompare::engine::progress::{Progress, ProgressCallback};
use tracing::warn;

/// Renders core progress events as an indicatif bar on stderr: one bar for
/// the SASA pass, then one for the pairwise sweep. Failed pairs are printed
/// above the bar as they happen.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::SasaStart { total } => {
                    pb.reset();
                    pb.set_length(total);
                    pb.set_message("SASA");
                }
                Progress::SasaTick => pb.inc(1),
                Progress::SweepStart { total_pairs } => {
                    pb.reset();
                    pb.set_length(total_pairs);
                    pb.set_message("Alignments");
                }
                Progress::PairDone { label, failed } => {
                    if failed {
                        pb.println(format!("  ✗ {label}"));
                    }
                    pb.inc(1);
                }
                Progress::Finished => pb.finish_with_message("✓ Done"),
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}
