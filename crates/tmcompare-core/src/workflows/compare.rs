use crate::core::io::tables::MetricTable;
use crate::core::models::structure::{AlignmentResult, PairKey, SasaValue, Structure};
use crate::engine::adapter::AlignmentTool;
use crate::engine::config::AlignConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sasa::SasaComputer;
use crate::engine::transform::apply_transform;
use tracing::{info, instrument, warn};

/// One isolated failure: a SASA computation (label = structure id) or a
/// pair computation (label = composite pair label) that was recorded and
/// skipped without aborting the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub label: String,
    pub reason: String,
}

/// Everything a completed run produced, in enumeration order. Tables are
/// derived views over these vectors; nothing is persisted until the caller
/// writes them at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct ComparisonReport {
    pub sasa: Vec<SasaValue>,
    pub results: Vec<AlignmentResult>,
    pub superposed: Vec<(PairKey, Structure)>,
    pub failures: Vec<FailedEntry>,
}

impl ComparisonReport {
    pub fn succeeded(&self) -> usize {
        self.sasa.len() + self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn sasa_table(&self) -> MetricTable {
        let mut table = MetricTable::new();
        for value in &self.sasa {
            table.push(&value.id, value.area);
        }
        table
    }

    /// RMSD per pair. Pairs whose output carried no RMSD are omitted.
    pub fn rmsd_table(&self) -> MetricTable {
        let mut table = MetricTable::new();
        for result in &self.results {
            if let Some(rmsd) = result.rmsd {
                table.push(result.pair.label(), rmsd);
            }
        }
        table
    }

    /// Similarity score per pair. Pairs with an absent score are omitted.
    pub fn tm_table(&self) -> MetricTable {
        let mut table = MetricTable::new();
        for result in &self.results {
            if let Some(score) = result.tm_score {
                table.push(result.pair.label(), score);
            }
        }
        table
    }
}

/// Runs the full comparison sweep: N SASA values and N·(N−1)/2 pairwise
/// alignments over a sorted copy of the structure list.
///
/// Identifiers are sorted before enumeration, so result ordering is
/// reproducible regardless of how the caller discovered the structures.
/// Each pair is computed independently; a pair-level error is recorded as
/// a [`FailedEntry`] and the sweep continues. An empty structure set is a
/// run-level error and nothing is computed.
#[instrument(skip_all, name = "comparison_workflow")]
pub fn run(
    structures: &[Structure],
    config: &AlignConfig,
    sasa: &dyn SasaComputer,
    reporter: &ProgressReporter,
) -> Result<ComparisonReport, EngineError> {
    if structures.is_empty() {
        return Err(EngineError::EmptyStructureSet);
    }

    let mut ordered: Vec<&Structure> = structures.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let n = ordered.len();
    let total_pairs = (n * (n - 1) / 2) as u64;
    info!(
        structures = n,
        pairs = total_pairs,
        "starting comparison sweep"
    );

    let mut report = ComparisonReport::default();

    reporter.report(Progress::SasaStart { total: n as u64 });
    for structure in &ordered {
        match sasa.total_area(structure) {
            Ok(area) => report.sasa.push(SasaValue {
                id: structure.id.clone(),
                area,
            }),
            Err(e) => {
                warn!(id = %structure.id, error = %e, "SASA computation failed");
                report.failures.push(FailedEntry {
                    label: structure.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::SasaTick);
    }

    let tool = AlignmentTool::new(config.clone());
    reporter.report(Progress::SweepStart { total_pairs });
    for i in 0..n {
        for j in (i + 1)..n {
            let (mobile, target) = (ordered[i], ordered[j]);
            let label = PairKey::new(&mobile.id, &target.id).label();
            let mut failed = false;

            match tool.align(mobile, target) {
                Ok(result) => {
                    if config.apply_transform
                        && let Some(transform) = &result.transform
                    {
                        report
                            .superposed
                            .push((result.pair.clone(), apply_transform(mobile, transform)));
                    }
                    report.results.push(result);
                }
                Err(e) => {
                    warn!(pair = %label, error = %e, "pair computation failed");
                    failed = true;
                    report.failures.push(FailedEntry {
                        label: label.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            reporter.report(Progress::PairDone { label, failed });
        }
    }
    reporter.report(Progress::Finished);

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "comparison sweep finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::Residue;
    use crate::engine::config::AlignmentMode;
    use nalgebra::Point3;
    use std::path::PathBuf;

    struct FixedSasa(f64);

    impl SasaComputer for FixedSasa {
        fn total_area(&self, structure: &Structure) -> Result<f64, EngineError> {
            if structure.is_empty() {
                return Err(EngineError::EmptyStructure {
                    id: structure.id.clone(),
                });
            }
            Ok(self.0)
        }
    }

    fn structure(id: &str) -> Structure {
        let residues = (0..4)
            .map(|i| Residue {
                name: "ALA".to_string(),
                seq: i + 1,
                chain_id: 'A',
                ca: Point3::new(i as f64 * 3.8, 0.0, 0.0),
            })
            .collect();
        Structure::new(id, residues)
    }

    fn config(executable: PathBuf) -> AlignConfig {
        AlignConfig::builder()
            .executable(executable)
            .mode(AlignmentMode::ScoreOnly)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_structure_set_is_a_run_level_error() {
        let result = run(
            &[],
            &config(PathBuf::from("/nonexistent/tool")),
            &FixedSasa(1.0),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::EmptyStructureSet)));
    }

    #[cfg(unix)]
    mod with_fake_tool {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        fn fake_tool(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake_tool.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn scoring_tool(dir: &Path) -> PathBuf {
            fake_tool(dir, "echo 'RMSD= 1.50'\necho 'TM-score= 0.75'")
        }

        #[test]
        fn four_structures_yield_six_pairs_and_four_sasa_values() {
            let dir = tempfile::tempdir().unwrap();
            let structures = vec![
                structure("d"),
                structure("b"),
                structure("a"),
                structure("c"),
            ];
            let report = run(
                &structures,
                &config(scoring_tool(dir.path())),
                &FixedSasa(250.0),
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_eq!(report.sasa.len(), 4);
            assert_eq!(report.results.len(), 6);
            assert_eq!(report.failed(), 0);
            assert_eq!(report.succeeded(), 10);
        }

        #[test]
        fn enumeration_order_is_sorted_and_platform_independent() {
            let dir = tempfile::tempdir().unwrap();
            let structures = vec![structure("c"), structure("a"), structure("b")];
            let report = run(
                &structures,
                &config(scoring_tool(dir.path())),
                &FixedSasa(1.0),
                &ProgressReporter::new(),
            )
            .unwrap();

            let labels: Vec<String> = report.results.iter().map(|r| r.pair.label()).collect();
            assert_eq!(labels, vec!["a|b", "a|c", "b|c"]);

            let sasa_ids: Vec<&str> = report.sasa.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(sasa_ids, vec!["a", "b", "c"]);
        }

        #[test]
        fn tables_keep_enumeration_order() {
            let dir = tempfile::tempdir().unwrap();
            let structures = vec![structure("b"), structure("a"), structure("c")];
            let report = run(
                &structures,
                &config(scoring_tool(dir.path())),
                &FixedSasa(42.0),
                &ProgressReporter::new(),
            )
            .unwrap();

            let rmsd = report.rmsd_table();
            let labels: Vec<&str> = rmsd.rows().iter().map(|(l, _)| l.as_str()).collect();
            assert_eq!(labels, vec!["a|b", "a|c", "b|c"]);
            assert!(rmsd.rows().iter().all(|&(_, v)| (v - 1.5).abs() < 1e-9));

            let tm = report.tm_table();
            assert!((tm.get("a|b").unwrap() - 0.75).abs() < 1e-9);
        }

        #[test]
        fn a_failing_pair_does_not_abort_the_sweep() {
            let dir = tempfile::tempdir().unwrap();
            // The tool fails on its first invocation (pair a|b) and
            // succeeds afterwards, tracked through a counter file.
            let counter = dir.path().join("calls");
            let body = format!(
                "count=$(cat '{0}' 2>/dev/null || echo 0)\n\
                 echo $((count + 1)) > '{0}'\n\
                 if [ \"$count\" -eq 0 ]; then exit 9; fi\n\
                 echo 'RMSD= 2.00'\necho 'TM-score= 0.60'",
                counter.display()
            );
            let tool = fake_tool(dir.path(), &body);

            let structures = vec![structure("a"), structure("b"), structure("c")];
            let report = run(
                &structures,
                &config(tool),
                &FixedSasa(1.0),
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_eq!(report.results.len(), 2);
            assert_eq!(report.failed(), 1);
            assert_eq!(report.failures[0].label, "a|b");
            assert!(report.failures[0].reason.contains("exit"));
        }

        #[test]
        fn sasa_failure_is_isolated_per_structure() {
            struct FailingSasa;
            impl SasaComputer for FailingSasa {
                fn total_area(&self, structure: &Structure) -> Result<f64, EngineError> {
                    if structure.id == "b" {
                        Err(EngineError::EmptyStructure {
                            id: structure.id.clone(),
                        })
                    } else {
                        Ok(10.0)
                    }
                }
            }

            let dir = tempfile::tempdir().unwrap();
            let structures = vec![structure("a"), structure("b"), structure("c")];
            let report = run(
                &structures,
                &config(scoring_tool(dir.path())),
                &FailingSasa,
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_eq!(report.sasa.len(), 2);
            assert_eq!(report.results.len(), 3);
            assert_eq!(report.failed(), 1);
            assert_eq!(report.failures[0].label, "b");
        }

        #[test]
        fn apply_transform_toggle_produces_superposed_structures() {
            let dir = tempfile::tempdir().unwrap();
            // Emits a pure-translation matrix for every pair.
            let body = "echo 'TM-score= 0.90'\n\
                        echo ' -------- rotation matrix ----'\n\
                        echo ' 1 10.0 1.0 0.0 0.0'\n\
                        echo ' 2  0.0 0.0 1.0 0.0'\n\
                        echo ' 3  0.0 0.0 0.0 1.0'";
            let tool = fake_tool(dir.path(), body);
            let config = AlignConfig::builder()
                .executable(tool)
                .mode(AlignmentMode::Full)
                .apply_transform(true)
                .build()
                .unwrap();

            let structures = vec![structure("a"), structure("b")];
            let report = run(
                &structures,
                &config,
                &FixedSasa(1.0),
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_eq!(report.superposed.len(), 1);
            let (pair, moved) = &report.superposed[0];
            assert_eq!(pair, &PairKey::new("a", "b"));
            let original_x = structures[0].residues()[0].ca.x;
            assert!((moved.residues()[0].ca.x - (original_x + 10.0)).abs() < 1e-9);
        }

        #[test]
        fn progress_events_cover_both_phases() {
            use std::sync::Mutex;

            let dir = tempfile::tempdir().unwrap();
            let events: Mutex<Vec<String>> = Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|p| {
                let tag = match p {
                    Progress::SasaStart { .. } => "sasa_start",
                    Progress::SasaTick => "sasa_tick",
                    Progress::SweepStart { .. } => "sweep_start",
                    Progress::PairDone { .. } => "pair_done",
                    Progress::Finished => "finished",
                };
                events.lock().unwrap().push(tag.to_string());
            }));

            let structures = vec![structure("a"), structure("b")];
            run(
                &structures,
                &config(scoring_tool(dir.path())),
                &FixedSasa(1.0),
                &reporter,
            )
            .unwrap();

            // The callback borrows `events`; release it before moving out.
            drop(reporter);
            let events = events.into_inner().unwrap();
            assert_eq!(
                events,
                vec![
                    "sasa_start",
                    "sasa_tick",
                    "sasa_tick",
                    "sweep_start",
                    "pair_done",
                    "finished"
                ]
            );
        }
    }
}
