use crate::cli::RunArgs;
use crate::config;
use crate::data;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use std::fs::File;
use std::io::BufWriter;
use tmcompare::core::io::pdb;
use tmcompare::core::io::tables::{METRIC_RMSD, METRIC_SASA, METRIC_TM};
use tmcompare::engine::progress::ProgressReporter;
use tmcompare::workflows;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let settings = config::resolve(&args)?;

    let dataset_dir = settings.layout.dataset_dir();
    info!("Loading dataset '{}' from {:?}", args.dataset, dataset_dir);
    let structures = data::load_structures(&dataset_dir)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Comparing {} structure(s) in dataset '{}'...",
        structures.len(),
        args.dataset
    );
    let report = workflows::compare::run(&structures, &settings.align, &settings.sasa, &reporter)?;

    // The one and only persistence step: all three tables, full overwrite.
    settings.layout.ensure_tables_dir()?;
    report
        .sasa_table()
        .write_csv(&settings.layout.table_path(METRIC_SASA))?;
    report
        .rmsd_table()
        .write_csv(&settings.layout.table_path(METRIC_RMSD))?;
    report
        .tm_table()
        .write_csv(&settings.layout.table_path(METRIC_TM))?;
    info!("Tables written to {:?}", settings.layout.tables_dir());

    if settings.write_superposed && !report.superposed.is_empty() {
        let dir = settings.layout.superposed_dir();
        std::fs::create_dir_all(&dir)?;
        for (pair, structure) in &report.superposed {
            let path = dir.join(format!("{}_on_{}.pdb", pair.mobile, pair.target));
            let mut writer = BufWriter::new(File::create(&path)?);
            pdb::write_structure(structure, &mut writer, true)?;
        }
        println!(
            "✓ {} superposed structure(s) written to {}",
            report.superposed.len(),
            dir.display()
        );
    }

    println!(
        "✓ Run complete: {} succeeded, {} failed ({} structures, {} pairwise results)",
        report.succeeded(),
        report.failed(),
        report.sasa.len(),
        report.results.len()
    );
    for failure in &report.failures {
        println!("  ✗ {}: {}", failure.label, failure.reason);
    }
    println!("Tables written to {}", settings.layout.tables_dir().display());

    Ok(())
}
