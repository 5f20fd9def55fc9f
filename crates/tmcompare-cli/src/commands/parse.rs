use crate::cli::ParseArgs;
use crate::error::Result;
use tmcompare::engine::error::EngineError;
use tmcompare::engine::parser;

/// Debug aid: parses a captured tool-output file and prints what the
/// pipeline would extract from it. Useful when pointing tmcompare at a
/// new alignment-tool version.
pub fn run(args: ParseArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)?;
    let parsed = parser::parse_output(&text).map_err(EngineError::from)?;

    match parsed.tm_score {
        Some(score) => println!("TM-score:  {score}"),
        None => println!("TM-score:  (absent)"),
    }
    match parsed.rmsd {
        Some(rmsd) => println!("RMSD:      {rmsd}"),
        None => println!("RMSD:      (absent)"),
    }

    match parsed.transform {
        Some(m) => {
            println!("Transform:");
            for row in 0..4 {
                println!(
                    "  {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                    m[(row, 0)],
                    m[(row, 1)],
                    m[(row, 2)],
                    m[(row, 3)]
                );
            }
        }
        None => println!("Transform: (absent)"),
    }

    match parsed.alignment {
        Some(triple) => {
            println!("Alignment:");
            println!("  {}", triple.mobile);
            println!("  {}", triple.markers);
            println!("  {}", triple.target);
        }
        None => println!("Alignment: (absent)"),
    }

    Ok(())
}
