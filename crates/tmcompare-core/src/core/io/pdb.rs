use crate::core::models::structure::{Residue, Structure};
use nalgebra::Point3;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Structure '{id}' contains no usable backbone atoms")]
    NoAtoms { id: String },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("ATOM record is too short (needs at least 54 columns)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// Reads a structure down to the reduced atom set: one CA record per
/// residue, primary alternate location only (blank or 'A'), HETATM records
/// excluded. Residue order follows the file, so reloading the same file
/// always yields the same ordering.
pub fn read_structure(id: &str, reader: &mut impl BufRead) -> Result<Structure, PdbError> {
    let mut residues = Vec::new();
    let mut seen: HashSet<(char, isize)> = HashSet::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        let record_type = slice_and_trim(&line, 0, 6);
        if record_type == "END" || record_type == "ENDMDL" {
            break;
        }
        if record_type != "ATOM" {
            continue;
        }
        if line.len() < 54 {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let atom_name = slice_and_trim(&line, 12, 16);
        if atom_name != "CA" {
            continue;
        }
        let alt_loc = line.as_bytes()[16] as char;
        if alt_loc != ' ' && alt_loc != 'A' {
            continue;
        }

        let res_name = slice_and_trim(&line, 17, 20);
        let chain_id = line.as_bytes()[21] as char;
        let seq_str = slice_and_trim(&line, 22, 26);
        let seq: isize = seq_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: seq_str.into(),
            },
        })?;
        // Altloc 'A' duplicates a blank-altloc residue in malformed files;
        // first record wins either way.
        if !seen.insert((chain_id, seq)) {
            continue;
        }

        let mut coords = [0.0f64; 3];
        for (i, (start, end)) in [(30, 38), (38, 46), (46, 54)].into_iter().enumerate() {
            let field = slice_and_trim(&line, start, end);
            coords[i] = field.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidFloat {
                    columns: format!("{}-{}", start + 1, end),
                    value: field.into(),
                },
            })?;
        }

        residues.push(Residue {
            name: res_name.to_string(),
            seq,
            chain_id,
            ca: Point3::new(coords[0], coords[1], coords[2]),
        });
    }

    if residues.is_empty() {
        return Err(PdbError::NoAtoms { id: id.to_string() });
    }
    Ok(Structure::new(id, residues))
}

/// Writes the reduced atom set as minimal well-formed ATOM records.
///
/// When `emit_chain_breaks` is false, TER records are stripped entirely:
/// some alignment tools stop reading at the first chain terminator, so the
/// adapter serializes multi-chain structures as one continuous chain of
/// records.
pub fn write_structure(
    structure: &Structure,
    writer: &mut impl Write,
    emit_chain_breaks: bool,
) -> io::Result<()> {
    let mut previous_chain: Option<char> = None;

    for (i, residue) in structure.residues().iter().enumerate() {
        if emit_chain_breaks
            && let Some(prev) = previous_chain
            && prev != residue.chain_id
        {
            writeln!(writer, "TER")?;
        }
        previous_chain = Some(residue.chain_id);

        writeln!(
            writer,
            "ATOM  {:>5}  CA  {:<3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C",
            i + 1,
            residue.name,
            residue.chain_id,
            residue.seq,
            residue.ca.x,
            residue.ca.y,
            residue.ca.z,
        )?;
    }

    if emit_chain_breaks {
        writeln!(writer, "TER")?;
    }
    writeln!(writer, "END")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
HEADER    OXYGEN TRANSPORT
ATOM      1  N   VAL A   1      -5.000   2.000   1.000  1.00  0.00           N
ATOM      2  CA  VAL A   1      -4.000   2.500   1.200  1.00  0.00           C
ATOM      3  CA BLEU A   2       0.100   0.200   0.300  1.00  0.00           C
ATOM      4  CA ALEU A   2      -1.200   3.100   0.900  1.00  0.00           C
ATOM      5  CA  GLY B   3       2.000  -1.000   4.500  1.00  0.00           C
HETATM    6  CA  HOH A  99       9.000   9.000   9.000  1.00  0.00           C
END
";

    fn read_sample() -> Structure {
        read_structure("sample", &mut Cursor::new(SAMPLE)).unwrap()
    }

    #[test]
    fn reader_keeps_one_ca_per_residue() {
        let s = read_sample();
        assert_eq!(s.len(), 3);
        assert_eq!(s.residues()[0].name, "VAL");
        assert_eq!(s.residues()[1].name, "LEU");
        assert_eq!(s.residues()[2].name, "GLY");
    }

    #[test]
    fn reader_skips_non_primary_altloc() {
        let s = read_sample();
        // Altloc 'B' at residue 2 is skipped; the 'A' conformer is kept.
        assert!((s.residues()[1].ca.x - (-1.2)).abs() < 1e-9);
    }

    #[test]
    fn reader_excludes_heteroatoms() {
        let s = read_sample();
        assert!(s.residues().iter().all(|r| r.name != "HOH"));
    }

    #[test]
    fn reader_preserves_residue_order() {
        let s = read_sample();
        let seqs: Vec<isize> = s.residues().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn reader_is_stable_across_reloads() {
        assert_eq!(read_sample(), read_sample());
    }

    #[test]
    fn reader_rejects_structure_without_ca_atoms() {
        let text = "ATOM      1  N   VAL A   1      -5.000   2.000   1.000  1.00  0.00\nEND\n";
        let result = read_structure("bare", &mut Cursor::new(text));
        assert!(matches!(result, Err(PdbError::NoAtoms { .. })));
    }

    #[test]
    fn reader_reports_invalid_coordinate() {
        let text =
            "ATOM      1  CA  VAL A   1      xxxxxxxx   2.000   1.000  1.00  0.00           C\n";
        let result = read_structure("bad", &mut Cursor::new(text));
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidFloat { .. }
            })
        ));
    }

    #[test]
    fn write_read_round_trip_preserves_reduced_set() {
        let original = read_sample();
        let mut buf = Vec::new();
        write_structure(&original, &mut buf, true).unwrap();
        let reloaded =
            read_structure("sample", &mut Cursor::new(String::from_utf8(buf).unwrap())).unwrap();
        assert_eq!(reloaded.len(), original.len());
        for (a, b) in original.coords().zip(reloaded.coords()) {
            assert!((a - b).norm() < 1e-3);
        }
    }

    #[test]
    fn writer_strips_chain_breaks_when_disabled() {
        let s = read_sample();
        let mut buf = Vec::new();
        write_structure(&s, &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("TER"));
    }

    #[test]
    fn writer_emits_chain_breaks_between_chains_when_enabled() {
        let s = read_sample();
        let mut buf = Vec::new();
        write_structure(&s, &mut buf, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // One TER between chains A and B, one trailing.
        assert_eq!(text.matches("TER").count(), 2);
    }
}
