use nalgebra::{Matrix4, Point3};

/// Separator used when a [`PairKey`] is flattened into a single table label.
pub const PAIR_LABEL_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,      // Residue name from the source file (e.g., "ALA")
    pub seq: isize,        // Residue sequence number from the source file
    pub chain_id: char,    // Parent chain identifier
    pub ca: Point3<f64>,   // Representative backbone atom (CA) position
}

/// An immutable structure reduced to one representative backbone atom per
/// residue. Residue order follows the source file and is stable across
/// reloads; heteroatoms and alternate conformers are excluded at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub id: String,
    residues: Vec<Residue>,
}

impl Structure {
    pub fn new(id: impl Into<String>, residues: Vec<Residue>) -> Self {
        Self {
            id: id.into(),
            residues,
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.residues.iter().map(|r| &r.ca)
    }

    /// Rebuilds this structure with the given coordinates, keeping residue
    /// identities. Panics if the coordinate count differs (callers map over
    /// the existing coordinates, so the lengths always agree).
    pub(crate) fn with_coords(&self, coords: Vec<Point3<f64>>) -> Self {
        assert_eq!(coords.len(), self.residues.len());
        let residues = self
            .residues
            .iter()
            .zip(coords)
            .map(|(r, ca)| Residue { ca, ..r.clone() })
            .collect();
        Self {
            id: self.id.clone(),
            residues,
        }
    }
}

/// Ordered identifier of the two structures in a pairwise comparison.
///
/// The order matters: the similarity score is normalized by one structure's
/// length and the transform maps mobile coordinates onto the target, so
/// `(a, b)` and `(b, a)` are distinct keys with distinct results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub mobile: String,
    pub target: String,
}

impl PairKey {
    pub fn new(mobile: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            target: target.into(),
        }
    }

    /// Composite table label, e.g. `idA|idB`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.mobile, PAIR_LABEL_SEPARATOR, self.target)
    }

    /// Recovers a key from its composite label. Returns `None` if the
    /// separator is missing or either side is empty.
    pub fn from_label(label: &str) -> Option<Self> {
        let (mobile, target) = label.split_once(PAIR_LABEL_SEPARATOR)?;
        if mobile.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self::new(mobile, target))
    }
}

/// The three verbatim lines of an alignment block: mobile sequence, match
/// markers, target sequence. All three have equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentTriple {
    pub mobile: String,
    pub markers: String,
    pub target: String,
}

/// Everything extracted from one alignment-tool invocation. Any of the
/// payload fields may be absent depending on the tool's mode and output.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub pair: PairKey,
    pub rmsd: Option<f64>,                  // Root-mean-square deviation, >= 0
    pub tm_score: Option<f64>,              // Length-normalized score in [0, 1]
    pub transform: Option<Matrix4<f64>>,    // Homogeneous mobile-onto-target transform
    pub alignment: Option<AlignmentTriple>, // Residue-level alignment block
}

/// Solvent-accessible surface area of a single structure, independent of
/// every pairwise result.
#[derive(Debug, Clone, PartialEq)]
pub struct SasaValue {
    pub id: String,
    pub area: f64, // Å², >= 0
}
