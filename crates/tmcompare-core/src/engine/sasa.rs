use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use nalgebra::{Point3, Vector3};

/// Water probe radius in Å.
const DEFAULT_PROBE_RADIUS: f64 = 1.4;
/// Effective radius of a reduced-set CA pseudo-atom in Å. Larger than a
/// bare carbon van der Waals radius because each CA stands in for a whole
/// residue.
const DEFAULT_ATOM_RADIUS: f64 = 1.9;
const DEFAULT_SAMPLES: usize = 480;

/// Computes a scalar solvent-accessible surface area for a structure under
/// a fixed solvent-probe configuration. Values for different structures
/// are fully independent.
pub trait SasaComputer {
    fn total_area(&self, structure: &Structure) -> Result<f64, EngineError>;
}

/// Shrake-Rupley style sampler over the reduced atom set: each pseudo-atom
/// is covered with a Fibonacci sphere of sample points at the solvated
/// radius, and the exposed fraction scales the sphere's area.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrakeRupley {
    pub probe_radius: f64,
    pub atom_radius: f64,
    pub samples: usize,
}

impl Default for ShrakeRupley {
    fn default() -> Self {
        Self {
            probe_radius: DEFAULT_PROBE_RADIUS,
            atom_radius: DEFAULT_ATOM_RADIUS,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl SasaComputer for ShrakeRupley {
    fn total_area(&self, structure: &Structure) -> Result<f64, EngineError> {
        if structure.is_empty() {
            return Err(EngineError::EmptyStructure {
                id: structure.id.clone(),
            });
        }

        let coords: Vec<Point3<f64>> = structure.coords().copied().collect();
        let radius = self.atom_radius + self.probe_radius;
        let points = fibonacci_sphere(self.samples);

        // Neighbor prefilter keeps the per-sample occlusion test linear in
        // the local density instead of the structure size.
        let cutoff_sq = (2.0 * radius) * (2.0 * radius);
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); coords.len()];
        for i in 0..coords.len() {
            for j in (i + 1)..coords.len() {
                if (coords[i] - coords[j]).norm_squared() <= cutoff_sq {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }

        let sphere_area = 4.0 * std::f64::consts::PI * radius * radius;
        let mut total = 0.0;
        for (i, center) in coords.iter().enumerate() {
            let mut exposed = 0usize;
            for p in &points {
                let sample = center + p * radius;
                let occluded = neighbors[i]
                    .iter()
                    .any(|&n| (sample - coords[n]).norm_squared() < radius * radius);
                if !occluded {
                    exposed += 1;
                }
            }
            total += sphere_area * exposed as f64 / points.len() as f64;
        }
        Ok(total)
    }
}

/// Near-uniform unit-sphere sampling via the golden-angle spiral.
fn fibonacci_sphere(samples: usize) -> Vec<Vector3<f64>> {
    let samples = samples.max(1);
    let golden_angle = std::f64::consts::PI * (3.0 - (5.0_f64).sqrt());

    (0..samples)
        .map(|i| {
            let y = 1.0 - (2.0 * i as f64) / (samples.saturating_sub(1).max(1)) as f64;
            let ring_radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            Vector3::new(theta.cos() * ring_radius, y, theta.sin() * ring_radius)
        })
        .collect()
}
