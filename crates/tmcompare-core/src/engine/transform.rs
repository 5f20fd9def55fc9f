use crate::core::models::structure::Structure;
use nalgebra::Matrix4;

/// Applies a homogeneous rigid transform to every coordinate of a
/// structure, `p' = R·p + t`, returning a new structure. The input is
/// never mutated.
pub fn apply_transform(structure: &Structure, transform: &Matrix4<f64>) -> Structure {
    let coords = structure
        .coords()
        .map(|p| transform.transform_point(p))
        .collect();
    structure.with_coords(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::Residue;
    use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

    fn structure(points: &[[f64; 3]]) -> Structure {
        let residues = points
            .iter()
            .enumerate()
            .map(|(i, p)| Residue {
                name: "ALA".to_string(),
                seq: i as isize + 1,
                chain_id: 'A',
                ca: Point3::new(p[0], p[1], p[2]),
            })
            .collect();
        Structure::new("s", residues)
    }

    #[test]
    fn identity_transform_is_a_no_op() {
        let s = structure(&[[1.0, 2.0, 3.0], [-4.0, 0.5, 9.0]]);
        let moved = apply_transform(&s, &Matrix4::identity());
        assert_eq!(moved, s);
    }

    #[test]
    fn pure_translation_shifts_every_coordinate() {
        let s = structure(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let mut m = Matrix4::identity();
        m[(0, 3)] = 2.0;
        m[(1, 3)] = -3.0;
        m[(2, 3)] = 0.5;

        let moved = apply_transform(&s, &m);
        let p = moved.residues()[1].ca;
        assert!((p - Point3::new(3.0, -2.0, 1.5)).norm() < 1e-12);
    }

    #[test]
    fn input_structure_is_untouched() {
        let s = structure(&[[1.0, 0.0, 0.0]]);
        let before = s.clone();
        let mut m = Matrix4::identity();
        m[(0, 3)] = 100.0;
        let _ = apply_transform(&s, &m);
        assert_eq!(s, before);
    }

    #[test]
    fn transform_then_inverse_round_trips_within_tolerance() {
        let s = structure(&[[1.0, 2.0, 3.0], [-2.5, 4.0, 0.1], [7.0, -8.0, 2.2]]);

        let rotation =
            Rotation3::from_axis_angle(&Vector3::z_axis(), 1.1_f64).to_homogeneous();
        let mut m = rotation;
        m[(0, 3)] = 11.25;
        m[(1, 3)] = 3.5;
        m[(2, 3)] = -7.75;
        let inverse = m.try_inverse().unwrap();

        let round_tripped = apply_transform(&apply_transform(&s, &m), &inverse);
        for (a, b) in s.coords().zip(round_tripped.coords()) {
            assert!((a - b).norm() < 1e-6);
        }
    }
}
