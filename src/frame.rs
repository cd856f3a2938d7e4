use nalgebra::{Matrix3, Vector3};

/// Simulation cell: an origin plus three basis vectors (matrix columns) with
/// per-axis periodic boundary flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationCell {
    origin: Vector3<f64>,
    basis: Matrix3<f64>,
    periodic: [bool; 3],
}

impl SimulationCell {
    pub fn new(origin: Vector3<f64>, basis: Matrix3<f64>, periodic: [bool; 3]) -> Self {
        Self {
            origin,
            basis,
            periodic,
        }
    }

    /// Orthogonal box from per-axis bounds.
    pub fn from_bounds(
        xlo: f64,
        xhi: f64,
        ylo: f64,
        yhi: f64,
        zlo: f64,
        zhi: f64,
        periodic: [bool; 3],
    ) -> Self {
        Self {
            origin: Vector3::new(xlo, ylo, zlo),
            basis: Matrix3::from_diagonal(&Vector3::new(xhi - xlo, yhi - ylo, zhi - zlo)),
            periodic,
        }
    }

    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    pub fn extent(&self, axis: usize) -> f64 {
        self.basis.column(axis).norm()
    }

    pub fn volume(&self) -> f64 {
        self.basis.determinant().abs()
    }

    /// Minimum-image convention: remaps the vector along each periodic axis so
    /// its fractional coordinate falls within [-0.5, 0.5]. Non-periodic axes
    /// and degenerate cells are left untouched.
    pub fn wrap_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let Some(inverse) = self.basis.try_inverse() else {
            return *v;
        };
        let mut reduced = inverse * v;
        for axis in 0..3 {
            if self.periodic[axis] {
                reduced[axis] -= reduced[axis].round();
            }
        }
        self.basis * reduced
    }
}

/// One simulation snapshot as handed over by a frame-parsing collaborator.
/// The position sequence may be shorter than `atom_count` for partially
/// written frames; the property adapter zero-fills the gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub atom_count: usize,
    pub positions: Vec<Vector3<f64>>,
    pub cell: SimulationCell,
}

impl Frame {
    pub fn new(atom_count: usize, positions: Vec<Vector3<f64>>, cell: SimulationCell) -> Self {
        Self {
            atom_count,
            positions,
            cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_f64_near;

    #[test]
    fn test_from_bounds() {
        let cell = SimulationCell::from_bounds(-1.0, 4.0, 0.0, 10.0, 0.0, 2.0, [true, true, false]);
        assert_f64_near!(cell.extent(0), 5.0, 4);
        assert_f64_near!(cell.extent(1), 10.0, 4);
        assert_f64_near!(cell.extent(2), 2.0, 4);
        assert_f64_near!(cell.volume(), 100.0, 4);
        assert_f64_near!(cell.origin().x, -1.0, 4);
        assert!(cell.is_periodic(0));
        assert!(!cell.is_periodic(2));
    }

    #[test]
    fn test_wrap_vector_periodic() {
        let cell = SimulationCell::from_bounds(0.0, 10.0, 0.0, 10.0, 0.0, 10.0, [true, true, true]);
        let wrapped = cell.wrap_vector(&Vector3::new(9.0, -8.0, 3.0));
        assert_f64_near!(wrapped.x, -1.0, 4);
        assert_f64_near!(wrapped.y, 2.0, 4);
        assert_f64_near!(wrapped.z, 3.0, 4);
    }

    #[test]
    fn test_wrap_vector_non_periodic() {
        let cell = SimulationCell::from_bounds(0.0, 10.0, 0.0, 10.0, 0.0, 10.0, [false, false, false]);
        let v = Vector3::new(9.0, -8.0, 3.0);
        assert_eq!(cell.wrap_vector(&v), v);
    }
}
