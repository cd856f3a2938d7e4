use nalgebra::{Quaternion, Vector3};
use std::slice;

/// Fixed-length per-atom buffer. The length is set at construction, always
/// equals the frame's atom count, and never changes afterwards; index `i`
/// refers to the same atom across every buffer derived from one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PerAtomProperty<T> {
    values: Vec<T>,
}

impl<T: Clone> PerAtomProperty<T> {
    pub fn filled(atom_count: usize, value: T) -> Self {
        Self {
            values: vec![value; atom_count],
        }
    }
}

impl<T> PerAtomProperty<T> {
    pub fn from_values(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, atom_i: usize) -> &T {
        &self.values[atom_i]
    }

    pub fn set(&mut self, atom_i: usize, value: T) {
        self.values[atom_i] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.clone()
    }
}

/// Scalar int property (structure types, grain ids).
pub type IntProperty = PerAtomProperty<i32>;

/// Scalar int64 property (template correspondence codes).
pub type Int64Property = PerAtomProperty<i64>;

/// 3-vector double property (positions).
pub type VectorProperty = PerAtomProperty<Vector3<f64>>;

/// 4-vector double property (orientation quaternions, x/y/z/w order).
pub type QuaternionProperty = PerAtomProperty<Quaternion<f64>>;
