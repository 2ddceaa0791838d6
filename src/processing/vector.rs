//! Sparse term vectors over a frozen vocabulary

use crate::error::{CareerMatcherError, Result};
use serde::{Deserialize, Serialize};

/// Sparse vector of non-negative term weights.
///
/// Entries are kept sorted by dimension with no duplicates and no zero weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from (dimension, weight) pairs. Repeated dimensions are summed.
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let mut entries: Vec<(usize, f32)> = weights.into_iter().collect();
        entries.sort_by_key(|&(dim, _)| dim);

        let mut merged: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        for (dim, weight) in entries {
            match merged.last_mut() {
                Some((last_dim, last_weight)) if *last_dim == dim => *last_weight += weight,
                _ => merged.push((dim, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight > 0.0);

        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero dimensions
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, dim: usize) -> f32 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn max_dimension(&self) -> Option<usize> {
        self.entries.last().map(|&(dim, _)| dim)
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Scale to unit L2 length. A zero vector has no direction and is rejected.
    pub fn normalized(&self) -> Result<SparseVector> {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(CareerMatcherError::DegenerateVector(format!(
                "cannot normalize a vector with norm {}",
                norm
            )));
        }

        Ok(Self {
            entries: self.entries.iter().map(|&(dim, w)| (dim, w / norm)).collect(),
        })
    }

    /// Dot product via a merge over both sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_weight) = self.entries[i];
            let (b_dim, b_weight) = other.entries[j];
            if a_dim == b_dim {
                sum += a_weight * b_weight;
                i += 1;
                j += 1;
            } else if a_dim < b_dim {
                i += 1;
            } else {
                j += 1;
            }
        }

        sum
    }

    /// Dense copy with `dims` slots; entries at or beyond `dims` are ignored
    pub fn to_dense(&self, dims: usize) -> Vec<f32> {
        let mut dense = vec![0.0; dims];
        for &(dim, weight) in &self.entries {
            if dim < dims {
                dense[dim] = weight;
            }
        }
        dense
    }

    /// Dot product against a dense vector
    pub fn dot_dense(&self, dense: &[f32]) -> f32 {
        self.entries
            .iter()
            .filter_map(|&(dim, weight)| dense.get(dim).map(|d| d * weight))
            .sum()
    }
}

/// Cosine similarity of two dense vectors; 0 when either has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot_product / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_weights_sorts_merges_and_drops_zeros() {
        let v = SparseVector::from_weights(vec![(3, 1.0), (1, 2.0), (3, 0.5), (2, 0.0)]);

        assert_eq!(v.entries(), &[(1, 2.0), (3, 1.5)]);
        assert_eq!(v.get(3), 1.5);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.max_dimension(), Some(3));
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let v = SparseVector::from_weights(vec![(0, 3.0), (4, 4.0)]);
        let unit = v.normalized().unwrap();

        assert_relative_eq!(unit.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(unit.get(0), 0.6, epsilon = 1e-6);
        assert_relative_eq!(unit.get(4), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        let result = SparseVector::zero().normalized();
        assert!(matches!(result, Err(CareerMatcherError::DegenerateVector(_))));
    }

    #[test]
    fn test_dot_products_agree() {
        let a = SparseVector::from_weights(vec![(0, 1.0), (2, 2.0), (5, 1.0)]);
        let b = SparseVector::from_weights(vec![(2, 3.0), (5, 4.0), (7, 9.0)]);

        assert_relative_eq!(a.dot(&b), 10.0);
        assert_relative_eq!(a.dot_dense(&b.to_dense(8)), 10.0);
        assert_eq!(a.dot(&SparseVector::zero()), 0.0);
    }

    #[test]
    fn test_cosine_similarity_guards_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    }
}
