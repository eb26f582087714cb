use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Dense row-major matrix backed by a flat `Vec<f64>`.
///
/// Shapes are small enough here (largest: input_dim × first backbone width)
/// that naive loops are fine; there is no SIMD or blocking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(data.len(), rows * cols, "data length must equal rows * cols");
        Matrix { rows, cols, data }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    #[inline]
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] += value;
    }

    /// Flat view of the underlying storage, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // Draw uniforms in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: N(0, sqrt(2 / fan_in)), for ReLU layers.
    ///
    /// Shape convention throughout the crate: weights are (input_size, size),
    /// so `rows` is the fan-in.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let std_dev = (2.0 / rows as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(&mut rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / fan_in)), for
    /// Sigmoid/Identity/Softmax layers.
    pub fn xavier(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let std_dev = (1.0 / rows as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(&mut rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    /// `x * self` for a row vector `x` of length `rows`; returns length `cols`.
    ///
    /// This is the forward-pass workhorse: z = xW (+ b added by the layer).
    pub fn vec_mul(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.rows, "input length must equal matrix rows");
        let mut out = vec![0.0; self.cols];
        for (i, &xi) in x.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for (o, &w) in out.iter_mut().zip(row.iter()) {
                *o += xi * w;
            }
        }
        out
    }

    /// `self^T * d` for a column vector `d` of length `cols`; returns length `rows`.
    ///
    /// Backward-pass workhorse: propagates a layer delta to the previous layer.
    pub fn vec_mul_transposed(&self, d: &[f64]) -> Vec<f64> {
        assert_eq!(d.len(), self.cols, "delta length must equal matrix cols");
        let mut out = vec![0.0; self.rows];
        for (i, o) in out.iter_mut().enumerate() {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            *o = row.iter().zip(d.iter()).map(|(w, dj)| w * dj).sum();
        }
        out
    }

    /// `self += other * scale`, element-wise. Shapes must match.
    pub fn add_scaled(&mut self, other: &Matrix, scale: f64) {
        assert_eq!(self.rows, other.rows, "row mismatch");
        assert_eq!(self.cols, other.cols, "col mismatch");
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b * scale;
        }
    }

    /// Accumulates the outer product `input^T * delta` into `self`.
    ///
    /// Used for weight-gradient accumulation over a mini-batch without
    /// allocating a gradient matrix per sample.
    pub fn add_outer(&mut self, input: &[f64], delta: &[f64]) {
        assert_eq!(input.len(), self.rows, "input length must equal rows");
        assert_eq!(delta.len(), self.cols, "delta length must equal cols");
        for (i, &xi) in input.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let row = &mut self.data[i * self.cols..(i + 1) * self.cols];
            for (w, &dj) in row.iter_mut().zip(delta.iter()) {
                *w += xi * dj;
            }
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_mul_matches_hand_computation() {
        // W = [[1, 2], [3, 4], [5, 6]], x = [1, 0, 2]
        let w = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let z = w.vec_mul(&[1.0, 0.0, 2.0]);
        assert_eq!(z, vec![11.0, 14.0]);
    }

    #[test]
    fn vec_mul_transposed_matches_hand_computation() {
        let w = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let d = w.vec_mul_transposed(&[1.0, -1.0]);
        assert_eq!(d, vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn add_outer_accumulates() {
        let mut g = Matrix::zeros(2, 2);
        g.add_outer(&[1.0, 2.0], &[3.0, 4.0]);
        g.add_outer(&[1.0, 0.0], &[1.0, 1.0]);
        assert_eq!(g.as_slice(), &[4.0, 5.0, 6.0, 8.0]);
    }

    #[test]
    fn he_init_has_plausible_scale() {
        let w = Matrix::he(1000, 4);
        let mean: f64 = w.as_slice().iter().sum::<f64>() / 4000.0;
        let var: f64 = w.as_slice().iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 4000.0;
        // Expected variance 2/1000 = 0.002; allow generous slack.
        assert!(mean.abs() < 0.01, "mean {mean} too far from 0");
        assert!((0.001..0.004).contains(&var), "variance {var} implausible");
    }
}
