//! Two-component PCA by power iteration on the centered data.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use paperlens_core::config::ProjectionSettings;

use crate::tfidf::TfidfMatrix;

const CONVERGENCE_EPS: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct PcaReducer {
    seed: u64,
    max_iterations: usize,
}

impl Default for PcaReducer {
    fn default() -> Self {
        Self::from_settings(&ProjectionSettings::default())
    }
}

impl PcaReducer {
    pub fn from_settings(settings: &ProjectionSettings) -> Self {
        Self { seed: settings.seed, max_iterations: settings.max_iterations.max(1) }
    }

    /// Row-aligned (x, y) coordinates. `None` with fewer than 2 rows or no columns.
    pub fn reduce_to_2d(&self, matrix: &TfidfMatrix) -> Option<Vec<(f64, f64)>> {
        self.project(matrix.values.view())
    }

    pub fn project(&self, data: ArrayView2<'_, f64>) -> Option<Vec<(f64, f64)>> {
        let (n, d) = data.dim();
        if n < 2 || d == 0 {
            return None;
        }
        let mean = data.mean_axis(Axis(0))?;
        let centered: Array2<f64> = &data - &mean;

        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let first = self.principal_axis(&centered, None, &mut rng);
        let second = self.principal_axis(&centered, Some(&first), &mut rng);

        let xs = centered.dot(&first);
        let ys = centered.dot(&second);
        Some(xs.iter().copied().zip(ys.iter().copied()).collect())
    }

    /// Dominant eigenvector of `XᵀX`, kept orthogonal to `orth` when given.
    /// Sign is fixed so the largest-magnitude loading is positive.
    fn principal_axis(&self, x: &Array2<f64>, orth: Option<&Array1<f64>>, rng: &mut Xoshiro256Plus) -> Array1<f64> {
        let d = x.ncols();
        let mut v = Array1::from_shape_fn(d, |_| rng.gen_range(-1.0..1.0));
        remove_component(&mut v, orth);
        normalize(&mut v);

        for _ in 0..self.max_iterations {
            let mut next = x.t().dot(&x.dot(&v));
            remove_component(&mut next, orth);
            if !normalize(&mut next) {
                break;
            }
            let delta: f64 = (&next - &v).mapv(f64::abs).sum();
            v = next;
            if delta < CONVERGENCE_EPS {
                break;
            }
        }

        let pivot = v
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0f64), |best, (i, w)| if w.abs() > best.1.abs() { (i, w) } else { best });
        if pivot.1 < 0.0 {
            v.mapv_inplace(|w| -w);
        }
        v
    }
}

fn remove_component(v: &mut Array1<f64>, axis: Option<&Array1<f64>>) {
    if let Some(axis) = axis {
        let overlap = v.dot(axis);
        v.scaled_add(-overlap, axis);
    }
}

/// Scale to unit length. False when the vector is numerically zero.
fn normalize(v: &mut Array1<f64>) -> bool {
    let norm = v.dot(v).sqrt();
    if norm < 1e-12 {
        return false;
    }
    *v /= norm;
    true
}
