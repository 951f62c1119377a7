//! Seedable 2D simplex noise.
//!
//! A [`NoiseField`] is built once from a random source and is a pure function
//! of `(x, y)` afterwards: the same instance always returns the same value for
//! the same coordinates, output stays within `[-1, 1]`, and nearby coordinates
//! give nearby values. Two fields built from different random sources describe
//! different landscapes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Skew factor into the simplex grid: (√3 − 1) / 2.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskew factor back to input space: (3 − √3) / 6.
const G2: f64 = 0.211_324_865_405_187_1;

/// Scales the summed corner contributions into `[-1, 1]`.
const NORMALIZE: f64 = 70.0;

/// Classic 12-direction gradient set (edges of a cube, projected to 2D).
const GRAD2: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Anything that yields a scalar at a 2D coordinate.
///
/// [`NoiseField`] is the production implementation. Closures implement it too,
/// which lets callers feed a window with synthetic values.
pub trait ScalarField {
    /// Value of the field at `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Immutable simplex noise field.
#[derive(Clone)]
pub struct NoiseField {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl NoiseField {
    /// Build a field from a `rand` generator.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_uniform(|| rng.random::<f64>())
    }

    /// Build a field from a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Build a field from any source of uniform values in `[0, 1)`.
    ///
    /// The source is drawn exactly 255 times (one Fisher–Yates pass over
    /// `0..=255`). Values outside `[0, 1)` are clamped into range.
    pub fn from_uniform<F: FnMut() -> f64>(mut next: F) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..table.len()).rev() {
            // `as usize` saturates negatives and NaN to 0.
            let j = ((next() * (i + 1) as f64) as usize).min(i);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }
        Self { perm, perm_mod12 }
    }

    /// Evaluate the field at `(x, y)`. Result is in `[-1, 1]`.
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        // Skew input space to find the containing simplex cell.
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Lower or upper triangle of the rhombus.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = wrap(i);
        let jj = wrap(j);
        let g0 = self.gradient(ii, jj);
        let g1 = self.gradient(ii + i1, jj + j1);
        let g2 = self.gradient(ii + 1, jj + 1);

        NORMALIZE * (corner(g0, x0, y0) + corner(g1, x1, y1) + corner(g2, x2, y2))
    }

    fn gradient(&self, i: usize, j: usize) -> usize {
        // i, j <= 256 and perm[..] <= 255, so the index stays below 512.
        self.perm_mod12[i + self.perm[j] as usize] as usize
    }
}

impl ScalarField for NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise_2d(x, y)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("perm_head", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

/// Lattice coordinate → table index, with Euclidean modulo for negatives.
fn wrap(v: f64) -> usize {
    (v as i64).rem_euclid(256) as usize
}

/// Falloff kernel `(0.5 − d²)⁴ · dot(g, offset)`, zero outside radius².
fn corner(g: usize, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let (gx, gy) = GRAD2[g];
    t2 * t2 * (gx * x + gy * y)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_instance_same_point_same_value() {
        let field = NoiseField::seeded(7);
        for &(x, y) in &[(0.0, 0.0), (1.5, -2.25), (-100.3, 42.0), (12345.6, 0.0)] {
            assert_eq!(field.noise_2d(x, y), field.noise_2d(x, y));
        }
    }

    #[test]
    fn output_is_bounded() {
        let field = NoiseField::seeded(99);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let x = rng.random_range(-1000.0..1000.0);
            let y = rng.random_range(-1000.0..1000.0);
            let v = field.noise_2d(x, y);
            assert!((-1.0..=1.0).contains(&v), "noise({x}, {y}) = {v}");
        }
    }

    #[test]
    fn output_is_continuous() {
        let field = NoiseField::seeded(3);
        let mut x = -50.0;
        while x < 50.0 {
            let a = field.noise_2d(x, 0.3);
            let b = field.noise_2d(x + 1e-5, 0.3);
            assert!((a - b).abs() < 1e-2, "jump at x={x}: {a} -> {b}");
            x += 0.37;
        }
    }

    #[test]
    fn negative_coordinates_are_finite_and_vary() {
        let field = NoiseField::seeded(11);
        let values: Vec<f64> = (0..64).map(|i| field.noise_2d(-(i as f64) * 0.7, -3.1)).collect();
        assert!(values.iter().all(|v| v.is_finite()));
        let distinct = values.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(distinct > 32);
    }

    #[test]
    fn different_seeds_give_different_fields() {
        let a = NoiseField::seeded(1);
        let b = NoiseField::seeded(2);
        let differs = (0..32).any(|i| {
            let x = i as f64 * 0.5 + 0.1;
            a.noise_2d(x, 0.0) != b.noise_2d(x, 0.0)
        });
        assert!(differs);
    }

    #[test]
    fn same_seed_rebuilds_same_field() {
        let a = NoiseField::seeded(5);
        let b = NoiseField::seeded(5);
        assert_eq!(a.noise_2d(3.3, 4.4), b.noise_2d(3.3, 4.4));
    }

    #[test]
    fn permutation_is_a_permutation() {
        let field = NoiseField::seeded(42);
        let mut seen = [false; 256];
        for &p in &field.perm[..256] {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(field.perm[..256], field.perm[256..]);
    }

    #[test]
    fn from_uniform_tolerates_out_of_range_source() {
        let mut n = 0u32;
        let field = NoiseField::from_uniform(|| {
            n += 1;
            match n % 3 {
                0 => -0.5,
                1 => 1.5,
                _ => f64::NAN,
            }
        });
        assert!(field.noise_2d(0.5, 0.5).is_finite());
    }

    #[test]
    fn wrap_uses_euclidean_modulo() {
        assert_eq!(wrap(-1.0), 255);
        assert_eq!(wrap(-256.0), 0);
        assert_eq!(wrap(257.0), 1);
    }

    #[test]
    fn closures_are_scalar_fields() {
        let f = |x: f64, y: f64| x + y;
        assert_eq!(f.sample(1.0, 2.0), 3.0);
    }
}
