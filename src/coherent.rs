//! Coherent 2D gradient noise keyed by the seeded stream.
//!
//! The permutation table is drawn from [`SeededRng`], so the noise field is a
//! pure function of the map seed. The island stages take any
//! [`noise::NoiseFn`] and layer it with [`fbm`].

use noise::NoiseFn;

use crate::random::SeededRng;

const TABLE_SIZE: usize = 256;

/// Gradient noise over a shuffled permutation table.
#[derive(Clone, Debug)]
pub struct CoherentNoise {
    /// `[0..255]` shuffled, then repeated once so corner hashing never wraps.
    permutation: Vec<usize>,
}

impl CoherentNoise {
    pub fn new(rng: &mut SeededRng) -> Self {
        let mut table: Vec<usize> = (0..TABLE_SIZE).collect();
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.int_range(0, i as i64) as usize;
            table.swap(i, j);
        }

        let mut permutation = Vec::with_capacity(TABLE_SIZE * 2);
        permutation.extend_from_slice(&table);
        permutation.extend_from_slice(&table);
        Self { permutation }
    }

    /// Single-octave noise, roughly in `[-1, 1]`.
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let p = &self.permutation;
        let a = p[xi] + yi;
        let b = p[xi + 1] + yi;

        lerp(
            v,
            lerp(u, grad(p[a], x, y), grad(p[b], x - 1.0, y)),
            lerp(u, grad(p[a + 1], x, y - 1.0), grad(p[b + 1], x - 1.0, y - 1.0)),
        )
    }

    /// [`fbm`] over this noise.
    pub fn octave_noise_2d(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        scale: f64,
    ) -> f64 {
        fbm(self, x, y, octaves, persistence, scale)
    }
}

impl NoiseFn<f64, 2> for CoherentNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise_2d(point[0], point[1])
    }
}

/// Fractal sum of `octaves` layers of `source` starting at frequency `scale`,
/// doubling frequency and multiplying amplitude by `persistence` each layer.
/// Normalized by the total amplitude so the result stays in `[-1, 1]`.
pub fn fbm<N: NoiseFn<f64, 2>>(
    source: &N,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    scale: f64,
) -> f64 {
    let mut total = 0.0;
    let mut frequency = scale;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += source.get([x * frequency, y * frequency]) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
