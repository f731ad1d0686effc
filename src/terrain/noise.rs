//! Hash-lattice value noise
//!
//! Terrain heights must be reproducible bit-for-bit across runs and across
//! peers: evicted chunks are re-derived from the seed, and snapshot data can
//! be verified against local generation. Everything here is integer hashing
//! and f32 arithmetic with no process state.

/// Deterministic hash of a 2D lattice point and seed, mapped into [0, 1)
pub fn hash01(x: i32, y: i32, seed: i32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1)
        ^ (y as u32).wrapping_mul(0x85EB_CA77)
        ^ (seed as u32).wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2545_F491);
    h ^= h >> 13;
    // Top 24 bits give an exactly representable f32 in [0, 1)
    (h >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Smoothstep interpolation factor: 3t^2 - 2t^3
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear value noise: corner values hashed at lattice scale `cell`,
/// smoothstep-interpolated along both axes
pub fn value_noise(x: i32, z: i32, cell: i32, seed: i32) -> f32 {
    let lx = x.div_euclid(cell);
    let lz = z.div_euclid(cell);
    let fx = x.rem_euclid(cell) as f32 / cell as f32;
    let fz = z.rem_euclid(cell) as f32 / cell as f32;

    let c00 = hash01(lx, lz, seed);
    let c10 = hash01(lx + 1, lz, seed);
    let c01 = hash01(lx, lz + 1, seed);
    let c11 = hash01(lx + 1, lz + 1, seed);

    let tx = smoothstep(fx);
    let tz = smoothstep(fz);

    let bottom = c00 + (c10 - c00) * tx;
    let top = c01 + (c11 - c01) * tx;
    bottom + (top - bottom) * tz
}

/// Lattice cell sizes of the three octaves
pub const OCTAVE_CELLS: [i32; 3] = [64, 24, 12];

/// Blend weights of the three octaves
pub const OCTAVE_WEIGHTS: [f32; 3] = [1.0, 0.5, 0.25];

/// Weighted three-octave blend, normalized back into [0, 1)
pub fn blended_noise(x: i32, z: i32, seed: i32) -> f32 {
    let mut sum = 0.0;
    let mut weight_sum = 0.0;
    for (cell, weight) in OCTAVE_CELLS.iter().zip(OCTAVE_WEIGHTS) {
        sum += value_noise(x, z, *cell, seed) * weight;
        weight_sum += weight;
    }
    sum / weight_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash01_deterministic() {
        for (x, y, seed) in [(0, 0, 0), (13, -7, 42), (-1000, 1000, -1)] {
            assert_eq!(hash01(x, y, seed), hash01(x, y, seed));
        }
    }

    #[test]
    fn test_hash01_range() {
        for i in -500..500 {
            let v = hash01(i, i * 3 - 7, 1234);
            assert!((0.0..1.0).contains(&v), "hash01 out of range: {}", v);
        }
    }

    #[test]
    fn test_hash01_varies_with_inputs() {
        let base = hash01(10, 20, 30);
        assert_ne!(base, hash01(11, 20, 30));
        assert_ne!(base, hash01(10, 21, 30));
        assert_ne!(base, hash01(10, 20, 31));
    }

    #[test]
    fn test_value_noise_matches_lattice_at_corners() {
        // On a lattice point the interpolation weights are zero, so the
        // noise equals the corner hash exactly.
        for (lx, lz) in [(0, 0), (3, -2), (-5, 7)] {
            let expected = hash01(lx, lz, 99);
            assert_eq!(value_noise(lx * 16, lz * 16, 16, 99), expected);
        }
    }

    #[test]
    fn test_value_noise_range_and_determinism() {
        for x in (-300..300).step_by(7) {
            for z in (-300..300).step_by(11) {
                let v = value_noise(x, z, 24, 5);
                assert!((0.0..1.0).contains(&v));
                assert_eq!(v, value_noise(x, z, 24, 5));
            }
        }
    }

    #[test]
    fn test_blended_noise_normalized() {
        for x in (-200..200).step_by(13) {
            for z in (-200..200).step_by(17) {
                let v = blended_noise(x, z, 7);
                assert!((0.0..1.0).contains(&v), "blend out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_blended_noise_continuity() {
        // Neighboring samples should not jump by more than a small step;
        // the coarsest octave dominates and spans 64 blocks per cell.
        let mut prev = blended_noise(0, 50, 3);
        for x in 1..200 {
            let cur = blended_noise(x, 50, 3);
            assert!(
                (cur - prev).abs() < 0.25,
                "discontinuity at x={}: {} -> {}",
                x,
                prev,
                cur
            );
            prev = cur;
        }
    }
}
