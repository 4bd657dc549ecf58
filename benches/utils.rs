#![allow(dead_code)]

use rand::Rng;

/// GEMM FLOP count (multiply-add = 2 ops).
pub fn gemm_flops(m: usize, n: usize, k: usize) -> u64 {
    2 * m as u64 * n as u64 * k as u64
}

/// Random f32 vector in [-1.0, 1.0).
pub fn random_f32_vec(len: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Random packed code vector.
pub fn random_code_vec(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}
