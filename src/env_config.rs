//! Shared environment configuration for the analysis binaries.
//!
//! Consolidates the `RAYON_NUM_THREADS` and `ABSORBING_OUTPUT_DIR` reads
//! used by both binaries.

use std::path::PathBuf;

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8) and
/// build the rayon global thread pool. Tolerates an already-initialized
/// pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    num_threads
}

/// Read `ABSORBING_OUTPUT_DIR` (default `"outputs"`).
pub fn output_dir() -> PathBuf {
    PathBuf::from(std::env::var("ABSORBING_OUTPUT_DIR").unwrap_or_else(|_| "outputs".to_string()))
}
