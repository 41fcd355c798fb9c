//! Small test-support helpers. The core pipeline has no I/O of its own (§5, §6): reading golden
//! vectors or street-network data from disk is left to the caller.

/// The `trace_init` function installs a `tracing` subscriber reading `RUST_LOG`, for use at the top
/// of integration tests. Safe to call more than once; subsequent calls are no-ops.
#[cfg(test)]
pub fn trace_init() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
