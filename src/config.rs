//! Compile-time sizing knobs for the runtime.
//!
//! These mirror the C core's `#define`-style configuration macros. They stay
//! plain `const`s rather than environment/file-driven settings: the engine's
//! queue and descriptor arrays are sized from them at construction time, and
//! changing them is a rebuild, not a runtime reconfiguration.

/// Fixed worker-pool size for the multi-threaded backend. `0` would disable
/// the pool; this crate models that case as the `port-single` feature
/// instead of a runtime value, since the backend choice is compile-time.
pub const NUM_WORKERS: usize = 4;

pub const LOG_BUFFER_SIZE: usize = 64;

pub const MAX_OP_INPUTS: usize = 4;
pub const MAX_OP_OUTPUTS: usize = 2;
pub const MAX_OPS: usize = 64;
pub const MAX_LAYERS: usize = 32;
pub const MAX_OPS_PER_LAYER: usize = 16;

/// Runtime-inspectable snapshot of the knobs above. Exists so tests and the
/// demo binary can assert on the resolved configuration in one place; it is
/// never loaded from a file or environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub num_workers: usize,
    pub log_buffer_size: usize,
    pub max_op_inputs: usize,
    pub max_op_outputs: usize,
    pub max_ops: usize,
    pub max_layers: usize,
    pub max_ops_per_layer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_workers: NUM_WORKERS,
            log_buffer_size: LOG_BUFFER_SIZE,
            max_op_inputs: MAX_OP_INPUTS,
            max_op_outputs: MAX_OP_OUTPUTS,
            max_ops: MAX_OPS,
            max_layers: MAX_LAYERS,
            max_ops_per_layer: MAX_OPS_PER_LAYER,
        }
    }
}
