#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
// Unsafe code is isolated to `port`, `context`, and `engine`, each documented
// with a safety justification at the point of use.

//! # AOT BSP Runtime
//!
//! A minimal ahead-of-time inference runtime for a compiled dataflow graph of
//! scalar/tensor operators. A compiler front end is expected to produce a
//! [`descriptor::Descriptor`] (tensor map, operator table, layered schedule,
//! per-backend function tables); this crate resolves it against a workspace
//! and runs it to completion with a bulk-synchronous-parallel scheduler.
//!
//! ## Key components
//!
//! - **Port**: OS-abstraction primitives (mutex, condvar, barrier, thread)
//!   behind a compile-time-selected backend, `port-posix` or `port-single`.
//! - **Descriptor**: the compiler-produced contract — tensor map, operator
//!   table, schedule, function tables — validated once at startup.
//! - **Semantic**: resolves SIDs against the tensor map and binds operator
//!   descriptors to executable entries for one inference call.
//! - **Engine**: the BSP scheduler — a process-wide worker pool, a bounded
//!   per-layer queue, and a re-armable barrier between layers.
//! - **Log**: a zero-allocation fixed-capacity ring buffer recording each
//!   operator's return code, distinct from the ambient `tracing` output.
//!
//! ## Example
//!
//! ```rust
//! use aot_bsp_runtime::prelude::*;
//!
//! let descriptor = demo_model::diamond_descriptor();
//! let const_workspace = demo_model::diamond_const_workspace();
//! let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
//! let inputs = [10.0f32];
//! let mut outputs = [0.0f32];
//!
//! let mut ctx = semantic::init_context(
//!     &descriptor,
//!     &demo_model::DiamondFillArgs,
//!     &inputs,
//!     &mut outputs,
//!     &mut workspace,
//!     &const_workspace,
//! )
//! .unwrap();
//!
//! let rc = engine::run_single(&mut ctx, &descriptor.schedule);
//! assert_eq!(rc, 0);
//! assert_eq!(outputs[0], 23.0);
//! ```

pub mod config;
pub mod context;
pub mod demo_model;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod log;
pub mod ops;
pub mod port;
pub mod semantic;

pub use config::Config;
pub use context::{OpArgs, OperatorEntry, RuntimeContext};
pub use descriptor::{BackendKind, Descriptor, DescriptorBuilder, Schedule};
pub use error::RuntimeError;
pub use log::{LogLevel, LogRecord, WorkerId};
pub use semantic::{init_context, FillArgs};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{OpArgs, RuntimeContext};
    pub use crate::descriptor::{BackendKind, Descriptor, DescriptorBuilder};
    pub use crate::error::RuntimeError;
    pub use crate::{demo_model, engine, semantic};
}

/// Initializes the process-wide engine singleton with the given config.
/// Idempotent; see [`engine::init`].
pub fn init(config: &Config) -> Result<(), RuntimeError> {
    engine::init(config)
}

/// Tears down the process-wide engine singleton. Tolerates being called when
/// never initialized.
pub fn shutdown() {
    engine::shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_model_matches_documented_scenario() {
        let descriptor = demo_model::diamond_descriptor();
        let const_workspace = demo_model::diamond_const_workspace();
        let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
        let inputs = [10.0f32];
        let mut outputs = [0.0f32];

        let mut ctx = init_context(
            &descriptor,
            &demo_model::DiamondFillArgs,
            &inputs,
            &mut outputs,
            &mut workspace,
            &const_workspace,
        )
        .unwrap();

        let rc = engine::run_single(&mut ctx, &descriptor.schedule);
        assert_eq!(rc, 0);
        assert_eq!(outputs[0], 23.0);
    }
}
