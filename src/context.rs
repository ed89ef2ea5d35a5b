//! Per-inference runtime context and the typed argument blocks operators
//! receive. Replaces the C core's `void*` argument blocks with a concrete
//! struct of resolved scalar pointers, per the redesign note on
//! statically-typed argument shapes: every demo kernel is a 1- or 2-input,
//! single-output scalar float operator, so one tagged shape covers them all.

use crate::config::{MAX_OP_INPUTS, MAX_OP_OUTPUTS};

/// Resolved operator arguments: pointers into the workspace/const-workspace,
/// already offset to the operator's declared SIDs by `semantic::init_context`.
///
/// Raw pointers, not slices: a well-formed schedule's layers write disjoint
/// byte ranges (the compiler's obligation), so multiple operators in the same
/// layer hold live pointers into the same workspace buffer simultaneously.
/// Rust's aliasing rules can't express that invariant, so the runtime trusts
/// it instead of encoding it in the type system, same as the C source does.
#[derive(Clone, Copy)]
pub struct OpArgs {
    pub inputs: [*const f32; MAX_OP_INPUTS],
    pub input_count: usize,
    pub outputs: [*mut f32; MAX_OP_OUTPUTS],
    pub output_count: usize,
}

impl OpArgs {
    pub const fn empty() -> Self {
        OpArgs {
            inputs: [std::ptr::null(); MAX_OP_INPUTS],
            input_count: 0,
            outputs: [std::ptr::null_mut(); MAX_OP_OUTPUTS],
            output_count: 0,
        }
    }

    /// SAFETY (caller): every pointer in `inputs[..input_count]` and
    /// `outputs[..output_count]` must be valid for the appropriate access for
    /// the lifetime of the call.
    pub fn input(&self, i: usize) -> f32 {
        debug_assert!(i < self.input_count);
        unsafe { *self.inputs[i] }
    }

    pub fn set_output(&self, i: usize, value: f32) {
        debug_assert!(i < self.output_count);
        unsafe {
            *self.outputs[i] = value;
        }
    }
}

unsafe impl Send for OpArgs {}
unsafe impl Sync for OpArgs {}

/// `0` ("OK") or non-zero ("operator-defined error") — the kernel return
/// convention from the model generator's function tables.
pub type KernelFn = fn(&OpArgs) -> i32;

/// Runtime-built binding of one operator descriptor to an executable entry.
/// Lives only for the current `(inputs, outputs, workspace, const_workspace)`
/// tuple; `semantic::init_context` rebuilds it on every re-init.
#[derive(Clone)]
pub struct OperatorEntry {
    pub name: &'static str,
    pub function: Option<KernelFn>,
    pub args: OpArgs,
}

/// Owns references to the caller-provided buffers and the operator-entry
/// array for one inference call. A context is single-consumer: nothing here
/// prevents a second concurrent `engine::run` on the same context, matching
/// the contract in the data model (the engine does not guard against it).
pub struct RuntimeContext {
    pub workspace: *mut u8,
    pub workspace_len: usize,
    pub const_workspace: *const u8,
    pub const_workspace_len: usize,
    pub op_execs: Vec<OperatorEntry>,
    pub op_count: usize,
}

impl RuntimeContext {
    pub fn new(
        workspace: &mut [u8],
        const_workspace: &[u8],
        op_execs: Vec<OperatorEntry>,
    ) -> Self {
        let op_count = op_execs.len();
        RuntimeContext {
            workspace: workspace.as_mut_ptr(),
            workspace_len: workspace.len(),
            const_workspace: const_workspace.as_ptr(),
            const_workspace_len: const_workspace.len(),
            op_execs,
            op_count,
        }
    }
}

// Deliberately not `Sync`: a context is single-consumer (see the doc
// comment above). The engine never shares `&RuntimeContext` itself across
// threads — each worker dereferences its own raw pointer loaded from an
// `AtomicPtr<RuntimeContext>`, which is `Send`/`Sync` regardless of `T`.
