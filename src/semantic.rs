//! Resolves SIDs against the tensor map and binds operator descriptors to
//! executable entries. Module boundary grounded directly on the original
//! runtime's `tvmrt_semantic.c/h`.

use crate::context::{OperatorEntry, RuntimeContext};
use crate::descriptor::{Descriptor, NO_SID};
use crate::error::RuntimeError;

/// Resolves a SID against the tensor map, returning its `(offset, size)` in
/// the workspace, or `None` if `sid < 0` or absent.
pub fn resolve(descriptor: &Descriptor, sid: i32) -> Option<(usize, usize)> {
    if sid == NO_SID {
        return None;
    }
    descriptor
        .tensor_map
        .get(sid)
        .map(|e| (e.offset as usize, e.size as usize))
}

/// Populates a model-specific argument block for one operator. An external
/// collaborator: the semantic layer does not know the concrete argument
/// layout for any given kernel, only that it can ask this trait to produce
/// one. Owned by the model generator, per the source's resolution of the
/// argument-block-ownership ambiguity.
pub trait FillArgs {
    /// Builds the bound operator-entry array for every operator in
    /// `descriptor`, given the caller's input/output buffers and the
    /// workspace/const-workspace. SIDs resolve against the tensor map;
    /// operator inputs/outputs that aren't backed by a SID (the caller's own
    /// input/output buffers, or a constant outside the workspace) are wired
    /// directly by this routine, since the descriptor has no SID for them.
    fn fill(
        &self,
        descriptor: &Descriptor,
        inputs: *const f32,
        outputs: *mut f32,
        workspace: *mut u8,
        const_workspace: *const u8,
    ) -> Vec<OperatorEntry>;
}

/// Builds a `RuntimeContext` for one inference call: resolves every
/// operator's function pointer from its backend's function table and
/// delegates argument-block population to `fill_args`.
///
/// Returns `Err` only for a null/empty workspace; an operator whose
/// `func_entry_id` or SIDs don't resolve gets a `None` function instead of a
/// failure (descriptor inconsistencies are silently skipped per the error
/// model, not surfaced as a runtime error).
pub fn init_context(
    descriptor: &Descriptor,
    fill_args: &dyn FillArgs,
    inputs: &[f32],
    outputs: &mut [f32],
    workspace: &mut [u8],
    const_workspace: &[u8],
) -> Result<RuntimeContext, RuntimeError> {
    if workspace.is_empty() {
        return Err(RuntimeError::InvalidArgument("workspace must be non-empty"));
    }

    let workspace_ptr = workspace.as_mut_ptr();
    let const_ptr = const_workspace.as_ptr();
    let inputs_ptr = inputs.as_ptr();
    let outputs_ptr = outputs.as_mut_ptr();

    let mut entries = fill_args.fill(descriptor, inputs_ptr, outputs_ptr, workspace_ptr, const_ptr);

    for (i, op) in descriptor.operators.iter().enumerate() {
        let function = descriptor
            .function_table(op.backend)
            .and_then(|table| table.functions.get(op.func_entry_id as usize))
            .copied();
        if let Some(entry) = entries.get_mut(i) {
            entry.function = function;
        }
    }

    Ok(RuntimeContext::new(workspace, const_workspace, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BackendKind, DescriptorBuilder, OperatorDescriptor, TensorMapEntry};

    fn noop_kernel(_args: &crate::context::OpArgs) -> i32 {
        0
    }

    struct NoopFill;
    impl FillArgs for NoopFill {
        fn fill(
            &self,
            descriptor: &Descriptor,
            _inputs: *const f32,
            _outputs: *mut f32,
            _workspace: *mut u8,
            _const_workspace: *const u8,
        ) -> Vec<OperatorEntry> {
            descriptor
                .operators
                .iter()
                .map(|op| OperatorEntry {
                    name: op.name,
                    function: None,
                    args: crate::context::OpArgs::empty(),
                })
                .collect()
        }
    }

    #[test]
    fn resolve_rejects_negative_sid() {
        let desc = DescriptorBuilder::new()
            .with_tensor(TensorMapEntry { sid: 1, offset: 0, size: 4, align: 4 })
            .build();
        assert!(resolve(&desc, NO_SID).is_none());
        assert_eq!(resolve(&desc, 1), Some((0, 4)));
    }

    #[test]
    fn init_context_binds_function_pointers() {
        let desc = DescriptorBuilder::new()
            .with_tensor(TensorMapEntry { sid: 1, offset: 0, size: 4, align: 4 })
            .with_operator(OperatorDescriptor {
                op_id: 0,
                name: "id",
                backend: BackendKind::Cpu,
                func_entry_id: 0,
                input_sids: [1, -1, -1, -1],
                output_sids: [1, -1],
                input_count: 1,
                output_count: 1,
            })
            .with_layer(vec![0])
            .with_function_table(BackendKind::Cpu, vec![noop_kernel])
            .build();

        let mut workspace = [0u8; 16];
        let const_workspace: [u8; 0] = [];
        let inputs = [0.0f32];
        let mut outputs = [0.0f32];
        let ctx =
            init_context(&desc, &NoopFill, &inputs, &mut outputs, &mut workspace, &const_workspace)
                .unwrap();
        assert!(ctx.op_execs[0].function.is_some());
    }

    #[test]
    fn init_context_rejects_empty_workspace() {
        let desc = DescriptorBuilder::new().build();
        let mut workspace: [u8; 0] = [];
        let const_workspace: [u8; 0] = [];
        let inputs = [0.0f32];
        let mut outputs = [0.0f32];
        assert!(init_context(
            &desc,
            &NoopFill,
            &inputs,
            &mut outputs,
            &mut workspace,
            &const_workspace
        )
        .is_err());
    }
}
