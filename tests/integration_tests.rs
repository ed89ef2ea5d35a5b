// End-to-end tests for the AOT BSP runtime against the bundled demo models
// and the scenarios from the data model: diamond/stress reference outputs,
// error propagation, idempotent lifecycle, and single-threaded equivalence.

use aot_bsp_runtime::context::OpArgs;
use aot_bsp_runtime::descriptor::{BackendKind, DescriptorBuilder, OperatorDescriptor, TensorMapEntry, NO_SID};
use aot_bsp_runtime::{demo_model, engine, semantic, Config};

#[test]
fn diamond_model_produces_reference_output() {
    let descriptor = demo_model::diamond_descriptor();
    descriptor.validate(demo_model::DIAMOND_WORKSPACE_LEN).unwrap();

    let const_workspace = demo_model::diamond_const_workspace();
    let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
    let inputs = [10.0f32];
    let mut outputs = [0.0f32];

    let mut ctx = semantic::init_context(
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

#[test]
fn stress_model_produces_reference_output() {
    let descriptor = demo_model::stress_descriptor();
    descriptor.validate(demo_model::STRESS_WORKSPACE_LEN).unwrap();

    let const_workspace = demo_model::stress_const_workspace();
    let mut workspace = [0u8; demo_model::STRESS_WORKSPACE_LEN];
    let inputs = [10.0f32];
    let mut outputs = [0.0f32];

    let mut ctx = semantic::init_context(
        &descriptor,
        &demo_model::StressFillArgs,
        &inputs,
        &mut outputs,
        &mut workspace,
        &const_workspace,
    )
    .unwrap();

    let rc = engine::run_single(&mut ctx, &descriptor.schedule);
    assert_eq!(rc, 0);
    assert_eq!(outputs[0], 235.0);
}

fn failing_kernel(_args: &OpArgs) -> i32 {
    -7
}

fn ok_kernel(_args: &OpArgs) -> i32 {
    0
}

fn single_op_descriptor(func: aot_bsp_runtime::context::KernelFn) -> aot_bsp_runtime::Descriptor {
    DescriptorBuilder::new()
        .with_tensor(TensorMapEntry { sid: 1, offset: 0, size: 4, align: 4 })
        .with_operator(OperatorDescriptor {
            op_id: 0,
            name: "only_op",
            backend: BackendKind::Cpu,
            func_entry_id: 0,
            input_sids: [NO_SID, NO_SID, NO_SID, NO_SID],
            output_sids: [1, NO_SID],
            input_count: 0,
            output_count: 1,
        })
        .with_layer(vec![0])
        .with_function_table(BackendKind::Cpu, vec![func])
        .build()
}

struct NoopFill;
impl semantic::FillArgs for NoopFill {
    fn fill(
        &self,
        descriptor: &aot_bsp_runtime::Descriptor,
        _inputs: *const f32,
        _outputs: *mut f32,
        workspace: *mut u8,
        _const_workspace: *const u8,
    ) -> Vec<aot_bsp_runtime::OperatorEntry> {
        descriptor
            .operators
            .iter()
            .map(|op| {
                let mut args = OpArgs::empty();
                args.outputs[0] = workspace as *mut f32;
                args.output_count = 1;
                aot_bsp_runtime::OperatorEntry { name: op.name, function: None, args }
            })
            .collect()
    }
}

#[test]
fn a_failing_operator_return_code_propagates() {
    let descriptor = single_op_descriptor(failing_kernel);
    let mut workspace = [0u8; 4];
    let const_workspace: [u8; 0] = [];
    let inputs: [f32; 0] = [];
    let mut outputs: [f32; 0] = [];

    let mut ctx = semantic::init_context(
        &descriptor,
        &NoopFill,
        &inputs,
        &mut outputs,
        &mut workspace,
        &const_workspace,
    )
    .unwrap();

    let rc = engine::run_single(&mut ctx, &descriptor.schedule);
    assert_eq!(rc, -7);
}

#[test]
fn an_empty_layer_is_a_no_op() {
    let descriptor = DescriptorBuilder::new()
        .with_layer(vec![])
        .with_function_table(BackendKind::Cpu, vec![ok_kernel])
        .build();
    let mut workspace = [0u8; 4];
    let mut ctx = aot_bsp_runtime::RuntimeContext::new(&mut workspace, &[], vec![]);
    let rc = engine::run_single(&mut ctx, &descriptor.schedule);
    assert_eq!(rc, 0);
}

#[cfg(feature = "port-posix")]
#[test]
fn init_shutdown_is_idempotent_and_repeatable() {
    let cfg = Config::default();
    engine::init(&cfg).unwrap();
    engine::init(&cfg).unwrap();

    let descriptor = demo_model::diamond_descriptor();
    let const_workspace = demo_model::diamond_const_workspace();

    for _ in 0..2 {
        let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
        let inputs = [10.0f32];
        let mut outputs = [0.0f32];
        let mut ctx = semantic::init_context(
            &descriptor,
            &demo_model::DiamondFillArgs,
            &inputs,
            &mut outputs,
            &mut workspace,
            &const_workspace,
        )
        .unwrap();
        let rc = engine::run(&mut ctx, &descriptor.schedule);
        assert_eq!(rc, 0);
        assert_eq!(outputs[0], 23.0);
    }

    engine::shutdown();
    engine::shutdown();

    engine::init(&cfg).unwrap();
    let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
    let inputs = [10.0f32];
    let mut outputs = [0.0f32];
    let mut ctx = semantic::init_context(
        &descriptor,
        &demo_model::DiamondFillArgs,
        &inputs,
        &mut outputs,
        &mut workspace,
        &const_workspace,
    )
    .unwrap();
    assert_eq!(engine::run(&mut ctx, &descriptor.schedule), 0);
    assert_eq!(outputs[0], 23.0);
    engine::shutdown();
}

#[cfg(feature = "port-posix")]
#[test]
fn wide_layer_runs_under_the_real_worker_pool() {
    let cfg = Config::default();
    engine::init(&cfg).unwrap();

    let descriptor = demo_model::stress_descriptor();
    let const_workspace = demo_model::stress_const_workspace();
    let mut workspace = [0u8; demo_model::STRESS_WORKSPACE_LEN];
    let inputs = [10.0f32];
    let mut outputs = [0.0f32];

    let mut ctx = semantic::init_context(
        &descriptor,
        &demo_model::StressFillArgs,
        &inputs,
        &mut outputs,
        &mut workspace,
        &const_workspace,
    )
    .unwrap();

    let rc = engine::run(&mut ctx, &descriptor.schedule);
    assert_eq!(rc, 0);
    assert_eq!(outputs[0], 235.0);

    engine::shutdown();
}

#[cfg(all(feature = "port-single", not(feature = "port-posix")))]
#[test]
fn single_threaded_backend_matches_multithreaded_reference_output() {
    let descriptor = demo_model::stress_descriptor();
    let const_workspace = demo_model::stress_const_workspace();
    let mut workspace = [0u8; demo_model::STRESS_WORKSPACE_LEN];
    let inputs = [10.0f32];
    let mut outputs = [0.0f32];

    let mut ctx = semantic::init_context(
        &descriptor,
        &demo_model::StressFillArgs,
        &inputs,
        &mut outputs,
        &mut workspace,
        &const_workspace,
    )
    .unwrap();

    let rc = engine::run(&mut ctx, &descriptor.schedule);
    assert_eq!(rc, 0);
    assert_eq!(outputs[0], 235.0);
}
