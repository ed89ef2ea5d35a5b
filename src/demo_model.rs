//! Two concrete model descriptors matching the canonical end-to-end test
//! scenarios: a 6-operator diamond and a 16-operator, 9-layer stress graph.
//! Exact SID/offset/constant wiring is carried over from the original
//! runtime's `src/Initial/default_lib1.c` (diamond) and
//! `src/stress_lib1.c`/`src/stress_main.c` (stress graph), not reinvented.

use crate::context::{OpArgs, OperatorEntry};
use crate::descriptor::{
    BackendKind, Descriptor, DescriptorBuilder, OperatorDescriptor, TensorMapEntry, NO_SID,
};
use crate::ops;
use crate::semantic::FillArgs;

const FN_ADD: u32 = 0;
const FN_SUB: u32 = 1;

fn const_ptr(const_workspace: *const u8, byte_offset: usize) -> *const f32 {
    // SAFETY: byte_offset is a compile-time-known offset into the constant
    // buffer this model was built to receive; callers supply a buffer at
    // least `DIAMOND_CONST_LEN`/`STRESS_CONST_LEN` bytes long.
    unsafe { const_workspace.add(byte_offset) as *const f32 }
}

fn ws_ptr(workspace: *mut u8, byte_offset: usize) -> *mut f32 {
    // SAFETY: byte_offset comes from a tensor-map entry already checked
    // against the workspace length by `Descriptor::validate`.
    unsafe { workspace.add(byte_offset) as *mut f32 }
}

fn sid_offset(descriptor: &Descriptor, sid: i32) -> usize {
    descriptor
        .tensor_map
        .get(sid)
        .expect("demo model SIDs always resolve")
        .offset as usize
}

// ---------------------------------------------------------------------
// 6-op diamond
// ---------------------------------------------------------------------

pub const DIAMOND_WORKSPACE_LEN: usize = 48;
pub const DIAMOND_CONST: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

pub fn diamond_const_workspace() -> [u8; 20] {
    let mut bytes = [0u8; 20];
    for (i, c) in DIAMOND_CONST.iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&c.to_ne_bytes());
    }
    bytes
}

/// SIDs: `{2:0, 1:16, 3:32, 4:16, 5:32}` — SID 4 reuses SID 1's slot, SID 5
/// reuses SID 3's, once each is dead.
pub fn diamond_descriptor() -> Descriptor {
    let op = |op_id: u32, name: &'static str, func: u32, ins: [i32; 4], in_n: usize, outs: [i32; 2], out_n: usize| {
        OperatorDescriptor {
            op_id,
            name,
            backend: BackendKind::Cpu,
            func_entry_id: func,
            input_sids: ins,
            output_sids: outs,
            input_count: in_n,
            output_count: out_n,
        }
    };

    DescriptorBuilder::new()
        .with_tensor(TensorMapEntry { sid: 2, offset: 0, size: 4, align: 4 })
        .with_tensor(TensorMapEntry { sid: 1, offset: 16, size: 4, align: 4 })
        .with_tensor(TensorMapEntry { sid: 3, offset: 32, size: 4, align: 4 })
        .with_tensor(TensorMapEntry { sid: 4, offset: 16, size: 4, align: 4 })
        .with_tensor(TensorMapEntry { sid: 5, offset: 32, size: 4, align: 4 })
        .with_operator(op(0, "add_in_1", FN_ADD, [NO_SID, NO_SID, NO_SID, NO_SID], 2, [1, NO_SID], 1))
        .with_operator(op(1, "sub_2", FN_SUB, [1, NO_SID, NO_SID, NO_SID], 2, [2, NO_SID], 1))
        .with_operator(op(2, "add_in_3", FN_ADD, [NO_SID, NO_SID, NO_SID, NO_SID], 2, [3, NO_SID], 1))
        .with_operator(op(3, "sub_4", FN_SUB, [3, NO_SID, NO_SID, NO_SID], 2, [4, NO_SID], 1))
        .with_operator(op(4, "add_5", FN_ADD, [4, NO_SID, NO_SID, NO_SID], 2, [5, NO_SID], 1))
        .with_operator(op(5, "add_out", FN_ADD, [2, 5, NO_SID, NO_SID], 2, [NO_SID, NO_SID], 1))
        .with_layer(vec![0, 2])
        .with_layer(vec![1, 3])
        .with_layer(vec![4])
        .with_layer(vec![5])
        .with_function_table(BackendKind::Cpu, vec![ops::add, ops::subtract])
        .build()
}

pub struct DiamondFillArgs;

impl FillArgs for DiamondFillArgs {
    fn fill(
        &self,
        descriptor: &Descriptor,
        inputs: *const f32,
        outputs: *mut f32,
        workspace: *mut u8,
        const_workspace: *const u8,
    ) -> Vec<OperatorEntry> {
        let sid = |s: i32| ws_ptr(workspace, sid_offset(descriptor, s));
        let c = |i: usize| const_ptr(const_workspace, i * 4);

        let make = |inputs: [*const f32; 2], output: *mut f32| {
            let mut args = OpArgs::empty();
            args.inputs[0] = inputs[0];
            args.inputs[1] = inputs[1];
            args.input_count = 2;
            args.outputs[0] = output;
            args.output_count = 1;
            args
        };

        descriptor
            .operators
            .iter()
            .map(|op| {
                let args = match op.op_id {
                    0 => make([inputs, c(0)], sid(1)),
                    1 => make([sid(1) as *const f32, c(1)], sid(2)),
                    2 => make([inputs, c(2)], sid(3)),
                    3 => make([sid(3) as *const f32, c(3)], sid(4)),
                    4 => make([sid(4) as *const f32, c(4)], sid(5)),
                    5 => make([sid(2) as *const f32, sid(5) as *const f32], outputs),
                    _ => OpArgs::empty(),
                };
                OperatorEntry { name: op.name, function: None, args }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------
// 16-op, 9-layer stress graph
// ---------------------------------------------------------------------

pub const STRESS_WORKSPACE_LEN: usize = 64;
pub const STRESS_CONST: [f32; 5] = [1.0, 3.0, 5.0, 2.0, 4.0];

pub fn stress_const_workspace() -> [u8; 20] {
    let mut bytes = [0u8; 20];
    for (i, c) in STRESS_CONST.iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&c.to_ne_bytes());
    }
    bytes
}

/// SIDs 1-12 over 8 slots of 8 bytes: `{1:0,2:8,3:16,4:24,5:32,6:40,7:0,
/// 8:8,9:48,10:16,11:24,12:56}`.
pub fn stress_descriptor() -> Descriptor {
    let op = |op_id: u32, name: &'static str, func: u32, ins: [i32; 4], in_n: usize, outs: [i32; 2]| {
        OperatorDescriptor {
            op_id,
            name,
            backend: BackendKind::Cpu,
            func_entry_id: func,
            input_sids: ins,
            output_sids: outs,
            input_count: in_n,
            output_count: 1,
        }
    };
    let s = |a: i32| [a, NO_SID, NO_SID, NO_SID];
    let s2 = |a: i32, b: i32| [a, b, NO_SID, NO_SID];

    DescriptorBuilder::new()
        .with_tensor(TensorMapEntry { sid: 1, offset: 0, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 2, offset: 8, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 3, offset: 16, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 4, offset: 24, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 5, offset: 32, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 6, offset: 40, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 7, offset: 0, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 8, offset: 8, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 9, offset: 48, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 10, offset: 16, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 11, offset: 24, size: 8, align: 8 })
        .with_tensor(TensorMapEntry { sid: 12, offset: 56, size: 8, align: 8 })
        // L1: in+{1,3,5,1} -> SID1..4
        .with_operator(op(0, "l1_p1", FN_ADD, s(NO_SID), 2, [1, NO_SID]))
        .with_operator(op(1, "l1_p3", FN_ADD, s(NO_SID), 2, [2, NO_SID]))
        .with_operator(op(2, "l1_p5", FN_ADD, s(NO_SID), 2, [3, NO_SID]))
        .with_operator(op(3, "l1_p1_dup", FN_ADD, s(NO_SID), 2, [4, NO_SID]))
        // L2: SID1+SID2->SID5, SID3+SID4->SID6
        .with_operator(op(4, "l2_a", FN_ADD, s2(1, 2), 2, [5, NO_SID]))
        .with_operator(op(5, "l2_b", FN_ADD, s2(3, 4), 2, [6, NO_SID]))
        // L3: SID5-2->SID7, SID6-4->SID8
        .with_operator(op(6, "l3_a", FN_SUB, s(5), 2, [7, NO_SID]))
        .with_operator(op(7, "l3_b", FN_SUB, s(6), 2, [8, NO_SID]))
        // L4: SID7+SID8->SID9
        .with_operator(op(8, "l4", FN_ADD, s2(7, 8), 2, [9, NO_SID]))
        // L5: SID9+3->SID10, SID9+5->SID11
        .with_operator(op(9, "l5_a", FN_ADD, s(9), 2, [10, NO_SID]))
        .with_operator(op(10, "l5_b", FN_ADD, s(9), 2, [11, NO_SID]))
        // L6: SID10+SID11->SID12
        .with_operator(op(11, "l6", FN_ADD, s2(10, 11), 2, [12, NO_SID]))
        // L7: SID12-2->SID5 (reused), SID9+1->SID6 (reused)
        .with_operator(op(12, "l7_a", FN_SUB, s(12), 2, [5, NO_SID]))
        .with_operator(op(13, "l7_b", FN_ADD, s(9), 2, [6, NO_SID]))
        // L8: SID5+SID6->SID1 (reused)
        .with_operator(op(14, "l8", FN_ADD, s2(5, 6), 2, [1, NO_SID]))
        // L9: SID1+SID12->out
        .with_operator(op(15, "l9", FN_ADD, s2(1, 12), 2, [NO_SID, NO_SID]))
        .with_layer(vec![0, 1, 2, 3])
        .with_layer(vec![4, 5])
        .with_layer(vec![6, 7])
        .with_layer(vec![8])
        .with_layer(vec![9, 10])
        .with_layer(vec![11])
        .with_layer(vec![12, 13])
        .with_layer(vec![14])
        .with_layer(vec![15])
        .with_function_table(BackendKind::Cpu, vec![ops::add, ops::subtract])
        .build()
}

pub struct StressFillArgs;

impl FillArgs for StressFillArgs {
    fn fill(
        &self,
        descriptor: &Descriptor,
        inputs: *const f32,
        outputs: *mut f32,
        workspace: *mut u8,
        const_workspace: *const u8,
    ) -> Vec<OperatorEntry> {
        let sid = |s: i32| ws_ptr(workspace, sid_offset(descriptor, s));
        let c = |i: usize| const_ptr(const_workspace, i * 4);

        let make = |a: *const f32, b: *const f32, output: *mut f32| {
            let mut args = OpArgs::empty();
            args.inputs[0] = a;
            args.inputs[1] = b;
            args.input_count = 2;
            args.outputs[0] = output;
            args.output_count = 1;
            args
        };

        descriptor
            .operators
            .iter()
            .map(|op| {
                let args = match op.op_id {
                    0 => make(inputs, c(0), sid(1)),
                    1 => make(inputs, c(1), sid(2)),
                    2 => make(inputs, c(2), sid(3)),
                    3 => make(inputs, c(0), sid(4)),
                    4 => make(sid(1) as *const f32, sid(2) as *const f32, sid(5)),
                    5 => make(sid(3) as *const f32, sid(4) as *const f32, sid(6)),
                    6 => make(sid(5) as *const f32, c(3), sid(7)),
                    7 => make(sid(6) as *const f32, c(4), sid(8)),
                    8 => make(sid(7) as *const f32, sid(8) as *const f32, sid(9)),
                    9 => make(sid(9) as *const f32, c(1), sid(10)),
                    10 => make(sid(9) as *const f32, c(2), sid(11)),
                    11 => make(sid(10) as *const f32, sid(11) as *const f32, sid(12)),
                    12 => make(sid(12) as *const f32, c(3), sid(5)),
                    13 => make(sid(9) as *const f32, c(0), sid(6)),
                    14 => make(sid(5) as *const f32, sid(6) as *const f32, sid(1)),
                    15 => make(sid(1) as *const f32, sid(12) as *const f32, outputs),
                    _ => OpArgs::empty(),
                };
                OperatorEntry { name: op.name, function: None, args }
            })
            .collect()
    }
}
