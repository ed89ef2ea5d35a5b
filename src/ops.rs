//! Scalar f32 operator kernels for the demo backend. The engine treats
//! these as an external collaborator — nothing here is part of the core's
//! scope — but a demo driver needs real kernels to execute, so this module
//! supplies the ones exercised by `demo_model` plus a handful more recovered
//! from the original runtime's `test_new_ops.c`.

use crate::context::OpArgs;

pub fn add(args: &OpArgs) -> i32 {
    let a = args.input(0);
    let b = args.input(1);
    args.set_output(0, a + b);
    0
}

pub fn subtract(args: &OpArgs) -> i32 {
    let a = args.input(0);
    let b = args.input(1);
    args.set_output(0, a - b);
    0
}

pub fn relu(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0).max(0.0));
    0
}

pub fn sigmoid(args: &OpArgs) -> i32 {
    let x = args.input(0);
    args.set_output(0, 1.0 / (1.0 + (-x).exp()));
    0
}

pub fn tanh_op(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0).tanh());
    0
}

pub fn relu6(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0).max(0.0).min(6.0));
    0
}

pub fn multiply(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0) * args.input(1));
    0
}

pub fn maximum(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0).max(args.input(1)));
    0
}

pub fn minimum(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0).min(args.input(1)));
    0
}

pub fn mul_2(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0) * 2.0);
    0
}

pub fn mul_half(args: &OpArgs) -> i32 {
    args.set_output(0, args.input(0) * 0.5);
    0
}
