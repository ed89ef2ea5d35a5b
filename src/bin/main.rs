//! Demo CLI: runs the diamond or stress model against one scalar input.

use clap::Parser;

use aot_bsp_runtime::{demo_model, engine, semantic};

#[derive(Parser)]
#[command(name = "aot-runtime-demo")]
#[command(about = "Runs the bundled demo dataflow models against a scalar input")]
#[command(version)]
struct Cli {
    /// Scalar input value.
    #[arg(default_value_t = 10.0)]
    input: f32,

    /// Run the 16-operator, 9-layer stress model instead of the diamond.
    #[arg(long)]
    stress: bool,
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let inputs = [cli.input];
    let mut outputs = [0.0f32];

    let rc = if cli.stress {
        let descriptor = demo_model::stress_descriptor();
        let const_workspace = demo_model::stress_const_workspace();
        let mut workspace = [0u8; demo_model::STRESS_WORKSPACE_LEN];
        run(&descriptor, &demo_model::StressFillArgs, &inputs, &mut outputs, &mut workspace, &const_workspace)
    } else {
        let descriptor = demo_model::diamond_descriptor();
        let const_workspace = demo_model::diamond_const_workspace();
        let mut workspace = [0u8; demo_model::DIAMOND_WORKSPACE_LEN];
        run(&descriptor, &demo_model::DiamondFillArgs, &inputs, &mut outputs, &mut workspace, &const_workspace)
    };

    match rc {
        Ok(()) => {
            println!("input: {}", cli.input);
            println!("output: {}", outputs[0]);
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(
    descriptor: &aot_bsp_runtime::Descriptor,
    fill_args: &dyn semantic::FillArgs,
    inputs: &[f32],
    outputs: &mut [f32],
    workspace: &mut [u8],
    const_workspace: &[u8],
) -> Result<(), aot_bsp_runtime::RuntimeError> {
    descriptor.validate(workspace.len())?;
    let mut ctx = semantic::init_context(descriptor, fill_args, inputs, outputs, workspace, const_workspace)?;
    let rc = engine::run_single(&mut ctx, &descriptor.schedule);
    if rc != 0 {
        tracing::error!(rc, "model execution returned a nonzero code");
        return Err(aot_bsp_runtime::RuntimeError::InvalidArgument("operator returned nonzero"));
    }
    Ok(())
}
