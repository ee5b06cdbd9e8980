use anyhow::{Context, Result};
use clap::Parser;
use guard_patrol::CLIArgs;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    args.init_logging();
    let lab = guard_patrol::read_lab(&args.input_path).with_context(|| {
        format!(
            "Failed to read laboratory from given file({}).",
            args.input_path.display()
        )
    })?;

    let loop_n = lab.loop_positions_n(&args.patrol_options());
    println!("{}", loop_n);

    Ok(())
}
