//! List filter modes and voice parameters.

use clap::Args;
use clavier_core::ParameterInfo;
use clavier_filter::{FilterMode, Filterclavier, mode_max_gain};

#[derive(Args)]
pub struct ModesArgs {
    /// Also list the voice parameters
    #[arg(short, long)]
    params: bool,
}

pub fn run(args: ModesArgs) -> anyhow::Result<()> {
    println!("Filter Modes\n");
    println!("  {:>2}  {:<5}  {:<20}  {:>6}  {:>8}", "#", "id", "name", "stages", "max gain");
    for mode in FilterMode::ALL {
        println!(
            "  {:>2}  {:<5}  {:<20}  {:>6}  {:>8.2}",
            mode.index(),
            mode.id(),
            mode.name(),
            mode.order(),
            mode_max_gain(mode)
        );
    }

    if args.params {
        let voice = Filterclavier::default();
        println!("\nParameters\n");
        for desc in (0..voice.param_count()).filter_map(|i| voice.param_info(i)) {
            println!(
                "  {:<14} {:<14} {:>8} .. {:<8} default {}{}",
                desc.string_id,
                desc.name,
                desc.min,
                desc.max,
                desc.default,
                desc.unit.suffix()
            );
        }
    }

    Ok(())
}
