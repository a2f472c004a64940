//! Print the magnitude response of the voice for one held note.

use clap::Args;
use clavier_core::{Effect, ParameterInfo, linear_to_db};
use clavier_filter::{
    FilterMode, Filterclavier, LineGraphProvider, MidiTarget, PARAM_MAX_RESONANCE, PARAM_MODE,
    graph_frequency,
};

use crate::error::CliError;

#[derive(Args)]
pub struct ResponseArgs {
    /// Filter mode id (see `clavier modes`)
    #[arg(short, long, default_value = "bp6")]
    mode: String,

    /// MIDI note to hold
    #[arg(short, long, default_value = "69")]
    note: u8,

    /// Note velocity
    #[arg(short, long, default_value = "127")]
    velocity: u8,

    /// Resonance at full velocity
    #[arg(long)]
    max_resonance: Option<f32>,

    /// Number of graph points between 20 Hz and 20 kHz
    #[arg(long, default_value = "32")]
    points: usize,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Also list the graph gridlines
    #[arg(long)]
    gridlines: bool,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let mode = FilterMode::from_id(&args.mode)
        .ok_or_else(|| CliError::UnknownMode(args.mode.clone()))?;
    if args.note > 127 || args.velocity > 127 {
        anyhow::bail!("note and velocity must be in 0-127");
    }
    if args.points == 0 {
        anyhow::bail!("--points must be at least 1");
    }
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }

    let mut voice = Filterclavier::new(args.sample_rate as f32);
    voice.set_param(PARAM_MODE, mode.as_param());
    if let Some(max_res) = args.max_resonance {
        voice.set_param(PARAM_MAX_RESONANCE, max_res);
    }
    voice.activate();
    voice.note_on(args.note, args.velocity);
    settle(&mut voice);

    let mut graph = vec![0.0f32; args.points];
    if !voice.get_graph(PARAM_MODE, 0, &mut graph) {
        anyhow::bail!("voice produced no response graph");
    }

    println!(
        "{}: note {} ({:.1} Hz), velocity {}, Q {:.3}, gain {:.3}\n",
        mode.name(),
        args.note,
        voice.core().cutoff().get(),
        args.velocity,
        voice.core().resonance().get(),
        voice.core().gain().get(),
    );
    println!("  {:>10}  {:>9}  {:>7}", "Hz", "dB", "graph");
    for (i, y) in graph.iter().enumerate() {
        let freq = graph_frequency(i, args.points);
        let db = linear_to_db(voice.core().freq_gain(freq));
        println!("  {freq:>10.1}  {db:>9.2}  {y:>7.3}");
    }

    if args.gridlines {
        println!("\nGridlines:");
        for line in (0..).map_while(|i| voice.get_gridline(PARAM_MODE, i)) {
            let axis = if line.vertical { "freq" } else { "level" };
            println!("  {axis:<5}  {:>7.3}  {}", line.pos, line.legend.unwrap_or(""));
        }
    }

    Ok(())
}

/// Run silence through the voice until every ramp has finished.
fn settle(voice: &mut Filterclavier) {
    let tick = (voice.core().sample_rate() / 1000.0).max(1.0) as usize;
    let mut block = vec![0.0f32; tick];
    while voice.core().is_ramping() {
        block.fill(0.0);
        voice.process_block_inplace(&mut block);
    }
}
