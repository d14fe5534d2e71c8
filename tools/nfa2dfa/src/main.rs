use anyhow::Result;
use clap::Parser;
use log::info;

use dawg_automata::subset_construction;
use dawg_automata::SubsetKey;
use dawg_io::persistence::load_automaton;
use dawg_io::persistence::save_automaton;
use dawg_utilities::Timing;

#[derive(Parser, Debug)]
#[command(name = "nfa2dfa", about = "Converts a stored nondeterministic automaton into a deterministic one")]
pub struct Cli {
    #[arg(long, value_name = "FILE")]
    input: String,

    #[arg(long, value_name = "FILE")]
    output: String,

    #[arg(
        long,
        help = "Identify subsets by their concatenated state labels, distinct subsets can then be merged"
    )]
    concatenated_keys: bool,

    #[arg(long)]
    time: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let strategy = if cli.concatenated_keys {
        SubsetKey::Concatenated
    } else {
        SubsetKey::Separated
    };

    let mut timing = Timing::new();
    let nfa = load_automaton(&cli.input)?;

    let mut convert_time = timing.start("conversion");
    let construction = subset_construction(&nfa, strategy)?;
    convert_time.finish();

    info!(
        "Converted {} states into {} subsets",
        nfa.num_of_states(),
        construction.num_of_subsets()
    );

    let dfa = construction.into_automaton();
    save_automaton(&cli.output, &dfa)?;

    if cli.time {
        timing.print();
    }

    Ok(())
}
