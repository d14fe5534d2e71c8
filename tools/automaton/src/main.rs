use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use log::info;

use dawg_automata::validate_determinism;
use dawg_automata::AutomatonKind;
use dawg_io::definition::AutomatonDefinition;
use dawg_io::persistence::load_automaton;
use dawg_io::persistence::save_automaton;

#[derive(Parser, Debug)]
#[command(
    name = "automaton",
    about = "Creates, stores and queries finite automata",
    long_about = "Creates an automaton from a textual transition table, or loads a stored automaton and checks whether it accepts a word"
)]
struct Cli {
    #[arg(long, global = true, help = "Require the automaton to be deterministic")]
    deterministic: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates an automaton and stores it in a file.
    Create {
        #[arg(long, help = "Comma separated list of states")]
        states: String,

        #[arg(long, help = "Comma separated list of input symbols")]
        symbols: String,

        #[arg(long)]
        initial: String,

        #[arg(long, help = "Comma separated list of final states")]
        final_states: String,

        #[arg(short = 't', long = "transition", required = true, help = "A transition origin-symbol-dest1,dest2,...")]
        transitions: Vec<String>,

        #[arg(long, value_name = "FILE")]
        output: String,
    },

    /// Loads a stored automaton and prints it.
    Load {
        #[arg(value_name = "FILE")]
        filename: String,

        #[arg(long, help = "Check whether the word is accepted, every character is one input symbol")]
        accept: Option<String>,
    },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let kind = if cli.deterministic {
        AutomatonKind::Deterministic
    } else {
        AutomatonKind::Nondeterministic
    };

    match cli.command {
        Command::Create {
            states,
            symbols,
            initial,
            final_states,
            transitions,
            output,
        } => {
            let definition = AutomatonDefinition::parse(&states, &symbols, &initial, &final_states, &transitions)?;
            let automaton = definition.into_automaton(kind)?;

            save_automaton(&output, &automaton)?;
            info!("Stored the automaton in {output}");
            println!("{automaton}");
        }
        Command::Load { filename, accept } => {
            let automaton = load_automaton(&filename)?;
            if cli.deterministic {
                validate_determinism(&automaton)?;
            }

            println!("{automaton}");

            if let Some(word) = accept {
                if automaton.accepts_str(&word) {
                    println!("Accepted");
                } else {
                    println!("Rejected");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
