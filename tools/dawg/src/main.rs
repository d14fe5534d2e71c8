use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use clap::Subcommand;
use itertools::Itertools;
use log::info;

use dawg_automata::nfa_to_dfa;
use dawg_induction::train;
use dawg_induction::InductionConfig;
use dawg_io::dataset::load_test_set;
use dawg_io::dataset::load_training_set;
use dawg_io::dataset::TestSetConfig;
use dawg_io::persistence::load_automaton;
use dawg_io::persistence::save_automaton;
use dawg_utilities::Timing;

#[derive(Parser, Debug)]
#[command(
    name = "dawg",
    about = "Learns a recognizer from example words and evaluates it",
    long_about = "Trains an automaton from a set of positive and negative words, or measures the accuracy of a stored automaton on a labelled test set"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    time: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learns an automaton from a training set and stores it.
    Train {
        #[arg(long, value_name = "FILE", help = "One word per line, positive words contain a '+'")]
        training_set: String,

        #[arg(long, value_name = "FILE")]
        output: String,

        #[arg(long, default_value_t = 1, help = "Number of threads that check the negative words")]
        threads: usize,
    },

    /// Measures the accuracy of a stored automaton on a labelled test set.
    Test {
        #[arg(long, value_name = "FILE")]
        automaton: String,

        #[arg(long, value_name = "FILE", help = "Comma separated label and word per row, after a header")]
        test_set: String,

        #[arg(long, help = "Convert the automaton into a deterministic one first")]
        dfa: bool,

        #[arg(long, default_value = "amyloid")]
        positive_label: String,
    },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut timing = Timing::new();

    match cli.command {
        Command::Train {
            training_set,
            output,
            threads,
        } => {
            let set = load_training_set(&training_set)?;

            let mut train_time = timing.start("train");
            let (automaton, report) = train(&set.positive, &set.negative, &InductionConfig { threads })?;
            train_time.finish();

            info!(
                "Kept {} and rolled back {} candidate transitions",
                report.kept, report.rolled_back
            );
            save_automaton(&output, &automaton)?;
        }
        Command::Test {
            automaton,
            test_set,
            dfa,
            positive_label,
        } => {
            let mut automaton = load_automaton(&automaton)?;
            let words = load_test_set(&test_set, &TestSetConfig { positive_label })?;

            if dfa {
                let mut convert_time = timing.start("conversion");
                automaton = nfa_to_dfa(&automaton)?;
                let duration = convert_time.finish();
                println!("DFA conversion time: {:.6}s", duration.as_secs_f64());
            }

            let mut total = Duration::ZERO;
            let outcomes = words
                .iter()
                .map(|labeled| {
                    let start = Instant::now();
                    let accepted = automaton.accepts_str(&labeled.word);
                    total += start.elapsed();

                    (labeled.positive, accepted)
                })
                .counts();

            let correct = outcomes.get(&(true, true)).unwrap_or(&0) + outcomes.get(&(false, false)).unwrap_or(&0);
            info!(
                "True positives {}, false positives {}, true negatives {}, false negatives {}",
                outcomes.get(&(true, true)).unwrap_or(&0),
                outcomes.get(&(false, true)).unwrap_or(&0),
                outcomes.get(&(false, false)).unwrap_or(&0),
                outcomes.get(&(true, false)).unwrap_or(&0)
            );

            if words.is_empty() {
                println!("The test set contains no words");
                return Ok(ExitCode::FAILURE);
            }

            println!("Accuracy: {:.2}%", correct as f64 / words.len() as f64 * 100.0);
            println!("Total time: {:.6}s", total.as_secs_f64());
            println!("Average time: {:.6}s", total.as_secs_f64() / words.len() as f64);
        }
    }

    if cli.time {
        timing.print();
    }

    Ok(ExitCode::SUCCESS)
}
