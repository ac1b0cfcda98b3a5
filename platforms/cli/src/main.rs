use clap::{Parser, ValueEnum};
use fas::{
    encode, random_automaton, random_input, to_dot, unreachable_states, Automaton,
    AutomatonLoader, Determinism, Run, Simulator, Step,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::error::Error;
use std::io::{self, Read};
use std::path::Path;

/// Classifies a finite automaton and tests strings against it.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  fas-cli -a demos/ends-with-ab.fa -i abab -i aba
  cat demos/even-zeros.fa | fas-cli -i 0110
  fas-cli --random nfa --seed 42 --samples 5")]
struct Cli {
    /// The automaton specification file (.fa). Read from stdin when omitted and piped.
    #[clap(short, long)]
    automaton: Option<String>,

    /// Generate a random automaton instead of reading one
    #[clap(short, long, value_enum, conflicts_with = "automaton")]
    random: Option<Kind>,

    /// Seed for the random generator
    #[clap(long)]
    seed: Option<u64>,

    /// A string to test; symbols are single characters
    #[clap(short, long)]
    input: Vec<String>,

    /// Also test this many random strings over the alphabet
    #[clap(short, long, default_value_t = 0)]
    samples: usize,

    /// Print the active states after each symbol
    #[clap(short, long)]
    trace: bool,

    /// Print the automaton as a Graphviz DOT graph and exit
    #[clap(long)]
    dot: bool,

    /// Print a JSON report instead of text
    #[clap(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Dfa,
    Nfa,
}

impl From<Kind> for Determinism {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Dfa => Determinism::Deterministic,
            Kind::Nfa => Determinism::NonDeterministic,
        }
    }
}

#[derive(Serialize)]
struct Report {
    kind: Determinism,
    unreachable: Vec<String>,
    queries: Vec<Query>,
}

#[derive(Serialize)]
struct Query {
    input: String,
    accepted: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let automaton = load_automaton(&cli, &mut rng)?;

    if cli.dot {
        println!("{}", to_dot(&automaton)?);
        return Ok(());
    }

    let simulator = Simulator::new(&automaton)?;

    let mut inputs = cli.input.clone();
    inputs.extend((0..cli.samples).map(|_| random_input(&mut rng, &automaton)));

    let mut queries = Vec::with_capacity(inputs.len());
    for input in inputs {
        if cli.trace && !cli.json {
            println!("\nTracing {:?}", input);
            print_trace(simulator.run(input.chars().map(String::from)));
        }

        let accepted = simulator.accepts_str(&input)?;
        queries.push(Query { input, accepted });
    }

    let report = Report {
        kind: simulator.determinism(),
        unreachable: unreachable_states(&automaton),
        queries,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Loads the automaton from `--random`, `--automaton`, or piped stdin, in that order.
fn load_automaton(cli: &Cli, rng: &mut StdRng) -> Result<Automaton, Box<dyn Error>> {
    if let Some(kind) = cli.random {
        log::debug!("generating a random {:?} automaton", Determinism::from(kind));
        let automaton = random_automaton(rng, kind.into());
        if !cli.json && !cli.dot {
            println!("{}\n", encode(&automaton));
        }
        Ok(automaton)
    } else if let Some(path) = &cli.automaton {
        log::debug!("loading automaton from {}", path);
        Ok(AutomatonLoader::load(Path::new(path))?)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        log::debug!("read {} bytes of specification from stdin", buffer.len());
        Ok(AutomatonLoader::load_from_string(&buffer)?)
    } else {
        Err("No automaton given: pass --automaton FILE, pipe one on stdin, or use --random".into())
    }
}

fn print_trace(mut run: Run) {
    let print_state = |run: &Run| {
        let states = run.active().iter().cloned().collect::<Vec<_>>().join(", ");
        println!("Step: {}, States: {{{}}}", run.position(), states);
    };

    print_state(&run);

    loop {
        match run.step() {
            Step::Continue => print_state(&run),
            Step::Halt(halt) => {
                println!("Halted: {:?}", halt);
                break;
            }
        }
    }
}

fn print_report(report: &Report) {
    println!("The input automaton is a {}.", report.kind);

    if !report.unreachable.is_empty() {
        println!("Unreachable states: {}", report.unreachable.join(", "));
    }

    for query in &report.queries {
        let verdict = if query.accepted { "accepted" } else { "rejected" };
        println!("{:?}: the string is {}", query.input, verdict);
    }
}
