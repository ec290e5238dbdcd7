use std::fs::File;
use std::io;

use clap::{value_parser, Arg, ArgAction};
use log::info;
use pagesim::config::{Config, OutputFormat};
use pagesim::display::{SweepTable, TraceTable};
use pagesim::error::{Error, Result};
use pagesim::generate::reference_string;
use pagesim::input::read_pages;
use pagesim::replacement::{new_policy, simulate_with, sweep};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

/// Command line arguments that map onto configuration keys.
const OVERRIDES: [(&str, &str); 6] = [
    ("file", "input"),
    ("column", "column"),
    ("frames", "frames"),
    ("policy", "policy"),
    ("k", "lru_k"),
    ("format", "format"),
];

fn main() -> Result<()> {
    let args = clap::command!()
        .name("pagesim")
        .about("Page replacement simulator")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .default_value(""),
        )
        .arg(Arg::new("file").short('f').long("file").help("CSV file with the page requests, - for stdin"))
        .arg(Arg::new("column").long("column").help("CSV column holding the page ids"))
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .allow_negative_numbers(true)
                .help("Number of frames"),
        )
        .arg(
            Arg::new("policy")
                .short('p')
                .long("policy")
                .help("Eviction policy: lru, fifo, lru-k or optimal"),
        )
        .arg(Arg::new("k").short('k').long("k").help("History depth of the lru-k policy"))
        .arg(Arg::new("format").long("format").help("Output format: table or json"))
        .arg(
            Arg::new("random")
                .long("random")
                .value_parser(value_parser!(usize))
                .help("Simulate a generated reference string of the given length"),
        )
        .arg(
            Arg::new("pages")
                .long("pages")
                .value_parser(value_parser!(u32))
                .default_value("10")
                .help("Number of distinct pages in a generated reference string"),
        )
        .arg(
            Arg::new("locality")
                .long("locality")
                .value_parser(value_parser!(f64))
                .default_value("0.3")
                .help("Probability that a generated request repeats a recent page"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .default_value("0")
                .help("Seed of the reference string generator"),
        )
        .arg(
            Arg::new("sweep")
                .long("sweep")
                .help("Report the total faults of every frame count from 1 to max_frames")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut overrides = vec![];
    for (arg, key) in OVERRIDES {
        if let Some(value) = args.get_one::<String>(arg) {
            overrides.push((key, value.clone()));
        }
    }
    let file = args.get_one::<String>("config").map(String::as_str).unwrap_or("");
    let cfg = Config::with_overrides(file, &overrides)?;

    let loglevel = cfg.log_level()?;
    let logconfig = simplelog::ConfigBuilder::new().build();
    TermLogger::init(loglevel, logconfig, TerminalMode::Stderr, ColorChoice::Auto)?;

    let pages: Vec<String> = match args.get_one::<usize>("random") {
        Some(&len) => {
            let universe = args.get_one::<u32>("pages").copied().unwrap_or(10);
            let locality = args.get_one::<f64>("locality").copied().unwrap_or(0.3);
            let seed = args.get_one::<u64>("seed").copied().unwrap_or(0);
            info!("generating {} requests over {} pages, seed {}", len, universe, seed);
            reference_string(len, universe, locality, seed)?
                .into_iter()
                .map(|page| page.to_string())
                .collect()
        }
        None => load_pages(&cfg)?,
    };

    if args.get_flag("sweep") {
        let capacities = cfg.sweep_capacities()?;
        let points = sweep(&pages, &capacities, cfg.policy, cfg.lru_k)?;
        match cfg.format {
            OutputFormat::Table => print!("{}", SweepTable::new(&points)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
        }
        return Ok(());
    }

    let capacity = cfg.capacity()?;
    let policy = new_policy(cfg.policy, cfg.lru_k, &pages)?;
    let result = simulate_with(pages, capacity, policy)?;
    match cfg.format {
        OutputFormat::Table => {
            println!("Simulation with {} frames ({})", capacity, cfg.policy);
            println!();
            print!("{}", TraceTable::new(&result));
            println!("Total Page Faults: {}", result.total_faults);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

fn load_pages(cfg: &Config) -> Result<Vec<String>> {
    match cfg.input.as_str() {
        "" => Err(Error::value("no input given, use --file <csv> or --random <len>")),
        "-" => read_pages(io::stdin(), &cfg.column),
        path => read_pages(File::open(path)?, &cfg.column),
    }
}
