use crate::Config;
use tracing::info;
use votee::{issue_ballots, validate_ballot};

fn parse_index(matches: &clap::ArgMatches, name: &str) -> u32 {
    // Unwrap is OK, both lo and hi always have a value
    let value = matches.value_of(name).unwrap();
    value.parse().unwrap_or_else(|e| {
        eprintln!("votee ballots: invalid --{} {}: {}", name, value, e);
        std::process::exit(1);
    })
}

pub fn command_ballots(matches: &clap::ArgMatches, config: Config) {
    let secret = config.with_matches(matches).secret().unwrap_or_else(|e| {
        eprintln!("votee ballots: {}", e);
        std::process::exit(1);
    });

    let lo = parse_index(matches, "lo");
    let hi = parse_index(matches, "hi");
    if lo > hi {
        eprintln!("votee ballots: --lo must not be greater than --hi");
        std::process::exit(1);
    }

    info!(count = hi - lo, "printing ballot tokens");
    for token in issue_ballots(&secret, lo, hi) {
        match matches.value_of("url") {
            Some(url) => println!("{}?s={}", url, token),
            None => println!("{}", token),
        }
    }
}

pub fn command_validate(matches: &clap::ArgMatches, config: Config) {
    let config = config.with_matches(matches);
    let secret = config.secret().unwrap_or_else(|e| {
        eprintln!("votee validate: {}", e);
        std::process::exit(1);
    });
    let number_of_ballots = config.number_of_ballots().unwrap_or_else(|e| {
        eprintln!("votee validate: {}", e);
        std::process::exit(1);
    });

    // Unwrap is OK, TOKEN is required
    let token = matches.value_of("TOKEN").unwrap();

    match validate_ballot(&secret, token, number_of_ballots) {
        Some(index) => println!("{}", index),
        None => {
            println!("invalid");
            std::process::exit(1);
        }
    }
}
