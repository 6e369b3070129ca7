use crate::Config;
use votee::{check_admin, issue_admin, Secret};

fn secret_or_exit(matches: &clap::ArgMatches, config: Config) -> Secret {
    config.with_matches(matches).secret().unwrap_or_else(|e| {
        eprintln!("votee: {}", e);
        std::process::exit(1);
    })
}

pub fn command_admin_token(matches: &clap::ArgMatches, config: Config) {
    let secret = secret_or_exit(matches, config);
    println!("{}", issue_admin(&secret));
}

pub fn command_check_admin(matches: &clap::ArgMatches, config: Config) {
    let secret = secret_or_exit(matches, config);

    // Unwrap is OK, TOKEN is required
    let token = matches.value_of("TOKEN").unwrap();

    if check_admin(&secret, token) {
        println!("valid");
    } else {
        println!("invalid");
        std::process::exit(1);
    }
}
