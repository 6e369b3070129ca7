use clap::{App, AppSettings, Arg, SubCommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod command_admin;
mod command_ballots;
mod command_keygen;
mod config;

pub use command_admin::*;
pub use command_ballots::*;
pub use command_keygen::*;
pub use config::Config;

fn secret_arg() -> Arg<'static, 'static> {
    Arg::with_name("secret")
        .long("secret")
        .short("s")
        .takes_value(true)
        .help("Secret as 32 hex characters - can also be set with VOTEE_SECRET")
}

fn app() -> App<'static, 'static> {
    App::new("Votee CLI")
        .version("0.1")
        .about("Issues and checks votee admin and ballot tokens")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(SubCommand::with_name("keygen").about("Generate a new election or poll secret"))
        .subcommand(
            SubCommand::with_name("admin-token")
                .about("Print the admin token for an election secret")
                .arg(secret_arg()),
        )
        .subcommand(
            SubCommand::with_name("check-admin")
                .about("Check an admin token against an election secret")
                .arg(secret_arg())
                .arg(Arg::with_name("TOKEN").index(1).required(true)),
        )
        .subcommand(
            SubCommand::with_name("ballots")
                .about("Print ballot tokens for a poll secret")
                .arg(secret_arg())
                .arg(
                    Arg::with_name("lo")
                        .long("lo")
                        .takes_value(true)
                        .default_value("0")
                        .help("First ballot index"),
                )
                .arg(
                    Arg::with_name("hi")
                        .long("hi")
                        .takes_value(true)
                        .required(true)
                        .help("One past the last ballot index"),
                )
                .arg(
                    Arg::with_name("url")
                        .long("url")
                        .takes_value(true)
                        .help("Print each token as a voting link: <url>?s=<token>"),
                ),
        )
        .subcommand(
            SubCommand::with_name("validate")
                .about("Print the ballot index behind a ballot token")
                .arg(secret_arg())
                .arg(
                    Arg::with_name("count")
                        .long("count")
                        .short("n")
                        .takes_value(true)
                        .help("Number of valid ballots - can also be set with VOTEE_BALLOT_COUNT"),
                )
                .arg(Arg::with_name("TOKEN").index(1).required(true)),
        )
}

fn init_tracing(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let matches = app().get_matches();
    init_tracing(matches.occurrences_of("v"));

    let config = Config::from_env();

    match matches.subcommand() {
        ("keygen", Some(matches)) => command_keygen(matches),
        ("admin-token", Some(matches)) => command_admin_token(matches, config),
        ("check-admin", Some(matches)) => command_check_admin(matches, config),
        ("ballots", Some(matches)) => command_ballots(matches, config),
        ("validate", Some(matches)) => command_validate(matches, config),
        _ => unreachable!("clap requires a subcommand"),
    }
}
