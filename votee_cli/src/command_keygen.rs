pub fn command_keygen(_matches: &clap::ArgMatches) {
    let secret = votee::Secret::generate();
    println!("secret: {}", secret.to_hex());
}
