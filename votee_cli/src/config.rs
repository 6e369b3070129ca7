use std::env::var;
use votee::Secret;

/// Settings that may come from the environment, overridden by flags
#[derive(Default, Clone)]
pub struct Config {
    pub secret: Option<String>,
    pub number_of_ballots: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            secret: var("VOTEE_SECRET").ok(),
            number_of_ballots: var("VOTEE_BALLOT_COUNT").ok(),
        }
    }

    /// Apply `--secret` and `--count` from a subcommand's arguments
    pub fn with_matches(mut self, matches: &clap::ArgMatches) -> Self {
        if let Some(secret) = matches.value_of("secret") {
            self.secret = Some(secret.to_owned());
        }
        if let Some(count) = matches.value_of("count") {
            self.number_of_ballots = Some(count.to_owned());
        }
        self
    }

    pub fn secret(&self) -> Result<Secret, String> {
        let hex = self
            .secret
            .as_deref()
            .ok_or("a secret is required: pass --secret or set VOTEE_SECRET")?;
        hex.parse::<Secret>().map_err(|e| e.to_string())
    }

    pub fn number_of_ballots(&self) -> Result<u64, String> {
        let count = self
            .number_of_ballots
            .as_deref()
            .ok_or("a ballot count is required: pass --count or set VOTEE_BALLOT_COUNT")?;
        count
            .parse::<u64>()
            .map_err(|e| format!("invalid ballot count {}: {}", count, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_env() {
        let config = Config {
            secret: Some("ffffffffffffffffffffffffffffffff".to_owned()),
            number_of_ballots: Some("3".to_owned()),
        };
        let matches = clap::App::new("test")
            .arg(clap::Arg::with_name("count").long("count").takes_value(true))
            .get_matches_from(vec!["test", "--count", "7"]);

        let config = config.with_matches(&matches);
        assert_eq!(config.number_of_ballots().unwrap(), 7);
        assert_eq!(config.secret().unwrap().as_bytes(), &[0xff; 16]);
    }

    #[test]
    fn missing_or_bad_values() {
        let config = Config::default();
        assert!(config.secret().is_err());
        assert!(config.number_of_ballots().is_err());

        let config = Config {
            secret: Some("abcd".to_owned()),
            number_of_ballots: Some("many".to_owned()),
        };
        assert!(config.secret().is_err());
        assert!(config.number_of_ballots().is_err());
    }
}
