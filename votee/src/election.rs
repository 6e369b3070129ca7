use crate::*;
use uuid::Uuid;

/// An election groups polls and owns the admin secret
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Election {
    pub id: Uuid,
    pub name: String,
    pub slug: String,

    /// Key behind the election's admin token. Generated once, never rotated.
    pub admin_secret: Secret,
}

impl Election {
    /// Create a new election with a freshly generated admin secret
    pub fn new(name: &str, slug: &str) -> Self {
        Election {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            slug: slug.to_owned(),
            admin_secret: Secret::generate(),
        }
    }
}

/// Settings owned by the surrounding application that gate voting on a poll.
///
/// Missing fields deserialize to their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PollSettings {
    /// Number of selections each ballot must carry
    pub votes_per_ballot: u32,

    /// Whether ballots may currently be redeemed
    pub accepting_votes: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            votes_per_ballot: 1,
            accepting_votes: false,
        }
    }
}

/// A single question in an election
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Poll {
    pub id: Uuid,
    pub election: Uuid,
    pub name: String,
    pub slug: String,

    /// Key behind the poll's ballot tokens. Generated once, never rotated.
    pub ballot_secret: Secret,

    /// Ballot slots `0..number_of_ballots` are valid.
    ///
    /// Raising this extends the range without reissuing earlier tokens.
    pub number_of_ballots: u64,

    #[serde(default)]
    pub settings: PollSettings,
}

impl Poll {
    /// Create a new poll with a freshly generated ballot secret and no valid ballots
    pub fn new(election: &Election, name: &str, slug: &str) -> Self {
        Poll {
            id: Uuid::new_v4(),
            election: election.id,
            name: name.to_owned(),
            slug: slug.to_owned(),
            ballot_secret: Secret::generate(),
            number_of_ballots: 0,
            settings: PollSettings::default(),
        }
    }
}

/// Something a voter can select in a poll
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PollOption {
    pub id: Uuid,
    pub poll: Uuid,

    /// A blank name marks an abstain option
    #[serde(default)]
    pub name: String,
}

impl PollOption {
    pub fn new(poll: &Poll, name: &str) -> Self {
        PollOption {
            id: Uuid::new_v4(),
            poll: poll.id,
            name: name.to_owned(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}
