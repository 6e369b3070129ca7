use thiserror::Error;
use uuid::Uuid;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("votee: unknown election {0}")]
    UnknownElection(Uuid),

    #[error("votee: unknown poll {0}")]
    UnknownPoll(Uuid),

    #[error("votee: option {0} does not exist in poll")]
    UnknownOption(Uuid),

    #[error("votee: invalid secret - invalid hexidecimal")]
    SecretBadHex,

    #[error("votee: invalid secret - wrong length")]
    SecretBadLen,

    #[error("votee: malformed token")]
    TokenMalformed,

    #[error("votee: store lock poisoned")]
    StorePoisoned,
}

/// Reasons a vote was not counted
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("votee vote: voting key is not valid")]
    InvalidToken,

    #[error("votee vote: ballot has already been used")]
    AlreadyVoted,

    #[error("votee vote: poll is not accepting votes")]
    NotAcceptingVotes,

    #[error("votee vote: expected {expected} selections, found {found}")]
    WrongNumberOfSelections { expected: u32, found: usize },

    #[error("votee vote: cannot vote for the same option more than once")]
    DuplicateSelection,

    #[error("votee vote: option {0} is not part of this poll")]
    OptionNotInPoll(Uuid),

    #[error("votee vote: {0}")]
    Store(#[from] Error),
}
