use crate::*;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// The entry point for the surrounding application.
///
/// Wraps a store providing secrets and the ballot ledger, and exposes token
/// issuance, validation and redemption keyed by entity id.
pub struct Votee<S> {
    store: S,
}

impl<S> Votee<S>
where
    S: SecretStore + Ledger,
{
    pub fn new(store: S) -> Self {
        Votee { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue the admin token for an election
    pub fn issue_admin_token(&self, election: Uuid) -> Result<Token, Error> {
        let secret = self.store.admin_secret(election)?;
        Ok(issue_admin(&secret))
    }

    /// Check an admin token for an election
    pub fn check_admin_token(&self, election: Uuid, token: &str) -> Result<bool, Error> {
        let secret = self.store.admin_secret(election)?;
        Ok(check_admin(&secret, token))
    }

    /// Issue ballot tokens for slots `lo..hi` of a poll.
    ///
    /// The range is not checked against the poll's current number of ballots.
    pub fn issue_ballot_tokens(&self, poll: Uuid, lo: u32, hi: u32) -> Result<Vec<Token>, Error> {
        let secret = self.store.ballot_secret(poll)?;
        Ok(issue_ballots(&secret, lo, hi))
    }

    /// Recover the slot index of a ballot token, or `None` if it is not valid for this poll right now
    pub fn validate_ballot_token(&self, poll: Uuid, token: &str) -> Result<Option<u32>, Error> {
        let secret = self.store.ballot_secret(poll)?;
        let number_of_ballots = self.store.valid_ballot_count(poll)?;
        Ok(validate_ballot(&secret, token, number_of_ballots))
    }

    /// Spend a ballot slot and count its selections. See [`Ledger::redeem_ballot`].
    pub fn redeem_ballot(&self, poll: Uuid, slot: u32, options: &[Uuid]) -> Result<bool, Error> {
        self.store.redeem_ballot(poll, slot, options)
    }

    pub fn is_ballot_used(&self, poll: Uuid, slot: u32) -> Result<bool, Error> {
        self.store.is_ballot_used(poll, slot)
    }

    /// Number of ballots of a poll that have been spent
    pub fn used_ballot_count(&self, poll: Uuid) -> Result<u64, Error> {
        self.store.used_ballot_count(poll)
    }

    pub fn tally(&self, poll: Uuid) -> Result<IndexMap<Uuid, u64>, Error> {
        self.store.tally(poll)
    }

    /// Cast a vote with a ballot token.
    ///
    /// `selections` must hold exactly `votes_per_ballot` options of this poll.
    /// Blank options may be selected any number of times and count once per
    /// ballot; other options may be selected at most once. Returns the slot
    /// index that was spent.
    pub fn cast_vote(&self, poll: Uuid, token: &str, selections: &[Uuid]) -> Result<u32, VoteError> {
        let slot = self
            .validate_ballot_token(poll, token)?
            .ok_or(VoteError::InvalidToken)?;

        if self.store.is_ballot_used(poll, slot)? {
            return Err(VoteError::AlreadyVoted);
        }

        let settings = self.store.poll_settings(poll)?;
        if !settings.accepting_votes {
            return Err(VoteError::NotAcceptingVotes);
        }
        if selections.len() != settings.votes_per_ballot as usize {
            return Err(VoteError::WrongNumberOfSelections {
                expected: settings.votes_per_ballot,
                found: selections.len(),
            });
        }

        let options: IndexMap<Uuid, PollOption> = self
            .store
            .poll_options(poll)?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let mut seen = HashSet::new();
        let mut chosen = Vec::with_capacity(selections.len());
        for id in selections {
            let option = options.get(id).ok_or(VoteError::OptionNotInPoll(*id))?;
            if seen.insert(*id) {
                chosen.push(*id);
            } else if !option.is_blank() {
                return Err(VoteError::DuplicateSelection);
            }
        }

        debug!(%poll, slot, "casting vote");
        if !self.store.redeem_ballot(poll, slot, &chosen)? {
            return Err(VoteError::AlreadyVoted);
        }
        Ok(slot)
    }
}
