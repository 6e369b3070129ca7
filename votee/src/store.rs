use crate::*;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

/// Source of per-entity secrets and the parameters that gate voting.
///
/// Values are read fresh on every call so that changes made by the
/// surrounding application (such as raising `number_of_ballots`) apply to
/// the next validation.
pub trait SecretStore {
    /// Get an election's admin secret
    fn admin_secret(&self, election: Uuid) -> Result<Secret, Error>;

    /// Get a poll's ballot secret
    fn ballot_secret(&self, poll: Uuid) -> Result<Secret, Error>;

    /// Get the current number of valid ballot slots for a poll
    fn valid_ballot_count(&self, poll: Uuid) -> Result<u64, Error>;

    /// Get the settings that decide whether and how a poll accepts votes
    fn poll_settings(&self, poll: Uuid) -> Result<PollSettings, Error>;

    /// Get the options of a poll, in insertion order
    fn poll_options(&self, poll: Uuid) -> Result<Vec<PollOption>, Error>;
}

/// The record of spent ballot slots and the option tallies they produced.
///
/// No other component may increment a tally.
pub trait Ledger {
    /// Claim `(poll, slot)` and count one vote for every option in `options`.
    ///
    /// Returns `Ok(false)` without side effects if the slot was already
    /// claimed. The claim and all increments commit together or not at all,
    /// and of any number of concurrent calls for the same slot exactly one
    /// returns `Ok(true)`. Options are not deduplicated.
    fn redeem_ballot(&self, poll: Uuid, slot: u32, options: &[Uuid]) -> Result<bool, Error>;

    /// Check whether `(poll, slot)` has been claimed
    fn is_ballot_used(&self, poll: Uuid, slot: u32) -> Result<bool, Error>;

    /// Get the number of slots of a poll that have been claimed
    fn used_ballot_count(&self, poll: Uuid) -> Result<u64, Error>;

    /// Get the vote count of every option in a poll, in option order
    fn tally(&self, poll: Uuid) -> Result<IndexMap<Uuid, u64>, Error>;
}

#[derive(Default)]
struct Entities {
    elections: BTreeMap<Uuid, Election>,
    polls: BTreeMap<Uuid, Poll>,
    options: IndexMap<Uuid, PollOption>,
}

impl Entities {
    fn poll(&self, poll: Uuid) -> Result<&Poll, Error> {
        self.polls.get(&poll).ok_or(Error::UnknownPoll(poll))
    }

    fn poll_mut(&mut self, poll: Uuid) -> Result<&mut Poll, Error> {
        self.polls.get_mut(&poll).ok_or(Error::UnknownPoll(poll))
    }
}

#[derive(Default)]
struct LedgerState {
    used: BTreeSet<(Uuid, u32)>,
    counts: BTreeMap<Uuid, u64>,
}

/// A simple store that keeps everything in memory.
///
/// The ledger sits behind a single mutex, so claiming a slot and applying its
/// tally increments happen under one lock acquisition. Entity locks are
/// always taken before the ledger lock.
#[derive(Default)]
pub struct MemStore {
    entities: RwLock<Entities>,
    ledger: Mutex<LedgerState>,
}

impl MemStore {
    fn read(&self) -> Result<RwLockReadGuard<Entities>, Error> {
        self.entities.read().map_err(|_| Error::StorePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<Entities>, Error> {
        self.entities.write().map_err(|_| Error::StorePoisoned)
    }

    fn ledger(&self) -> Result<MutexGuard<LedgerState>, Error> {
        self.ledger.lock().map_err(|_| Error::StorePoisoned)
    }

    pub fn insert_election(&self, election: Election) -> Result<(), Error> {
        self.write()?.elections.insert(election.id, election);
        Ok(())
    }

    pub fn insert_poll(&self, poll: Poll) -> Result<(), Error> {
        let mut entities = self.write()?;
        if !entities.elections.contains_key(&poll.election) {
            return Err(Error::UnknownElection(poll.election));
        }
        entities.polls.insert(poll.id, poll);
        Ok(())
    }

    pub fn insert_option(&self, option: PollOption) -> Result<(), Error> {
        let mut entities = self.write()?;
        entities.poll(option.poll)?;
        entities.options.insert(option.id, option);
        Ok(())
    }

    pub fn get_election(&self, election: Uuid) -> Result<Election, Error> {
        self.read()?
            .elections
            .get(&election)
            .cloned()
            .ok_or(Error::UnknownElection(election))
    }

    pub fn get_poll(&self, poll: Uuid) -> Result<Poll, Error> {
        self.read()?.poll(poll).map(Clone::clone)
    }

    /// Change how many ballot slots a poll accepts.
    ///
    /// Lowering it invalidates tokens for the slots above the new bound;
    /// raising it again restores them.
    pub fn set_number_of_ballots(&self, poll: Uuid, number_of_ballots: u64) -> Result<(), Error> {
        self.write()?.poll_mut(poll)?.number_of_ballots = number_of_ballots;
        Ok(())
    }

    pub fn set_accepting_votes(&self, poll: Uuid, accepting_votes: bool) -> Result<(), Error> {
        self.write()?.poll_mut(poll)?.settings.accepting_votes = accepting_votes;
        Ok(())
    }

    pub fn set_votes_per_ballot(&self, poll: Uuid, votes_per_ballot: u32) -> Result<(), Error> {
        self.write()?.poll_mut(poll)?.settings.votes_per_ballot = votes_per_ballot;
        Ok(())
    }

    /// Close a poll and revoke all of its ballot slots.
    ///
    /// Used ballots and tallies are kept.
    pub fn reset_poll_settings(&self, poll: Uuid) -> Result<(), Error> {
        let mut entities = self.write()?;
        let poll = entities.poll_mut(poll)?;
        poll.settings = PollSettings::default();
        poll.number_of_ballots = 0;
        Ok(())
    }
}

impl SecretStore for MemStore {
    fn admin_secret(&self, election: Uuid) -> Result<Secret, Error> {
        self.read()?
            .elections
            .get(&election)
            .map(|e| e.admin_secret)
            .ok_or(Error::UnknownElection(election))
    }

    fn ballot_secret(&self, poll: Uuid) -> Result<Secret, Error> {
        Ok(self.read()?.poll(poll)?.ballot_secret)
    }

    fn valid_ballot_count(&self, poll: Uuid) -> Result<u64, Error> {
        Ok(self.read()?.poll(poll)?.number_of_ballots)
    }

    fn poll_settings(&self, poll: Uuid) -> Result<PollSettings, Error> {
        Ok(self.read()?.poll(poll)?.settings.clone())
    }

    fn poll_options(&self, poll: Uuid) -> Result<Vec<PollOption>, Error> {
        let entities = self.read()?;
        entities.poll(poll)?;
        Ok(entities
            .options
            .values()
            .filter(|o| o.poll == poll)
            .cloned()
            .collect())
    }
}

impl Ledger for MemStore {
    fn redeem_ballot(&self, poll: Uuid, slot: u32, options: &[Uuid]) -> Result<bool, Error> {
        let entities = self.read()?;
        entities.poll(poll)?;
        for option in options {
            match entities.options.get(option) {
                Some(o) if o.poll == poll => {}
                _ => return Err(Error::UnknownOption(*option)),
            }
        }

        let mut ledger = self.ledger()?;
        if !ledger.used.insert((poll, slot)) {
            warn!(%poll, slot, "ballot already used");
            return Ok(false);
        }
        for option in options {
            *ledger.counts.entry(*option).or_insert(0) += 1;
        }

        info!(%poll, slot, selections = options.len(), "ballot redeemed");
        Ok(true)
    }

    fn is_ballot_used(&self, poll: Uuid, slot: u32) -> Result<bool, Error> {
        Ok(self.ledger()?.used.contains(&(poll, slot)))
    }

    fn used_ballot_count(&self, poll: Uuid) -> Result<u64, Error> {
        self.read()?.poll(poll)?;
        let ledger = self.ledger()?;
        Ok(ledger.used.range((poll, 0)..=(poll, u32::MAX)).count() as u64)
    }

    fn tally(&self, poll: Uuid) -> Result<IndexMap<Uuid, u64>, Error> {
        let entities = self.read()?;
        entities.poll(poll)?;
        let ledger = self.ledger()?;

        Ok(entities
            .options
            .values()
            .filter(|o| o.poll == poll)
            .map(|o| (o.id, ledger.counts.get(&o.id).copied().unwrap_or(0)))
            .collect())
    }
}
