use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn end_to_end_poll() {
    let store = MemStore::default();

    // Create an election and check its admin token
    let election = Election::new("Test", "tæst");
    store.insert_election(election.clone()).unwrap();
    let votee = Votee::new(store);

    let admin_token = votee.issue_admin_token(election.id).unwrap();
    assert!(votee.check_admin_token(election.id, admin_token.as_str()).unwrap());
    assert!(!votee.check_admin_token(election.id, "abc").unwrap());
    assert!(!votee.check_admin_token(election.id, "0123456789abcdef").unwrap());
    assert_eq!(
        encode_token(&decode_token(admin_token.as_str()).unwrap()),
        admin_token.as_str()
    );

    // Create a poll with no valid ballots yet
    let poll = Poll::new(&election, "Test poll", "test-poll");
    votee.store().insert_poll(poll.clone()).unwrap();

    let tokens = votee.issue_ballot_tokens(poll.id, 0, 3).unwrap();
    let (b0, b1, b2) = (tokens[0].as_str(), tokens[1].as_str(), tokens[2].as_str());
    assert_eq!(votee.validate_ballot_token(poll.id, b0).unwrap(), None);
    assert_eq!(votee.validate_ballot_token(poll.id, b1).unwrap(), None);

    // Raising the number of ballots makes already issued tokens valid
    votee.store().set_number_of_ballots(poll.id, 1).unwrap();
    assert_eq!(votee.validate_ballot_token(poll.id, b0).unwrap(), Some(0));
    assert_eq!(votee.validate_ballot_token(poll.id, b1).unwrap(), None);

    votee.store().set_number_of_ballots(poll.id, 2).unwrap();
    assert_eq!(votee.validate_ballot_token(poll.id, b0).unwrap(), Some(0));
    assert_eq!(votee.validate_ballot_token(poll.id, b1).unwrap(), Some(1));
    assert_eq!(votee.validate_ballot_token(poll.id, b2).unwrap(), None);

    // Admin tokens are not ballot tokens
    assert_eq!(
        votee.validate_ballot_token(poll.id, admin_token.as_str()).unwrap(),
        None
    );

    let potatoes = PollOption::new(&poll, "Potatoes");
    let carrots = PollOption::new(&poll, "Carrots");
    votee.store().insert_option(potatoes.clone()).unwrap();
    votee.store().insert_option(carrots.clone()).unwrap();

    assert!(votee.redeem_ballot(poll.id, 0, &[potatoes.id]).unwrap());
    assert!(!votee.redeem_ballot(poll.id, 0, &[potatoes.id]).unwrap());
    assert_eq!(votee.tally(poll.id).unwrap()[&potatoes.id], 1);

    assert!(votee.redeem_ballot(poll.id, 1, &[potatoes.id, carrots.id]).unwrap());
    assert!(!votee.redeem_ballot(poll.id, 1, &[potatoes.id]).unwrap());

    let tally = votee.tally(poll.id).unwrap();
    assert_eq!(tally[&potatoes.id], 2);
    assert_eq!(tally[&carrots.id], 1);
    assert_eq!(votee.used_ballot_count(poll.id).unwrap(), 2);
}

#[test]
fn concurrent_redemption_has_one_winner() {
    const ATTEMPTS: usize = 16;

    let store = MemStore::default();
    let election = Election::new("Test", "test");
    let poll = Poll::new(&election, "Race", "race");
    let a = PollOption::new(&poll, "A");
    let b = PollOption::new(&poll, "B");
    store.insert_election(election).unwrap();
    store.insert_poll(poll.clone()).unwrap();
    store.insert_option(a.clone()).unwrap();
    store.insert_option(b.clone()).unwrap();
    store.set_number_of_ballots(poll.id, 2).unwrap();
    store.set_accepting_votes(poll.id, true).unwrap();

    let votee = Arc::new(Votee::new(store));
    let token = votee.issue_ballot_tokens(poll.id, 1, 2).unwrap().remove(0);
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|i| {
            let votee = votee.clone();
            let barrier = barrier.clone();
            let token = token.clone();
            let choice = if i % 2 == 0 { a.id } else { b.id };
            let poll_id = poll.id;
            thread::spawn(move || {
                barrier.wait();
                let slot = votee
                    .validate_ballot_token(poll_id, token.as_str())
                    .unwrap()
                    .unwrap();
                votee.redeem_ballot(poll_id, slot, &[choice]).unwrap()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(winners, 1);

    let tally = votee.tally(poll.id).unwrap();
    assert_eq!(tally[&a.id] + tally[&b.id], 1);
    assert!(votee.is_ballot_used(poll.id, 1).unwrap());
    assert!(!votee.is_ballot_used(poll.id, 0).unwrap());
    assert_eq!(votee.used_ballot_count(poll.id).unwrap(), 1);
}

#[test]
fn concurrent_cast_vote_has_one_winner() {
    const ATTEMPTS: usize = 8;

    let store = MemStore::default();
    let election = Election::new("Test", "test");
    let poll = Poll::new(&election, "Race", "race");
    let a = PollOption::new(&poll, "A");
    store.insert_election(election).unwrap();
    store.insert_poll(poll.clone()).unwrap();
    store.insert_option(a.clone()).unwrap();
    store.set_number_of_ballots(poll.id, 1).unwrap();
    store.set_accepting_votes(poll.id, true).unwrap();

    let votee = Arc::new(Votee::new(store));
    let token = votee.issue_ballot_tokens(poll.id, 0, 1).unwrap().remove(0);
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|_| {
            let votee = votee.clone();
            let barrier = barrier.clone();
            let token = token.clone();
            let option = a.id;
            let poll_id = poll.id;
            thread::spawn(move || {
                barrier.wait();
                votee.cast_vote(poll_id, token.as_str(), &[option])
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(slot) => {
                assert_eq!(slot, 0);
                winners += 1;
            }
            Err(VoteError::AlreadyVoted) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(votee.tally(poll.id).unwrap()[&a.id], 1);
}
