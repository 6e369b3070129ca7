use crate::*;
use tracing::debug;

/// Issue the admin token for an election's admin secret.
///
/// An admin capability is the token for index 0 in a range of exactly one.
pub fn issue_admin(secret: &Secret) -> Token {
    Token::encode(&encrypt_index(secret, 0))
}

/// Check an admin token against an election's admin secret
pub fn check_admin(secret: &Secret, token: &str) -> bool {
    match decode_token(token) {
        Some(ciphertext) => decrypt_index(secret, &ciphertext, 1) == Some(0),
        None => false,
    }
}

/// Issue ballot tokens for every slot index in `lo..hi`
pub fn issue_ballots(secret: &Secret, lo: u32, hi: u32) -> Vec<Token> {
    debug!(lo, hi, "issuing ballot tokens");
    (lo..hi)
        .map(|index| Token::encode(&encrypt_index(secret, index)))
        .collect()
}

/// Recover the slot index behind a ballot token, if it is valid for a poll with `number_of_ballots` slots
pub fn validate_ballot(secret: &Secret, token: &str, number_of_ballots: u64) -> Option<u32> {
    let ciphertext = decode_token(token)?;
    decrypt_index(secret, &ciphertext, number_of_ballots)
}
