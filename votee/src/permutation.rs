//! Keyed permutation between small integers and 128-bit ciphertexts.
//!
//! An index is laid out as the first of four little-endian `u32` words, the
//! other three zero, and encrypted as a single AES-128 block. Decryption
//! accepts a block only if the three trailing words are still zero and the
//! index is below the caller's bound. Any ciphertext not produced under the
//! same key passes that check with probability about `valid_count / 2^128`,
//! which makes the plaintext structure an implicit integrity check.

use crate::*;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, NewBlockCipher};
use aes::Aes128;

/// Length in bytes of a ciphertext block
pub const BLOCK_LEN: usize = 16;

fn cipher(secret: &Secret) -> Aes128 {
    Aes128::new(GenericArray::from_slice(secret.as_bytes()))
}

/// Encrypt `index` under `secret`
pub fn encrypt_index(secret: &Secret, index: u32) -> [u8; BLOCK_LEN] {
    let mut plaintext = [0u8; BLOCK_LEN];
    plaintext[..4].copy_from_slice(&index.to_le_bytes());

    let mut block = GenericArray::clone_from_slice(&plaintext);
    cipher(secret).encrypt_block(&mut block);

    let mut ciphertext = [0u8; BLOCK_LEN];
    ciphertext.copy_from_slice(&block);
    ciphertext
}

/// Decrypt `ciphertext` under `secret`, returning the index if it is well-formed and below `valid_count`.
///
/// Wrong-length input, a wrong key, tampering and an out-of-range index are
/// all reported the same way.
pub fn decrypt_index(secret: &Secret, ciphertext: &[u8], valid_count: u64) -> Option<u32> {
    if ciphertext.len() != BLOCK_LEN {
        return None;
    }

    let mut block = GenericArray::clone_from_slice(ciphertext);
    cipher(secret).decrypt_block(&mut block);

    let mut plaintext = [0u8; BLOCK_LEN];
    plaintext.copy_from_slice(&block);
    let word = |at: usize| {
        u32::from_le_bytes([
            plaintext[at],
            plaintext[at + 1],
            plaintext[at + 2],
            plaintext[at + 3],
        ])
    };
    let index = word(0);
    let zero_tail = word(4) == 0 && word(8) == 0 && word(12) == 0;

    if !zero_tail || u64::from(index) >= valid_count {
        return None;
    }
    Some(index)
}
