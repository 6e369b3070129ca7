#[macro_use]
extern crate serde;

mod capability;
mod election;
mod error;
mod permutation;
mod secret;
mod service;
mod store;
mod token;

pub use capability::*;
pub use election::*;
pub use error::*;
pub use permutation::*;
pub use secret::*;
pub use service::*;
pub use store::*;
pub use token::*;

#[cfg(test)]
mod tests;
