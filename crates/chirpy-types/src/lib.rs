//! Foundation types for Chirpy.
//!
//! This crate provides the entity and identity types shared by every other
//! Chirpy crate. It has no I/O and no cryptography.
//!
//! # Key Types
//!
//! - [`UserId`] / [`ChirpId`]: positive, monotonically allocated identifiers
//! - [`User`]: the public view of an account (never carries a hash)
//! - [`UserRecord`]: the stored account, including its [`PasswordHash`]
//! - [`Chirp`]: a short immutable post
//! - [`Clock`]: injectable source of Unix time

pub mod chirp;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod user;

pub use chirp::{Chirp, MAX_CHIRP_LEN};
pub use error::TypeError;
pub use identity::{ChirpId, UserId};
pub use temporal::{Clock, ManualClock, SystemClock};
pub use user::{PasswordHash, User, UserRecord};
