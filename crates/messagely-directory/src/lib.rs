//! Account directory: registration, credential checks, login bookkeeping and
//! the user/message read queries, on top of `messagely-db`.

pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod hasher;
mod records;

pub use clock::{Clock, SystemClock};
pub use config::{AuthPolicy, DirectoryConfig, HashCost};
pub use directory::AccountDirectory;
pub use error::{DirectoryError, ErrorKind};
pub use hasher::{Argon2Hasher, CredentialHasher};
