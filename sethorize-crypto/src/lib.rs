pub mod hasher;
pub mod keys;
pub mod secret;

pub use hasher::{Argon2Hasher, Argon2Params, HashError};
pub use keys::{KeyError, KeyManager};
pub use secret::{generate_secret, SECRET_LEN};
