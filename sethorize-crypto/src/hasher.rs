use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("malformed argon2 hash")]
    BadFormat,
    #[error("argon2 derivation failed")]
    Crypto,
}

/// Cost parameters carried inside every encoded hash.
///
/// Verification re-reads these from the stored string, so rows hashed under
/// older defaults keep verifying after the defaults change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub time: u32,
    pub parallelism: u32,
    pub salt_length: usize,
    pub key_length: usize,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            time: 2,
            parallelism: 4,
            salt_length: 16,
            key_length: 32,
        }
    }
}

/// Argon2id hasher producing self-describing encoded strings of the form
/// `$argon2id$v=19$m=<mem>,t=<time>,p=<par>$<b64 salt>$<b64 key>` with
/// standard padded base64 segments.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Argon2Params,
}

impl Argon2Hasher {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let mut salt = vec![0u8; self.params.salt_length];
        OsRng.fill_bytes(&mut salt);
        let key = derive(password.as_bytes(), &salt, &self.params)?;
        Ok(format!(
            "$argon2id$v=19$m={},t={},p={}${}${}",
            self.params.memory_kib,
            self.params.time,
            self.params.parallelism,
            STANDARD.encode(&salt),
            STANDARD.encode(&key),
        ))
    }

    /// Recomputes the derived key with the parameters encoded in `encoded`
    /// and compares it against the stored key in constant time.
    pub fn compare(&self, password: &str, encoded: &str) -> Result<bool, HashError> {
        let (params, salt, expected) = parse_encoded(encoded)?;
        let computed = derive(password.as_bytes(), &salt, &params)?;
        if computed.len() != expected.len() {
            return Ok(false);
        }
        Ok(bool::from(computed.ct_eq(&expected)))
    }
}

fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>, HashError> {
    let kdf_params = Params::new(
        params.memory_kib,
        params.time,
        params.parallelism,
        Some(params.key_length),
    )
    .map_err(|_| HashError::Crypto)?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, kdf_params);
    let mut out = vec![0u8; params.key_length];
    argon
        .hash_password_into(password, salt, &mut out)
        .map_err(|_| HashError::Crypto)?;
    Ok(out)
}

fn parse_encoded(encoded: &str) -> Result<(Argon2Params, Vec<u8>, Vec<u8>), HashError> {
    let parts: Vec<&str> = encoded.split('$').collect();
    if parts.len() != 6 || !parts[0].is_empty() || parts[1] != "argon2id" || parts[2] != "v=19" {
        return Err(HashError::BadFormat);
    }

    let mut memory_kib: Option<u32> = None;
    let mut time: Option<u32> = None;
    let mut parallelism: Option<u32> = None;
    for param in parts[3].split(',') {
        let (name, value) = param.split_once('=').ok_or(HashError::BadFormat)?;
        let value: u32 = value.parse().map_err(|_| HashError::BadFormat)?;
        match name {
            "m" => memory_kib = Some(value),
            "t" => time = Some(value),
            "p" => parallelism = Some(value),
            _ => return Err(HashError::BadFormat),
        }
    }
    let (memory_kib, time, parallelism) = match (memory_kib, time, parallelism) {
        (Some(m), Some(t), Some(p)) => (m, t, p),
        _ => return Err(HashError::BadFormat),
    };

    let salt = STANDARD
        .decode(parts[4])
        .map_err(|_| HashError::BadFormat)?;
    let key = STANDARD
        .decode(parts[5])
        .map_err(|_| HashError::BadFormat)?;
    let params = Argon2Params {
        memory_kib,
        time,
        parallelism,
        salt_length: salt.len(),
        key_length: key.len(),
    };
    Ok((params, salt, key))
}
