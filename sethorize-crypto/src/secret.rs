use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

/// Byte length of generated auth-code, refresh-token and client secrets.
pub const SECRET_LEN: usize = 32;

/// Random opaque secret: `len` bytes from the OS RNG, standard base64.
pub fn generate_secret(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_unique_and_sized() {
        let a = generate_secret(SECRET_LEN);
        let b = generate_secret(SECRET_LEN);
        assert_ne!(a, b);
        // 32 bytes → 44 chars of padded standard base64
        assert_eq!(a.len(), 44);
    }
}
