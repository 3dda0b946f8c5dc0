use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

/// Composite opaque bearer: standard padded base64 of `"<row-id>:<secret>"`.
/// The row id selects the stored row; the secret half is compared against
/// the stored argon2 hash.
pub fn encode_composite(id: Uuid, secret: &str) -> String {
    STANDARD.encode(format!("{id}:{secret}"))
}

/// Strict decode of a composite bearer: standard padded base64, UTF-8,
/// exactly one `:`, and an id half that parses as a UUID.
pub fn decode_composite(raw: &str) -> Option<(Uuid, String)> {
    let decoded = STANDARD.decode(raw).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    if secret.is_empty() || secret.contains(':') {
        return None;
    }
    let id = Uuid::parse_str(id).ok()?;
    Some((id, secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let id = Uuid::new_v4();
        let encoded = encode_composite(id, "s3cret+value==");
        let (decoded_id, secret) = decode_composite(&encoded).unwrap();
        assert_eq!(decoded_id, id);
        assert_eq!(secret, "s3cret+value==");
    }

    #[test]
    fn rejects_inputs_without_exactly_one_separator() {
        let id = Uuid::new_v4();
        assert!(decode_composite(&STANDARD.encode(id.to_string())).is_none());
        assert!(decode_composite(&STANDARD.encode(format!("{id}:a:b"))).is_none());
        assert!(decode_composite(&STANDARD.encode(format!("{id}:"))).is_none());
    }

    #[test]
    fn rejects_non_uuid_ids_and_bad_base64() {
        assert!(decode_composite(&STANDARD.encode("not-a-uuid:secret")).is_none());
        assert!(decode_composite("!!! not base64 !!!").is_none());
        // Unpadded variants of a padded encoding are refused too.
        let id = Uuid::new_v4();
        let padded = encode_composite(id, "secret");
        let unpadded = padded.trim_end_matches('=').to_string();
        if unpadded.len() != padded.len() {
            assert!(decode_composite(&unpadded).is_none());
        }
    }
}
