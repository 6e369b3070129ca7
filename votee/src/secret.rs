use crate::*;
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

/// Length in bytes of every admin and ballot secret
pub const SECRET_LEN: usize = 16;

/// A 128-bit per-entity key.
///
/// Elections own one (the admin secret) and polls own one (the ballot secret).
/// A secret is generated once when its entity is created and never rotated:
/// replacing it would invalidate every token issued under it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    /// Generate a fresh secret from the operating system's CSPRNG
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let mut bytes = [0u8; SECRET_LEN];
        csprng.fill_bytes(&mut bytes);
        Secret(bytes)
    }

    pub fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Secret(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; SECRET_LEN] = bytes.try_into().map_err(|_| Error::SecretBadLen)?;
        Ok(Secret(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Secret {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|_| Error::SecretBadHex)?;
        Secret::from_slice(&bytes)
    }
}

// Never print key material
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Secret::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_differ() {
        let a = Secret::generate();
        let b = Secret::generate();
        assert!(a != b);
    }

    #[test]
    fn hex_round_trip() {
        let secret = Secret::generate();
        let parsed: Secret = secret.to_hex().parse().unwrap();
        assert!(parsed == secret);

        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", secret.to_hex()));
        let back: Secret = serde_json::from_str(&json).unwrap();
        assert!(back == secret);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Secret::from_str("not hex at all"),
            Err(Error::SecretBadHex)
        ));
        assert!(matches!(
            Secret::from_str("00112233"),
            Err(Error::SecretBadLen)
        ));
        assert!(Secret::from_slice(&[0u8; 17]).is_err());
    }

    #[test]
    fn debug_is_redacted() {
        let secret = Secret::from_bytes([0xab; SECRET_LEN]);
        assert!(!format!("{:?}", secret).contains("ab"));
    }
}
