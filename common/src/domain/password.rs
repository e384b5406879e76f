use std::fmt::{Debug, Formatter};

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

const ALGORITHM: &str = "pbkdf2_sha256";
pub const DEFAULT_ITERATIONS: u32 = 600_000;
const DIGEST_LENGTH: usize = 32;

/// PBKDF2-HMAC-SHA256 password hash, stored as `pbkdf2_sha256$<iterations>$<salt>$<hex digest>`
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: String,
    digest: String,
}

impl PasswordHash {
    pub fn new(password: &str) -> Self {
        Self::with_iterations(password, DEFAULT_ITERATIONS)
    }

    /// Hash with a custom work factor, fixtures use a low one to stay fast
    pub fn with_iterations(password: &str, iterations: u32) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, password, iterations);
        Self {
            iterations,
            salt,
            digest,
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        let candidate = digest(&self.salt, password, self.iterations);
        bool::from(candidate.as_bytes().ct_eq(self.digest.as_bytes()))
    }

    pub fn encoded(&self) -> String {
        format!(
            "{}${}${}${}",
            ALGORITHM, self.iterations, self.salt, self.digest
        )
    }
}

impl TryFrom<&str> for PasswordHash {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut parts = value.splitn(4, '$');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ALGORITHM), Some(iterations), Some(salt), Some(digest))
                if !salt.is_empty() && !digest.is_empty() =>
            {
                let iterations: u32 = iterations.parse()?;
                if iterations == 0 {
                    anyhow::bail!("password hash with zero iterations");
                }
                Ok(Self {
                    iterations,
                    salt: salt.to_string(),
                    digest: digest.to_string(),
                })
            }
            _ => Err(anyhow::anyhow!("unsupported password hash format")),
        }
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

fn digest(salt: &str, password: &str, iterations: u32) -> String {
    let mut key = [0u8; DIGEST_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key.iter().map(|byte| format!("{:02x}", byte)).collect()
}
