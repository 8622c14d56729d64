use rand::{rngs::OsRng, RngCore};
use scrypt::{scrypt, Params};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Scheme tag stored alongside every protected form.
pub const PROTECTION_SCHEME: &str = "lizard.v1";

pub const SALT_LEN: usize = 32;
pub const KEY_LEN: usize = 64;
/// hex(salt ‖ key)
pub const PROTECTED_FORM_LEN: usize = 2 * (SALT_LEN + KEY_LEN);

// scrypt cost: N = 2^15, r = 8, p = 1. Changing these breaks every stored
// credential tagged `lizard.v1`.
const LOG_N: u8 = 15;
const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("secure random source failed: {0}")]
    Entropy(#[from] rand::Error),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("stored credential is malformed")]
    MalformedProtectedForm,

    #[error("unsupported protection scheme: {0}")]
    UnsupportedScheme(String),
}

/// Salt and derived key of one password, as persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct ProtectedCredential {
    salt: [u8; SALT_LEN],
    derived_key: [u8; KEY_LEN],
}

impl ProtectedCredential {
    pub fn scheme(&self) -> &'static str {
        PROTECTION_SCHEME
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Lowercase hex of `salt ‖ derived_key`, always 192 characters.
    pub fn encode(&self) -> String {
        let mut bytes = Vec::with_capacity(SALT_LEN + KEY_LEN);
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.derived_key);
        hex::encode(bytes)
    }

    /// First 64 hex characters are the salt, the remaining 128 the key.
    pub fn decode(protected_form: &str) -> Result<Self, CredentialError> {
        if protected_form.len() != PROTECTED_FORM_LEN {
            return Err(CredentialError::MalformedProtectedForm);
        }
        let bytes = hex::decode(protected_form).map_err(|_| CredentialError::MalformedProtectedForm)?;
        let (salt, key) = bytes.split_at(SALT_LEN);
        Ok(Self {
            salt: salt.try_into().map_err(|_| CredentialError::MalformedProtectedForm)?,
            derived_key: key.try_into().map_err(|_| CredentialError::MalformedProtectedForm)?,
        })
    }
}

impl std::fmt::Debug for ProtectedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectedCredential").field("scheme", &PROTECTION_SCHEME).finish_non_exhaustive()
    }
}

/// Derives and checks salted scrypt password hashes with fixed cost
/// parameters.
#[derive(Clone)]
pub struct CredentialProtector {
    params: Params,
}

impl CredentialProtector {
    pub fn new() -> Result<Self, CredentialError> {
        let params = Params::new(LOG_N, BLOCK_SIZE, PARALLELISM, KEY_LEN)
            .map_err(|e| CredentialError::Derivation(e.to_string()))?;
        Ok(Self { params })
    }

    /// Fails rather than returning a credential built from partial output.
    pub fn protect(&self, password: &str) -> Result<ProtectedCredential, CredentialError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.try_fill_bytes(&mut salt)?;
        let derived_key = self.derive(password.as_bytes(), &salt)?;
        Ok(ProtectedCredential { salt, derived_key })
    }

    /// Re-derives with the stored salt and compares in constant time.
    pub fn verify(&self, password: &str, scheme: &str, protected_form: &str) -> Result<bool, CredentialError> {
        if scheme != PROTECTION_SCHEME {
            return Err(CredentialError::UnsupportedScheme(scheme.to_string()));
        }
        let stored = ProtectedCredential::decode(protected_form)?;
        let derived = self.derive(password.as_bytes(), &stored.salt)?;
        Ok(derived[..].ct_eq(&stored.derived_key[..]).into())
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN], CredentialError> {
        let mut key = [0u8; KEY_LEN];
        scrypt(password, salt, &self.params, &mut key).map_err(|e| CredentialError::Derivation(e.to_string()))?;
        Ok(key)
    }
}
