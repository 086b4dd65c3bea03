pub const PASSWORD_COST: u32 = 10;

/// bcrypt hash of a password. The plain text never leaves this type.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        Self::with_cost(password, PASSWORD_COST)
    }

    pub fn with_cost(password: &str, cost: u32) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(bcrypt::hash(password, cost)?))
    }

    /// Wraps a hash read back from storage.
    #[must_use]
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Malformed stored hashes never verify.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.0).unwrap_or(false)
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
    #[error(transparent)]
    Hashing(#[from] bcrypt::BcryptError),
}
