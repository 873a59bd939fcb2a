use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated principal before role resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    /// Opaque per-sign-in identifier. Scopes the role cache.
    pub session_id: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Principal {
    /// New principal with a random 128-bit hex session ID.
    ///
    /// # Errors
    ///
    /// Returns the OS RNG error if randomness is unavailable.
    pub fn new(email: &str) -> Result<Self, getrandom::Error> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes)?;
        let session_id = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Ok(Self {
            email: email.to_string(),
            session_id,
            signed_in_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_hex_and_distinct() {
        let a = Principal::new("d@x.com").unwrap();
        let b = Principal::new("d@x.com").unwrap();
        assert_eq!(a.session_id.len(), 32);
        assert!(a.session_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.session_id, b.session_id);
    }
}
