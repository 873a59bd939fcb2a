//! Read/starred flag update builder.

use serde::{Deserialize, Serialize};

/// Target state for an internal message's mutable flags. `None` leaves the
/// flag unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_starred: Option<bool>,
}

impl FlagUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_read.is_none() && self.is_starred.is_none()
    }
}

pub struct FlagUpdateBuilder(FlagUpdate);

impl FlagUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(FlagUpdate::default())
    }

    #[must_use]
    pub const fn is_read(mut self, val: bool) -> Self {
        self.0.is_read = Some(val);
        self
    }

    #[must_use]
    pub const fn is_starred(mut self, val: bool) -> Self {
        self.0.is_starred = Some(val);
        self
    }

    #[must_use]
    pub const fn build(self) -> FlagUpdate {
        self.0
    }
}

impl Default for FlagUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
