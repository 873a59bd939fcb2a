//! Visibility policy: which internal messages an identity may see per inbox tab.
//!
//! ```text
//!                       inbox              sent               starred              important
//! driver/coordinator    receiver == self   sender == self     inbox AND starred    inbox AND unread
//! admin                 sender != self     sender == self     inbox AND starred    inbox + external store
//! ```
//!
//! Placeholder tabs (snoozed, drafts, spam, junk, trash) apply the inbox row
//! unchanged. [`predicate`] is pure; the database layer translates the result
//! into SQL and [`QueryPredicate::matches`] evaluates it in memory.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Identity, InternalMessage};
use crate::enums::InboxFilter;

/// Internal message column a condition tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    SenderEmail,
    ReceiverEmail,
    IsRead,
    IsStarred,
}

impl Column {
    /// Column name in the `contact` table.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::SenderEmail => "sender_email",
            Self::ReceiverEmail => "receiver_email",
            Self::IsRead => "is_read",
            Self::IsStarred => "is_starred",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
}

impl Comparison {
    #[must_use]
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Text(String),
    Flag(bool),
}

/// A single `column <op> operand` test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub column: Column,
    pub comparison: Comparison,
    pub operand: Operand,
}

impl Condition {
    fn text(column: Column, comparison: Comparison, value: &str) -> Self {
        Self {
            column,
            comparison,
            operand: Operand::Text(value.to_string()),
        }
    }

    fn flag(column: Column, value: bool) -> Self {
        Self {
            column,
            comparison: Comparison::Eq,
            operand: Operand::Flag(value),
        }
    }

    /// Evaluate against a message. A text operand on a flag column (or the
    /// reverse) never matches.
    #[must_use]
    pub fn matches(&self, message: &InternalMessage) -> bool {
        let equal = match (&self.operand, self.column) {
            (Operand::Text(v), Column::SenderEmail) => message.sender_email == *v,
            (Operand::Text(v), Column::ReceiverEmail) => message.receiver_email == *v,
            (Operand::Flag(v), Column::IsRead) => message.is_read == *v,
            (Operand::Flag(v), Column::IsStarred) => message.is_starred == *v,
            _ => return false,
        };
        match self.comparison {
            Comparison::Eq => equal,
            Comparison::Ne => !equal,
        }
    }
}

/// Conjunction of conditions over the internal store, plus whether the
/// external store is merged in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct QueryPredicate {
    pub conditions: Vec<Condition>,
    /// Merge every external contact-form submission into the result.
    pub include_external: bool,
}

impl QueryPredicate {
    /// `true` when every condition holds.
    #[must_use]
    pub fn matches(&self, message: &InternalMessage) -> bool {
        self.conditions.iter().all(|c| c.matches(message))
    }
}

/// Compute the visibility predicate for `identity` on the `filter` tab.
#[must_use]
pub fn predicate(identity: &Identity, filter: InboxFilter) -> QueryPredicate {
    let me = identity.email.as_str();
    let admin = identity.is_admin();

    // Sent and Inbox keep separate rules: admin Inbox uses `!=` and Sent `==`
    // on the same column.
    let base = match (admin, filter) {
        (_, InboxFilter::Sent) => Condition::text(Column::SenderEmail, Comparison::Eq, me),
        (true, _) => Condition::text(Column::SenderEmail, Comparison::Ne, me),
        (false, _) => Condition::text(Column::ReceiverEmail, Comparison::Eq, me),
    };

    let mut conditions = vec![base];
    let mut include_external = false;
    match filter {
        InboxFilter::Starred => conditions.push(Condition::flag(Column::IsStarred, true)),
        InboxFilter::Important if admin => include_external = true,
        InboxFilter::Important => conditions.push(Condition::flag(Column::IsRead, false)),
        _ => {}
    }

    QueryPredicate {
        conditions,
        include_external,
    }
}

/// Whether `identity` may act on `message` at all: it sits in the principal's
/// inbox or sent scope.
#[must_use]
pub fn can_access(identity: &Identity, message: &InternalMessage) -> bool {
    predicate(identity, InboxFilter::Inbox).matches(message)
        || predicate(identity, InboxFilter::Sent).matches(message)
}
