//! Work-item status
//!
//! Every work item (requirement, task, feature) carries one of exactly five
//! statuses. The persisted form is a single symbol character; dashboards and
//! documentation tooling key off these symbols, so they are wire-stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid status symbol: expected one of '+', '~', '-', '?', '=', got '{0}'")]
pub struct StatusParseError(String);

/// Status of a work item
///
/// Symbol encoding: `+` Done, `~` In-Progress, `-` Pending, `?` Blocked,
/// `=` Deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    Done,
    InProgress,
    #[default]
    Pending,
    Blocked,
    Deferred,
}

impl Status {
    /// All statuses, in board display order
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::InProgress,
        Status::Blocked,
        Status::Deferred,
        Status::Done,
    ];

    /// Returns the single-character wire symbol
    pub fn symbol(&self) -> char {
        match self {
            Status::Done => '+',
            Status::InProgress => '~',
            Status::Pending => '-',
            Status::Blocked => '?',
            Status::Deferred => '=',
        }
    }

    /// Returns a human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Status::Done => "done",
            Status::InProgress => "in-progress",
            Status::Pending => "pending",
            Status::Blocked => "blocked",
            Status::Deferred => "deferred",
        }
    }

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Done)
    }

    /// Returns true if the item is declared blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, Status::Blocked)
    }

    /// Returns true if the item has been deferred
    pub fn is_deferred(&self) -> bool {
        matches!(self, Status::Deferred)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Status::Done),
            "~" => Ok(Status::InProgress),
            "-" => Ok(Status::Pending),
            "?" => Ok(Status::Blocked),
            "=" => Ok(Status::Deferred),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.symbol().to_string()
    }
}
