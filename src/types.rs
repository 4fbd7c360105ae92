//! Shared types used across the codebase

use std::fmt;

/// Statements the expense gateway issues against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    List,
    Insert,
    Update,
    Ping,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "query",
            Operation::List => "list",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Ping => "ping",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a statement's lifecycle a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Exec,
    Scan,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Exec => "exec",
            Stage::Scan => "scan",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Operation::Select.to_string(), "query");
        assert_eq!(Operation::Insert.to_string(), Operation::Insert.as_str());
        assert_eq!(Stage::Prepare.to_string(), "prepare");
        assert_eq!(format!("{}", Stage::Scan), "scan");
    }
}
