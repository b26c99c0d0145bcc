//! Procedure resolution.

/// Operations the dispatcher knows how to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Procedure {
    SendMoney,
    Unknown(String),
}

impl Procedure {
    /// Resolve an HTTP request path.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/SendMoney" => Procedure::SendMoney,
            other => Procedure::Unknown(other.to_string()),
        }
    }

    /// Resolve a sub-command name.
    pub fn from_command(name: &str) -> Self {
        match name {
            "send" => Procedure::SendMoney,
            other => Procedure::Unknown(other.to_string()),
        }
    }

    /// Label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Procedure::SendMoney => "send_money",
            Procedure::Unknown(_) => "unknown",
        }
    }
}
