//! Lookup keys for the dependency container.

use std::fmt;

/// Identifies one logical dependency held by the [`Container`](super::Container).
///
/// Tokens compare and hash structurally, so the same variant always addresses
/// the same registration no matter where it is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    /// The environment-derived [`AppConfig`](crate::config::AppConfig).
    Config,
    /// The service [`Logger`](crate::logging::Logger).
    Logger,
}

impl Token {
    /// Every token, in declaration order.
    pub const ALL: [Token; 2] = [Token::Config, Token::Logger];

    /// Human-readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Token::Config => "Config",
            Token::Logger => "Logger",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
