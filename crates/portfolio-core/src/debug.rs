//! Operations exposed to the host for manual invocation.

use std::fmt;
use std::str::FromStr;

use crate::error::PageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    ToggleMobileMenu,
    UpdateActiveNav,
    CloseMobileMenu,
    Init,
}

impl DebugCommand {
    pub const ALL: [DebugCommand; 4] = [
        DebugCommand::ToggleMobileMenu,
        DebugCommand::UpdateActiveNav,
        DebugCommand::CloseMobileMenu,
        DebugCommand::Init,
    ];

    /// Name under which the host exposes this command.
    pub fn name(&self) -> &'static str {
        match self {
            DebugCommand::ToggleMobileMenu => "toggleMobileMenu",
            DebugCommand::UpdateActiveNav => "updateActiveNav",
            DebugCommand::CloseMobileMenu => "closeMobileMenu",
            DebugCommand::Init => "init",
        }
    }
}

impl fmt::Display for DebugCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DebugCommand {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DebugCommand::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| PageError::UnknownDebugCommand(s.to_string()))
    }
}
