use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Dispatch mode for tool submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Each tool calls its own dedicated endpoint.
    Manual,
    /// Every tool submits to the routing endpoint, which picks the capability.
    #[default]
    Autonomous,
}

impl Mode {
    /// Parse a mode name. Unknown values fall back to `Autonomous`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "manual" | "direct" => Self::Manual,
            _ => Self::Autonomous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Autonomous => "autonomous",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide mode flag shared by every tool controller.
///
/// Controllers read it once per `submit`; a toggle never reaches a request
/// that has already left validation.
#[derive(Debug)]
pub struct ModeSwitch {
    autonomous: AtomicBool,
}

impl ModeSwitch {
    pub fn new(mode: Mode) -> Self {
        Self {
            autonomous: AtomicBool::new(mode == Mode::Autonomous),
        }
    }

    pub fn current(&self) -> Mode {
        if self.autonomous.load(Ordering::SeqCst) {
            Mode::Autonomous
        } else {
            Mode::Manual
        }
    }

    /// Flip the flag and return the new mode.
    pub fn toggle(&self) -> Mode {
        let was_autonomous = self.autonomous.fetch_xor(true, Ordering::SeqCst);
        let mode = if was_autonomous {
            Mode::Manual
        } else {
            Mode::Autonomous
        };
        tracing::info!(mode = %mode, "Mode toggled");
        mode
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_autonomous() {
        assert_eq!(ModeSwitch::default().current(), Mode::Autonomous);
    }

    #[test]
    fn test_toggle_flips_and_returns_new_mode() {
        let switch = ModeSwitch::new(Mode::Manual);
        assert_eq!(switch.toggle(), Mode::Autonomous);
        assert_eq!(switch.current(), Mode::Autonomous);
        assert_eq!(switch.toggle(), Mode::Manual);
        assert_eq!(switch.current(), Mode::Manual);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Mode::parse("manual"), Mode::Manual);
        assert_eq!(Mode::parse(" MANUAL "), Mode::Manual);
        assert_eq!(Mode::parse("auto"), Mode::Autonomous);
        assert_eq!(Mode::parse("whatever"), Mode::Autonomous);
    }
}
