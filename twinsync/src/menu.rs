//! The numbered menu offered at startup

use std::fmt::Write as _;

use crate::actions::Mode;
use crate::config::SyncConfig;
use crate::decision::Policy;

/// A policy together with whether to run it for real
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub policy: Policy,
    pub mode: Mode,
}

impl Choice {
    /// Menu entries in display order; entry `n` is at index `n - 1`.
    pub const ALL: [Choice; 6] = [
        Choice::new(Policy::Match, Mode::Execute),
        Choice::new(Policy::LocalToExternal, Mode::Execute),
        Choice::new(Policy::ExternalToLocal, Mode::Execute),
        Choice::new(Policy::Match, Mode::Simulate),
        Choice::new(Policy::LocalToExternal, Mode::Simulate),
        Choice::new(Policy::ExternalToLocal, Mode::Simulate),
    ];

    pub const fn new(policy: Policy, mode: Mode) -> Self {
        Self { policy, mode }
    }

    /// Parse a menu answer. Anything but a number from 1 to 6 is `None`.
    pub fn from_answer(answer: &str) -> Option<Self> {
        let number: usize = answer.trim().parse().ok()?;
        number.checked_sub(1).and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn description(&self) -> String {
        let action = match self.policy {
            Policy::Match => "Synchronise both ways.",
            Policy::LocalToExternal => "Copy from local to external.",
            Policy::ExternalToLocal => "Copy from external to local.",
        };
        match self.mode {
            Mode::Execute => action.to_string(),
            Mode::Simulate => format!("{action}  Simulate."),
        }
    }
}

/// Banner and options shown before asking for a choice
pub fn menu_text(config: &SyncConfig) -> String {
    let directories: Vec<String> = config
        .directories
        .iter()
        .map(|d| d.display().to_string())
        .collect();

    let mut text = String::new();
    text.push_str("Synchronise files between local and external filesystems.\n");
    let _ = writeln!(text, "Local = {}", config.local_root.display());
    let _ = writeln!(text, "External = {}", config.external_root.display());
    let _ = writeln!(text, "Directories to sync: {}", directories.join(", "));
    text.push_str("\nOptions:\n");
    for (index, choice) in Choice::ALL.iter().enumerate() {
        let _ = writeln!(text, "[{}] {}", index + 1, choice.description());
    }
    text.push_str("Choice (other to quit): ");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use test_case::test_case;

    #[test_case("1", Policy::Match, Mode::Execute)]
    #[test_case("2", Policy::LocalToExternal, Mode::Execute)]
    #[test_case("3", Policy::ExternalToLocal, Mode::Execute)]
    #[test_case("4", Policy::Match, Mode::Simulate)]
    #[test_case("5", Policy::LocalToExternal, Mode::Simulate)]
    #[test_case(" 6 ", Policy::ExternalToLocal, Mode::Simulate)]
    fn test_valid_answers(answer: &str, policy: Policy, mode: Mode) {
        assert_eq!(Choice::from_answer(answer), Some(Choice::new(policy, mode)));
    }

    #[test_case(""; "empty")]
    #[test_case("0"; "zero")]
    #[test_case("7"; "past the end")]
    #[test_case("-1"; "negative")]
    #[test_case("two"; "word")]
    #[test_case("1.0"; "decimal")]
    fn test_invalid_answers_quit(answer: &str) {
        assert_eq!(Choice::from_answer(answer), None);
    }

    #[test]
    fn test_menu_lists_roots_and_options() {
        let directories = vec![PathBuf::from("a"), PathBuf::from("b/c")];
        let config = SyncConfig::new("/home/me", "/mnt/usb", directories);
        let text = menu_text(&config);
        assert!(text.contains("Local = /home/me\n"));
        assert!(text.contains("External = /mnt/usb\n"));
        assert!(text.contains("Directories to sync: a, b/c\n"));
        assert!(text.contains("[4] Synchronise both ways.  Simulate.\n"));
        assert!(text.ends_with("Choice (other to quit): "));
    }
}
