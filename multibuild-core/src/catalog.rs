//! The enumerated build-command table.

use std::collections::HashSet;

use crate::settings::Settings;
use crate::types::{BuildCommand, Label};

/// Recognized build variants plus the special-label override.
///
/// Variants are numbered from 1, matching the order they are offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCatalog {
    commands: Vec<BuildCommand>,
    special_labels: HashSet<Label>,
    special_command: BuildCommand,
}

impl BuildCatalog {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut commands: Vec<BuildCommand> = settings
            .build_commands
            .iter()
            .map(|c| BuildCommand::from(c.trim()))
            .filter(|c| !c.0.is_empty())
            .collect();
        if commands.is_empty() {
            tracing::warn!("settings list no build command; falling back to the built-in table");
            commands = Settings::default()
                .build_commands
                .into_iter()
                .map(BuildCommand::from)
                .collect();
        }

        Self {
            commands,
            special_labels: settings
                .special_labels
                .iter()
                .map(|l| Label::from(l.as_str()))
                .collect(),
            special_command: BuildCommand::from(settings.special_build_command.as_str()),
        }
    }

    /// Variant 1.
    pub fn default_command(&self) -> &BuildCommand {
        &self.commands[0]
    }

    /// 1-based lookup.
    pub fn variant(&self, index: usize) -> Option<&BuildCommand> {
        index.checked_sub(1).and_then(|i| self.commands.get(i))
    }

    pub fn commands(&self) -> &[BuildCommand] {
        &self.commands
    }

    pub fn contains(&self, command: &BuildCommand) -> bool {
        self.commands.contains(command)
    }

    pub fn is_special(&self, label: &Label) -> bool {
        self.special_labels.contains(label)
    }

    pub fn special_command(&self) -> &BuildCommand {
        &self.special_command
    }
}

impl Default for BuildCatalog {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
