// Menu actions and the profiles that decide which of them are offered.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ListAssistants,
    CreateAssistant,
    ChatWithAssistant,
    UploadFile,
    CreateThread,
    Exit,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ListAssistants => "List Assistants",
            MenuAction::CreateAssistant => "Create Assistant",
            MenuAction::ChatWithAssistant => "Chat with Assistant",
            MenuAction::UploadFile => "Upload File",
            MenuAction::CreateThread => "Create Thread",
            MenuAction::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which set of actions the main menu shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuProfile {
    #[default]
    Standard,
    /// Standard actions plus "Create Thread".
    Extended,
}

impl MenuProfile {
    /// Actions in display order; `Exit` is always last.
    pub fn actions(self) -> Vec<MenuAction> {
        let mut actions = vec![
            MenuAction::ListAssistants,
            MenuAction::CreateAssistant,
            MenuAction::ChatWithAssistant,
            MenuAction::UploadFile,
        ];
        if self == MenuProfile::Extended {
            actions.push(MenuAction::CreateThread);
        }
        actions.push(MenuAction::Exit);
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_menu_has_no_create_thread() {
        let actions = MenuProfile::Standard.actions();
        assert_eq!(actions.len(), 5);
        assert!(!actions.contains(&MenuAction::CreateThread));
        assert_eq!(actions.last(), Some(&MenuAction::Exit));
    }

    #[test]
    fn extended_menu_adds_create_thread_before_exit() {
        let labels: Vec<_> = MenuProfile::Extended
            .actions()
            .into_iter()
            .map(MenuAction::label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "List Assistants",
                "Create Assistant",
                "Chat with Assistant",
                "Upload File",
                "Create Thread",
                "Exit"
            ]
        );
    }
}
