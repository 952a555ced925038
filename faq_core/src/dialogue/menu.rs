//! Menu buttons, commands, and input classification.

use serde::{Deserialize, Serialize};

/// A button of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuButton {
    MedicalErrors,
    Incidents,
    Complaints,
    Consent,
    Secrecy,
    Liability,
    LawBase,
    AskTeacher,
    MiniTests,
}

impl MenuButton {
    /// All buttons in menu order.
    pub const ALL: [MenuButton; 9] = [
        MenuButton::MedicalErrors,
        MenuButton::Incidents,
        MenuButton::Complaints,
        MenuButton::Consent,
        MenuButton::Secrecy,
        MenuButton::Liability,
        MenuButton::LawBase,
        MenuButton::AskTeacher,
        MenuButton::MiniTests,
    ];

    /// Button caption, also the section label of matching entries.
    pub fn label(self) -> &'static str {
        match self {
            MenuButton::MedicalErrors => "⚖️ Медицинские ошибки",
            MenuButton::Incidents => "🚨 Инциденты",
            MenuButton::Complaints => "🏥 Жалобы пациента",
            MenuButton::Consent => "✍️ Информированное согласие",
            MenuButton::Secrecy => "🔒 Врачебная тайна",
            MenuButton::Liability => "👮 Ответственность медработников",
            MenuButton::LawBase => "📄 Нормативная база",
            MenuButton::AskTeacher => "✉️ Задать вопрос преподавателю",
            MenuButton::MiniTests => "🧪 Мини-тесты",
        }
    }

    /// Recognise a button caption.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|b| b.label() == text)
    }

    /// Search phrase used when a section has no entry of its own.
    pub fn section_query(self) -> Option<&'static str> {
        match self {
            MenuButton::MedicalErrors => Some("медицинская ошибка"),
            MenuButton::Incidents => Some("инцидент"),
            MenuButton::Complaints => Some("жалоба"),
            MenuButton::Consent => Some("информированное согласие"),
            MenuButton::Secrecy => Some("врачебная тайна"),
            MenuButton::Liability => Some("ответственность"),
            MenuButton::LawBase | MenuButton::AskTeacher | MenuButton::MiniTests => None,
        }
    }
}

/// Keyboard layout of the main menu.
pub struct Menu;

impl Menu {
    /// Button captions row by row.
    pub fn rows() -> Vec<Vec<&'static str>> {
        use MenuButton::*;
        [
            vec![MedicalErrors, Incidents],
            vec![Complaints, Consent],
            vec![Secrecy, Liability],
            vec![LawBase],
            vec![AskTeacher, MiniTests],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(MenuButton::label).collect())
        .collect()
    }
}

/// A slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Menu,
    FaqCount,
    Reload,
    /// Switch exam mode on.
    Exam,
    /// Switch exam mode off.
    Faq,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "menu" => Some(Command::Menu),
            "faqcount" => Some(Command::FaqCount),
            "reload" => Some(Command::Reload),
            "exam" => Some(Command::Exam),
            "faq" => Some(Command::Faq),
            _ => None,
        }
    }
}

/// Classified user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Command(Command),
    UnknownCommand(&'a str),
    Button(MenuButton),
    Text(&'a str),
}

impl<'a> Input<'a> {
    /// Classify a message. Commands may carry a `@botname` suffix and
    /// trailing arguments, which are ignored.
    pub fn parse(text: &'a str) -> Self {
        let trimmed = text.trim();

        if let Some(rest) = trimmed.strip_prefix('/') {
            let word = rest.split_whitespace().next().unwrap_or("");
            let name = word.split('@').next().unwrap_or("").to_lowercase();
            return match Command::from_name(&name) {
                Some(command) => Input::Command(command),
                None => Input::UnknownCommand(trimmed),
            };
        }

        match MenuButton::from_label(trimmed) {
            Some(button) => Input::Button(button),
            None => Input::Text(trimmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_roundtrip() {
        for button in MenuButton::ALL {
            assert_eq!(MenuButton::from_label(button.label()), Some(button));
        }
        assert_eq!(MenuButton::from_label(" 🔒 Врачебная тайна "), Some(MenuButton::Secrecy));
        assert_eq!(MenuButton::from_label("Врачебная тайна"), None);
    }

    #[test]
    fn test_menu_layout() {
        let rows = Menu::rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().map(Vec::len).sum::<usize>(), MenuButton::ALL.len());
        assert_eq!(rows[3], vec!["📄 Нормативная база"]);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("/start"), Input::Command(Command::Start));
        assert_eq!(Input::parse(" /FAQCOUNT "), Input::Command(Command::FaqCount));
        assert_eq!(Input::parse("/reload@med_law_bot now"), Input::Command(Command::Reload));
        assert_eq!(Input::parse("/unknown"), Input::UnknownCommand("/unknown"));
    }

    #[test]
    fn test_parse_text_and_buttons() {
        assert_eq!(Input::parse("🧪 Мини-тесты"), Input::Button(MenuButton::MiniTests));
        assert_eq!(Input::parse("  что такое инцидент "), Input::Text("что такое инцидент"));
    }

    #[test]
    fn test_section_queries() {
        assert_eq!(MenuButton::Complaints.section_query(), Some("жалоба"));
        assert_eq!(MenuButton::LawBase.section_query(), None);
    }
}
