//! Response Formatter - turns a matched entry into display text.

use faq_base::KnowledgeEntry;

/// Default disclaimer appended to every answer.
pub const DEFAULT_DISCLAIMER: &str = "⚠️ Ответ носит информационный характер и не является официальным юридическим заключением. \
Для индивидуальной ситуации используйте кнопку «✉️ Задать вопрос преподавателю».";

const LAW_LABEL: &str = "🔷 Нормативная база";
const QUESTION_LABEL: &str = "❓ Вопрос";
const IDEAL_ANSWER_LABEL: &str = "✅ Эталонный ответ";
const COMMENT_LABEL: &str = "💬 Комментарий";
const MISTAKE_LABEL: &str = "⚠️ Типичная ошибка";

/// Builds answer text from entry payloads.
#[derive(Debug, Clone)]
pub struct Formatter {
    disclaimer: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_DISCLAIMER)
    }
}

impl Formatter {
    /// Create a formatter with the given disclaimer. An empty disclaimer is
    /// omitted from output.
    pub fn new(disclaimer: impl Into<String>) -> Self {
        Self {
            disclaimer: disclaimer.into(),
        }
    }

    /// Format a matched entry.
    pub fn format(&self, entry: &KnowledgeEntry) -> String {
        let payload = &entry.payload;
        let mut blocks: Vec<String> = Vec::new();

        if payload.is_exam_card() {
            let lines: Vec<String> = [
                (QUESTION_LABEL, &payload.question),
                (IDEAL_ANSWER_LABEL, &payload.ideal_answer),
                (COMMENT_LABEL, &payload.comment),
                (MISTAKE_LABEL, &payload.common_mistake),
            ]
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(|v| format!("{}: {}", label, v.trim()))
            })
            .collect();
            blocks.push(lines.join("\n"));
        } else if !payload.answer_text().is_empty() {
            blocks.push(payload.answer_text().to_string());
        }

        if let Some(law) = payload.law.as_deref() {
            blocks.push(format!("{}: {}", LAW_LABEL, law.trim()));
        }

        self.finish(blocks)
    }

    /// Append the disclaimer to externally produced text.
    pub fn format_fallback(&self, text: &str) -> String {
        self.finish(vec![text.trim().to_string()])
    }

    fn finish(&self, mut blocks: Vec<String>) -> String {
        if !self.disclaimer.is_empty() {
            blocks.push(self.disclaimer.clone());
        }
        blocks.retain(|b| !b.is_empty());
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_base::{EntryId, EntryPayload};

    #[test]
    fn test_format_answer_with_law() {
        let payload = EntryPayload::answer("  Жалоба подаётся письменно. ")
            .with_law("Кодекс о здоровье, ст. 91");
        let entry = KnowledgeEntry::new(EntryId::position(0)).with_payload(payload);
        let text = Formatter::new("DISCLAIMER").format(&entry);
        assert_eq!(
            text,
            "Жалоба подаётся письменно.\n\n🔷 Нормативная база: Кодекс о здоровье, ст. 91\n\nDISCLAIMER"
        );
    }

    #[test]
    fn test_format_without_law() {
        let entry =
            KnowledgeEntry::new(EntryId::position(0)).with_payload(EntryPayload::answer("Ответ"));
        assert_eq!(Formatter::new("D").format(&entry), "Ответ\n\nD");
    }

    #[test]
    fn test_format_exam_card() {
        let mut payload = EntryPayload::default()
            .with_exam("Что такое инцидент?", "Любое непредвиденное событие");
        payload.common_mistake = Some("Путать с ошибкой".to_string());
        let entry = KnowledgeEntry::new(EntryId::position(0)).with_payload(payload);

        let text = Formatter::new("").format(&entry);
        assert!(text.starts_with("❓ Вопрос: Что такое инцидент?"));
        assert!(text.contains("✅ Эталонный ответ: Любое непредвиденное событие"));
        assert!(text.contains("⚠️ Типичная ошибка: Путать с ошибкой"));
        assert!(!text.contains("Комментарий"));
    }

    #[test]
    fn test_format_empty_payload() {
        let entry = KnowledgeEntry::new(EntryId::position(0));
        assert_eq!(Formatter::new("D").format(&entry), "D");
    }

    #[test]
    fn test_format_fallback() {
        assert_eq!(Formatter::new("D").format_fallback(" generated "), "generated\n\nD");
        assert!(Formatter::default().format_fallback("x").contains("информационный характер"));
    }
}
