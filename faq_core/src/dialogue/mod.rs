//! Dialogue Shell - platform-agnostic message handling around the ranker.
//!
//! The shell classifies each message (command, menu button, or free text),
//! consults the knowledge bases, and produces a reply. Per-user state lives in
//! a [`Session`] the host passes in; the matching core never sees it.

mod fallback;
mod menu;
mod session;

pub use fallback::*;
pub use menu::*;
pub use session::*;

use faq_base::{EntryKind, KnowledgeBase};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{BotConfig, DialogueConfig, KnowledgeConfig};
use crate::formatter::Formatter;
use crate::ranker::{arbitrate, BaseChoice, MatchResult, Ranker};

const START_TEXT: &str = "Здравствуйте! Я бот кафедры медицинского права.\n\n\
Я помогаю с типовыми вопросами: медицинские ошибки, инциденты, жалобы, \
информированное согласие, врачебная тайна, ответственность.\n\n\
Выберите раздел кнопками ниже или просто напишите вопрос текстом.";

const HELP_TEXT: &str = "Выберите раздел кнопками или напишите вопрос текстом.";

const LAW_BASE_TEXT: &str = "📄 Нормативная база (ориентиры):\n\
• Кодекс РК «О здоровье народа и системе здравоохранения»\n\
• УК / КоАП / ГК / ТК РК — по ситуации\n\
• Внутренние регламенты медорганизации и приказы уполномоченного органа\n\n\
Если напишете тему (например, «врачебная тайна»), я подскажу типовой блок норм.";

const ASK_TEACHER_TEXT: &str = "Напишите ваш вопрос одним сообщением.\n\
Формат: *Тема* → *Суть вопроса*.\n\
Не указывайте лишние персональные данные.";

const EXAM_ON_TEXT: &str = "🧪 Режим мини-тестов включён: отвечаю также по экзаменационным карточкам.\n\
Команда /faq вернёт обычный режим.";

const EXAM_OFF_TEXT: &str = "Режим мини-тестов выключен. Отвечаю по базе FAQ.";

const NO_ANSWER_TEXT: &str = "Не нашёл точного ответа в базе знаний.\n\
Попробуйте переформулировать вопрос проще (1–2 ключевых слова) \
или нажмите «✉️ Задать вопрос преподавателю».";

const SECTION_MISSING_TEXT: &str = "Информация по этому разделу пока не найдена в базе.\n\
Попробуйте задать вопрос текстом (1–2 ключевых слова).";

/// Which knowledge base produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BaseKind {
    Faq,
    Exam,
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Outcome {
    /// Free-text query matched an entry.
    Answered { base: BaseKind, score: f64 },
    /// Menu section rendered.
    Section,
    /// External responder answered.
    Fallback,
    /// Nothing matched and no fallback answered.
    NoAnswer,
    /// Command, help, or other fixed text.
    Info,
}

/// Text to send back, with the reason it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub outcome: Outcome,
}

impl Reply {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: Outcome::Info,
        }
    }

    fn no_answer() -> Self {
        Self {
            text: NO_ANSWER_TEXT.to_string(),
            outcome: Outcome::NoAnswer,
        }
    }
}

/// The current pair of knowledge bases.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub faq: Arc<KnowledgeBase>,
    pub exam: Arc<KnowledgeBase>,
}

impl Library {
    /// Wrap two knowledge bases.
    pub fn new(faq: KnowledgeBase, exam: KnowledgeBase) -> Self {
        Self {
            faq: Arc::new(faq),
            exam: Arc::new(exam),
        }
    }

    /// Load both bases. Unreadable resources become empty bases.
    pub fn load(sources: &KnowledgeConfig) -> Self {
        Self::new(
            KnowledgeBase::load("faq", &sources.faq_path),
            KnowledgeBase::load("exam", &sources.exam_path),
        )
    }
}

/// Handles user messages against the knowledge bases.
pub struct DialogueShell {
    ranker: Ranker,
    formatter: Formatter,
    config: DialogueConfig,
    sources: KnowledgeConfig,
    library: RwLock<Library>,
    fallback: Option<FallbackRunner>,
}

impl DialogueShell {
    /// Create a shell, loading the knowledge bases named in `config`.
    pub fn new(config: &BotConfig) -> Self {
        Self::with_library(config, Library::load(&config.knowledge))
    }

    /// Create a shell over knowledge bases already in memory.
    pub fn with_library(config: &BotConfig, library: Library) -> Self {
        Self {
            ranker: config.ranker(),
            formatter: Formatter::new(config.dialogue.disclaimer.clone()),
            config: config.dialogue.clone(),
            sources: config.knowledge.clone(),
            library: RwLock::new(library),
            fallback: None,
        }
    }

    /// Attach an external responder for unmatched questions, limited by the
    /// dialogue config's time limit and in-flight cap.
    pub fn with_fallback(mut self, fallback: Arc<dyn Fallback>) -> Self {
        self.fallback = Some(FallbackRunner::new(
            fallback,
            self.config.fallback_timeout(),
            self.config.fallback_max_in_flight,
        ));
        self
    }

    /// Get the ranker.
    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Get a snapshot of the current knowledge bases.
    pub fn library(&self) -> Library {
        self.library.read().clone()
    }

    /// Reload both knowledge bases from their sources, replacing the current
    /// ones wholesale. Returns the new entry counts (FAQ, exam).
    pub fn reload(&self) -> (usize, usize) {
        let fresh = Library::load(&self.sources);
        let counts = (fresh.faq.len(), fresh.exam.len());
        *self.library.write() = fresh;
        tracing::info!(faq = counts.0, exam = counts.1, "Knowledge bases reloaded");
        counts
    }

    /// Handle one message from the user owning `session`.
    pub fn handle(&self, session: &mut Session, text: &str) -> Reply {
        match Input::parse(text) {
            Input::Command(command) => self.handle_command(session, command),
            Input::UnknownCommand(name) => {
                tracing::debug!(command = name, "Unknown command");
                Reply::info(HELP_TEXT)
            }
            Input::Button(button) => self.handle_button(session, button),
            Input::Text(query) => self.answer(session, query),
        }
    }

    /// Handle one message, looking the session up by user.
    pub fn handle_user(&self, sessions: &mut Sessions, user: UserId, text: &str) -> Reply {
        let reply = self.handle(sessions.get_mut(user), text);
        tracing::debug!(user = %user, outcome = ?reply.outcome, "Handled message");
        reply
    }

    fn handle_command(&self, session: &mut Session, command: Command) -> Reply {
        match command {
            Command::Start => Reply::info(START_TEXT),
            Command::Help | Command::Menu => Reply::info(HELP_TEXT),
            Command::FaqCount => {
                let library = self.library();
                Reply::info(format!(
                    "FAQ записей: {}\nЭкзаменационных карточек: {}",
                    library.faq.len(),
                    library.exam.len()
                ))
            }
            Command::Reload => {
                let (faq, exam) = self.reload();
                Reply::info(format!(
                    "Перезагрузил FAQ: {} записей, карточек: {}.",
                    faq, exam
                ))
            }
            Command::Exam => {
                session.exam_mode = true;
                Reply::info(EXAM_ON_TEXT)
            }
            Command::Faq => {
                session.exam_mode = false;
                Reply::info(EXAM_OFF_TEXT)
            }
        }
    }

    fn handle_button(&self, session: &mut Session, button: MenuButton) -> Reply {
        match button {
            MenuButton::LawBase => Reply::info(LAW_BASE_TEXT),
            MenuButton::AskTeacher => Reply::info(ASK_TEACHER_TEXT),
            MenuButton::MiniTests => {
                session.exam_mode = true;
                Reply::info(EXAM_ON_TEXT)
            }
            _ => self.section(button),
        }
    }

    /// Render a menu section: its intro entry, else any entry in the
    /// section, else the best match for the section's search phrase.
    fn section(&self, button: MenuButton) -> Reply {
        let library = self.library();
        let label = button.label();

        let direct = library
            .faq
            .find_by_section(label, Some(&EntryKind::Intro))
            .or_else(|| library.faq.find_by_section(label, None));

        let entry = direct.or_else(|| {
            button
                .section_query()
                .and_then(|query| self.ranker.rank(&library.faq, query).entry)
        });

        match entry {
            Some(entry) => Reply {
                text: self.formatter.format(entry),
                outcome: Outcome::Section,
            },
            None => Reply::info(SECTION_MISSING_TEXT),
        }
    }

    /// Answer free text from the knowledge bases, escalating when nothing
    /// matches.
    fn answer(&self, session: &Session, query: &str) -> Reply {
        if query.trim().is_empty() {
            return Reply::no_answer();
        }

        let library = self.library();
        let faq = self.ranker.rank(&library.faq, query);

        let (choice, exam) = if session.exam_mode {
            let exam = self.ranker.rank(&library.exam, query);
            (arbitrate(&faq, &exam, self.config.exam_margin), exam)
        } else {
            let choice = if faq.is_match() {
                BaseChoice::Faq
            } else {
                BaseChoice::Neither
            };
            (choice, MatchResult::no_match(0.0))
        };

        match choice {
            BaseChoice::Faq => self.answered(faq, BaseKind::Faq),
            BaseChoice::Exam => self.answered(exam, BaseKind::Exam),
            BaseChoice::Neither => {
                tracing::debug!(
                    faq_score = faq.score,
                    exam_score = exam.score,
                    "No knowledge entry matched"
                );
                self.escalate(query)
            }
        }
    }

    fn answered(&self, result: MatchResult<'_>, base: BaseKind) -> Reply {
        match result.entry {
            Some(entry) => Reply {
                text: self.formatter.format(entry),
                outcome: Outcome::Answered {
                    base,
                    score: result.score,
                },
            },
            None => Reply::no_answer(),
        }
    }

    fn escalate(&self, query: &str) -> Reply {
        let Some(fallback) = &self.fallback else {
            return Reply::no_answer();
        };

        match fallback.ask(query) {
            Ok(Some(answer)) if !answer.trim().is_empty() => Reply {
                text: self.formatter.format_fallback(&answer),
                outcome: Outcome::Fallback,
            },
            Ok(_) => {
                tracing::debug!("Fallback declined to answer");
                Reply::no_answer()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fallback failed");
                Reply::no_answer()
            }
        }
    }
}
