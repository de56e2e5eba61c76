//! Dialog State Machine
//!
//! Per-chat multi-turn dialog tracking. A dialog is a pending question:
//! the bot has asked for a title, a minimum rating, or a minimum budget,
//! and the next message from that chat is interpreted as the answer.
//!
//! # Design Philosophy
//!
//! Recognized commands are a closed enum, not string comparisons scattered
//! across handlers, and commands are parsed before a pending answer. That
//! ordering is what makes the core invariant hold: at most one dialog per
//! chat, and a new dialog-start while another is pending overwrites it.
//!
//! State lives in a `DashMap`, so chats lock per key and unrelated users
//! never contend. Transitions are pure computation under the entry guard;
//! no I/O ever happens while a key is held.

use dashmap::DashMap;
use thiserror::Error;

use crate::catalog::SearchQuery;
use crate::transport::ChatId;

/// Recognized commands
///
/// Everything else a user types is either a pending-dialog answer or noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Greeting / entry point
    Start,
    /// Show the search mode menu
    Menu,
    /// Begin a search-by-name dialog
    ByName,
    /// Begin a search-by-rating dialog
    ByRating,
    /// Begin a search-by-budget dialog
    ByBudget,
    /// Cancel a pending dialog and return to the main menu
    Back,
}

impl Command {
    /// Parse a message as a command, if it is one
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "/start" | "/help" => Some(Self::Start),
            "search" | "/search" => Some(Self::Menu),
            "by name" | "/name" => Some(Self::ByName),
            "by rating" | "/rating" => Some(Self::ByRating),
            "by budget" | "/budget" => Some(Self::ByBudget),
            "back" | "/cancel" => Some(Self::Back),
            _ => None,
        }
    }
}

/// The kind of answer a dialog is waiting for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Free-text movie or series title
    MovieName,
    /// Minimum rating, 0–10
    MinRating,
    /// Minimum budget in millions of dollars
    MinBudget,
}

impl InputKind {
    /// The question to ask when this dialog starts
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::MovieName => "Enter a movie or series title:",
            Self::MinRating => "Enter a minimum rating from 0 to 10 (for example, 7.5):",
            Self::MinBudget => {
                "Enter a minimum budget in millions of dollars (for example, 50):"
            }
        }
    }
}

/// Per-chat dialog state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogState {
    /// No dialog in progress
    #[default]
    Idle,
    /// Waiting for a title
    AwaitingMovieName,
    /// Waiting for a minimum rating
    AwaitingMinRating,
    /// Waiting for a minimum budget
    AwaitingMinBudget,
}

/// Rejected dialog answer
///
/// The pending dialog stays open so the user can retry.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Blank title
    #[error("title must not be empty")]
    EmptyName,

    /// Answer was not a decimal number
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Rating outside the accepted range
    #[error("rating must be between 0 and 10, got {0}")]
    RatingOutOfRange(f64),

    /// Negative budget
    #[error("budget cannot be negative, got {0}")]
    NegativeBudget(f64),
}

impl ValidationError {
    /// User-facing message naming the accepted range or format
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyName => "Please enter a non-empty title.".to_string(),
            Self::NotANumber(input) => {
                format!("'{input}' is not a number. Please enter a number like 7.5 or 7,5.")
            }
            Self::RatingOutOfRange(value) => {
                format!("Invalid rating {value}: please enter a number from 0 to 10.")
            }
            Self::NegativeBudget(value) => {
                format!("Invalid budget {value}: please enter a non-negative number.")
            }
        }
    }
}

/// What the engine should do with a message
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Not a command and no dialog pending: do nothing
    Ignore,
    /// Send the greeting
    Greet,
    /// Send the search mode menu
    Menu,
    /// A pending dialog was cancelled (or there was none to cancel)
    Cancelled,
    /// A dialog started: ask the question
    Prompt(InputKind),
    /// A dialog completed: run this query
    Execute(SearchQuery),
    /// A dialog answer was rejected: report and keep waiting
    Reject(ValidationError),
}

/// Per-chat dialog state store
#[derive(Default)]
pub struct SessionStore {
    states: DashMap<ChatId, DialogState>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a chat (Idle when never seen)
    pub fn state(&self, chat: ChatId) -> DialogState {
        self.states.get(&chat).map_or(DialogState::Idle, |s| *s)
    }

    /// Interpret one inbound text message
    ///
    /// The read-modify-write on the chat's state is atomic with respect to
    /// other messages for the same chat; other chats proceed in parallel.
    pub fn handle_text(&self, chat: ChatId, text: &str) -> Action {
        let mut state = self.states.entry(chat).or_default();

        if let Some(command) = Command::parse(text) {
            return match command {
                Command::Start => {
                    *state = DialogState::Idle;
                    Action::Greet
                }
                Command::Menu => Action::Menu,
                Command::Back => {
                    *state = DialogState::Idle;
                    Action::Cancelled
                }
                Command::ByName => {
                    *state = DialogState::AwaitingMovieName;
                    Action::Prompt(InputKind::MovieName)
                }
                Command::ByRating => {
                    *state = DialogState::AwaitingMinRating;
                    Action::Prompt(InputKind::MinRating)
                }
                Command::ByBudget => {
                    *state = DialogState::AwaitingMinBudget;
                    Action::Prompt(InputKind::MinBudget)
                }
            };
        }

        match *state {
            DialogState::Idle => Action::Ignore,
            DialogState::AwaitingMovieName => match validate_name(text) {
                Ok(name) => {
                    *state = DialogState::Idle;
                    Action::Execute(SearchQuery::name(name))
                }
                Err(e) => Action::Reject(e),
            },
            DialogState::AwaitingMinRating => match validate_rating(text) {
                Ok(min) => {
                    *state = DialogState::Idle;
                    Action::Execute(SearchQuery::rating(min))
                }
                Err(e) => Action::Reject(e),
            },
            DialogState::AwaitingMinBudget => match validate_budget(text) {
                Ok(min_usd) => {
                    *state = DialogState::Idle;
                    Action::Execute(SearchQuery::budget(min_usd))
                }
                Err(e) => Action::Reject(e),
            },
        }
    }
}

/// Any non-empty trimmed text is a valid title
fn validate_name(text: &str) -> Result<String, ValidationError> {
    let name = text.trim();
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

/// Parse a decimal accepting both `.` and `,` as the separator
fn parse_decimal(text: &str) -> Result<f64, ValidationError> {
    let normalized = text.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber(text.trim().to_string()))
}

/// Rating answers must land in [0, 10]
fn validate_rating(text: &str) -> Result<f64, ValidationError> {
    let value = parse_decimal(text)?;
    if (0.0..=10.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::RatingOutOfRange(value))
    }
}

/// Budget answers are millions of dollars, converted to whole dollars
fn validate_budget(text: &str) -> Result<u64, ValidationError> {
    let value = parse_decimal(text)?;
    if value < 0.0 {
        Err(ValidationError::NegativeBudget(value))
    } else {
        Ok((value * 1_000_000.0).round() as u64)
    }
}
