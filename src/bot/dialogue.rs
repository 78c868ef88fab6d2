//! The registration conversation as a pure state machine.
//!
//! A conversation walks `CollectingTitle -> CollectingDate -> Done`. The
//! transition function only decides what should happen; applying the
//! [`Effect`] against the store and the chat is left to the caller.

use chrono::NaiveDate;

use crate::bot::commands::Command;
use crate::utils::validation::{
    is_command, is_date_shaped, parse_start_date, validate_weakness_title,
};

/// Where a user currently is in the registration conversation.
///
/// `Done` doubles as the idle state: a user without a running conversation is
/// `Done`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RegistrationState {
    #[default]
    Done,
    CollectingTitle,
    CollectingDate,
}

impl RegistrationState {
    pub fn name(&self) -> &'static str {
        match self {
            RegistrationState::Done => "done",
            RegistrationState::CollectingTitle => "collecting_title",
            RegistrationState::CollectingDate => "collecting_date",
        }
    }

    pub fn in_conversation(&self) -> bool {
        !matches!(self, RegistrationState::Done)
    }
}

/// What the user sent, as far as the conversation cares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Start,
    Skip,
    Cancel,
    Text(String),
}

impl Input {
    /// Commands that take part in the conversation. `/days`, `/failed` and
    /// `/help` are handled outside of it.
    pub fn from_command(command: &Command) -> Option<Self> {
        match command {
            Command::Start => Some(Input::Start),
            Command::Skip => Some(Input::Skip),
            Command::Cancel => Some(Input::Cancel),
            Command::Help | Command::Days | Command::Failed => None,
        }
    }
}

/// Side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Create the user record if missing and ask for a title.
    Register,
    SaveTitle(String),
    SaveStartDate(NaiveDate),
    /// `/skip`: the start date set at registration stays.
    KeepStartDate,
    /// `/cancel`: say goodbye, persist nothing.
    Farewell,
    RejectTitle(String),
    RejectStartDate(String),
    /// The input is not meant for the current state.
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: RegistrationState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: RegistrationState, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn stay(state: &RegistrationState) -> Self {
        Self::to(state.clone(), Effect::Ignore)
    }
}

pub fn transition(state: &RegistrationState, input: Input, today: NaiveDate) -> Transition {
    use RegistrationState::*;

    match (state, input) {
        // `/start` always (re)starts the conversation from the title step.
        (_, Input::Start) => Transition::to(CollectingTitle, Effect::Register),

        (CollectingTitle | CollectingDate, Input::Cancel) => Transition::to(Done, Effect::Farewell),

        (CollectingTitle, Input::Text(text)) if !is_command(&text) => {
            match validate_weakness_title(&text) {
                Ok(()) => Transition::to(CollectingDate, Effect::SaveTitle(text)),
                Err(e) => Transition::to(CollectingTitle, Effect::RejectTitle(e.to_string())),
            }
        }

        (CollectingDate, Input::Skip) => Transition::to(Done, Effect::KeepStartDate),

        (CollectingDate, Input::Text(text)) if is_date_shaped(&text) => {
            match parse_start_date(&text, today) {
                Ok(date) => Transition::to(Done, Effect::SaveStartDate(date)),
                Err(e) => Transition::to(CollectingDate, Effect::RejectStartDate(e.to_string())),
            }
        }

        (state, _) => Transition::stay(state),
    }
}
