use chrono::NaiveDate;

use crate::bot::dialogue::{transition, Effect, Input, RegistrationState, Transition};
use crate::bot::replies;
use crate::database::{
    connection::DatabaseManager,
    models::{Registration, User, UserProfile},
};
use crate::utils::feedback::{Reply, ReplyKeyboard};
use crate::utils::logging::{log_transition, log_validation_error};

/// Result of feeding one input into a user's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: RegistrationState,
    pub replies: Vec<Reply>,
}

/// Runs the transition for `input` and applies its effect to the store.
///
/// A conversation whose user record has gone missing is ended with a
/// "not registered" reply instead of failing.
pub async fn advance(
    db: &DatabaseManager,
    profile: &UserProfile,
    state: &RegistrationState,
    input: Input,
    today: NaiveDate,
) -> Result<Step, sqlx::Error> {
    let raw_input = match &input {
        Input::Text(text) => Some(text.clone()),
        _ => None,
    };
    let Transition { next, effect } = transition(state, input, today);
    let user_id = profile.telegram_id;

    let step = match effect {
        Effect::Register => {
            let greeting = match User::register(&db.pool, profile, today).await? {
                Registration::Created(_) => replies::REGISTERED.to_string(),
                Registration::AlreadyRegistered(user) => {
                    replies::already_registered(user.display_name())
                }
            };
            Step {
                next,
                replies: vec![
                    Reply::text(greeting),
                    Reply::text(replies::ASK_TITLE).with_keyboard(ReplyKeyboard::Cancel),
                ],
            }
        }
        Effect::SaveTitle(title) => {
            if User::set_weakness_title(&db.pool, user_id, &title).await? {
                Step {
                    next,
                    replies: vec![
                        Reply::text(replies::ASK_START_DATE).with_keyboard(ReplyKeyboard::Skip)
                    ],
                }
            } else {
                not_registered()
            }
        }
        Effect::SaveStartDate(date) => {
            if User::set_streak_start_date(&db.pool, user_id, date).await? {
                Step {
                    next,
                    replies: vec![
                        Reply::text(replies::WEAKNESS_CREATED).with_keyboard(ReplyKeyboard::Remove)
                    ],
                }
            } else {
                not_registered()
            }
        }
        Effect::KeepStartDate => Step {
            next,
            replies: vec![Reply::text(replies::START_DATE_KEPT).with_keyboard(ReplyKeyboard::Remove)],
        },
        Effect::Farewell => Step {
            next,
            replies: vec![Reply::text(replies::FAREWELL).with_keyboard(ReplyKeyboard::Remove)],
        },
        Effect::RejectTitle(reason) => {
            log_validation_error("weakness_title", raw_input.as_deref().unwrap_or_default(), &reason, user_id);
            Step {
                next,
                replies: vec![
                    Reply::text(replies::invalid_title(&reason)).with_keyboard(ReplyKeyboard::Cancel)
                ],
            }
        }
        Effect::RejectStartDate(reason) => {
            log_validation_error("start_date", raw_input.as_deref().unwrap_or_default(), &reason, user_id);
            Step {
                next,
                replies: vec![
                    Reply::text(replies::invalid_start_date(&reason)).with_keyboard(ReplyKeyboard::Skip)
                ],
            }
        }
        Effect::Ignore => Step {
            next,
            replies: Vec::new(),
        },
    };

    if step.next != *state {
        log_transition(user_id, state.name(), step.next.name());
    }

    Ok(step)
}

fn not_registered() -> Step {
    Step {
        next: RegistrationState::Done,
        replies: vec![Reply::text(replies::NOT_REGISTERED).with_keyboard(ReplyKeyboard::Remove)],
    }
}
