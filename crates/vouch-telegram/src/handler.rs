// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing: authorization, button presses, custom reply text, and
//! the reviewer commands.

use std::str::FromStr;

use teloxide::prelude::*;
use teloxide::types::{ChatKind, User};
use tracing::{debug, error, warn};
use vouch_core::types::{Decision, ReviewAction};
use vouch_engine::{ApplyOutcome, ClearOutcome, DecisionEngine, SubmitOutcome};

/// Checks whether the sender is authorized.
///
/// Authorization passes if the sender's user id (as string) or username
/// matches any entry in `allowed_users`. An empty list rejects everyone.
pub fn is_authorized(user: Option<&User>, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return false;
    }

    let user = match user {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        if *allowed == user_id_str {
            return true;
        }
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Whether the message is from a private (DM) chat.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Status line appended to the prompt once a decision lands.
pub fn decided_suffix(decision: Decision) -> &'static str {
    match decision {
        Decision::Reject => "\u{274C} AI response rejected. No reply will be sent.",
        _ => "\u{2705} AI response accepted and sent.",
    }
}

/// Handle a button press on a review prompt.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    engine: DecisionEngine,
    allowed_users: &[String],
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    if !is_authorized(Some(&q.from), allowed_users) {
        debug!(user_id = q.from.id.0, "ignoring callback from unauthorized user");
        return Ok(());
    }

    let Some(message) = q.message else {
        debug!("callback without an attached message");
        return Ok(());
    };
    let chat_id = message.chat().id.0;
    let message_id = message.id().0;

    let action = match q.data.as_deref().map(ReviewAction::from_str) {
        Some(Ok(action)) => action,
        _ => {
            warn!(chat_id, message_id, data = ?q.data, "unrecognized callback data");
            return Ok(());
        }
    };

    let outcome = match engine.apply(chat_id, message_id, action).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(chat_id, message_id, error = %e, "failed to apply reviewer action");
            return Ok(());
        }
    };

    // The original prompt text is unavailable when Telegram considers the
    // message inaccessible; the status line then stands alone.
    let prompt_text = message
        .regular_message()
        .and_then(|m| m.text())
        .unwrap_or_default();
    let with_suffix = |suffix: &str| {
        if prompt_text.is_empty() {
            suffix.to_string()
        } else {
            format!("{prompt_text}\n\n{suffix}")
        }
    };

    match outcome {
        ApplyOutcome::Decided(decision) => {
            edit_prompt(&bot, chat_id, message_id, &with_suffix(decided_suffix(decision))).await;
        }
        ApplyOutcome::AwaitingCustom => {
            edit_prompt(
                &bot,
                chat_id,
                message_id,
                &with_suffix("\u{1F4DD} Please type your custom message now."),
            )
            .await;
        }
        ApplyOutcome::SessionNotFound => {
            edit_prompt(
                &bot,
                chat_id,
                message_id,
                "\u{274C} No session found for this message.",
            )
            .await;
        }
        ApplyOutcome::AlreadyAwaitingCustom { pending_message_id } => {
            debug!(chat_id, pending_message_id, "custom reply already pending in chat");
            if let Err(e) = bot
                .send_message(
                    ChatId(chat_id),
                    "\u{26A0} Another message is already awaiting your custom reply. \
                     Send it first, or use /clear to abandon it.",
                )
                .await
            {
                warn!(chat_id, error = %e, "failed to send conflict notice");
            }
        }
    }

    Ok(())
}

async fn edit_prompt(bot: &Bot, chat_id: i64, message_id: i32, text: &str) {
    if let Err(e) = bot
        .edit_message_text(ChatId(chat_id), teloxide::types::MessageId(message_id), text)
        .await
    {
        warn!(chat_id, message_id, error = %e, "failed to edit review prompt");
    }
}

/// Handle a plain message from the reviewer: commands first, otherwise
/// the text is offered to the engine as a potential custom reply.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    engine: DecisionEngine,
    allowed_users: &[String],
) -> ResponseResult<()> {
    if !is_dm(&msg) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return Ok(());
    }
    if !is_authorized(msg.from.as_ref(), allowed_users) {
        debug!(chat_id = msg.chat.id.0, "ignoring message from unauthorized user");
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;

    match text {
        "/start" => {
            bot.send_message(
                msg.chat.id,
                format!("Welcome! I'll send you messages to accept or reject: {chat_id}"),
            )
            .await?;
        }
        "/clear" => {
            let reply = match engine.clear_pending(chat_id).await {
                Ok(ClearOutcome::Cleared { .. }) => "Pending review cleared.",
                Ok(ClearOutcome::NothingToClear) => "No pending custom reply to clear.",
                Err(e) => {
                    error!(chat_id, error = %e, "failed to clear pending custom reply");
                    "Something went wrong; please try again."
                }
            };
            bot.send_message(msg.chat.id, reply).await?;
        }
        _ if text.starts_with('/') => {
            debug!(chat_id, "ignoring unknown command");
        }
        _ => {
            let reply = match engine.submit_text(chat_id, text).await {
                Ok(SubmitOutcome::Delivered) => "Thanks! Your message was sent.",
                Ok(SubmitOutcome::NoPendingCustom) => {
                    "Please wait \u{2014} we'll send you messages here."
                }
                Err(e) => {
                    error!(chat_id, error = %e, "failed to submit custom reply");
                    "Something went wrong; please try again."
                }
            };
            bot.send_message(msg.chat.id, reply).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching Telegram Bot
    /// API structure.
    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let from = if let Some(uname) = username {
            serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
                "username": uname,
            })
        } else {
            serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            })
        };

        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_authorized(msg.from.as_ref(), &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_or_without_at() {
        let msg = make_private_message(12345, Some("reviewer"), "hello");
        assert!(is_authorized(msg.from.as_ref(), &["reviewer".into()]));
        assert!(is_authorized(msg.from.as_ref(), &["@reviewer".into()]));
    }

    #[test]
    fn authorized_by_username_case_insensitive() {
        let msg = make_private_message(12345, Some("Reviewer"), "hello");
        assert!(is_authorized(msg.from.as_ref(), &["reviewer".into()]));
    }

    #[test]
    fn not_authorized_wrong_user_or_empty_list() {
        let msg = make_private_message(12345, Some("reviewer"), "hello");
        assert!(!is_authorized(msg.from.as_ref(), &["99999".into()]));
        assert!(!is_authorized(msg.from.as_ref(), &[]));
    }

    #[test]
    fn not_authorized_without_sender() {
        assert!(!is_authorized(None, &["12345".into()]));
    }

    #[test]
    fn is_dm_distinguishes_chat_kinds() {
        assert!(is_dm(&make_private_message(12345, None, "hello")));
        assert!(!is_dm(&make_group_message(12345, "hello")));
    }

    #[test]
    fn callback_data_parses_to_actions() {
        assert_eq!(
            ReviewAction::from_str("accept_gpt").unwrap(),
            ReviewAction::AcceptGpt
        );
        assert_eq!(
            ReviewAction::from_str("custom_prompt").unwrap(),
            ReviewAction::CustomPrompt
        );
        assert!(ReviewAction::from_str("accept").is_err());
    }

    #[test]
    fn decided_suffix_distinguishes_reject() {
        assert!(decided_suffix(Decision::Reject).contains("rejected"));
        assert!(decided_suffix(Decision::AcceptGpt).contains("accepted"));
        assert!(decided_suffix(Decision::Custom).contains("accepted"));
    }
}
