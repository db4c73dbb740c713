// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram reviewer channel for Vouch.
//!
//! Sends review prompts with inline decision buttons via teloxide and
//! runs a long-polling dispatcher that routes button presses, custom
//! reply text, and the handful of reviewer commands into the decision
//! engine.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Recipient};
use tracing::info;
use vouch_config::model::TelegramConfig;
use vouch_core::traits::ReviewerChannel;
use vouch_core::types::ReviewAction;
use vouch_core::VouchError;
use vouch_engine::DecisionEngine;

/// Reviewer channel backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramReviewer {
    bot: Bot,
}

impl TelegramReviewer {
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: &TelegramConfig) -> Result<Self, VouchError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            VouchError::Config("telegram.bot_token is required for the Telegram channel".into())
        })?;
        if token.is_empty() {
            return Err(VouchError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Inline keyboard for a review prompt: one row per provider with an
/// actual answer, then the fixed reject/custom row. Callback data is the
/// action's wire tag.
pub(crate) fn review_keyboard(buttons: &[(String, ReviewAction)]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .iter()
        .map(|(label, action)| {
            vec![InlineKeyboardButton::callback(
                format!("\u{2705} {label}"),
                action.to_string(),
            )]
        })
        .collect();

    rows.push(vec![
        InlineKeyboardButton::callback("\u{274C} Reject", ReviewAction::Reject.to_string()),
        InlineKeyboardButton::callback(
            "\u{1F4DD} Custom Message",
            ReviewAction::CustomPrompt.to_string(),
        ),
    ]);

    InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl ReviewerChannel for TelegramReviewer {
    async fn send_review_prompt(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[(String, ReviewAction)],
    ) -> Result<i32, VouchError> {
        let markup = review_keyboard(buttons);
        let sent = self
            .bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .reply_markup(markup)
            .await
            .map_err(|e| VouchError::Channel {
                message: format!("failed to send review prompt: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(sent.id.0)
    }
}

/// Start long polling and route updates into the engine. The returned
/// handle finishes when the dispatcher stops.
pub fn spawn_dispatcher(
    bot: Bot,
    engine: DecisionEngine,
    allowed_users: Vec<String>,
) -> tokio::task::JoinHandle<()> {
    let allowed: Arc<Vec<String>> = Arc::new(allowed_users);
    info!("starting Telegram long polling");

    tokio::spawn(async move {
        let callback_engine = engine.clone();
        let callback_allowed = allowed.clone();
        let callback = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery| {
                let engine = callback_engine.clone();
                let allowed = callback_allowed.clone();
                async move { handler::handle_callback(bot, q, engine, &allowed).await }
            },
        );

        let message_engine = engine.clone();
        let message_allowed = allowed.clone();
        let message = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let engine = message_engine.clone();
            let allowed = message_allowed.clone();
            async move { handler::handle_message(bot, msg, engine, &allowed).await }
        });

        let handler = teloxide::dptree::entry().branch(callback).branch(message);

        Dispatcher::builder(bot, handler)
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .build()
            .dispatch()
            .await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig {
            bot_token: None,
            allowed_users: vec![],
        };
        assert!(TelegramReviewer::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            allowed_users: vec![],
        };
        assert!(TelegramReviewer::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
            allowed_users: vec!["reviewer".into()],
        };
        assert!(TelegramReviewer::new(&config).is_ok());
    }

    #[test]
    fn keyboard_has_one_row_per_provider_plus_fixed_row() {
        let buttons = vec![
            ("\u{1F916} GPT".to_string(), ReviewAction::AcceptGpt),
            ("\u{1F30D} Gemini".to_string(), ReviewAction::AcceptGemini),
        ];
        let markup = review_keyboard(&buttons);

        assert_eq!(markup.inline_keyboard.len(), 3);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        assert_eq!(markup.inline_keyboard[1].len(), 1);
        assert_eq!(markup.inline_keyboard[2].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "\u{2705} \u{1F916} GPT");
    }

    #[test]
    fn keyboard_callback_data_uses_action_tags() {
        use teloxide::types::InlineKeyboardButtonKind;

        let buttons = vec![("\u{1F4DD} Claude".to_string(), ReviewAction::AcceptClaude)];
        let markup = review_keyboard(&buttons);

        let data = |btn: &InlineKeyboardButton| match &btn.kind {
            InlineKeyboardButtonKind::CallbackData(d) => d.clone(),
            other => panic!("expected callback button, got {other:?}"),
        };
        assert_eq!(data(&markup.inline_keyboard[0][0]), "accept_claude");
        assert_eq!(data(&markup.inline_keyboard[1][0]), "reject");
        assert_eq!(data(&markup.inline_keyboard[1][1]), "custom_prompt");
    }

    #[test]
    fn keyboard_without_providers_still_offers_reject_and_custom() {
        let markup = review_keyboard(&[]);
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
    }
}
