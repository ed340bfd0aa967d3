use async_trait::async_trait;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::ApiError;
use thiserror::Error;

/// One inline button shown under a delivered message.
pub enum InlineAction {
    /// A callback-style button that echoes `text` back to the chat when
    /// pressed, so a user can copy it out of Telegram's message view.
    Copy { label: String, text: String },
    /// A plain URL button, used for the listing link or a maps search.
    Link { label: String, url: String },
}

/// Errors a `ChatTransport` can surface, collapsed to the three buckets
/// the Delivery Worker branches on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("recipient has blocked or deactivated the bot")]
    UserBlocked,
    #[error("provider rejected the request: {0}")]
    BadRequest(String),
    #[error("transient provider error: {0}")]
    Transient(String),
}

/// Boundary between the Delivery Worker and whatever chat platform actually
/// carries the message. `send_text`/`send_photo` are the only two
/// operations the worker needs; everything provider-specific (auth,
/// formatting, rate limits) lives behind this trait.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, buttons: &[InlineAction]) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        buttons: &[InlineAction],
    ) -> Result<(), TransportError>;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot_token: &str) -> Self {
        Self { bot: Bot::new(bot_token) }
    }

    fn keyboard(buttons: &[InlineAction]) -> InlineKeyboardMarkup {
        let row: Vec<InlineKeyboardButton> = buttons
            .iter()
            .map(|action| match action {
                InlineAction::Copy { label, text } => InlineKeyboardButton::callback(label.clone(), text.clone()),
                InlineAction::Link { label, url } => InlineKeyboardButton::url(
                    label.clone(),
                    url.parse().unwrap_or_else(|_| "https://example.invalid".parse().unwrap()),
                ),
            })
            .collect();
        InlineKeyboardMarkup::new([row])
    }

    /// Collapse teloxide's error surface to the three buckets the Delivery
    /// Worker cares about. Anything below the `Api` layer (network, retry
    /// hints, body decoding) is treated as transient and retried; within
    /// `Api`, only the "this chat is gone" family counts as blocked.
    fn classify(err: teloxide::RequestError) -> TransportError {
        match err {
            teloxide::RequestError::Api(api_err) => match api_err {
                ApiError::BotBlocked | ApiError::UserDeactivated | ApiError::ChatNotFound => {
                    TransportError::UserBlocked
                }
                other => TransportError::BadRequest(other.to_string()),
            },
            other => TransportError::Transient(other.to_string()),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str, buttons: &[InlineAction]) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text).parse_mode(ParseMode::Html);
        if !buttons.is_empty() {
            request = request.reply_markup(Self::keyboard(buttons));
        }
        request.await.map(|_| ()).map_err(Self::classify)
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        buttons: &[InlineAction],
    ) -> Result<(), TransportError> {
        let url = photo_url
            .parse()
            .map_err(|_| TransportError::BadRequest(format!("invalid photo url: {photo_url}")))?;
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), teloxide::types::InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if !buttons.is_empty() {
            request = request.reply_markup(Self::keyboard(buttons));
        }
        request.await.map(|_| ()).map_err(Self::classify)
    }
}
