use std::sync::Arc;

use renthawk_core::Preferences;
use renthawk_store::DuckDbBackend;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::warn;

/// The minimal command surface a user interacts with directly; everything
/// else (setting cities, price bounds, etc.) goes through the admin CLI
/// against the same Preference Store.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "register and start receiving matches")]
    Start,
    #[command(description = "show your current match preferences")]
    Preferences,
    #[command(description = "stop receiving notifications")]
    Stop,
}

pub async fn run(bot: Bot, store: DuckDbBackend) {
    let store = Arc::new(store);
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let store = store.clone();
        async move {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let Ok(command) = Command::parse(text, "renthawk_bot") else {
                return Ok(());
            };
            let chat_id = msg.chat.id.0;
            let display_name = msg.from.as_ref().and_then(|u| u.username.clone());
            if let Err(err) = handle(&bot, &store, chat_id, display_name, command).await {
                warn!(chat_id, error = %err, "command handling failed");
            }
            Ok(())
        }
    })
    .await;
}

async fn handle(
    bot: &Bot,
    store: &DuckDbBackend,
    chat_id: i64,
    display_name: Option<String>,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Start => {
            store.upsert_user(chat_id, display_name.as_deref()).await?;
            store.set_user_active(chat_id, true).await?;
            bot.send_message(
                ChatId(chat_id),
                "Welcome! You'll receive new matching listings here. Use /preferences to see your current filters.",
            )
            .await?;
        }
        Command::Preferences => {
            let prefs = store.get_preferences(chat_id).await?;
            let text = match prefs {
                Some(p) if !p.cities.is_empty() => format_preferences(&p),
                _ => "No preferences set yet — configure cities/price/rooms via the admin CLI.".to_string(),
            };
            bot.send_message(ChatId(chat_id), text).await?;
        }
        Command::Stop => {
            store.set_user_active(chat_id, false).await?;
            bot.send_message(ChatId(chat_id), "Notifications paused. Send /start to resume.").await?;
        }
    }
    Ok(())
}

fn format_preferences(p: &Preferences) -> String {
    format!(
        "Cities: {}\nMin price: {}\nMax price: {}\nMin rooms: {}\nMax rooms: {}",
        p.cities.join(", "),
        p.min_price,
        if p.max_price == 0 { "no limit".to_string() } else { p.max_price.to_string() },
        p.min_rooms,
        if p.max_rooms == 0 { "no limit".to_string() } else { p.max_rooms.to_string() },
    )
}
