use crate::error::Result;
use std::collections::HashMap;
use tracing::{error, warn};
use zbus::zvariant::Value;
use zbus::Connection;

const APP_NAME: &str = "wnav";
const URGENCY_CRITICAL: u8 = 2;

/// Уведомление, которое висит до закрытия пользователем.
///
/// Текст всегда попадает в лог, даже если D-Bus недоступен.
pub async fn notify_fatal(summary: &str, body: &str) {
    error!("{}: {}", summary, body);

    if let Err(e) = send_notification(summary, body).await {
        warn!("Не удалось показать уведомление: {}", e);
    }
}

async fn send_notification(summary: &str, body: &str) -> Result<()> {
    let connection = Connection::session().await?;

    let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
    hints.insert("urgency", Value::from(URGENCY_CRITICAL));

    // expire_timeout = 0: не закрывать автоматически
    connection
        .call_method(
            Some("org.freedesktop.Notifications"),
            "/org/freedesktop/Notifications",
            Some("org.freedesktop.Notifications"),
            "Notify",
            &(
                APP_NAME,
                0u32,
                "",
                summary,
                body,
                Vec::<&str>::new(),
                hints,
                0i32,
            ),
        )
        .await?;

    Ok(())
}
