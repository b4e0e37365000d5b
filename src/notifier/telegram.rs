use crate::model::NotifyError;
use crate::notifier::Notifier;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: i64,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: i64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bot_token,
            chat_id,
            client,
        })
    }

    fn send_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    /// Sends a plain text message to the configured chat.
    async fn notify_text(&self, text: &str) -> Result<(), NotifyError> {
        let params = [
            ("chat_id", self.chat_id.to_string()),
            ("text", text.to_string()),
        ];

        let response = match timeout(SEND_TIMEOUT, self.client.post(self.send_url()).form(&params).send()).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("Telegram send() failed: {:?}", e);
                return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
            }
            Err(_) => {
                warn!("Telegram send() timed out");
                return Err(NotifyError::Unreachable);
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "unknown".into());
        if !status.is_success() {
            warn!("Telegram API responded [{}]: {}", status, body);
            return Err(NotifyError::ApiError(format!("HTTP {}", status)));
        }
        info!("Telegram report sent [{}]", status);
        Ok(())
    }
}
