pub mod telegram;

use crate::model::NotifyError;

pub use telegram::TelegramNotifier;

/// Delivers rendered analysis reports somewhere a human will read them.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_text(&self, text: &str) -> Result<(), NotifyError>;
}
