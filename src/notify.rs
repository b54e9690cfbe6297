//! Notification boundary. Delivery transport is a collaborator concern;
//! the bundled implementation just logs what would be sent.

use async_trait::async_trait;
use tracing::info;

use crate::error::AppError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user: &str, title: &str, message: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user: &str, title: &str, message: &str) -> Result<(), AppError> {
        info!(user, title, message, "notification");
        Ok(())
    }
}
