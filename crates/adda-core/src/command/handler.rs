//! CommandHandler trait definition.

use adda_types::command::Command;
use adda_types::error::CommandError;

/// Trait for executing intercepted commands.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The
/// HTTP-backed implementation lives in adda-infra.
pub trait CommandHandler: Send + Sync {
    /// Execute `command` and produce the reply text shown to the user.
    fn run(
        &self,
        command: &Command,
    ) -> impl std::future::Future<Output = Result<String, CommandError>> + Send;
}
