use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use storefront::executable_utils::{initialize_executable, initialize_tracing, run_backend, AppState};
use storefront::lifecycle::OrderLifecycle;
use storefront::notification::{BrevoTransport, NotificationDispatcher};
use storefront::storage::PgStorage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting backend...");
    let config = initialize_executable()?;
    initialize_tracing(&config.backend.log_level);

    let storage = Arc::new(PgStorage::new(&config.common.database_url).await?);
    let lifecycle = OrderLifecycle::new(storage.clone());
    let send_timeout = Duration::from_millis(config.email.send_timeout_ms);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(BrevoTransport::new(config.email.clone())),
        send_timeout,
    ));

    let state = AppState::new(lifecycle, storage.clone(), storage, dispatcher);
    run_backend(config.backend, state).await
}
