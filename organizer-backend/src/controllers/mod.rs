pub mod control_files;
pub mod files;
pub mod food;
pub mod green_notes;
pub mod health;
pub mod houses;
pub mod tasks;
pub mod topics;
pub mod tracking;
pub mod window;

use std::sync::Arc;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web;

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Run a store call on the blocking pool so SQLite never stalls a worker
pub(crate) async fn with_db<T, F>(state: &web::Data<AppState>, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(&state.db);
    web::block(move || f(&db)).await?
}

/// Body parse failures become 400s that name the offending field
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
            other => other.to_string(),
        };
        ApiError::Validation(message).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = match &err {
            QueryPayloadError::Deserialize(e) => format!("Invalid query string: {}", e),
            other => other.to_string(),
        };
        ApiError::Validation(message).into()
    })
}

/// Mount every resource on an app or scope
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .configure(health::config)
        .configure(houses::config)
        .configure(topics::config)
        .configure(files::config)
        .configure(green_notes::config)
        .configure(tasks::config)
        .configure(tracking::config)
        .configure(food::config)
        .configure(control_files::config)
        .configure(window::config);
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::web;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::db::test_support::temp_db;
    use crate::signals::WindowSignals;
    use crate::AppState;

    pub fn test_state() -> (TempDir, web::Data<AppState>) {
        let (dir, db) = temp_db();
        let state = web::Data::new(AppState {
            db: Arc::new(db),
            config: Config::default(),
            signals: Arc::new(WindowSignals::new()),
        });
        (dir, state)
    }

    /// Build an app with every route mounted on `state`
    #[macro_export]
    macro_rules! test_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data($state.clone())
                    .configure($crate::controllers::configure_all),
            )
            .await
        };
    }
}
