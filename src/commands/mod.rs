pub mod dashboard;
pub mod inspect;
pub mod prefs;
pub mod session;
pub mod upload;
pub mod watch;

use crate::error::AppError;
use crate::state::AppStore;

/// The signed-in email, or an error telling the user to log in.
pub fn require_session(store: &AppStore) -> Result<String, AppError> {
    store
        .session_email()
        .ok_or_else(|| "Not logged in. Run `plant-locator login <email>` first.".into())
}
