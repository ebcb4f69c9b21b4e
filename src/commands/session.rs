use crate::error::AppError;
use crate::state::session::validate_email;
use crate::state::SessionAction;
use crate::AppContext;
use console::style;
use tracing::info;

pub fn login(ctx: &AppContext, email: &str) -> Result<(), AppError> {
    let email = validate_email(email)?;
    ctx.store.commit(SessionAction::SetEmail(email.to_string()))?;
    info!("Logged in as {}", email);
    println!("Logged in as {}", style(email).bold());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<(), AppError> {
    match ctx.store.session_email() {
        Some(email) => {
            ctx.store.commit(SessionAction::Logout)?;
            println!("Logged out {}", email);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<(), AppError> {
    let email = super::require_session(&ctx.store)?;
    println!("{}", email);
    Ok(())
}
