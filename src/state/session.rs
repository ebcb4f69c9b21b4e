use serde::Serialize;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct SessionState {
    pub email_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetEmail(String),
    Logout,
}

impl SessionState {
    pub fn reduce(&mut self, action: &SessionAction) {
        match action {
            SessionAction::SetEmail(email) => self.email_id = Some(email.clone()),
            SessionAction::Logout => self.email_id = None,
        }
    }
}

/// The login form's rule. The store itself accepts any string.
pub fn validate_email(email: &str) -> Result<&str, String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_email() {
        let mut state = SessionState::default();
        state.reduce(&SessionAction::SetEmail("farmer@example.com".into()));
        assert_eq!(state.email_id.as_deref(), Some("farmer@example.com"));
        state.reduce(&SessionAction::Logout);
        assert_eq!(state.email_id, None);
    }

    #[test]
    fn login_form_rejects_addresses_without_at() {
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("farmer.example.com").is_err());
        assert_eq!(validate_email(" a@b.c "), Ok("a@b.c"));
    }
}
