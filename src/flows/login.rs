use tracing::info;

use super::{Field, FieldErrors};
use crate::nav::route::Route;

/// Sign-in form. Authentication is mocked: any filled-in form is accepted.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.add(Field::Email, "Please enter your email");
        } else if !email.contains('@') {
            errors.add(Field::Email, "Please enter a valid email address");
        }
        if self.password.is_empty() {
            errors.add(Field::Password, "Please enter your password");
        }
        errors
    }

    /// On success the app moves to the home dashboard.
    pub fn submit(&self) -> Result<Route, FieldErrors> {
        self.validate().into_result()?;
        info!(email = %self.email.trim(), "signed in");
        Ok(Route::Home)
    }
}
