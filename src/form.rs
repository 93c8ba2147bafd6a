//! State machine behind the auth page.
//!
//! [`AuthForm`] holds no reactive state. The page keeps one in a signal, feeds it events and
//! runs the requests it hands out against [`Auth`](crate::Auth).

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::session::Session;
use crate::validation::{self, AuthMode, FormData, FormField, ValidationErrors};

pub const EMAIL_REQUIRED_FOR_RESET: &str = "Please enter your email address";

/// A validated credential submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        display_name: String,
    },
}

impl AuthRequest {
    pub fn mode(&self) -> AuthMode {
        match self {
            AuthRequest::SignIn { .. } => AuthMode::SignIn,
            AuthRequest::SignUp { .. } => AuthMode::SignUp,
        }
    }

    pub async fn dispatch(&self, provider: &dyn IdentityProvider) -> Result<Session, AuthError> {
        match self {
            AuthRequest::SignIn { email, password } => provider.sign_in(email, password).await,
            AuthRequest::SignUp {
                email,
                password,
                display_name,
            } => provider.sign_up(email, password, display_name).await,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub data: FormData,
    pub errors: ValidationErrors,

    /// A request handed out by this form is in flight.
    pub busy: bool,

    /// A password reset email was sent. Stays until the next reset request.
    pub reset_email_sent: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Store a new value for `field` and forget the error previously reported for it.
    pub fn update_field(&mut self, field: FormField, value: String) {
        self.data.set(field, value);
        self.errors.remove(field);
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        if mode == self.mode {
            return;
        }
        if self.mode == AuthMode::SignUp {
            self.data.display_name.clear();
            self.data.confirm_password.clear();
        }
        self.mode = mode;
        self.errors.retain_for(mode);
    }

    /// Validate the form. Returns the request to send, or `None` if the form is invalid or
    /// another request is still in flight.
    pub fn prepare_submit(&mut self) -> Option<AuthRequest> {
        if self.busy {
            return None;
        }
        self.errors = validation::validate(&self.data, self.mode);
        if !self.errors.is_empty() {
            tracing::debug!(fields = ?self.errors.fields().collect::<Vec<_>>(), "Form is invalid");
            return None;
        }

        self.busy = true;
        let FormData {
            display_name,
            email,
            password,
            ..
        } = self.data.clone();
        Some(match self.mode {
            AuthMode::SignIn => AuthRequest::SignIn { email, password },
            AuthMode::SignUp => AuthRequest::SignUp {
                email,
                password,
                display_name,
            },
        })
    }

    pub fn finish_submit(&mut self, result: &Result<Session, AuthError>) {
        self.busy = false;
        if result.is_ok() {
            self.data = FormData::default();
            self.errors.clear();
        }
    }

    /// Returns the address to send a password reset email to.
    pub fn prepare_password_reset(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        if self.data.email.is_empty() {
            self.errors = ValidationErrors::single(FormField::Email, EMAIL_REQUIRED_FOR_RESET);
            return None;
        }
        self.busy = true;
        self.reset_email_sent = false;
        Some(self.data.email.clone())
    }

    pub fn finish_password_reset(&mut self, result: &Result<(), AuthError>) {
        self.busy = false;
        if result.is_ok() {
            self.reset_email_sent = true;
            self.errors.clear();
        }
    }

    /// Returns `false` if another request is still in flight.
    pub fn begin_social_sign_in(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish_social_sign_in(&mut self) {
        self.busy = false;
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(field)
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use super::*;
    use crate::provider::fake::{Call, FakeProvider};

    fn filled(mode: AuthMode, data: &[(FormField, &str)]) -> AuthForm {
        let mut form = AuthForm::new(mode);
        for (field, value) in data {
            form.update_field(*field, (*value).to_owned());
        }
        form
    }

    async fn submit(form: &mut AuthForm, provider: &FakeProvider) -> Option<Result<Session, AuthError>> {
        let request = form.prepare_submit()?;
        let result = request.dispatch(provider).await;
        form.finish_submit(&result);
        Some(result)
    }

    #[tokio::test]
    async fn valid_sign_up_invokes_the_provider_with_the_entered_values() {
        let provider = FakeProvider::default();
        let mut form = filled(
            AuthMode::SignUp,
            &[
                (FormField::Email, "a@b.com"),
                (FormField::Password, "secret"),
                (FormField::ConfirmPassword, "secret"),
                (FormField::DisplayName, "A"),
            ],
        );

        let result = submit(&mut form, &provider).await;

        assert_that(result.is_some_and(|it| it.is_ok())).is_true();
        assert_that(provider.calls()).is_equal_to(vec![Call::SignUp {
            email: "a@b.com".to_owned(),
            password: "secret".to_owned(),
            display_name: "A".to_owned(),
        }]);
        assert_that(form.busy).is_false();
        assert_that(form.data).is_equal_to(FormData::default());
    }

    #[tokio::test]
    async fn invalid_sign_in_reports_errors_without_calling_the_provider() {
        let provider = FakeProvider::default();
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "bad"), (FormField::Password, "12345")],
        );

        let result = submit(&mut form, &provider).await;

        assert_that(result.is_none()).is_true();
        assert_that(provider.calls().len()).is_equal_to(0);
        assert_that(form.error(FormField::Email)).is_equal_to(Some("Email is invalid"));
        assert_that(form.error(FormField::Password))
            .is_equal_to(Some("Password must be at least 6 characters"));
        assert_that(form.busy).is_false();
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_entered_values() {
        let provider = FakeProvider::failing(AuthError::Rejected {
            code: "INVALID_LOGIN_CREDENTIALS".to_owned(),
            message: "Invalid email or password.".to_owned(),
        });
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "a@b.com"), (FormField::Password, "secret")],
        );

        let result = submit(&mut form, &provider).await;

        assert_that(result.is_some_and(|it| it.is_err())).is_true();
        assert_that(form.busy).is_false();
        assert_that(form.data.email.as_str()).is_equal_to("a@b.com");
    }

    #[test]
    fn no_second_request_while_one_is_in_flight() {
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "a@b.com"), (FormField::Password, "secret")],
        );

        assert_that(form.prepare_submit().is_some()).is_true();
        assert_that(form.prepare_submit().is_none()).is_true();
        assert_that(form.prepare_password_reset().is_none()).is_true();
        assert_that(form.begin_social_sign_in()).is_false();
    }

    #[test]
    fn editing_a_field_drops_only_its_error() {
        let mut form = AuthForm::new(AuthMode::SignIn);
        assert_that(form.prepare_submit().is_none()).is_true();
        assert_that(form.errors.len()).is_equal_to(2);

        form.update_field(FormField::Email, "a".to_owned());

        assert_that(form.error(FormField::Email)).is_equal_to(None);
        assert_that(form.error(FormField::Password)).is_equal_to(Some("Password is required"));
    }

    #[test]
    fn toggling_to_sign_in_drops_sign_up_errors_and_values() {
        let mut form = filled(
            AuthMode::SignUp,
            &[
                (FormField::DisplayName, "Ada"),
                (FormField::ConfirmPassword, "x"),
            ],
        );
        assert_that(form.prepare_submit().is_none()).is_true();
        assert_that(form.errors.len()).is_equal_to(3);

        form.toggle_mode();

        assert_that(form.mode).is_equal_to(AuthMode::SignIn);
        assert_that(form.error(FormField::ConfirmPassword)).is_equal_to(None);
        assert_that(form.error(FormField::DisplayName)).is_equal_to(None);
        assert_that(form.error(FormField::Email)).is_equal_to(Some("Email is required"));
        assert_that(form.data.display_name.as_str()).is_equal_to("");
        assert_that(form.data.confirm_password.as_str()).is_equal_to("");
    }

    #[test]
    fn toggling_to_sign_up_keeps_shared_values() {
        let mut form = filled(AuthMode::SignIn, &[(FormField::Email, "a@b.com")]);
        form.toggle_mode();
        assert_that(form.mode).is_equal_to(AuthMode::SignUp);
        assert_that(form.data.email.as_str()).is_equal_to("a@b.com");
    }

    #[tokio::test]
    async fn password_reset_requires_an_email() {
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "bad"), (FormField::Password, "1")],
        );
        form.update_field(FormField::Email, String::new());
        assert_that(form.prepare_submit().is_none()).is_true();

        assert_that(form.prepare_password_reset()).is_equal_to(None);
        assert_that(form.errors).is_equal_to(ValidationErrors::single(
            FormField::Email,
            EMAIL_REQUIRED_FOR_RESET,
        ));
        assert_that(form.busy).is_false();
    }

    #[tokio::test]
    async fn successful_password_reset_shows_the_notice() {
        let provider = FakeProvider::default();
        let mut form = filled(AuthMode::SignIn, &[(FormField::Email, "ada@example.com")]);

        let email = form.prepare_password_reset().unwrap();
        assert_that(form.busy).is_true();
        let result = provider.reset_password(&email).await;
        form.finish_password_reset(&result);

        assert_that(form.reset_email_sent).is_true();
        assert_that(form.busy).is_false();
        assert_that(provider.calls()).is_equal_to(vec![Call::ResetPassword {
            email: "ada@example.com".to_owned(),
        }]);
    }

    #[tokio::test]
    async fn reset_notice_outlives_mode_changes_and_submissions() {
        let provider = FakeProvider::default();
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "ada@example.com"), (FormField::Password, "secret")],
        );
        let email = form.prepare_password_reset().unwrap();
        let result = provider.reset_password(&email).await;
        form.finish_password_reset(&result);

        form.toggle_mode();
        form.toggle_mode();
        assert_that(submit(&mut form, &provider).await.is_some()).is_true();
        assert_that(form.begin_social_sign_in()).is_true();
        form.finish_social_sign_in();

        assert_that(form.reset_email_sent).is_true();

        form.update_field(FormField::Email, "ada@example.com".to_owned());
        assert_that(form.prepare_password_reset().is_some()).is_true();
        assert_that(form.reset_email_sent).is_false();
    }

    #[tokio::test]
    async fn failed_password_reset_shows_no_notice() {
        let provider = FakeProvider::failing(AuthError::Unreachable {
            details: "offline".to_owned(),
        });
        let mut form = filled(AuthMode::SignIn, &[(FormField::Email, "ada@example.com")]);

        let email = form.prepare_password_reset().unwrap();
        let result = provider.reset_password(&email).await;
        form.finish_password_reset(&result);

        assert_that(form.reset_email_sent).is_false();
        assert_that(form.busy).is_false();
    }

    #[test]
    fn request_mode_follows_the_form_mode() {
        let mut form = filled(
            AuthMode::SignIn,
            &[(FormField::Email, "a@b.com"), (FormField::Password, "secret")],
        );
        let request = form.prepare_submit().unwrap();
        assert_that(request.mode()).is_equal_to(AuthMode::SignIn);
    }
}
