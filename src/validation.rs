//! Client-side validation of the sign-in / sign-up form.
//!
//! Every rule is applied independently, so a single pass reports all offending fields at once.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Which flavor of the auth form is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }

    /// Whether `field` is part of the form in this mode.
    pub fn uses(self, field: FormField) -> bool {
        match field {
            FormField::Email | FormField::Password => true,
            FormField::DisplayName | FormField::ConfirmPassword => self == AuthMode::SignUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    DisplayName,
    Email,
    Password,
    ConfirmPassword,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::DisplayName,
        FormField::Email,
        FormField::Password,
        FormField::ConfirmPassword,
    ];

    /// Form-field name, also used as the html `name` / `id` of the rendered input.
    pub fn name(self) -> &'static str {
        match self {
            FormField::DisplayName => "name",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::ConfirmPassword => "confirmPassword",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values of the auth form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormData {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::DisplayName => &self.display_name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::DisplayName => &mut self.display_name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::ConfirmPassword => &mut self.confirm_password,
        };
        *slot = value;
    }
}

/// Human-readable validation messages, keyed by the offending field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of a single message for `field`.
    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    /// Drop every error belonging to a field not shown in `mode`.
    pub fn retain_for(&mut self, mode: AuthMode) {
        self.0.retain(|field, _| mode.uses(*field));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }
}

/// Loose email shape check: something, an `@`, something, a dot, something.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Validate `data` for `mode`. An empty result means the form may be submitted.
pub fn validate(data: &FormData, mode: AuthMode) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if data.email.is_empty() {
        errors.insert(FormField::Email, "Email is required");
    } else if !is_valid_email(&data.email) {
        errors.insert(FormField::Email, "Email is invalid");
    }

    if data.password.is_empty() {
        errors.insert(FormField::Password, "Password is required");
    } else if data.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            FormField::Password,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    if mode == AuthMode::SignUp {
        if data.display_name.is_empty() {
            errors.insert(FormField::DisplayName, "Name is required");
        }

        if data.confirm_password.is_empty() {
            errors.insert(FormField::ConfirmPassword, "Please confirm your password");
        } else if data.password != data.confirm_password {
            errors.insert(FormField::ConfirmPassword, "Passwords do not match");
        }
    }

    errors
}
