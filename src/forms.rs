//! Sign-in and sign-up form validation.
//!
//! Each field reports at most one error: the first rule it fails, in the
//! order listed on the rule tables below. A form that validates turns into
//! the matching API request.
//!
//! Password length is measured in UTF-16 code units, the way browsers count
//! string length, so a character outside the Basic Multilingual Plane counts
//! twice.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::fmt;

use crate::api::{SignInRequest, SignUpRequest};

pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

/// Per-field error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, &'static str)>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, msg)| *msg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().copied()
    }

    fn check(&mut self, field: Field, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.0.push((field, message));
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.label())?;
        }
        Ok(())
    }
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// # Errors
    ///
    /// Returns the failing fields when the form is incomplete or malformed.
    pub fn validate(self) -> Result<SignInRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Password, required(&self.password, "Password is required"));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignInRequest { email: self.email, password: self.password })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl SignUpForm {
    /// # Errors
    ///
    /// Returns the failing fields when the form is incomplete, malformed, or
    /// the password is too weak.
    pub fn validate(self) -> Result<SignUpRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Name, required(&self.name, "Name is required"));
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Password, check_new_password(&self.password));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignUpRequest { email: self.email, name: self.name, password: self.password })
    }
}

// =============================================================================
// RULES
// =============================================================================

fn required(value: &str, message: &'static str) -> Result<(), &'static str> {
    if value.is_empty() { Err(message) } else { Ok(()) }
}

fn check_email(email: &str) -> Result<(), &'static str> {
    required(email, "Email is required")?;
    if is_email(email) { Ok(()) } else { Err("Invalid email") }
}

/// `local@domain.tld`: one `@`, no whitespace, a dotted domain with no empty
/// labels.
#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

const PASSWORD_RULES: &[(fn(&str) -> bool, &str)] = &[
    (long_enough, "Password must be at least 8 characters long"),
    (has_lowercase, "Password must contain a lowercase letter"),
    (has_uppercase, "Password must contain an uppercase letter"),
    (has_digit, "Password must contain a number"),
    (has_special, "Password must contain a special character (exclude white space)"),
];

fn long_enough(p: &str) -> bool {
    p.encode_utf16().count() >= PASSWORD_MIN_LEN
}

fn has_lowercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_lowercase())
}

fn has_uppercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

fn has_special(p: &str) -> bool {
    p.chars().any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
}

fn check_new_password(password: &str) -> Result<(), &'static str> {
    required(password, "Password is required")?;
    match PASSWORD_RULES.iter().find(|(passes, _)| !passes(password)) {
        Some((_, message)) => Err(*message),
        None => Ok(()),
    }
}
