//! Form submission state and client-side validation for the auth flows.
//!
//! The rate-limit gate is a courtesy guard: the authoritative limit is
//! enforced server-side, this one only suppresses pointless resubmissions
//! while a 429 countdown is running.

use crate::api::{Rejection, RegisterRequest};
use crate::classify::DEFAULT_RETRY_AFTER_SECONDS;
use crate::validate;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-form submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    RateLimited(u64),
}

/// Submit rejected locally while the rate-limit countdown is running.
#[derive(Debug, Error, PartialEq, Eq)]
pub struct SubmitBlocked {
    pub seconds_remaining: u64,
}

impl std::fmt::Display for SubmitBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = if self.seconds_remaining == 1 { "" } else { "s" };
        write!(
            f,
            "Too many requests. Please wait {} second{plural} before trying again.",
            self.seconds_remaining
        )
    }
}

/// Gate enforcing at most one meaningful submission at a time.
///
/// A new `begin` while `Submitting` is allowed; the caller is expected to
/// cancel the in-flight request before issuing the new one.
#[derive(Debug, Default)]
pub struct SubmitGate {
    state: SubmitState,
}

impl Default for SubmitState {
    fn default() -> Self {
        Self::Idle
    }
}

impl SubmitGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> SubmitState {
        self.state
    }

    /// Move into `Submitting`, unless a rate-limit countdown is running.
    ///
    /// # Errors
    /// Returns [`SubmitBlocked`] with the remaining wait; the countdown is
    /// preserved and no network call should be made.
    pub fn begin(&mut self) -> std::result::Result<(), SubmitBlocked> {
        if let SubmitState::RateLimited(seconds) = self.state {
            if seconds > 0 {
                return Err(SubmitBlocked {
                    seconds_remaining: seconds,
                });
            }
        }

        self.state = SubmitState::Submitting;
        Ok(())
    }

    /// The in-flight submission succeeded.
    pub fn succeed(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// The in-flight submission failed with a classified rejection.
    ///
    /// Rate-limited rejections start the countdown; everything else returns
    /// to `Idle` with the inputs still editable.
    pub fn fail(&mut self, rejection: &Rejection) {
        self.state = if rejection.is_rate_limited {
            SubmitState::RateLimited(
                rejection
                    .retry_after_seconds
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
            )
        } else {
            SubmitState::Idle
        };
    }

    /// The in-flight submission was cancelled; treated as a no-op.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// One-second countdown tick; at zero the gate reopens.
    pub fn tick(&mut self) {
        if let SubmitState::RateLimited(seconds) = self.state {
            self.state = if seconds <= 1 {
                SubmitState::Idle
            } else {
                SubmitState::RateLimited(seconds - 1)
            };
        }
    }
}

/// Pre-submit validation for the login form.
///
/// Returns an empty map when the form is valid.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if email.trim().is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !validate::valid_email(email) {
        errors.insert("email".to_string(), "Invalid email format".to_string());
    }

    if password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    } else if !validate::valid_password(password) {
        errors.insert(
            "password".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
    }

    errors
}

/// Steps of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStep {
    Basic,
    Academic,
    Security,
}

impl RegisterStep {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Academic, Self::Security];

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Basic => Some(Self::Academic),
            Self::Academic => Some(Self::Security),
            Self::Security => None,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::Basic => None,
            Self::Academic => Some(Self::Basic),
            Self::Security => Some(Self::Academic),
        }
    }
}

/// University selection value that expands to the full institution name.
pub const UNIVERSITY_LPU: &str = "lpu";
/// University selection value that substitutes a custom college name.
pub const UNIVERSITY_OTHERS: &str = "others";

const LPU_FULL_NAME: &str = "Lovely Professional University";

/// Raw registration form state, as typed by the registrant.
///
/// `custom_college_name` and `confirm_password` never leave the client.
#[derive(Clone)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub university_name: String,
    pub custom_college_name: String,
    pub university_uid: String,
    pub graduation_year: String,
    pub degree_program: String,
    pub gender: String,
    pub role: String,
    pub hostel: String,
    pub profile_picture_url: String,
    pub password: String,
    pub confirm_password: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            university_name: String::new(),
            custom_college_name: String::new(),
            university_uid: String::new(),
            graduation_year: String::new(),
            degree_program: String::new(),
            gender: String::new(),
            role: "attendee".to_string(),
            hostel: String::new(),
            profile_picture_url: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

impl RegisterForm {
    /// Validate one step; an empty map means the step passes.
    #[must_use]
    pub fn validate_step(&self, step: RegisterStep) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        let mut fail = |field: &str, message: &str| {
            errors.insert(field.to_string(), message.to_string());
        };

        match step {
            RegisterStep::Basic => {
                if self.first_name.trim().chars().count() < 2 {
                    fail("first_name", "First name must be at least 2 characters");
                }
                if self.last_name.trim().chars().count() < 2 {
                    fail("last_name", "Last name must be at least 2 characters");
                }
                if self.email.trim().is_empty() {
                    fail("email", "Email is required");
                } else if !validate::valid_email(&self.email) {
                    fail("email", "Invalid email format");
                }
                if self.phone_number.trim().is_empty() {
                    fail("phone_number", "Phone number is required");
                } else if !validate::valid_phone_number(&self.phone_number) {
                    fail("phone_number", "Phone number must be 10 digits");
                }
            }
            RegisterStep::Academic => {
                if self.university_name.is_empty() {
                    fail("university_name", "University selection is required");
                } else if self.university_name == UNIVERSITY_OTHERS {
                    if self.custom_college_name.trim().chars().count() < 3 {
                        fail(
                            "custom_college_name",
                            "College name must be at least 3 characters",
                        );
                    }
                } else if self.university_name == UNIVERSITY_LPU
                    && self.hostel.trim().chars().count() < 3
                {
                    fail("hostel", "Hostel/Residence is required");
                }

                if self.university_uid.trim().chars().count() < 3 {
                    fail("university_uid", "University ID must be at least 3 characters");
                }
                if self.graduation_year.is_empty() {
                    fail("graduation_year", "Graduation year is required");
                }
                if self.degree_program.trim().chars().count() < 2 {
                    fail("degree_program", "Degree program is required");
                }
                if self.gender.is_empty() {
                    fail("gender", "Gender is required");
                }
                if !self.profile_picture_url.trim().is_empty()
                    && !validate::valid_url(&self.profile_picture_url)
                {
                    fail("profile_picture_url", "Invalid URL format");
                }
            }
            RegisterStep::Security => {
                if self.password.is_empty() {
                    fail("password", "Password is required");
                } else if !validate::valid_password(&self.password) {
                    fail("password", "Password must be at least 8 characters");
                }
                if self.confirm_password.is_empty() {
                    fail("confirm_password", "Please confirm your password");
                } else if self.password != self.confirm_password {
                    fail("confirm_password", "Passwords do not match");
                }
            }
        }

        errors
    }

    /// Validate every step in order, merging the failures.
    #[must_use]
    pub fn validate_all(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for step in RegisterStep::ALL {
            errors.extend(self.validate_step(step));
        }
        errors
    }

    /// Assemble the wire payload from the validated form.
    ///
    /// The `lpu` selection expands to the full institution name and keeps
    /// the hostel; `others` substitutes the custom college name and drops
    /// the hostel. Empty optional fields become null.
    ///
    /// # Errors
    /// Returns an error if the graduation year is not a number.
    pub fn to_request(&self) -> Result<RegisterRequest> {
        let graduation_year: i32 = self
            .graduation_year
            .trim()
            .parse()
            .context("invalid graduation year")?;

        let (university_name, hostel) = match self.university_name.as_str() {
            UNIVERSITY_LPU => (LPU_FULL_NAME.to_string(), none_if_empty(&self.hostel)),
            UNIVERSITY_OTHERS => (self.custom_college_name.trim().to_string(), None),
            other => (other.to_string(), none_if_empty(&self.hostel)),
        };

        Ok(RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: validate::format_phone_number(&self.phone_number),
            university_name,
            university_uid: self.university_uid.clone(),
            graduation_year,
            degree_program: self.degree_program.clone(),
            gender: self.gender.clone(),
            role: self.role.clone(),
            hostel,
            profile_picture_url: none_if_empty(&self.profile_picture_url),
            email_verified: false,
            password: self.password.clone(),
        })
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("university_name", &self.university_name)
            .field("role", &self.role)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rate_limited_rejection(retry_after_seconds: Option<u64>) -> Rejection {
        Rejection {
            status: Some(429),
            message: "Too many requests. Please wait a few moments before trying again."
                .to_string(),
            suggestion: None,
            retry_after_seconds,
            is_rate_limited: true,
            field_errors: BTreeMap::new(),
        }
    }

    fn validation_rejection() -> Rejection {
        Rejection {
            status: Some(400),
            message: "Invalid request data. Please check your information and try again."
                .to_string(),
            suggestion: None,
            retry_after_seconds: None,
            is_rate_limited: false,
            field_errors: BTreeMap::new(),
        }
    }

    fn filled_form() -> RegisterForm {
        RegisterForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            university_name: UNIVERSITY_LPU.to_string(),
            university_uid: "LPU-123".to_string(),
            graduation_year: "2027".to_string(),
            degree_program: "B.Tech CSE".to_string(),
            gender: "Female".to_string(),
            hostel: "BH-4".to_string(),
            password: "hunter2hunter2".to_string(),
            confirm_password: "hunter2hunter2".to_string(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn gate_submits_from_idle() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        assert_eq!(gate.state(), SubmitState::Submitting);
    }

    #[test]
    fn gate_success_returns_to_idle() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.succeed();
        assert_eq!(gate.state(), SubmitState::Idle);
    }

    #[test]
    fn rate_limited_rejection_starts_countdown() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.fail(&rate_limited_rejection(Some(15)));
        assert_eq!(gate.state(), SubmitState::RateLimited(15));
    }

    #[test]
    fn rate_limited_rejection_without_delay_defaults() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.fail(&rate_limited_rejection(None));
        assert_eq!(gate.state(), SubmitState::RateLimited(60));
    }

    #[test]
    fn other_rejections_return_to_idle() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.fail(&validation_rejection());
        assert_eq!(gate.state(), SubmitState::Idle);
    }

    #[test]
    fn submit_while_rate_limited_is_blocked_and_preserves_countdown() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.fail(&rate_limited_rejection(Some(3)));

        let blocked = gate.begin().unwrap_err();
        assert_eq!(blocked.seconds_remaining, 3);
        assert_eq!(gate.state(), SubmitState::RateLimited(3));
        assert_eq!(
            blocked.to_string(),
            "Too many requests. Please wait 3 seconds before trying again."
        );
    }

    #[test]
    fn blocked_message_is_singular_at_one_second() {
        let blocked = SubmitBlocked {
            seconds_remaining: 1,
        };
        assert_eq!(
            blocked.to_string(),
            "Too many requests. Please wait 1 second before trying again."
        );
    }

    #[test]
    fn countdown_ticks_back_to_idle() {
        let mut gate = SubmitGate::new();
        gate.begin().unwrap();
        gate.fail(&rate_limited_rejection(Some(2)));

        gate.tick();
        assert_eq!(gate.state(), SubmitState::RateLimited(1));
        gate.tick();
        assert_eq!(gate.state(), SubmitState::Idle);
        assert!(gate.begin().is_ok());
    }

    #[test]
    fn tick_outside_countdown_is_a_no_op() {
        let mut gate = SubmitGate::new();
        gate.tick();
        assert_eq!(gate.state(), SubmitState::Idle);
    }

    #[test]
    fn login_validation_passes_on_good_input() {
        assert!(validate_login("ada@example.com", "hunter2hunter2").is_empty());
    }

    #[test]
    fn login_validation_requires_fields() {
        let errors = validate_login("", "");
        assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));
        assert_eq!(
            errors.get("password").map(String::as_str),
            Some("Password is required")
        );
    }

    #[test]
    fn login_validation_checks_formats() {
        let errors = validate_login("not-an-email", "short");
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Invalid email format")
        );
        assert_eq!(
            errors.get("password").map(String::as_str),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn step_navigation_is_bounded() {
        assert_eq!(RegisterStep::Basic.prev(), None);
        assert_eq!(RegisterStep::Basic.next(), Some(RegisterStep::Academic));
        assert_eq!(RegisterStep::Security.next(), None);
        assert_eq!(RegisterStep::Security.prev(), Some(RegisterStep::Academic));
    }

    #[test]
    fn basic_step_validation() {
        let form = RegisterForm {
            first_name: "A".to_string(),
            email: "bad".to_string(),
            phone_number: "123".to_string(),
            ..RegisterForm::default()
        };

        let errors = form.validate_step(RegisterStep::Basic);
        assert_eq!(
            errors.get("first_name").map(String::as_str),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get("last_name").map(String::as_str),
            Some("Last name must be at least 2 characters")
        );
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Invalid email format")
        );
        assert_eq!(
            errors.get("phone_number").map(String::as_str),
            Some("Phone number must be 10 digits")
        );
    }

    #[test]
    fn academic_step_requires_hostel_for_lpu() {
        let mut form = filled_form();
        form.hostel = String::new();

        let errors = form.validate_step(RegisterStep::Academic);
        assert_eq!(
            errors.get("hostel").map(String::as_str),
            Some("Hostel/Residence is required")
        );
    }

    #[test]
    fn academic_step_requires_college_name_for_others() {
        let mut form = filled_form();
        form.university_name = UNIVERSITY_OTHERS.to_string();
        form.custom_college_name = "IT".to_string();

        let errors = form.validate_step(RegisterStep::Academic);
        assert_eq!(
            errors.get("custom_college_name").map(String::as_str),
            Some("College name must be at least 3 characters")
        );
        // Hostel is not required for the others selection.
        assert!(!errors.contains_key("hostel"));
    }

    #[test]
    fn academic_step_checks_profile_picture_url() {
        let mut form = filled_form();
        form.profile_picture_url = "not a url".to_string();

        let errors = form.validate_step(RegisterStep::Academic);
        assert_eq!(
            errors.get("profile_picture_url").map(String::as_str),
            Some("Invalid URL format")
        );
    }

    #[test]
    fn security_step_requires_matching_passwords() {
        let mut form = filled_form();
        form.confirm_password = "different-pass".to_string();

        let errors = form.validate_step(RegisterStep::Security);
        assert_eq!(
            errors.get("confirm_password").map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn filled_form_passes_all_steps() {
        assert!(filled_form().validate_all().is_empty());
    }

    #[test]
    fn to_request_expands_lpu_and_keeps_hostel() {
        let request = filled_form().to_request().unwrap();
        assert_eq!(request.university_name, "Lovely Professional University");
        assert_eq!(request.hostel.as_deref(), Some("BH-4"));
        assert_eq!(request.graduation_year, 2027);
        assert!(!request.email_verified);
        assert_eq!(request.role, "attendee");
    }

    #[test]
    fn to_request_substitutes_custom_college_and_drops_hostel() {
        let mut form = filled_form();
        form.university_name = UNIVERSITY_OTHERS.to_string();
        form.custom_college_name = "  Imperial College  ".to_string();

        let request = form.to_request().unwrap();
        assert_eq!(request.university_name, "Imperial College");
        assert_eq!(request.hostel, None);
    }

    #[test]
    fn to_request_nulls_empty_optionals() {
        let mut form = filled_form();
        form.profile_picture_url = "   ".to_string();

        let request = form.to_request().unwrap();
        assert_eq!(request.profile_picture_url, None);
    }

    #[test]
    fn to_request_rejects_non_numeric_year() {
        let mut form = filled_form();
        form.graduation_year = "soon".to_string();
        assert!(form.to_request().is_err());
    }
}
