pub mod dashboard;
pub mod login;
pub mod logout;
pub mod register;

use crate::form::RegisterForm;
use secrecy::SecretString;

/// Parsed CLI action, one per flow.
#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Register(Box<RegisterForm>),
    Dashboard,
    Logout,
}
