use crate::cli::actions::Action;
use crate::form::RegisterForm;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .map(ToString::to_string)
        .with_context(|| format!("missing required argument: --{name}"))
}

fn optional(matches: &clap::ArgMatches, name: &str) -> String {
    matches
        .get_one::<String>(name)
        .map(ToString::to_string)
        .unwrap_or_default()
}

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub)) => Ok(Action::Login {
            email: required(sub, "email")?,
            password: SecretString::from(required(sub, "password")?),
        }),

        Some(("register", sub)) => {
            let form = RegisterForm {
                first_name: required(sub, "first-name")?,
                last_name: required(sub, "last-name")?,
                email: required(sub, "email")?,
                phone_number: required(sub, "phone-number")?,
                university_name: required(sub, "university")?,
                custom_college_name: optional(sub, "college-name"),
                university_uid: required(sub, "university-uid")?,
                graduation_year: required(sub, "graduation-year")?,
                degree_program: required(sub, "degree-program")?,
                gender: required(sub, "gender")?,
                role: required(sub, "role")?,
                hostel: optional(sub, "hostel"),
                profile_picture_url: optional(sub, "profile-picture-url"),
                password: required(sub, "password")?,
                confirm_password: required(sub, "confirm-password")?,
            };

            Ok(Action::Register(Box::new(form)))
        }

        Some(("dashboard", _)) => Ok(Action::Dashboard),
        Some(("logout", _)) => Ok(Action::Logout),

        _ => Err(anyhow!("missing subcommand")),
    }
}
