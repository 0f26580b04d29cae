use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

fn login_command() -> Command {
    Command::new("login")
        .about("Sign in and store the session token")
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email address")
                .env("CONVOCA_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("Account password")
                .env("CONVOCA_PASSWORD")
                .required(true),
        )
}

fn register_command() -> Command {
    Command::new("register")
        .about("Create an account")
        .arg(
            Arg::new("first-name")
                .long("first-name")
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new("last-name")
                .long("last-name")
                .help("Last name")
                .required(true),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .help("Email address")
                .env("CONVOCA_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("phone-number")
                .long("phone-number")
                .help("Phone number, 10 digits")
                .required(true),
        )
        .arg(
            Arg::new("university")
                .long("university")
                .help("University selection: lpu or others")
                .required(true),
        )
        .arg(
            Arg::new("college-name")
                .long("college-name")
                .help("College name, required with --university others")
                .required_if_eq("university", "others"),
        )
        .arg(
            Arg::new("university-uid")
                .long("university-uid")
                .help("University registration/ID number")
                .required(true),
        )
        .arg(
            Arg::new("graduation-year")
                .long("graduation-year")
                .help("Expected graduation year")
                .required(true),
        )
        .arg(
            Arg::new("degree-program")
                .long("degree-program")
                .help("Degree program")
                .required(true),
        )
        .arg(
            Arg::new("gender")
                .long("gender")
                .help("Gender")
                .required(true),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .help("Requested role")
                .default_value("attendee"),
        )
        .arg(
            Arg::new("hostel")
                .long("hostel")
                .help("Hostel/Residence, required for lpu"),
        )
        .arg(
            Arg::new("profile-picture-url")
                .long("profile-picture-url")
                .help("Profile picture URL"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Account password")
                .env("CONVOCA_PASSWORD")
                .required(true),
        )
        .arg(
            Arg::new("confirm-password")
                .long("confirm-password")
                .help("Password confirmation")
                .env("CONVOCA_CONFIRM_PASSWORD")
                .required(true),
        )
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("convoca")
        .about("Event platform auth client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the event platform backend")
                .default_value("http://localhost:3000")
                .env("CONVOCA_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Path of the session file")
                .default_value(".convoca/session.json")
                .env("CONVOCA_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("CONVOCA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(login_command())
        .subcommand(register_command())
        .subcommand(Command::new("dashboard").about("Show the signed-in dashboard"))
        .subcommand(Command::new("logout").about("Clear the stored session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "convoca");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Event platform auth client"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_login_args() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "convoca",
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2hunter2",
        ]);

        assert_eq!(
            matches.get_one::<String>("api-url").map(|s| s.to_string()),
            Some("http://localhost:3000".to_string())
        );

        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "login");
        assert_eq!(
            sub.get_one::<String>("email").map(|s| s.to_string()),
            Some("ada@example.com".to_string())
        );
        assert_eq!(
            sub.get_one::<String>("password").map(|s| s.to_string()),
            Some("hunter2hunter2".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("CONVOCA_API_URL", Some("https://api.convoca.dev")),
                ("CONVOCA_SESSION_FILE", Some("/tmp/session.json")),
                ("CONVOCA_EMAIL", Some("ada@example.com")),
                ("CONVOCA_PASSWORD", Some("hunter2hunter2")),
                ("CONVOCA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["convoca", "login"]);

                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some("https://api.convoca.dev".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("session-file")
                        .map(|s| s.to_string()),
                    Some("/tmp/session.json".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));

                let (name, sub) = matches.subcommand().expect("subcommand");
                assert_eq!(name, "login");
                assert_eq!(
                    sub.get_one::<String>("email").map(|s| s.to_string()),
                    Some("ada@example.com".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("CONVOCA_LOG_LEVEL", Some(level)),
                    ("CONVOCA_EMAIL", Some("ada@example.com")),
                    ("CONVOCA_PASSWORD", Some("hunter2hunter2")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["convoca", "login"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_register_requires_college_name_for_others() {
        temp_env::with_vars(
            [
                ("CONVOCA_EMAIL", None::<String>),
                ("CONVOCA_PASSWORD", None::<String>),
            ],
            || {
                let result = new().try_get_matches_from(vec![
                    "convoca",
                    "register",
                    "--first-name",
                    "Ada",
                    "--last-name",
                    "Lovelace",
                    "--email",
                    "ada@example.com",
                    "--phone-number",
                    "9876543210",
                    "--university",
                    "others",
                    "--university-uid",
                    "REG-123",
                    "--graduation-year",
                    "2027",
                    "--degree-program",
                    "B.Tech CSE",
                    "--gender",
                    "Female",
                    "--password",
                    "hunter2hunter2",
                    "--confirm-password",
                    "hunter2hunter2",
                ]);

                assert!(result.is_err());
            },
        );
    }
}
