use anyhow::Result;
use convoca::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Login { email, password } => {
            actions::login::handle(email, password, &globals).await?;
        }
        Action::Register(form) => actions::register::handle(*form, &globals).await?,
        Action::Dashboard => actions::dashboard::handle(&globals)?,
        Action::Logout => actions::logout::handle(&globals)?,
    }

    Ok(())
}
