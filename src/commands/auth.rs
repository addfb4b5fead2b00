//! Auth command handlers: login, register and logout.

use anyhow::Result;
use coursekit_core::state::AppState;
use tracing::info;

use super::explain;
use crate::cli::CredentialArgs;

pub async fn run_login_command(state: &mut AppState, args: &CredentialArgs) -> Result<()> {
    state
        .login(&args.email, &args.password)
        .await
        .map_err(explain)?;
    println!("Logged in as {}", args.email.trim().to_lowercase());
    Ok(())
}

pub async fn run_register_command(state: &mut AppState, args: &CredentialArgs) -> Result<()> {
    state
        .register(&args.email, &args.password)
        .await
        .map_err(explain)?;
    println!("Account created for {}", args.email.trim().to_lowercase());
    Ok(())
}

pub fn run_logout_command(state: &mut AppState) -> Result<()> {
    if !state.is_authenticated() {
        info!("No saved session");
    }
    state.logout().map_err(explain)?;
    println!("Logged out");
    Ok(())
}
