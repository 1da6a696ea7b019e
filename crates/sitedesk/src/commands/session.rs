use secrecy::SecretString;
use tracing::{debug, info};

use sitedesk_core::router::LOGIN_PATH;
use sitedesk_core::{Hub, Navigation};

use crate::error::CliError;
use crate::output::print_output;

const PASSWORD_ENV: &str = "SITEDESK_PASSWORD";

/// Pass the guard for `path`, signing in once when it redirects to the
/// login page.
pub async fn enter(hub: &Hub, path: &str, email: Option<&str>) -> Result<(), CliError> {
    match hub.guard().before_each(path).await {
        Navigation::Redirect(LOGIN_PATH) => {}
        Navigation::Proceed | Navigation::Redirect(_) => return Ok(()),
    }

    let email = email.ok_or(CliError::NoCredentials)?;
    let password = read_password()?;
    debug!(email, "signing in");
    hub.auth().login(email, &password).await?;
    info!(email, "signed in");

    match hub.guard().before_each(path).await {
        Navigation::Proceed => Ok(()),
        Navigation::Redirect(target) => Err(CliError::AuthFailed {
            message: format!("still redirected to {target} after signing in"),
        }),
    }
}

fn read_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(password));
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(SecretString::from(password))
}

pub fn whoami(hub: &Hub) -> Result<(), CliError> {
    let email = hub.auth().user_email().unwrap_or_else(|| "(no email)".to_owned());
    print_output(&email);
    Ok(())
}
