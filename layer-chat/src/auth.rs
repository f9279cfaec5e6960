//! Login flow: code, then the SRP password check if the account has 2FA.

use crate::config::Config;
use crate::errors::Error;
use crate::messenger::{Account, Messenger, SignIn};
use crate::prompt::Prompt;
use crate::srp::SrpProof;

/// Make sure the session is authorized, logging in interactively if needed.
///
/// Any failure other than "password needed" aborts the run.
pub async fn authenticate<M, P>(messenger: &mut M, prompt: &mut P, config: &Config) -> Result<Account, Error>
where
    M: Messenger,
    P: Prompt,
{
    if let Some(me) = messenger.current_user().await {
        log::info!("Already logged in as {me}");
        return Ok(me);
    }

    let login = messenger.send_code(&config.phone).await?;
    log::debug!("phone_code_hash={}", login.phone_code_hash);

    let code = prompt.line(&format!("Please enter passcode for {}:", config.phone))?;
    let account = match messenger.sign_in(&login, &code).await? {
        SignIn::Authorized(account) => account,
        SignIn::PasswordNeeded => {
            log::info!("Account is protected by a 2FA password");
            second_factor(messenger, prompt, config).await?
        }
    };

    log::info!("Signed in as {account}");
    Ok(account)
}

async fn second_factor<M, P>(messenger: &mut M, prompt: &mut P, config: &Config) -> Result<Account, Error>
where
    M: Messenger,
    P: Prompt,
{
    let challenge = messenger.password_challenge().await?;
    let password = match &config.password {
        Some(pw) => pw.clone(),
        None => {
            let hint = challenge.hint.as_deref().unwrap_or("no hint");
            prompt.line(&format!("2FA password (hint: {hint}):"))?
        }
    };
    let proof = SrpProof::compute(&challenge, password.as_bytes())?;
    messenger.check_password(&proof).await
}
