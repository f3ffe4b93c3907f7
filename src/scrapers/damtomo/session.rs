use crate::browser::{wait, BrowserPage};
use crate::config::{Credentials, SiteSettings, TimingSettings};
use crate::constants::{LOGIN_ID_INPUT, LOGIN_PASSWORD_INPUT, LOGIN_SUBMIT};
use crate::error::{Result, ScraperError};
use tracing::{info, instrument};

/// Logs the page into DAM tomo. Never retried: a failed login is fatal to the run.
#[instrument(skip_all, fields(member = %credentials.member_id))]
pub async fn login(
    page: &dyn BrowserPage,
    credentials: &Credentials,
    site: &SiteSettings,
    timing: &TimingSettings,
) -> Result<()> {
    info!("Navigating to DAM tomo login page...");
    page.goto(&site.login_url, timing.login_timeout())
        .await
        .map_err(|e| auth_error("login page did not load", e))?;

    if page.count(LOGIN_ID_INPUT).await? == 0 || page.count(LOGIN_PASSWORD_INPUT).await? == 0 {
        return Err(ScraperError::Authentication("login form not found".into()));
    }

    info!("Filling in login credentials...");
    page.fill(LOGIN_ID_INPUT, &credentials.member_id)
        .await
        .map_err(|e| auth_error("member id could not be entered", e))?;
    page.fill(LOGIN_PASSWORD_INPUT, &credentials.password)
        .await
        .map_err(|e| auth_error("password could not be entered", e))?;

    let login_url = page.current_url().await?;
    info!("Submitting login form...");
    page.click(LOGIN_SUBMIT)
        .await
        .map_err(|e| auth_error("login submit control not found", e))?;

    wait::wait_for_navigation(
        page,
        &login_url,
        LOGIN_PASSWORD_INPUT,
        timing.login_timeout(),
        timing.poll_interval(),
    )
    .await
    .map_err(|e| auth_error("post-login navigation did not complete", e))?;

    if page.count(LOGIN_PASSWORD_INPUT).await? > 0 {
        return Err(ScraperError::Authentication("credentials were rejected".into()));
    }

    info!("Login successful!");
    Ok(())
}

fn auth_error(context: &str, cause: ScraperError) -> ScraperError {
    ScraperError::Authentication(format!("{}: {}", context, cause))
}
