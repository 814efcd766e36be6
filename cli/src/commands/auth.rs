use anyhow::{bail, Result};
use seija_client::AppContext;
use seija_shared::{forms, ProfilePatch};

use super::{check_form, print_json};

pub async fn login(app: &mut AppContext, email: &str, password: &str) -> Result<()> {
    check_form(forms::validate_login(email, password))?;
    if !app.auth.login(email, password).await {
        bail!("login failed: {}", app.auth.last_error().unwrap_or("unknown error"));
    }
    match app.auth.session() {
        Some(session) => print_json(session),
        None => bail!("login did not produce a session"),
    }
}

pub async fn register(
    app: &mut AppContext,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    check_form(forms::validate_registration(username, email, password))?;
    if !app.auth.register(username, email, password).await {
        bail!("registration failed: {}", app.auth.last_error().unwrap_or("unknown error"));
    }
    println!("Registered {username}. Run `seija login` to start a session.");
    Ok(())
}

pub fn logout(app: &mut AppContext) -> Result<()> {
    app.auth.logout();
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(app: &mut AppContext, refresh: bool) -> Result<()> {
    if refresh && !app.auth.refresh_profile().await {
        tracing::warn!("could not refresh profile; showing the stored session");
    }
    match app.auth.session() {
        Some(session) => print_json(session),
        None => bail!("not logged in"),
    }
}

pub async fn profile_update(
    app: &mut AppContext,
    username: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
    bio: Option<String>,
    local: bool,
) -> Result<()> {
    let patch = ProfilePatch {
        username,
        email,
        avatar,
        bio,
    };
    if patch.is_empty() {
        bail!("nothing to update");
    }
    if !app.auth.is_authenticated() {
        bail!("please login to update your profile (run `seija login`)");
    }

    if local {
        app.auth.update_local_profile(&patch);
    } else if !app.auth.update_profile(&patch).await {
        bail!("profile update failed: {}", app.auth.last_error().unwrap_or("unknown error"));
    }
    match app.auth.session() {
        Some(session) => print_json(session),
        None => bail!("not logged in"),
    }
}
