//! Interactive dashboard loop.
//!
//! Login, district selection, and the five-panel tab router. Every
//! backend error is rendered inline next to the action that caused it
//! and the loop keeps going; nothing here can take the process down.

use std::path::Path;
use std::time::Duration;

use console::style;
use dialoguer::{Confirm, Editor, Input, Password, Select};
use district_desk_api::ApiClient;
use district_desk_api_models::{AccountRequest, UploadPayload};
use district_desk_session::{SessionManager, SessionState, TokenStore};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{DashboardError, DistrictView, Tab, load_district, panels};

/// Actions available before authentication.
enum EntryAction {
    LogIn,
    RequestAccess,
    Quit,
}

impl EntryAction {
    const ALL: &[Self] = &[Self::LogIn, Self::RequestAccess, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::LogIn => "Log in",
            Self::RequestAccess => "Request dashboard access",
            Self::Quit => "Quit",
        }
    }
}

/// Actions appended after the five tabs in the tab selector.
const EXTRA_ACTIONS: &[&str] = &["Switch district", "Log out", "Quit"];

/// How the authenticated dashboard loop ended.
enum Outcome {
    LoggedOut,
    Quit,
}

/// Runs the interactive dashboard until the officer quits.
///
/// # Errors
///
/// Returns [`DashboardError`] only for terminal prompt failures;
/// backend and intake errors are rendered inline and the loop
/// continues.
pub async fn run() -> Result<(), DashboardError> {
    let client = ApiClient::from_env();
    let mut session = SessionManager::restore(TokenStore::from_env());

    println!("{}", style("District Desk").bold());
    println!();

    loop {
        if session.state() == SessionState::Authenticating {
            let bar = spinner("Checking stored session...");
            let resolved = session.resolve_profile(&client).await.is_some();
            bar.finish_and_clear();
            if !resolved {
                println!("Stored session is no longer valid. Please log in.");
            }
        }

        if session.state() != SessionState::Authenticated {
            let labels: Vec<&str> = EntryAction::ALL.iter().map(EntryAction::label).collect();
            let idx = Select::new()
                .with_prompt("Welcome")
                .items(&labels)
                .default(0)
                .interact()?;
            match EntryAction::ALL[idx] {
                EntryAction::LogIn => {
                    if !login_flow(&client, &mut session).await? {
                        continue;
                    }
                }
                EntryAction::RequestAccess => {
                    request_access_flow(&client).await?;
                    continue;
                }
                EntryAction::Quit => return Ok(()),
            }
        }

        let Some(token) = session.access_token().map(ToString::to_string) else {
            continue;
        };
        if let Some(profile) = session.profile() {
            println!(
                "{} \u{2014} {}",
                style(&profile.user.first_name).bold(),
                profile.role.to_uppercase(),
            );
        }

        match dashboard_loop(&client, &token, &mut session).await? {
            Outcome::Quit => return Ok(()),
            Outcome::LoggedOut => {}
        }
    }
}

/// Prompts for credentials and advances the session to authenticated.
///
/// Returns `false` (after rendering the error inline) when login or
/// the follow-up profile fetch fails.
async fn login_flow(
    client: &ApiClient,
    session: &mut SessionManager,
) -> Result<bool, DashboardError> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    if let Err(e) = session.login(client, &username, &password).await {
        show_error(&e);
        return Ok(false);
    }

    let bar = spinner("Fetching profile...");
    let resolved = session.resolve_profile(client).await.is_some();
    bar.finish_and_clear();

    if !resolved {
        println!("Could not verify the new session. Please try again.");
        return Ok(false);
    }
    Ok(true)
}

/// Collects and submits an access request.
async fn request_access_flow(client: &ApiClient) -> Result<(), DashboardError> {
    let first_name: String = Input::new().with_prompt("First name").interact_text()?;
    let last_name: String = Input::new().with_prompt("Last name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let organization: String = Input::new()
        .with_prompt("Organization (optional)")
        .allow_empty(true)
        .interact_text()?;
    let message: String = Input::new()
        .with_prompt("Why do you need access? (optional)")
        .allow_empty(true)
        .interact_text()?;
    let district: String = Input::new()
        .with_prompt("District slug (optional)")
        .allow_empty(true)
        .interact_text()?;

    let request = AccountRequest {
        email,
        first_name,
        last_name,
        organization: none_if_empty(organization),
        message: none_if_empty(message),
        district: none_if_empty(district),
    };

    match district_desk_api::auth::request_access(client, &request).await {
        Ok(()) => println!("Request submitted. The admin team will follow up by email."),
        Err(e) => show_error(&e),
    }
    Ok(())
}

/// District selection, load, and the tab router.
#[allow(clippy::too_many_lines)]
async fn dashboard_loop(
    client: &ApiClient,
    token: &str,
    session: &mut SessionManager,
) -> Result<Outcome, DashboardError> {
    'district: loop {
        let Some(slug) = select_district(client).await? else {
            return Ok(Outcome::Quit);
        };

        let mut view = loop {
            let bar = spinner("Loading district intelligence...");
            let result = load_district(client, token, &slug).await;
            bar.finish_and_clear();
            match result {
                Ok(view) => break view,
                Err(e) => {
                    show_error(&e);
                    if Confirm::new()
                        .with_prompt("Retry load?")
                        .default(true)
                        .interact()?
                    {
                        continue;
                    }
                    continue 'district;
                }
            }
        };

        println!(
            "District {} \u{2014} officer collaboration hub",
            style(slug.to_uppercase()).bold()
        );
        if let Some(upload) = view.latest_upload() {
            println!(
                "Latest upload \u{2014} {} \u{2014} {}",
                upload.status,
                upload.created_at.format("%Y-%m-%d %H:%M"),
            );
        }

        loop {
            let mut labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();
            labels.extend_from_slice(EXTRA_ACTIONS);

            let idx = Select::new()
                .with_prompt("Panel")
                .items(&labels)
                .default(0)
                .interact()?;

            if let Some(tab) = Tab::ALL.get(idx) {
                match tab {
                    Tab::Overview => panels::overview::render(&view),
                    Tab::Eda => eda_loop(&view)?,
                    Tab::MlLab => panels::models::render(view.models()),
                    Tab::UploadCenter => upload_center(client, token, &mut view).await?,
                    Tab::Gis => panels::gis::render(&view),
                }
                continue;
            }

            match idx - Tab::ALL.len() {
                0 => continue 'district,
                1 => {
                    session.logout();
                    println!("Logged out.");
                    return Ok(Outcome::LoggedOut);
                }
                _ => return Ok(Outcome::Quit),
            }
        }
    }
}

/// Fetches the district directory and prompts for a selection.
///
/// Falls back to a free-form slug prompt when the directory is empty
/// or unavailable. `None` means quit.
async fn select_district(client: &ApiClient) -> Result<Option<String>, DashboardError> {
    let bar = spinner("Fetching districts...");
    let districts = district_desk_api::auth::fetch_districts(client).await;
    bar.finish_and_clear();

    match districts {
        Ok(districts) if !districts.is_empty() => {
            let mut labels: Vec<String> = districts
                .iter()
                .map(|d| format!("{} ({})", d.name, d.slug))
                .collect();
            labels.push("Quit".to_string());

            let idx = Select::new()
                .with_prompt("District")
                .items(&labels)
                .default(0)
                .interact()?;
            Ok(districts.get(idx).map(|d| d.slug.clone()))
        }
        other => {
            if let Err(e) = other {
                show_error(&e);
            }
            let slug: String = Input::new()
                .with_prompt("District slug (empty to quit)")
                .allow_empty(true)
                .interact_text()?;
            let slug = slug.trim().to_string();
            Ok(if slug.is_empty() { None } else { Some(slug) })
        }
    }
}

/// Column browser for the EDA panel.
fn eda_loop(view: &DistrictView) -> Result<(), DashboardError> {
    let names: Vec<&String> = view.snapshot.eda_payload.keys().collect();
    if names.is_empty() {
        println!("No EDA columns in this snapshot.");
        return Ok(());
    }

    loop {
        let mut labels: Vec<&str> = names.iter().map(|name| name.as_str()).collect();
        labels.push("Back");

        let idx = Select::new()
            .with_prompt("Column")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(name) = names.get(idx) else {
            return Ok(());
        };
        if let Some(metrics) = view.snapshot.eda_payload.get(*name) {
            panels::eda::render_column(name, metrics);
        }
    }
}

/// Upload Center actions: file upload, clipboard paste, refresh
/// trigger. Upload actions re-fetch the uploads list in full to
/// reflect authoritative server state; nothing merges incrementally.
#[allow(clippy::too_many_lines)]
async fn upload_center(
    client: &ApiClient,
    token: &str,
    view: &mut DistrictView,
) -> Result<(), DashboardError> {
    loop {
        panels::uploads::render(&view.uploads, view.refresh_job.as_ref());

        let actions = [
            "Upload spreadsheet file",
            "Paste clipboard rows",
            "Trigger refresh",
            "Back",
        ];
        let idx = Select::new()
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        match idx {
            0 => {
                let path: String = Input::new()
                    .with_prompt("Path to CSV/XLSX export")
                    .interact_text()?;
                match district_desk_ingest::file_payload(&view.slug, Path::new(path.trim())) {
                    Ok(payload) => {
                        submit_upload(
                            client,
                            token,
                            view,
                            payload,
                            "File uploaded. Trigger refresh to rebuild analytics.",
                        )
                        .await;
                    }
                    Err(e) => show_error(&e),
                }
            }
            1 => {
                let Some(raw) = Editor::new().edit("")? else {
                    println!("Nothing pasted.");
                    continue;
                };
                match district_desk_ingest::parse_clipboard(&raw) {
                    Ok(rows) if rows.is_empty() => println!("No rows parsed."),
                    Ok(rows) => {
                        let payload = UploadPayload::Clipboard {
                            district: view.slug.clone(),
                            rows,
                        };
                        submit_upload(
                            client,
                            token,
                            view,
                            payload,
                            "Clipboard data queued. Trigger refresh to publish.",
                        )
                        .await;
                    }
                    Err(e) => show_error(&e),
                }
            }
            2 => match district_desk_api::uploads::trigger_refresh(client, token).await {
                Ok(job) => view.refresh_job = Some(job),
                Err(e) => show_error(&e),
            },
            _ => return Ok(()),
        }
    }
}

/// Sends an upload and re-fetches the upload list on success.
async fn submit_upload(
    client: &ApiClient,
    token: &str,
    view: &mut DistrictView,
    payload: UploadPayload,
    success: &str,
) {
    if let Err(e) = district_desk_api::uploads::upload_asset(client, token, payload).await {
        show_error(&e);
        return;
    }
    match district_desk_api::uploads::list_uploads(client, token).await {
        Ok(uploads) => {
            view.uploads = uploads;
            println!("{success}");
        }
        Err(e) => show_error(&e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

fn show_error(err: &impl std::fmt::Display) {
    println!("{}", style(err).red());
}

fn none_if_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_labels_cover_all_actions() {
        let labels: Vec<&str> = EntryAction::ALL.iter().map(EntryAction::label).collect();
        assert_eq!(labels, vec!["Log in", "Request dashboard access", "Quit"]);
    }

    #[test]
    fn none_if_empty_trims() {
        assert_eq!(none_if_empty("  ".to_string()), None);
        assert_eq!(none_if_empty(" east ".to_string()), Some("east".to_string()));
    }
}
