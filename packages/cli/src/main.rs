#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal entry point for the district analytics dashboard.
//!
//! Initializes logging (`RUST_LOG`) and hands control to the
//! interactive dashboard loop. The backend base URL and token file
//! location come from `DISTRICT_DESK_API_URL` and
//! `DISTRICT_DESK_SESSION_FILE`.
//!
//! The UI is single-threaded and event driven; a current-thread
//! runtime is all the fan-out joins need.

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    district_desk_dashboard::interactive::run().await?;

    Ok(())
}
