//! Upload Center panel: refresh-job status and the upload log.

use console::style;
use district_desk_api_models::{RefreshJob, UploadAsset};

/// How many upload log entries the panel shows.
pub const LOG_LENGTH: usize = 6;

/// Renders the refresh status tile and the upload log.
pub fn render(uploads: &[UploadAsset], refresh_job: Option<&RefreshJob>) {
    println!();
    println!("{}", style("Upload Center").bold().underlined());
    println!();

    match refresh_job {
        Some(job) => {
            println!("  Refresh status  {}", style(job.status).bold());
            if let Some(started) = job.started_at {
                let finished = job.finished_at.map_or_else(
                    || "\u{2014}".to_string(),
                    |at| at.format("%Y-%m-%d %H:%M").to_string(),
                );
                println!(
                    "  Started {}  Finished {}",
                    started.format("%Y-%m-%d %H:%M"),
                    finished,
                );
            }
            if let Some(note) = &job.note
                && !note.is_empty()
            {
                println!("  Note: {note}");
            }
        }
        None => println!("  Refresh status  {}", style("Idle").bold()),
    }

    println!();
    println!("{}", style("Upload log").bold());
    if uploads.is_empty() {
        println!("  No uploads yet.");
        return;
    }

    for upload in uploads.iter().take(LOG_LENGTH) {
        let format = upload
            .input_format
            .map_or_else(String::new, |f| format!("  [{f}]"));
        println!(
            "  {:<12}  {}  {:>6} rows{}",
            upload.status.as_ref(),
            upload.created_at.format("%Y-%m-%d %H:%M"),
            upload.row_count,
            format,
        );
    }
}
