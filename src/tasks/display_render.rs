//! Terminal renderer for the display frame

use std::io::Write;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::DisplayFrame;

/// Redraw the current display string on one terminal line whenever it changes
pub async fn render_display_task(mut frames: watch::Receiver<DisplayFrame>) {
    info!("Starting terminal renderer");

    loop {
        let line = render_line(&frames.borrow_and_update());
        if draw(&line).is_err() {
            debug!("stdout closed, stopping terminal renderer");
            return;
        }

        if frames.changed().await.is_err() {
            debug!("Display channel closed, stopping terminal renderer");
            return;
        }
    }
}

fn draw(line: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r{}", line)?;
    stdout.flush()
}

fn render_line(frame: &DisplayFrame) -> String {
    format!("{} {}", frame.text, if frame.running { "▶" } else { "■" })
}
