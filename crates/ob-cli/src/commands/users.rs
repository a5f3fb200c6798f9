//! Registered users table.

use std::future::Future;

use tracing::debug;

use ob_app::DataViewer;

use crate::terminal::{render_snapshot, Prompt};

/// Fetch once and print the table.
pub async fn list(viewer: &DataViewer, prompt: &Prompt) -> anyhow::Result<()> {
    let snapshot = viewer.refresh().await;
    prompt.say(render_snapshot(&snapshot).trim_end()).await?;
    Ok(())
}

/// Print the table on every refresh until `shutdown` resolves.
///
/// The poller is stopped before returning, whichever way the loop ends.
pub async fn watch(
    viewer: &DataViewer,
    prompt: &Prompt,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let mut updates = viewer.subscribe();
    viewer.start().await;
    let result = print_updates(&mut updates, prompt, shutdown).await;
    viewer.stop().await;
    result
}

async fn print_updates(
    updates: &mut tokio::sync::watch::Receiver<ob_app::ViewerSnapshot>,
    prompt: &Prompt,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("user table watch interrupted");
                return Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.loading {
                    continue;
                }
                prompt.say(render_snapshot(&snapshot).trim_end()).await?;
                prompt.say("(Ctrl-C to stop)").await?;
            }
        }
    }
}
