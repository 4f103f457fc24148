use crate::api::{ActionApi, ActionWaiter};
use crate::error::{Error, Result};
use crate::models::{Action, ActionStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Polls an action until it leaves the `running` state, drawing its progress
/// on stderr.
pub struct PollingWaiter<'a, A: ?Sized> {
    api: &'a A,
    poll_interval: Duration,
    show_progress: bool,
}

impl<'a, A: ActionApi + ?Sized> PollingWaiter<'a, A> {
    pub fn new(api: &'a A, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            show_progress: atty::is(atty::Stream::Stderr),
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, action: &Action) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{msg} {wide_bar} {pos:>3}%") {
            bar.set_style(style);
        }
        bar.set_message(action.command.clone());
        bar
    }
}

impl<A: ActionApi + ?Sized> ActionWaiter for PollingWaiter<'_, A> {
    fn wait(&self, action: &Action) -> Result<()> {
        debug!(
            id = action.id,
            poll_interval = %humantime::format_duration(self.poll_interval),
            "waiting for action"
        );
        let bar = self.progress_bar(action);
        let mut current = action.clone();
        loop {
            bar.set_position(u64::from(current.progress.min(100)));
            match current.status {
                ActionStatus::Success => {
                    bar.finish_and_clear();
                    info!(id = current.id, command = %current.command, "action finished");
                    return Ok(());
                }
                ActionStatus::Error => {
                    bar.abandon();
                    let (code, message) = current
                        .error
                        .map(|e| (e.code, e.message))
                        .unwrap_or_else(|| ("unknown".into(), "action failed".into()));
                    return Err(Error::ActionFailed {
                        id: current.id,
                        code,
                        message,
                    });
                }
                ActionStatus::Running => {
                    debug!(id = current.id, progress = current.progress, "action running");
                    thread::sleep(self.poll_interval);
                    current = self.api.get_action(current.id)?;
                }
            }
        }
    }
}
