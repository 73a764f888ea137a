//! User-facing notifications
//!
//! A loading notification stays on screen (as a spinner) until the next
//! success or error replaces it.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Loading(String),
    Success { message: String, link: Option<String> },
    Error(String),
}

pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn loading(&self, message: impl Into<String>) {
        self.notify(Toast::Loading(message.into()));
    }

    fn success(&self, message: impl Into<String>, link: Option<String>) {
        self.notify(Toast::Success { message: message.into(), link });
    }

    fn error(&self, message: impl Into<String>) {
        self.notify(Toast::Error(message.into()));
    }
}

/// Spinner for loading states, styled lines for results
#[derive(Default)]
pub struct ConsoleNotifier {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast {
            Toast::Loading(message) => {
                let Ok(mut slot) = self.spinner.lock() else {
                    println!("{} {}", style("…").cyan(), message);
                    return;
                };
                match slot.as_ref() {
                    Some(bar) => bar.set_message(message),
                    None => {
                        let bar = ProgressBar::new_spinner();
                        bar.set_style(
                            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                        );
                        bar.enable_steady_tick(Duration::from_millis(100));
                        bar.set_message(message);
                        *slot = Some(bar);
                    }
                }
            }
            Toast::Success { message, link } => {
                self.clear_spinner();
                println!("{} {}", style("✓").green(), style(message).green());
                if let Some(link) = link {
                    println!("  {} {}", style("View on Explorer →").dim(), style(link).underlined());
                }
            }
            Toast::Error(message) => {
                self.clear_spinner();
                println!("{} {}", style("✗").red(), style(message).red());
            }
        }
    }
}
