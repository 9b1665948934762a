use std::future::Future;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr. Hidden when stderr is not a terminal, so piped
/// downloads and scripted runs stay clean.
fn create_spinner(msg: impl Into<String>) -> ProgressBar {
    if !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run one backend call behind a spinner, clearing it whatever the outcome.
pub async fn with_spinner<T>(msg: impl Into<String>, call: impl Future<Output = T>) -> T {
    let pb = create_spinner(msg);
    let out = call.await;
    pb.finish_and_clear();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_spinner_passes_result_through() {
        let ok: Result<u32, String> = with_spinner("working", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = with_spinner("working", async { Err("boom".into()) }).await;
        assert_eq!(err, Err("boom".to_string()));
    }
}
