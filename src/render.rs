//! 表示状態の端末出力

use crate::submission::Banner;
use blueprint_mint_common::{Phase, PresentationState};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// `[HH:MM:SS] ラベル` 形式の1行
pub fn status_line(time: &str, state: &PresentationState) -> String {
    match &state.error_message {
        Some(message) if state.enabled => format!("[{}] {} ({})", time, state.label, message),
        _ => format!("[{}] {}", time, state.label),
    }
}

fn render(bar: &ProgressBar, state: &PresentationState) {
    let line = status_line(&Local::now().format("%H:%M:%S").to_string(), state);
    bar.suspend(|| println!("{}", line));

    if state.enabled || state.phase == Phase::Done {
        bar.disable_steady_tick();
        bar.set_message("");
    } else {
        bar.set_message(state.label);
        bar.enable_steady_tick(Duration::from_millis(120));
    }
}

/// 送信ボタンの代わりにスピナーを出す
pub struct StatusView {
    bar: ProgressBar,
}

impl StatusView {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }

    pub fn render(&self, state: &PresentationState) {
        render(&self.bar, state);
    }

    /// コントローラに渡すリスナー
    pub fn listener(&self) -> impl FnMut(&PresentationState) + Send + 'static {
        let bar = self.bar.clone();
        move |state: &PresentationState| render(&bar, state)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}

pub fn print_banners(banners: &[Banner]) {
    for banner in banners {
        eprintln!("⚠ {}", banner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_mint_common::{Projector, TransactionStatus, TxState};

    #[test]
    fn test_status_line_idle() {
        let state = PresentationState::default();
        assert_eq!(status_line("12:00:00", &state), "[12:00:00] Submit");
    }

    #[test]
    fn test_status_line_processing() {
        let mut projector = Projector::new();
        projector.observe(&TxState::new(TransactionStatus::Mining, 1));
        assert_eq!(status_line("09:30:15", projector.state()), "[09:30:15] Processing…");
    }

    #[test]
    fn test_status_line_failure_message() {
        let mut projector = Projector::new();
        projector.observe(&TxState::failed(TransactionStatus::Fail, 1, "insufficient funds"));
        assert_eq!(
            status_line("09:30:17", projector.state()),
            "[09:30:17] Submit (insufficient funds)"
        );
    }

    #[test]
    fn test_status_line_done() {
        let mut projector = Projector::new();
        projector.observe(&TxState::new(TransactionStatus::Success, 1));
        assert_eq!(status_line("09:30:16", projector.state()), "[09:30:16] Success!");
    }
}
