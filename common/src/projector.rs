//! トランザクション状態 → 表示状態の射影
//!
//! | 外部ステータス       | フェーズ   | enabled | ラベル        |
//! |----------------------|------------|---------|---------------|
//! | （未観測）           | Idle       | true    | Submit        |
//! | Mining               | Processing | false   | Processing…   |
//! | Success              | Done       | false   | Success!      |
//! | Exception / Fail     | Idle       | true    | Submit + エラー |
//!
//! `reduce` は前回ミラーした (status, submission) と異なる観測のときだけ再計算する。
//! Connecting… などローカル専用の状態は、新しい外部ステータスが来るまで上書きされない。

use crate::types::{TransactionStatus, TxState};

pub const LABEL_SUBMIT: &str = "Submit";
pub const LABEL_CONNECTING: &str = "Connecting…";
pub const LABEL_PROCESSING: &str = "Processing…";
pub const LABEL_SUCCESS: &str = "Success!";

/// 表示フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// ウォレット接続待ち（ローカル専用）
    Connecting,
    /// アップロード中（ローカル専用）
    Uploading,
    Processing,
    Done,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => LABEL_SUBMIT,
            Phase::Connecting => LABEL_CONNECTING,
            Phase::Uploading | Phase::Processing => LABEL_PROCESSING,
            Phase::Done => LABEL_SUCCESS,
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

/// 送信ボタンの表示状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    pub phase: Phase,
    pub label: &'static str,
    pub enabled: bool,
    pub mirrored_status: TransactionStatus,
    pub mirrored_submission: u64,
    /// Exception / Fail のときの外部エラーメッセージ
    pub error_message: Option<String>,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            label: LABEL_SUBMIT,
            enabled: true,
            mirrored_status: TransactionStatus::None,
            mirrored_submission: 0,
            error_message: None,
        }
    }
}

impl PresentationState {
    fn mirrors(&self, observed: &TxState) -> bool {
        self.mirrored_status == observed.status && self.mirrored_submission == observed.submission
    }

    fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            label: phase.label(),
            enabled: phase.enabled(),
            ..self.clone()
        }
    }
}

/// 純粋なリデューサ: (前回の表示状態, 新しい外部状態) → 次の表示状態
pub fn reduce(prior: &PresentationState, observed: &TxState) -> PresentationState {
    if prior.mirrors(observed) {
        return prior.clone();
    }

    let mut next = match observed.status {
        TransactionStatus::Mining => prior.with_phase(Phase::Processing),
        TransactionStatus::Success => prior.with_phase(Phase::Done),
        TransactionStatus::Exception | TransactionStatus::Fail => prior.with_phase(Phase::Idle),
        // 対応する行がないステータスはミラーだけ更新する
        TransactionStatus::None | TransactionStatus::Connecting => prior.clone(),
    };

    next.mirrored_status = observed.status;
    next.mirrored_submission = observed.submission;
    next.error_message = if observed.status.is_failure() {
        observed.error_message.clone()
    } else {
        None
    };
    next
}

/// 外部状態を購読して表示状態を保持する
#[derive(Debug, Clone, Default)]
pub struct Projector {
    state: PresentationState,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// 観測を反映し、表示が変わったら true
    pub fn observe(&mut self, observed: &TxState) -> bool {
        let next = reduce(&self.state, observed);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// ローカル専用の遷移（ミラー済みの外部状態はそのまま）
    pub fn set_local(&mut self, phase: Phase) -> bool {
        let next = self.state.with_phase(phase);
        let changed = next != self.state;
        self.state = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(status: TransactionStatus) -> TxState {
        TxState::new(status, 1)
    }

    #[test]
    fn test_initial_state() {
        let projector = Projector::new();
        let state = projector.state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.label, "Submit");
        assert!(state.enabled);
    }

    #[test]
    fn test_none_mining_success() {
        let mut projector = Projector::new();
        let mut labels = vec![projector.state().label];
        let mut enabled = vec![projector.state().enabled];

        for status in [TransactionStatus::Mining, TransactionStatus::Success] {
            projector.observe(&observed(status));
            labels.push(projector.state().label);
            enabled.push(projector.state().enabled);
        }

        assert_eq!(labels, vec!["Submit", "Processing…", "Success!"]);
        assert_eq!(enabled, vec![true, false, false]);
        assert_eq!(projector.state().phase, Phase::Done);
    }

    #[test]
    fn test_mining_then_fail_surfaces_message() {
        let mut projector = Projector::new();
        projector.observe(&observed(TransactionStatus::Mining));
        projector.observe(&TxState::failed(TransactionStatus::Fail, 1, "insufficient funds"));

        let state = projector.state();
        assert_eq!(state.label, "Submit");
        assert!(state.enabled);
        assert_eq!(state.error_message.as_deref(), Some("insufficient funds"));
    }

    #[test]
    fn test_repeated_notifications_are_idempotent() {
        let mut projector = Projector::new();
        assert!(projector.observe(&observed(TransactionStatus::Mining)));
        let snapshot = projector.state().clone();

        for _ in 0..5 {
            assert!(!projector.observe(&observed(TransactionStatus::Mining)));
        }
        assert_eq!(projector.state(), &snapshot);
    }

    #[test]
    fn test_local_state_survives_unchanged_status() {
        let mut projector = Projector::new();
        projector.set_local(Phase::Connecting);

        // 未観測のNoneを繰り返し受けても Connecting… のまま
        assert!(!projector.observe(&TxState::default()));
        assert_eq!(projector.state().label, "Connecting…");
        assert!(!projector.state().enabled);
    }

    #[test]
    fn test_connecting_status_keeps_local_label() {
        let mut projector = Projector::new();
        projector.set_local(Phase::Uploading);
        projector.observe(&observed(TransactionStatus::Connecting));

        let state = projector.state();
        assert_eq!(state.phase, Phase::Uploading);
        assert_eq!(state.mirrored_status, TransactionStatus::Connecting);
    }

    #[test]
    fn test_same_failure_on_next_submission_is_observed() {
        let mut projector = Projector::new();
        projector.observe(&TxState::failed(TransactionStatus::Exception, 1, "rejected"));
        projector.set_local(Phase::Uploading);

        // 中間状態が合流して届かなくても、送信番号が違えば再評価する
        let changed = projector.observe(&TxState::failed(TransactionStatus::Exception, 2, "rejected again"));
        assert!(changed);
        assert!(projector.state().enabled);
        assert_eq!(projector.state().error_message.as_deref(), Some("rejected again"));
    }

    #[test]
    fn test_error_cleared_after_success() {
        let prior = reduce(
            &PresentationState::default(),
            &TxState::failed(TransactionStatus::Fail, 1, "reverted"),
        );
        let next = reduce(&prior, &TxState::new(TransactionStatus::Success, 2));
        assert!(next.error_message.is_none());
        assert_eq!(next.label, "Success!");
    }
}
