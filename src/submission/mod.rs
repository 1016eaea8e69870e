//! 送信パイプライン
//!
//! 入力検証 → ウォレット接続 → 画像/メタデータのアップロード → トランザクション送信。
//! 各段の失敗はここで捕捉して表示状態のリセットとバナーに変換する。
//! 外部の状態は `Collaborators` 経由でのみ参照する。

mod uploader;

pub use uploader::upload_sequence;

use crate::chain::{TransactionSender, Wallet};
use crate::error::Result;
use crate::ipfs::ContentStore;
use blueprint_mint_common::{
    validate, ContentAddress, FormInput, Phase, PresentationState, Projector, TxState, ValidationResult,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 外部連携先（構築時に注入）
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn ContentStore>,
    pub wallet: Arc<dyn Wallet>,
    pub transactions: Arc<dyn TransactionSender>,
}

/// 送信1回の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 送信中（ボタン無効）のため何もしなかった
    Busy,
    Invalid(ValidationResult),
    WalletFailed,
    UploadFailed,
    Sent { metadata: ContentAddress },
}

/// 画面に出すエラー表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    InvalidField(&'static str),
    Wallet,
    Upload(String),
    Transaction(Option<String>),
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::InvalidField(message) => f.write_str(message),
            Banner::Wallet => f.write_str("Error connecting to wallet"),
            Banner::Upload(message) => write!(f, "Error uploading to IPFS: {}", message),
            Banner::Transaction(Some(message)) => write!(f, "Error executing transaction: {}", message),
            Banner::Transaction(None) => f.write_str("Error executing transaction"),
        }
    }
}

pub type Listener = Box<dyn FnMut(&PresentationState) + Send>;

pub struct SubmissionController {
    collaborators: Collaborators,
    validation: ValidationResult,
    wallet_error: bool,
    upload_error: Option<String>,
    projector: Projector,
    listener: Option<Listener>,
}

impl SubmissionController {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            validation: ValidationResult::default(),
            wallet_error: false,
            upload_error: None,
            projector: Projector::new(),
            listener: None,
        }
    }

    /// 表示状態が変わるたびに呼ばれる
    pub fn with_listener(mut self, listener: impl FnMut(&PresentationState) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn presentation(&self) -> &PresentationState {
        self.projector.state()
    }

    pub fn validation(&self) -> ValidationResult {
        self.validation
    }

    pub fn wallet_error(&self) -> bool {
        self.wallet_error
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn banners(&self) -> Vec<Banner> {
        let mut banners: Vec<Banner> = self
            .validation
            .messages()
            .into_iter()
            .map(Banner::InvalidField)
            .collect();
        if self.wallet_error {
            banners.push(Banner::Wallet);
        }
        if let Some(message) = &self.upload_error {
            banners.push(Banner::Upload(message.clone()));
        }
        let state = self.projector.state();
        if state.mirrored_status.is_failure() {
            banners.push(Banner::Transaction(state.error_message.clone()));
        }
        banners
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(self.projector.state());
        }
    }

    fn set_local(&mut self, phase: Phase) {
        if self.projector.set_local(phase) {
            self.notify();
        }
    }

    /// 外部のトランザクション状態を反映（同じ状態の繰り返しは無視される）
    pub fn observe(&mut self, observed: &TxState) -> bool {
        let changed = self.projector.observe(observed);
        if changed {
            debug!(status = %observed.status, label = self.projector.state().label, "表示状態を更新");
            self.notify();
        }
        changed
    }

    /// トランザクション層の現在の状態を取り込む
    pub fn sync(&mut self) -> bool {
        let observed = self.collaborators.transactions.status();
        self.observe(&observed)
    }

    /// 送信したトランザクションが Done になるか、失敗して再送信可能になるまで観測する
    pub async fn follow(&mut self) -> PresentationState {
        let mut rx = self.collaborators.transactions.subscribe();
        loop {
            let observed = rx.borrow_and_update().clone();
            self.observe(&observed);

            let state = self.projector.state();
            if state.phase == Phase::Done || state.enabled {
                return state.clone();
            }
            if rx.changed().await.is_err() {
                return self.projector.state().clone();
            }
        }
    }

    async fn ensure_wallet(&mut self) -> Result<String> {
        if let Some(account) = self.collaborators.wallet.active_account().await {
            return Ok(account);
        }

        self.set_local(Phase::Connecting);
        self.collaborators.wallet.request_activation().await
    }

    pub async fn submit(&mut self, input: FormInput) -> SubmitOutcome {
        if !self.projector.state().enabled {
            debug!(label = self.projector.state().label, "送信処理中のため無視");
            return SubmitOutcome::Busy;
        }

        self.validation = validate(&input);
        if self.validation.has_error() {
            debug!(validation = ?self.validation, "入力エラー");
            return SubmitOutcome::Invalid(self.validation);
        }
        let FormInput {
            title,
            description,
            file: Some(file),
        } = input
        else {
            return SubmitOutcome::Invalid(self.validation);
        };
        self.upload_error = None;

        match self.ensure_wallet().await {
            Ok(account) => debug!(%account, "アカウント確認"),
            Err(e) => {
                warn!(error = %e, "ウォレット接続に失敗");
                self.wallet_error = true;
                self.set_local(Phase::Idle);
                return SubmitOutcome::WalletFailed;
            }
        }
        self.wallet_error = false;

        self.set_local(Phase::Uploading);
        let store = Arc::clone(&self.collaborators.store);
        let metadata = match upload_sequence(store.as_ref(), &title, &description, &file).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(error = %e, "アップロードに失敗");
                self.upload_error = Some(e.to_string());
                self.set_local(Phase::Idle);
                return SubmitOutcome::UploadFailed;
            }
        };

        info!(cid = %metadata, "トランザクションを送信");
        self.collaborators.transactions.send(&metadata);
        SubmitOutcome::Sent { metadata }
    }
}
