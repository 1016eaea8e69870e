//! トランザクション送信と状態追跡
//!
//! 送信は投げっぱなし（spawn）で、状態は `watch` チャネルで購読する。
//! Connecting → (Exception | Mining → Success | Fail)

use super::rpc::JsonRpcClient;
use super::wallet::Wallet;
use crate::error::MintError;
use blueprint_mint_common::contracts::{create_blueprint_calldata, to_hex_data};
use blueprint_mint_common::{ContentAddress, TransactionStatus, TxState};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// マニフェストのCIDからコントラクト呼び出しデータを作る
pub type CalldataEncoder = fn(&str) -> Vec<u8>;

pub const CREATE_BLUEPRINT: CalldataEncoder = create_blueprint_calldata;

/// トランザクション層（外部が状態を所有し、呼び出し側は観測のみ）
pub trait TransactionSender: Send + Sync {
    /// マニフェストのCIDを渡して送信する（結果は待たない）
    fn send(&self, manifest_pointer: &ContentAddress);

    /// 最新の状態
    fn status(&self) -> TxState;

    /// 状態変化の購読
    fn subscribe(&self) -> watch::Receiver<TxState>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// レシート → 最終状態（status がないのはByzantium以前のレシート）
pub fn receipt_state(submission: u64, receipt: &TransactionReceipt) -> TxState {
    let state = match receipt.status.as_deref() {
        Some("0x0") => TxState::failed(TransactionStatus::Fail, submission, "transaction reverted"),
        _ => TxState::new(TransactionStatus::Success, submission),
    };
    state.with_hash(receipt.transaction_hash.clone())
}

/// 送信番号の採番とレシートのポーリング
pub struct TransactionTracker {
    rpc: Arc<JsonRpcClient>,
    poll_interval: Duration,
    state: watch::Sender<TxState>,
    submissions: AtomicU64,
}

impl TransactionTracker {
    pub fn new(rpc: Arc<JsonRpcClient>, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(TxState::default());
        Self {
            rpc,
            poll_interval,
            state,
            submissions: AtomicU64::new(0),
        }
    }

    /// 新しい送信番号
    pub fn begin(&self) -> u64 {
        self.submissions.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 最新の送信以外からの更新は捨てる
    pub fn publish(&self, state: TxState) {
        if state.submission != self.submissions.load(Ordering::SeqCst) {
            debug!(submission = state.submission, "古い送信の状態を破棄");
            return;
        }
        debug!(status = %state.status, submission = state.submission, "トランザクション状態");
        self.state.send_replace(state);
    }

    pub fn current(&self) -> TxState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TxState> {
        self.state.subscribe()
    }

    /// 送信済みトランザクションを Mining として追跡し、レシートが出るまで待つ
    pub async fn follow_receipt(&self, submission: u64, tx_hash: String) {
        self.publish(TxState::new(TransactionStatus::Mining, submission).with_hash(tx_hash.clone()));

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            match self
                .rpc
                .request::<Option<TransactionReceipt>>("eth_getTransactionReceipt", json!([tx_hash]))
                .await
            {
                Ok(Some(receipt)) => {
                    info!(tx = %tx_hash, block = ?receipt.block_number, "レシート取得");
                    self.publish(receipt_state(submission, &receipt));
                    return;
                }
                Ok(None) => debug!(tx = %tx_hash, "未確定"),
                Err(e) => warn!(tx = %tx_hash, error = %e, "レシート取得に失敗"),
            }
        }
    }

    /// 既存のトランザクションハッシュを追跡する
    pub fn track(self: &Arc<Self>, tx_hash: String) {
        let submission = self.begin();
        let tracker = Arc::clone(self);
        tokio::spawn(async move { tracker.follow_receipt(submission, tx_hash).await });
    }
}

/// 単一の string 引数をとるコントラクト関数
pub struct ContractFunction {
    tracker: Arc<TransactionTracker>,
    wallet: Arc<dyn Wallet>,
    contract: String,
    encode: CalldataEncoder,
}

impl ContractFunction {
    pub fn new(
        tracker: Arc<TransactionTracker>,
        wallet: Arc<dyn Wallet>,
        contract: impl Into<String>,
        encode: CalldataEncoder,
    ) -> Self {
        Self {
            tracker,
            wallet,
            contract: contract.into(),
            encode,
        }
    }
}

async fn send_call(
    tracker: Arc<TransactionTracker>,
    wallet: Arc<dyn Wallet>,
    contract: String,
    data: String,
    submission: u64,
) {
    let Some(from) = wallet.active_account().await else {
        tracker.publish(TxState::failed(
            TransactionStatus::Exception,
            submission,
            "アクティブなアカウントがありません",
        ));
        return;
    };

    let params = json!([{ "from": from, "to": contract, "data": data }]);
    match tracker.rpc.request::<String>("eth_sendTransaction", params).await {
        Ok(tx_hash) => {
            info!(tx = %tx_hash, "トランザクション送信");
            tracker.follow_receipt(submission, tx_hash).await;
        }
        Err(e) => {
            let message = match e {
                MintError::Rpc { message, .. } => message,
                other => other.to_string(),
            };
            warn!(%message, "トランザクション送信に失敗");
            tracker.publish(TxState::failed(TransactionStatus::Exception, submission, message));
        }
    }
}

impl TransactionSender for ContractFunction {
    fn send(&self, manifest_pointer: &ContentAddress) {
        let submission = self.tracker.begin();
        self.tracker
            .publish(TxState::new(TransactionStatus::Connecting, submission));

        let data = to_hex_data(&(self.encode)(manifest_pointer.as_str()));
        tokio::spawn(send_call(
            Arc::clone(&self.tracker),
            Arc::clone(&self.wallet),
            self.contract.clone(),
            data,
            submission,
        ));
    }

    fn status(&self) -> TxState {
        self.tracker.current()
    }

    fn subscribe(&self) -> watch::Receiver<TxState> {
        self.tracker.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::stub;
    use crate::error::Result;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";

    struct FixedWallet(Option<String>);

    #[async_trait]
    impl Wallet for FixedWallet {
        async fn active_account(&self) -> Option<String> {
            self.0.clone()
        }

        async fn request_activation(&self) -> Result<String> {
            self.0
                .clone()
                .ok_or_else(|| MintError::WalletConnection("no account".into()))
        }
    }

    fn contract_function(url: &str, account: Option<&str>) -> ContractFunction {
        let rpc = Arc::new(JsonRpcClient::new(url));
        let tracker = Arc::new(TransactionTracker::new(rpc, Duration::from_millis(20)));
        ContractFunction::new(
            tracker,
            Arc::new(FixedWallet(account.map(String::from))),
            CONTRACT,
            CREATE_BLUEPRINT,
        )
    }

    /// 終端状態まで観測し、途中のステータスと最終状態を返す
    async fn until_terminal(rx: &mut watch::Receiver<TxState>) -> (Vec<TransactionStatus>, TxState) {
        let mut seen = Vec::new();
        let last = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let state = rx.borrow_and_update().clone();
                if seen.last() != Some(&state.status) {
                    seen.push(state.status);
                }
                if state.status.is_terminal() {
                    return state;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("terminal status not reached");
        (seen, last)
    }

    /// 送信は成功し、レシートは `pending` 回だけ未確定を返す
    async fn mined_stub(pending: usize, receipt_status: &'static str, sent: Arc<Mutex<Vec<Value>>>) -> String {
        let polls = AtomicUsize::new(0);
        stub::serve(move |method, params| match method {
            "eth_sendTransaction" => {
                sent.lock().unwrap().push(params[0].clone());
                Ok(json!("0xabc"))
            }
            "eth_getTransactionReceipt" if polls.fetch_add(1, Ordering::SeqCst) < pending => Ok(Value::Null),
            "eth_getTransactionReceipt" => Ok(json!({
                "transactionHash": "0xabc",
                "blockNumber": "0x10",
                "status": receipt_status
            })),
            other => Err((-32601, format!("method not found: {}", other))),
        })
        .await
    }

    #[tokio::test]
    async fn test_send_without_account_is_exception() {
        let sender = contract_function("http://127.0.0.1:9", None);
        let mut rx = sender.subscribe();

        sender.send(&ContentAddress::new("Qbbb"));
        let connecting = sender.status();
        assert_eq!(connecting.status, TransactionStatus::Connecting);
        assert_eq!(connecting.submission, 1);

        let (_, last) = until_terminal(&mut rx).await;
        assert_eq!(last.status, TransactionStatus::Exception);
        assert_eq!(last.submission, 1);
        assert_eq!(last.error_message.as_deref(), Some("アクティブなアカウントがありません"));
    }

    #[tokio::test]
    async fn test_rpc_error_message_is_verbatim() {
        let url = stub::serve(|method, _| match method {
            "eth_sendTransaction" => Err((-32000, "insufficient funds for gas * price + value".to_string())),
            other => Err((-32601, format!("method not found: {}", other))),
        })
        .await;
        let sender = contract_function(&url, Some(ACCOUNT));
        let mut rx = sender.subscribe();

        sender.send(&ContentAddress::new("Qbbb"));
        let (seen, last) = until_terminal(&mut rx).await;

        assert_eq!(seen, vec![TransactionStatus::Connecting, TransactionStatus::Exception]);
        assert_eq!(
            last.error_message.as_deref(),
            Some("insufficient funds for gas * price + value")
        );
    }

    #[tokio::test]
    async fn test_mining_then_success() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let url = mined_stub(2, "0x1", Arc::clone(&sent)).await;
        let sender = contract_function(&url, Some(ACCOUNT));
        let mut rx = sender.subscribe();

        sender.send(&ContentAddress::new("Qbbb"));
        let (seen, last) = until_terminal(&mut rx).await;

        assert_eq!(
            seen,
            vec![
                TransactionStatus::Connecting,
                TransactionStatus::Mining,
                TransactionStatus::Success
            ]
        );
        assert_eq!(last.tx_hash.as_deref(), Some("0xabc"));

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["from"], ACCOUNT);
        assert_eq!(sent[0]["to"], CONTRACT);
        assert_eq!(sent[0]["data"], to_hex_data(&create_blueprint_calldata("Qbbb")));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_fail() {
        let url = mined_stub(0, "0x0", Arc::new(Mutex::new(Vec::new()))).await;
        let sender = contract_function(&url, Some(ACCOUNT));
        let mut rx = sender.subscribe();

        sender.send(&ContentAddress::new("Qbbb"));
        let (_, last) = until_terminal(&mut rx).await;

        assert_eq!(last.status, TransactionStatus::Fail);
        assert_eq!(last.error_message.as_deref(), Some("transaction reverted"));
    }

    #[tokio::test]
    async fn test_second_send_gets_new_submission() {
        let sender = contract_function("http://127.0.0.1:9", None);
        let mut rx = sender.subscribe();

        sender.send(&ContentAddress::new("Qbbb"));
        let (_, first) = until_terminal(&mut rx).await;
        sender.send(&ContentAddress::new("Qbbb"));
        let (_, second) = until_terminal(&mut rx).await;

        // 同じ Exception でも送信番号で区別できる
        assert_eq!(first.status, second.status);
        assert_eq!((first.submission, second.submission), (1, 2));
    }

    fn tracker() -> TransactionTracker {
        let rpc = Arc::new(JsonRpcClient::new("http://127.0.0.1:8545"));
        TransactionTracker::new(rpc, Duration::from_millis(100))
    }

    fn receipt(status: Option<&str>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: "0xabc".into(),
            block_number: Some("0x10".into()),
            status: status.map(String::from),
        }
    }

    #[test]
    fn test_receipt_success() {
        let state = receipt_state(2, &receipt(Some("0x1")));
        assert_eq!(state.status, TransactionStatus::Success);
        assert_eq!(state.tx_hash.as_deref(), Some("0xabc"));
        assert_eq!(state.submission, 2);
    }

    #[test]
    fn test_receipt_reverted() {
        let state = receipt_state(1, &receipt(Some("0x0")));
        assert_eq!(state.status, TransactionStatus::Fail);
        assert_eq!(state.error_message.as_deref(), Some("transaction reverted"));
    }

    #[test]
    fn test_receipt_without_status() {
        assert_eq!(receipt_state(1, &receipt(None)).status, TransactionStatus::Success);
    }

    #[test]
    fn test_receipt_parse() {
        let json = serde_json::json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x1b4",
            "status": "0x1",
            "gasUsed": "0x5208"
        });
        let parsed: TransactionReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status.as_deref(), Some("0x1"));
    }

    #[test]
    fn test_publish_ignores_stale_submission() {
        let tracker = tracker();
        let first = tracker.begin();
        let second = tracker.begin();

        tracker.publish(TxState::new(TransactionStatus::Mining, second));
        tracker.publish(TxState::failed(TransactionStatus::Fail, first, "old"));

        let current = tracker.current();
        assert_eq!(current.status, TransactionStatus::Mining);
        assert_eq!(current.submission, second);
    }

    #[test]
    fn test_subscribe_sees_latest() {
        let tracker = tracker();
        let rx = tracker.subscribe();
        let submission = tracker.begin();
        tracker.publish(TxState::new(TransactionStatus::Connecting, submission));
        assert_eq!(rx.borrow().status, TransactionStatus::Connecting);
    }
}
