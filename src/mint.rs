//! ミントコマンド
//!
//! 送信に失敗したときの再試行は、対話モードでユーザーが確認したときだけ行う。

use crate::chain::{
    ContractFunction, JsonRpcClient, RpcWallet, TransactionSender, TransactionTracker, Wallet, CREATE_BLUEPRINT,
};
use crate::config::Config;
use crate::error::{MintError, Result};
use crate::form::{self, FormArgs};
use crate::ipfs::{ContentStore, IpfsHttpClient};
use crate::render::{print_banners, StatusView};
use crate::submission::{Collaborators, SubmissionController, SubmitOutcome};
use blueprint_mint_common::{validate, Phase, PresentationState, Projector};
use std::sync::Arc;

/// 設定から実際の連携先を組み立てる
pub fn collaborators(config: &Config) -> Result<Collaborators> {
    let contract = config.blueprint_address()?;
    let rpc = Arc::new(JsonRpcClient::new(&config.rpc_url));
    let wallet: Arc<dyn Wallet> = Arc::new(RpcWallet::new(Arc::clone(&rpc), config.account.clone()));
    let store: Arc<dyn ContentStore> = Arc::new(IpfsHttpClient::from_config(config));
    let tracker = Arc::new(TransactionTracker::new(rpc, config.poll_interval()));
    let transactions: Arc<dyn TransactionSender> = Arc::new(ContractFunction::new(
        tracker,
        Arc::clone(&wallet),
        contract,
        CREATE_BLUEPRINT,
    ));

    Ok(Collaborators {
        store,
        wallet,
        transactions,
    })
}

fn retry_or(interactive: bool, view: &StatusView, error: MintError) -> Result<()> {
    if interactive && form::confirm_retry()? {
        Ok(())
    } else {
        view.finish();
        Err(error)
    }
}

pub async fn run_mint(config: &Config, args: &FormArgs, interactive: bool) -> Result<()> {
    let collaborators = collaborators(config)?;
    let store = Arc::clone(&collaborators.store);

    let mut input = form::build_form(args)?;
    if interactive {
        let validation = validate(&input);
        if validation.has_error() {
            input = form::prompt_invalid(input, &validation)?;
        }
    }

    let view = StatusView::new();
    let mut controller = SubmissionController::new(collaborators).with_listener(view.listener());
    view.render(controller.presentation());

    loop {
        match controller.submit(input.clone()).await {
            SubmitOutcome::Busy => {
                view.finish();
                return Err(MintError::InvalidInput("送信処理中です".into()));
            }
            SubmitOutcome::Invalid(validation) => {
                print_banners(&controller.banners());
                if !interactive {
                    view.finish();
                    return Err(MintError::InvalidInput(validation.messages().join(", ")));
                }
                input = form::prompt_invalid(input, &validation)?;
            }
            SubmitOutcome::WalletFailed => {
                print_banners(&controller.banners());
                retry_or(
                    interactive,
                    &view,
                    MintError::WalletConnection("ウォレットに接続できませんでした".into()),
                )?;
            }
            SubmitOutcome::UploadFailed => {
                print_banners(&controller.banners());
                let message = controller.upload_error().unwrap_or_default().to_string();
                retry_or(interactive, &view, MintError::Upload(message))?;
            }
            SubmitOutcome::Sent { metadata } => {
                println!("✔ メタデータ: {}", metadata.to_uri());
                println!("  {}", store.to_url(metadata.as_str()));

                let state = controller.follow().await;
                if state.phase == Phase::Done {
                    view.finish();
                    println!("\n✅ ブループリントを作成しました");
                    return Ok(());
                }

                print_banners(&controller.banners());
                let message = state.error_message.unwrap_or_else(|| state.mirrored_status.to_string());
                retry_or(interactive, &view, MintError::Transaction(message))?;
            }
        }
    }
}

/// 送信済みトランザクションの状態を表示し続ける
pub async fn run_watch(config: &Config, tx_hash: String) -> Result<PresentationState> {
    let rpc = Arc::new(JsonRpcClient::new(&config.rpc_url));
    let tracker = Arc::new(TransactionTracker::new(rpc, config.poll_interval()));
    let mut rx = tracker.subscribe();
    tracker.track(tx_hash);

    let view = StatusView::new();
    let mut projector = Projector::new();
    loop {
        let observed = rx.borrow_and_update().clone();
        if projector.observe(&observed) {
            view.render(projector.state());
        }
        if observed.status.is_terminal() || rx.changed().await.is_err() {
            break;
        }
    }
    view.finish();

    Ok(projector.state().clone())
}
