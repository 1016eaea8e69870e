use anyhow::Context;
use blueprint_mint::{chain, cli, config, error, form, ipfs, logging, mint};
use blueprint_mint_common::{BlueprintMetadata, Phase};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use ipfs::ContentStore;
use std::io::IsTerminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Mint { title, description, file, no_interactive } => {
            println!("🎨 blueprint - ブループリント作成\n");

            let interactive = !no_interactive && std::io::stdin().is_terminal();
            let args = form::FormArgs { title, description, file };
            mint::run_mint(&config, &args, interactive).await?;
        }

        Commands::Watch { tx_hash } => {
            println!("⛓ blueprint - トランザクション追跡\n");

            let state = mint::run_watch(&config, tx_hash).await?;
            if state.phase != Phase::Done {
                let message = state
                    .error_message
                    .unwrap_or_else(|| state.mirrored_status.to_string());
                return Err(error::MintError::Transaction(message).into());
            }
            println!("\n✅ 完了");
        }

        Commands::Show { uri } => {
            let store = ipfs::IpfsHttpClient::from_config(&config);
            let json = store.fetch_json(&uri).await?;
            let metadata = BlueprintMetadata::from_json(json)?;

            if let Some(name) = &metadata.name {
                println!("Title:");
                println!("  {}", name);
            }
            if let Some(description) = &metadata.description {
                println!("Description:");
                println!("  {}", description);
            }
            if let Some(image) = &metadata.image {
                println!("Image:");
                println!("  {}", store.to_url(image));
            }
        }

        Commands::Collections => {
            let rpc = chain::JsonRpcClient::new(&config.rpc_url);
            let pack = chain::TokenPack::new(&rpc, config.token_pack_address()?);
            let store = ipfs::IpfsHttpClient::from_config(&config);

            println!("- コレクションを取得中... ({})", rpc.url());
            let collections = pack.list().await?;
            if collections.is_empty() {
                println!("コレクションがありません");
            }
            for collection in &collections {
                println!(
                    "#{} {} (容量: {}, 価格: {} ETH)",
                    collection.id,
                    store.to_url(&collection.ipfs_path),
                    collection.capacity,
                    collection.price_ether()
                );
            }
        }

        Commands::Pack { request_id } => {
            let request_id = chain::parse_request_id(&request_id)?;
            let rpc = chain::JsonRpcClient::new(&config.rpc_url);
            let pack = chain::TokenPack::new(&rpc, config.token_pack_address()?);

            println!("- パックの中身を取得中... ({})", rpc.url());
            let tokens = pack.purchase_order_tokens(request_id).await?;
            if tokens.is_empty() {
                println!("発行されたトークンがありません（未確定の可能性があります）");
            }
            for token in &tokens {
                println!("  トークン #{}", token);
            }
        }

        Commands::Config {
            set_rpc_url,
            set_ipfs_api,
            set_gateway,
            set_ipfs_project_id,
            set_ipfs_project_secret,
            set_blueprint,
            set_token_pack,
            set_account,
            show,
        } => {
            // 環境変数の上書きを保存しないようにファイルから読み直す
            let mut config = Config::load_from(&Config::config_path()?)?;
            let mut changed = false;

            if let Some(url) = set_rpc_url {
                config.rpc_url = url;
                changed = true;
            }
            if let Some(url) = set_ipfs_api {
                config.ipfs_api_url = url;
                changed = true;
            }
            if let Some(url) = set_gateway {
                config.ipfs_gateway_url = url;
                changed = true;
            }
            if let Some(id) = set_ipfs_project_id {
                config.ipfs_project_id = Some(id);
                changed = true;
            }
            if let Some(secret) = set_ipfs_project_secret {
                config.ipfs_project_secret = Some(secret);
                changed = true;
            }
            if let Some(address) = set_blueprint {
                config.set_blueprint_address(&address)?;
                changed = true;
            }
            if let Some(address) = set_token_pack {
                config.set_token_pack_address(&address)?;
                changed = true;
            }
            if let Some(address) = set_account {
                config.set_account(&address)?;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let unset = "未設定".to_string();
                println!("設定:");
                println!("  JSON-RPC: {}", config.rpc_url);
                println!("  IPFS API: {}", config.ipfs_api_url);
                println!("  IPFSゲートウェイ: {}", config.ipfs_gateway_url);
                println!(
                    "  IPFS認証: {}",
                    if config.ipfs_project_secret.is_some() { "設定済み" } else { "未設定" }
                );
                println!("  Blueprint: {}", config.blueprint_address.as_ref().unwrap_or(&unset));
                println!("  TokenPack: {}", config.token_pack_address.as_ref().unwrap_or(&unset));
                println!("  アカウント: {}", config.account.as_ref().unwrap_or(&unset));
                println!("  ポーリング間隔: {}ms", config.poll_interval_ms);
            }
        }
    }

    Ok(())
}
