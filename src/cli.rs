use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "画像とメタデータをIPFSへアップロードしてNFTブループリントを作成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像とメタデータをアップロードしてブループリントを作成
    Mint {
        /// タイトル
        #[arg(short, long)]
        title: Option<String>,

        /// 説明
        #[arg(short, long)]
        description: Option<String>,

        /// 画像ファイル
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 対話入力を行わない（不足・失敗時はエラー終了）
        #[arg(long)]
        no_interactive: bool,
    },

    /// 送信済みトランザクションの状態を追跡
    Watch {
        /// トランザクションハッシュ
        #[arg(required = true)]
        tx_hash: String,
    },

    /// IPFS上のブループリントを表示
    Show {
        /// CID または ipfs://CID
        #[arg(required = true)]
        uri: String,
    },

    /// 販売中のコレクション一覧
    Collections,

    /// 購入したパックの中身（発行されたトークンID）
    Pack {
        /// 購入リクエストID（0x + 64桁）
        #[arg(required = true)]
        request_id: String,
    },

    /// 設定を表示/編集
    Config {
        /// JSON-RPCエンドポイント
        #[arg(long)]
        set_rpc_url: Option<String>,

        /// IPFS APIのURL
        #[arg(long)]
        set_ipfs_api: Option<String>,

        /// IPFSゲートウェイのURL
        #[arg(long)]
        set_gateway: Option<String>,

        /// IPFS APIのプロジェクトID
        #[arg(long)]
        set_ipfs_project_id: Option<String>,

        /// IPFS APIのシークレット
        #[arg(long)]
        set_ipfs_project_secret: Option<String>,

        /// Blueprintコントラクトのアドレス
        #[arg(long)]
        set_blueprint: Option<String>,

        /// TokenPackコントラクトのアドレス
        #[arg(long)]
        set_token_pack: Option<String>,

        /// 優先して使うアカウント
        #[arg(long)]
        set_account: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
