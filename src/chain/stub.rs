//! テスト用のJSON-RPCサーバ（127.0.0.1の空きポート）

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub type RpcReply = std::result::Result<Value, (i64, String)>;

type Handler = dyn Fn(&str, &Value) -> RpcReply + Send + Sync;

async fn respond(State(handler): State<Arc<Handler>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();
    let body = match handler(method, &request["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    };
    Json(body)
}

/// `(method, params)` ごとに応答を返すサーバを起動し、URLを返す
pub async fn serve(handler: impl Fn(&str, &Value) -> RpcReply + Send + Sync + 'static) -> String {
    let handler: Arc<Handler> = Arc::new(handler);
    let app = Router::new().route("/", post(respond)).with_state(handler);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    url
}

/// `eth_call` の `data` を取り出す
pub fn call_data(params: &Value) -> &str {
    params[0]["data"].as_str().unwrap_or_default()
}
