//! HTTP server exposing the wallet session to a UI.

use std::{future::Future, net::SocketAddr};

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router, Server,
};
use log::{error, info};
use serde_json::json;

use crate::{
    biz::{ChainQuery, SessionStorage, SessionStore},
    error::Error,
    schema::ChainInfo,
};

mod dto;

pub use dto::*;

pub async fn run<Q: ChainQuery, K: SessionStorage>(
    addr: SocketAddr,
    store: SessionStore<Q, K>,
    shutdown: impl Future<Output = ()>,
) {
    let router = new_router(store);

    info!("📣 HTTP server listening on {addr}");
    let server = Server::bind(&addr)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown);

    if let Err(e) = server.await {
        error!("❌ HTTP server failed: {e}");
    }
}

pub fn new_router<Q: ChainQuery, K: SessionStorage>(store: SessionStore<Q, K>) -> Router {
    Router::new()
        .route("/wallet", get(get_wallet::<Q, K>))
        .route("/wallets", get(get_wallets::<Q, K>))
        .route("/wallet/connect", post(connect::<Q, K>))
        .route("/wallet/disconnect", post(disconnect::<Q, K>))
        .route("/wallet/refresh", post(refresh::<Q, K>))
        .route("/chain", get(get_chain::<Q, K>))
        .route("/balances/:address", get(get_balance::<Q, K>))
        .route("/notices", get(get_notices::<Q, K>))
        .fallback(not_found)
        .layer(Extension(store))
}

async fn get_wallet<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
) -> impl IntoResponse {
    Json(store.snapshot())
}

async fn get_wallets<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
) -> impl IntoResponse {
    Json(store.available_wallets())
}

async fn connect<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
    Json(req): Json<ConnectReq>,
) -> Result<impl IntoResponse, HttpError> {
    info!("📣 >> connect: {:?}", req);
    let wallet = store
        .connect_wallet(&req.name)
        .await?
        .ok_or(HttpError::Conflict)?;
    info!("📣 << connect response: {:?}", wallet);

    Ok(Json(wallet))
}

async fn disconnect<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
) -> impl IntoResponse {
    info!("📣 >> disconnect");
    store.disconnect_wallet().await;

    Json(store.snapshot())
}

async fn refresh<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
) -> impl IntoResponse {
    Json(store.refresh_balance().await)
}

async fn get_chain<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
) -> impl IntoResponse {
    Json(ChainInfo::from(store.adapter().chain()))
}

async fn get_balance<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    info!("📣 >> get_balance of: {address}");
    let chain = store.adapter().chain();
    let amount = store.adapter().query_balance(&address).await?;
    let resp = BalanceResp::new(address, &chain.coin_denom, amount, chain.coin_decimals);
    info!("📣 << get_balance response: {:?}", resp);

    Ok(Json(resp))
}

async fn get_notices<Q: ChainQuery, K: SessionStorage>(
    Extension(store): Extension<SessionStore<Q, K>>,
    Query(params): Query<NoticesReq>,
) -> impl IntoResponse {
    Json(store.notices(params.after))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[derive(thiserror::Error, Debug)]
enum HttpError {
    #[error("Bad request: {0}")]
    BadRequest(Error),
    #[error("Forbidden: {0}")]
    Forbidden(Error),
    #[error("Conflict: a wallet connection is already in progress")]
    Conflict,
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(Error),
    #[error("Internal server error: {0}")]
    InternalServerError(Error),
}

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        match err {
            Error::UnsupportedWallet(..) | Error::ProviderNotInstalled(..) => {
                HttpError::BadRequest(err)
            }
            Error::ConnectionRejected(..) => HttpError::Forbidden(err),
            Error::Timeout(..) => HttpError::GatewayTimeout(err),
            _ => HttpError::InternalServerError(err),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::Conflict => StatusCode::CONFLICT,
            HttpError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            HttpError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
