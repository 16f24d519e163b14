use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::{biz::ChainQuery, error::Error, schema::Coin};

/// Chain queries over the Cosmos REST (LCD) endpoint.
#[derive(Debug)]
pub struct RestQuery {
    rest: String,
    timeout: Duration,
    // Built on first use.
    client: OnceCell<Client>,
}

#[derive(Debug, Deserialize)]
struct BalancesResp {
    balances: Vec<Coin>,
    #[serde(default)]
    pagination: Option<PageResp>,
}

#[derive(Debug, Deserialize)]
struct PageResp {
    next_key: Option<String>,
}

impl RestQuery {
    pub fn new(rest: &str, timeout: Duration) -> Self {
        Self {
            rest: rest.trim_end_matches('/').to_string(),
            timeout,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, Error> {
        self.client
            .get_or_try_init(|| async { Client::builder().timeout(self.timeout).build() })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl ChainQuery for RestQuery {
    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, Error> {
        let client = self.client().await?;
        let url = format!("{}/cosmos/bank/v1beta1/balances/{address}", self.rest);

        let mut balances = Vec::new();
        let mut next_key: Option<String> = None;
        loop {
            let mut req = client.get(&url);
            if let Some(key) = &next_key {
                req = req.query(&[("pagination.key", key)]);
            }

            let resp: BalancesResp = req.send().await?.error_for_status()?.json().await?;
            debug!("📣 << balances of {address}: {:?}", resp.balances);
            balances.extend(resp.balances);

            next_key = resp
                .pagination
                .and_then(|page| page.next_key)
                .filter(|key| !key.is_empty());
            if next_key.is_none() {
                break;
            }
        }

        Ok(balances)
    }
}
