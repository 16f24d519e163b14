//! Network parameters of the target chain, and the registration descriptor
//! derived from them for wallet extensions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use wallet::COSMOS_COIN_TYPE;

use crate::error::Error;

/// Static descriptor of the chain this client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: String,
    pub chain_name: String,
    /// Tendermint RPC endpoint, handed to signing clients.
    pub rpc: String,
    /// REST (LCD) endpoint, used for read-only queries.
    pub rest: String,
    pub bech32_prefix: String,
    /// Minimal denom of the fee token.
    pub coin_denom: String,
    pub coin_decimals: u8,
    /// Gas price as `<amount><denom>`, e.g. `0.025token`.
    pub gas_prices: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "mychain-1".to_string(),
            chain_name: "My Blockchain".to_string(),
            rpc: "http://localhost:26657".to_string(),
            rest: "http://localhost:1317".to_string(),
            bech32_prefix: "myblockchain".to_string(),
            coin_denom: "token".to_string(),
            coin_decimals: 6,
            gas_prices: "0.025token".to_string(),
        }
    }
}

impl ChainConfig {
    pub fn gas_price(&self) -> Result<GasPrice, Error> {
        self.gas_prices.parse()
    }

    /// Display denom shown to users, e.g. `TOKEN` for `token`.
    pub fn display_denom(&self) -> String {
        self.coin_denom.to_uppercase()
    }
}

/// An amount of a denom, as returned by the bank module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// Price of one unit of gas, kept as an exact decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    /// Decimal amount as written, e.g. `0.025`.
    pub amount: String,
    pub denom: String,
    atomics: u128,
    fractional_digits: u32,
}

impl GasPrice {
    /// Fee for `gas_limit`, rounded up to a whole minimal unit.
    pub fn fee(&self, gas_limit: u64) -> Result<Coin, Error> {
        let scale = 10u128.pow(self.fractional_digits);
        let amount = (gas_limit as u128)
            .checked_mul(self.atomics)
            .and_then(|n| n.checked_add(scale - 1))
            .ok_or_else(|| Error::FeeOverflow(gas_limit, self.to_string()))?
            / scale;

        Ok(Coin {
            denom: self.denom.clone(),
            amount: amount.to_string(),
        })
    }
}

impl FromStr for GasPrice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidGasPrice(s.to_string());

        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (amount, denom) = s.split_at(split);

        let (int, frac) = amount.split_once('.').unwrap_or((amount, ""));
        if int.is_empty() || frac.contains('.') || frac.len() > 18 {
            return Err(invalid());
        }
        let fractional_digits = frac.len() as u32;
        let atomics: u128 = format!("{int}{frac}").parse().map_err(|_| invalid())?;

        Ok(Self {
            amount: amount.to_string(),
            denom: denom.to_string(),
            atomics,
            fractional_digits,
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

// The chain registration descriptor understood by Keplr-compatible extensions.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<FeeCurrency>,
    pub stake_currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    #[serde(flatten)]
    pub currency: Currency,
    pub gas_price_step: GasPriceStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl Default for GasPriceStep {
    fn default() -> Self {
        Self {
            low: 0.01,
            average: 0.025,
            high: 0.04,
        }
    }
}

impl From<&ChainConfig> for ChainInfo {
    fn from(chain: &ChainConfig) -> Self {
        let currency = Currency {
            coin_denom: chain.display_denom(),
            coin_minimal_denom: chain.coin_denom.clone(),
            coin_decimals: chain.coin_decimals,
        };

        Self {
            chain_id: chain.chain_id.clone(),
            chain_name: chain.chain_name.clone(),
            rpc: chain.rpc.clone(),
            rest: chain.rest.clone(),
            bip44: Bip44 {
                coin_type: COSMOS_COIN_TYPE,
            },
            bech32_config: Bech32Config::from_prefix(&chain.bech32_prefix),
            currencies: vec![currency.clone()],
            fee_currencies: vec![FeeCurrency {
                currency: currency.clone(),
                gas_price_step: GasPriceStep::default(),
            }],
            stake_currency: currency,
        }
    }
}
