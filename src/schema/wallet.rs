use serde::{Deserialize, Serialize};

/// A wallet provider as offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub name: String,
    pub logo: String,
    pub description: String,
    pub is_installed: bool,
    pub is_connected: bool,
}

/// The active session: which provider, which account, and its cached balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedWallet {
    pub name: String,
    pub address: String,
    /// Balance of the fee denom, in minimal units.
    pub balance: String,
    pub chain_id: String,
}

impl ConnectedWallet {
    /// Balance scaled by `decimals`, e.g. `1234500` with 6 decimals is `1.2345`.
    pub fn display_balance(&self, decimals: u8) -> String {
        format_amount(&self.balance, decimals)
    }

    /// Address with the middle elided, e.g. `myblockc...q0auqd`.
    pub fn short_address(&self, head: usize, tail: usize) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= head + tail {
            return self.address.clone();
        }

        let head: String = chars[..head].iter().collect();
        let tail: String = chars[chars.len() - tail..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// Session identity kept in durable storage across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWallet {
    pub name: String,
    pub address: String,
}

impl From<&ConnectedWallet> for SavedWallet {
    fn from(wallet: &ConnectedWallet) -> Self {
        Self {
            name: wallet.name.clone(),
            address: wallet.address.clone(),
        }
    }
}

/// Format an integer amount of minimal units with `decimals` fractional digits.
/// Trailing zeros are trimmed; non-numeric input is returned unchanged.
pub fn format_amount(amount: &str, decimals: u8) -> String {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return amount.to_string();
    }

    let digits = amount.trim_start_matches('0');
    let decimals = decimals as usize;
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    }
}
