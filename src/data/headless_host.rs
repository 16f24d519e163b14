use std::sync::Arc;

use crate::biz::{ExtensionApi, ExtensionHost, WalletKind};

/// A host without a browser: no extension is ever injected, so only the test
/// wallet is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl ExtensionHost for HeadlessHost {
    fn extension(&self, _kind: WalletKind) -> Option<Arc<dyn ExtensionApi>> {
        None
    }
}
