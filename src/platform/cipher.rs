use async_trait::async_trait;
use lifeline::impl_storage_clone;
use std::{fmt::Debug, sync::Arc};

/// Counts vault logins which match a page.  Implemented by the vault.
#[async_trait]
pub trait CipherCounter: Send + Sync {
    async fn count_for_url(&self, url: &str) -> anyhow::Result<usize>;
}

#[derive(Clone)]
pub struct CipherResource(pub Arc<dyn CipherCounter>);

impl Debug for CipherResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CipherResource").finish()
    }
}

impl_storage_clone!(CipherResource);

/// Reports whether a page has at-risk logins with a pending password change.  Implemented by the vault.
#[async_trait]
pub trait AtRiskCipherSource: Send + Sync {
    async fn has_at_risk_logins(&self, url: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct AtRiskCipherResource(pub Arc<dyn AtRiskCipherSource>);

impl Debug for AtRiskCipherResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AtRiskCipherResource").finish()
    }
}

impl_storage_clone!(AtRiskCipherResource);
