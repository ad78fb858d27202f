pub mod hiscores;
pub mod render;

use crate::record::types::{AccountType, EntityName, SkillTable};

/// Source of current stats for an account.
#[allow(async_fn_in_trait)]
pub trait StatsFetcher {
    async fn fetch_stats(&self, name: &EntityName, account: AccountType) -> anyhow::Result<SkillTable>;
}
