use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Client, StatusCode};

use crate::config::HiscoresConfig;
use crate::record::types::{AccountType, EntityName, SkillRecord, SkillTable};
use crate::series::vocab::Skill;
use crate::services::StatsFetcher;

/// Client for the plain-text hiscores endpoint.
#[derive(Clone)]
pub struct HiscoresClient {
    client: Client,
    base_url: String,
}

impl HiscoresClient {
    pub fn new(config: &HiscoresConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn table(account: AccountType) -> &'static str {
        match account {
            AccountType::Normal => "hiscore_oldschool",
            AccountType::Ironman => "hiscore_oldschool_ironman",
            AccountType::UltimateIronman => "hiscore_oldschool_ultimate",
            AccountType::HardcoreIronman => "hiscore_oldschool_hardcore_ironman",
        }
    }

    pub fn endpoint(&self, account: AccountType) -> String {
        format!("{}/m={}/index_lite.ws", self.base_url, Self::table(account))
    }
}

impl StatsFetcher for HiscoresClient {
    async fn fetch_stats(&self, name: &EntityName, account: AccountType) -> Result<SkillTable> {
        let response = self
            .client
            .get(self.endpoint(account))
            .query(&[("player", name.as_str())])
            .send()
            .await
            .with_context(|| format!("hiscores request for {name} failed"))?;

        match response.status() {
            StatusCode::NOT_FOUND => bail!("{name} is not on the {account} hiscores"),
            status if !status.is_success() => bail!("Hiscores Error: {status}"),
            _ => {}
        }

        let body = response.text().await?;
        parse_index_lite(&body)
    }
}

/// Parses the `rank,level,experience` lines of an index_lite body.
/// Lines past the last skill are activities and are ignored.
pub fn parse_index_lite(body: &str) -> Result<SkillTable> {
    let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());
    let mut table = SkillTable::new();

    for skill in Skill::ALL {
        let line = lines
            .next()
            .ok_or_else(|| anyhow!("hiscores response ended before {skill}"))?;
        let fields = line
            .split(',')
            .map(|f| f.trim().parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("bad {skill} line {line:?}"))?;
        let &[rank, level, experience] = fields.as_slice() else {
            bail!("expected rank,level,experience for {skill}, got {line:?}");
        };
        table.insert(skill.as_str().to_string(), SkillRecord::new(rank, level, experience));
    }
    Ok(table)
}
