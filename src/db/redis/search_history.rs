use std::collections::BTreeSet;
use std::fmt::Display;

use redis::{AsyncCommands, Client};

use crate::error::AppResult;
use crate::models::EmployerId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryKey {
    SearchDetail(i64),
}

impl Display for HistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKey::SearchDetail(user_id) => write!(f, "search:detail:{}", user_id),
        }
    }
}

/// Creates a Redis client for the search history
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Per-user set of employers whose detail page the user opened
#[derive(Clone)]
pub struct SearchHistory {
    redis_client: Client,
}

impl SearchHistory {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    pub async fn record(&self, user_id: i64, employer_id: EmployerId) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .sadd(HistoryKey::SearchDetail(user_id).to_string(), employer_id)
            .await?;
        Ok(())
    }

    /// Employers in the user's history; members that are not ids are skipped
    pub async fn employers(&self, user_id: i64) -> AppResult<BTreeSet<EmployerId>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let members: Vec<String> = conn
            .smembers(HistoryKey::SearchDetail(user_id).to_string())
            .await?;

        Ok(members
            .iter()
            .filter_map(|member| member.trim().parse::<EmployerId>().ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_key_display() {
        assert_eq!(HistoryKey::SearchDetail(42).to_string(), "search:detail:42");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_record_and_read_history() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let history = SearchHistory::new(client.clone());
        let user_id = 987_654_321;

        history.record(user_id, 3).await.unwrap();
        history.record(user_id, 3).await.unwrap();
        history.record(user_id, 8).await.unwrap();

        let employers = history.employers(user_id).await.unwrap();
        assert_eq!(employers.into_iter().collect::<Vec<_>>(), vec![3, 8]);

        // Clean up
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn
            .del(HistoryKey::SearchDetail(user_id).to_string())
            .await
            .unwrap();
    }
}
