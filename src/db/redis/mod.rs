pub mod search_history;

pub use search_history::create_redis_client;
pub use search_history::HistoryKey;
pub use search_history::SearchHistory;
