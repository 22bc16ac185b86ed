pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryBackend;
pub use postgres::{create_pool, run_migrations, PgCatalog, PgFeedback, PgRecommendationStore};
pub use self::redis::{create_redis_client, SearchHistory};
