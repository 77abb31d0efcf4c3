mod in_memory_result_cache;

pub use in_memory_result_cache::{DEFAULT_CACHE_TTL, InMemoryResultCache};
