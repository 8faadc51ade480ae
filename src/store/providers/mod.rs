mod in_memory;
mod redis;

pub use self::in_memory::InMemoryResultStore;
pub use self::redis::RedisResultStore;
