//! 进程内对象缓存
//!
//! 目前用于缓存已认证教师的账号信息，避免每个请求都查询数据库。

pub mod object_cache;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use object_cache::moka::MokaCacheWrapper;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 带类型的读取，反序列化失败视为未命中并移除该键
pub async fn get_typed<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> CacheResult<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => CacheResult::Found(value),
            Err(_) => {
                cache.remove(key).await;
                CacheResult::NotFound
            }
        },
        CacheResult::NotFound => CacheResult::NotFound,
        CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
    }
}

pub async fn insert_typed<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 按配置创建缓存实例
pub fn create_object_cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::new())
}
