use crate::cache::{ObjectCache, create_object_cache};
use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 准备服务器启动的上下文：存储（含迁移）与缓存
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    if config.is_production() && config.jwt.secret == "change-me-in-production" {
        warn!("JWT secret is still the default value, set JWT_SECRET in production");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_object_cache();
    debug!(
        "Moka cache initialized (ttl {}s, capacity {})",
        config.cache.default_ttl, config.cache.max_capacity
    );

    StartupContext { storage, cache }
}
