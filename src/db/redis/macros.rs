/// Read-through caching against the Redis cache.
///
/// Returns the cached value when present. Otherwise awaits `$block`, stores a
/// successful result in the background with `$ttl` seconds to live and returns
/// it. Errors from `$block` are returned as-is and never cached. A failed cache
/// read is logged and treated as a miss, so an unreachable Redis only costs the
/// cache, never the lookup.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache)
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future producing `AppResult<T>` on a miss
///
/// # Example
/// ```rust,ignore
/// let url: AppResult<String> = cached!(cache, CacheKey::Poster(27205), 3600, async {
///     lookup_poster(27205).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&$key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
