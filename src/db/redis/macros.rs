/// Read-through caching for an async computation returning `AppResult<T>`.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds
/// to live, and returns it. A failed cache read is logged and treated as a
/// miss, so only `$block` can fail the expression.
///
/// ```rust,ignore
/// let rating: Option<f64> = cached!(cache, key, 3600, async move {
///     compute_rating().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                ::tracing::warn!(error = %e, key = %key, "Cache read failed, computing value");
                None
            }
        };
        match hit {
            Some(cached) => Ok(cached),
            None => match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
