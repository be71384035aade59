//! Wall-clock and timer helpers that work in both the browser and SSR.
//!
//! `std::time::Instant` panics on `wasm32-unknown-unknown`, so the browser
//! build reads `Date.now()` instead.

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> f64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Waits `ms` milliseconds in the browser; resolves immediately elsewhere.
#[allow(clippy::unused_async)]
pub async fn sleep_ms(ms: u32) {
    #[cfg(feature = "hydrate")]
    {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ms;
    }
}
