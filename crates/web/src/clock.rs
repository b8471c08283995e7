use std::time::Duration;

use async_trait::async_trait;
use js_sys::{Date, Promise};
use secspell_harness::Clock;
use tracing::warn;
use wasm_bindgen_futures::JsFuture;
use web_time::Instant;

/// Clock backed by `setTimeout`. Elapsed time is monotonic
/// (`performance.now()`); wall time comes from `Date.now()`.
#[derive(Debug)]
pub struct BrowserClock {
    origin: Instant,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Clock for BrowserClock {
    async fn sleep(&self, duration: Duration) {
        let Some(window) = web_sys::window() else {
            warn!("no window, sleep skipped");
            return;
        };
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Err(e) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            {
                warn!("setTimeout failed: {:?}", e);
                let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_millis(&self) -> u64 {
        Date::now() as u64
    }
}
