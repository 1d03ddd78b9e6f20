//! Fire-and-forget helpers for non-critical work
//!
//! Analytics and comment side effects must never break the page that
//! triggered them. Failures are logged once at `warn` and dropped.

use std::fmt::Display;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

/// Keep the value on success; log and discard the error otherwise
pub fn log_failure<T, E: Display>(context: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(context, error = %e, "Best-effort operation failed");
            None
        }
    }
}

/// Run a fallible future in the background
pub fn spawn<F, T, E>(context: &'static str, future: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move { log_failure(context, future.await) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_failure() {
        assert_eq!(log_failure::<_, String>("ok", Ok(3)), Some(3));
        assert_eq!(log_failure::<i32, _>("err", Err("boom")), None);
    }

    #[tokio::test]
    async fn test_spawn_swallows_errors() {
        let handle = spawn("test", async { Err::<(), _>("unreachable backend") });
        assert_eq!(handle.await.unwrap(), None);
    }
}
