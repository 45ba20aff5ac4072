//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client with connection pooling
//! for uploads to the summarization service.
//!
//! No overall request timeout is set: a summarization run lasts as long as
//! the service needs, and the client never cancels it.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for summarization uploads
pub static SUMMARIZER_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create summarizer HTTP client")
});

/// Get the global summarizer HTTP client
#[inline]
pub fn summarizer_client() -> &'static Client {
    &SUMMARIZER_CLIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_same_instance() {
        let client1 = summarizer_client();
        let client2 = summarizer_client();
        assert!(std::ptr::eq(client1, client2));
    }
}
