//! Integration test common infrastructure.
//!
//! Provides an in-process test server, a raw framed test client, chat
//! views that record output, and polling helpers for state that settles
//! asynchronously.

pub mod client;
pub mod server;
pub mod view;

use std::time::Duration;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
#[allow(unused_imports)]
pub use view::{ChannelView, Transcript};

/// Poll `condition` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
