use crate::client::api::ChatClient;
use crate::domain::message::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

/// Periodically re-fetches the conversation and publishes it on a watch channel.
///
/// Subscribers are woken after every successful fetch, changed or not, so views
/// that show relative ages re-render on each poll. A failed fetch leaves the
/// previous list in place and is retried on the next tick.
/// The background task stops on shutdown or when the poller is dropped.
#[derive(Debug)]
pub struct Poller {
    feed: watch::Receiver<Vec<Message>>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl Poller {
    #[must_use]
    pub fn spawn(client: ChatClient, interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        let (tx, feed) = watch::channel(Vec::new());
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(run(client, interval, Arc::clone(&refresh), tx, shutdown));
        Self { feed, refresh, task }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.feed.clone()
    }

    #[must_use]
    pub fn latest(&self) -> Vec<Message> {
        self.feed.borrow().clone()
    }

    /// Fetches again without waiting for the next tick.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    client: ChatClient,
    interval: Duration,
    refresh: Arc<Notify>,
    tx: watch::Sender<Vec<Message>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = ticker.tick() => {}
            () = refresh.notified() => {
                ticker.reset();
            }
            res = shutdown.changed() => {
                if res.is_err() {
                    break;
                }
                continue;
            }
        }

        poll_once(&client, &tx).instrument(tracing::debug_span!("poll_messages")).await;
    }
    tracing::debug!("Message poller shutting down");
}

async fn poll_once(client: &ChatClient, tx: &watch::Sender<Vec<Message>>) {
    match client.list_messages().await {
        Ok(messages) => {
            let count = messages.len();
            let previous = tx.send_replace(messages);
            if previous.len() != count {
                tracing::debug!(count, "conversation updated");
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "poll failed, retrying on next tick");
        }
    }
}
