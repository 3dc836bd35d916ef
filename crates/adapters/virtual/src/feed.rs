//! Feed pump — forwards broadcast envelopes into a client's event feed.

use barrelhub_app::client::Client;
use barrelhub_app::ports::Transport;
use barrelhub_domain::envelope::FeedMessage;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Dispatch every message from `receiver` into `client` until the sender
/// side is dropped.
///
/// A lagging receiver has lost envelopes for good, so every store is
/// resynchronized from the server instead.
pub async fn pump<T>(receiver: broadcast::Receiver<FeedMessage>, client: &Client<T>)
where
    T: Transport + Clone + 'static,
{
    let mut stream = BroadcastStream::new(receiver);
    while let Some(result) = stream.next().await {
        match result {
            Ok(message) => {
                client.feed().dispatch(message);
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "feed receiver lagged, resynchronizing");
                client.resynchronize();
            }
        }
    }
    tracing::debug!("feed closed");
}
