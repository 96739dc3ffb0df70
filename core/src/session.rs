use campuseats_common::{catalog, FoodItem};
use campuseats_protocol::{Event, Op, Submission};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::client::ModelClient;
use crate::concierge;
use crate::error::{CampusError, Result};
use crate::geolocation::Geolocator;

/// Background worker for the AI-backed operations.
///
/// Each submission runs as its own task, so a slow chat reply does not
/// hold up a recommendation. Results come back through `next_event`.
#[derive(Clone)]
pub struct Concierge {
    inner: Arc<Inner>,
}

struct Inner {
    tx_submit: mpsc::Sender<Submission>,
    rx_event: Mutex<mpsc::Receiver<Event>>,
}

impl Concierge {
    pub fn spawn(client: Arc<dyn ModelClient>, geolocator: Arc<dyn Geolocator>) -> Self {
        Self::spawn_with_menu(client, geolocator, catalog::catalog())
    }

    pub fn spawn_with_menu(
        client: Arc<dyn ModelClient>,
        geolocator: Arc<dyn Geolocator>,
        menu: &'static [FoodItem],
    ) -> Self {
        let (tx_submit, mut rx_submit) = mpsc::channel::<Submission>(64);
        let (tx_event, rx_event) = mpsc::channel::<Event>(256);

        tokio::spawn(async move {
            while let Some(Submission { id, op }) = rx_submit.recv().await {
                debug!("submission {id}: {op:?}");
                let tx = tx_event.clone();
                let client = client.clone();
                match op {
                    Op::Recommend { mood } => {
                        tokio::spawn(async move {
                            let recommendations = concierge::recommend(client.as_ref(), &mood, menu).await;
                            info!("submission {id}: {} recommendations", recommendations.len());
                            let _ = tx.send(Event::RecommendationsReady { recommendations }).await;
                        });
                    }
                    Op::DetectLocation => {
                        let geolocator = geolocator.clone();
                        tokio::spawn(async move {
                            let location = concierge::detect_location(geolocator.as_ref(), client.as_ref()).await;
                            info!("submission {id}: location {}", location.address);
                            let _ = tx.send(Event::LocationResolved { location }).await;
                        });
                    }
                    Op::Chat { message, history } => {
                        tokio::spawn(async move {
                            let text = concierge::chat_reply(client.as_ref(), history, &message).await;
                            let _ = tx.send(Event::ChatReply { text }).await;
                        });
                    }
                    Op::Shutdown => {
                        let _ = tx.send(Event::ShutdownComplete).await;
                        break;
                    }
                }
            }
        });

        Self {
            inner: Arc::new(Inner {
                tx_submit,
                rx_event: Mutex::new(rx_event),
            }),
        }
    }

    /// Queues an operation, returning its submission id.
    pub async fn submit(&self, op: Op) -> Result<String> {
        let sub = Submission::new(op);
        let id = sub.id.clone();
        self.inner
            .tx_submit
            .send(sub)
            .await
            .map_err(|_| CampusError::ChannelSend)?;
        Ok(id)
    }

    pub async fn next_event(&self) -> Option<Event> {
        let mut rx = self.inner.rx_event.lock().await;
        rx.recv().await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.submit(Op::Shutdown).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concierge::testing::ScriptedClient;
    use crate::concierge::CHAT_FALLBACK;
    use crate::geolocation::{Coordinates, FixedGeolocator};
    use std::time::Duration;
    use tokio::time::timeout;

    fn concierge(client: ScriptedClient) -> Concierge {
        let geo = FixedGeolocator::new(Some(Coordinates { lat: 1.0, lng: 2.0 }));
        Concierge::spawn(Arc::new(client), Arc::new(geo))
    }

    async fn next(c: &Concierge) -> Event {
        timeout(Duration::from_secs(5), c.next_event())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn chat_op_produces_reply_event() {
        let c = concierge(ScriptedClient::ok("Pizza it is."));
        c.submit(Op::Chat { message: "dinner?".to_string(), history: Vec::new() })
            .await
            .unwrap();
        match next(&c).await {
            Event::ChatReply { text } => assert_eq!(text, "Pizza it is."),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn failures_still_produce_events() {
        let c = concierge(ScriptedClient::failing("boom"));
        c.submit(Op::Recommend { mood: "tired".to_string() }).await.unwrap();
        match next(&c).await {
            Event::RecommendationsReady { recommendations } => assert!(recommendations.is_empty()),
            other => panic!("unexpected event {other:?}"),
        }

        c.submit(Op::Chat { message: "hi".to_string(), history: Vec::new() })
            .await
            .unwrap();
        match next(&c).await {
            Event::ChatReply { text } => assert_eq!(text, CHAT_FALLBACK),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn detect_location_op_resolves() {
        let c = concierge(ScriptedClient::ok("Quiet residential street."));
        c.submit(Op::DetectLocation).await.unwrap();
        match next(&c).await {
            Event::LocationResolved { location } => {
                assert_eq!(location.address, "Detected: 1.0000, 2.0000");
                assert_eq!(location.insight.as_deref(), Some("Quiet residential street."));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn shutdown_completes_and_closes_worker() {
        let c = concierge(ScriptedClient::ok("x"));
        c.shutdown().await.unwrap();
        assert!(matches!(next(&c).await, Event::ShutdownComplete));
        // Worker loop has exited and dropped the receiver.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(c.submit(Op::DetectLocation).await.is_err());
    }
}
