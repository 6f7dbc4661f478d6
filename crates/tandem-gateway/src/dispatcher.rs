use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use tandem_types::events::FeedEvent;
use tandem_types::models::Person;

/// Rebroadcasts every confirmed row mutation to all connected clients and
/// tracks who is currently online.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Every connection receives every event; per-connection subscription
    /// filtering happens at the socket.
    broadcast_tx: broadcast::Sender<FeedEvent>,

    /// Who is online: person -> owning connection id.
    online: RwLock<HashMap<Person, Uuid>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                online: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Subscribe to feed events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients.
    pub fn broadcast(&self, event: FeedEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Mark a person online under the given connection id. A reconnect
    /// simply takes over ownership.
    pub async fn connected(&self, person: Person, conn_id: Uuid) {
        self.inner.online.write().await.insert(person, conn_id);
        self.broadcast(FeedEvent::Presence {
            person,
            online: true,
        });
    }

    /// Mark a person offline, but only if this connection still owns the
    /// presence entry. A fast reconnect must not be clobbered by the old
    /// connection's teardown.
    pub async fn disconnected(&self, person: Person, conn_id: Uuid) {
        let mut online = self.inner.online.write().await;
        if online.get(&person) != Some(&conn_id) {
            return;
        }
        online.remove(&person);
        drop(online);

        self.broadcast(FeedEvent::Presence {
            person,
            online: false,
        });
    }

    /// Who is online right now, for seeding a new connection.
    pub async fn online_people(&self) -> Vec<Person> {
        self.inner.online.read().await.keys().copied().collect()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
