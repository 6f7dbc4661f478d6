use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use tandem_db::Database;
use tandem_types::events::{Collection, FeedEvent, GatewayCommand};
use tandem_types::models::Person;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// What this connection has asked to receive.
#[derive(Default)]
struct Filters {
    collections: HashSet<Collection>,
    watched_tasks: HashSet<Uuid>,
}

impl Filters {
    /// Global events always pass. Comment events are pre-filtered by the
    /// watched task ids; everything else goes by collection subscription.
    fn wants(&self, event: &FeedEvent) -> bool {
        match event.collection() {
            None => true,
            Some(Collection::TaskComments) => event
                .comment_task_id()
                .is_some_and(|id| self.watched_tasks.contains(&id)),
            Some(c) => self.collections.contains(&c),
        }
    }
}

/// Handle a single WebSocket connection. The client must send an
/// Identify command naming its profile row before anything else.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, db: Arc<Database>) {
    let (mut sender, mut receiver) = socket.split();

    // Step 1: wait for Identify and resolve the profile.
    let Some((profile_id, person)) = wait_for_identify(&mut receiver, &db).await else {
        warn!("WebSocket client failed to identify, closing");
        return;
    };

    info!("{} ({}) connected to gateway", person, profile_id);

    // Step 2: send Ready.
    let ready = FeedEvent::Ready {
        profile_id,
        display_name: person,
    };
    if send_event(&mut sender, &ready).await.is_err() {
        return;
    }

    let conn_id = Uuid::new_v4();

    // Seed current presence so this client sees who is already here.
    for online in dispatcher.online_people().await {
        let event = FeedEvent::Presence {
            person: online,
            online: true,
        };
        if send_event(&mut sender, &event).await.is_err() {
            return;
        }
    }

    // Now mark ourselves online (broadcasts to the partner).
    dispatcher.connected(person, conn_id).await;

    let mut broadcast_rx = dispatcher.subscribe();

    // Per-connection filters, shared between the send and recv tasks.
    let filters: Arc<RwLock<Filters>> = Arc::new(RwLock::new(Filters::default()));
    let send_filters = filters.clone();

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received.clone();

    // Forward filtered broadcasts to the client, with heartbeat.
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = broadcast_rx.recv() => {
                    let event = match result {
                        Ok(event) => event,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Broadcast receiver lagged by {} events", n);
                            continue;
                        }
                        Err(_) => break,
                    };

                    {
                        let filters = send_filters.read().expect("filter lock poisoned");
                        if !filters.wants(&event) {
                            continue;
                        }
                    }

                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read commands from the client.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let Ok(command) = serde_json::from_str::<GatewayCommand>(&text) else {
                        warn!("Unparseable gateway command from {}", person);
                        continue;
                    };
                    let mut filters = filters.write().expect("filter lock poisoned");
                    match command {
                        GatewayCommand::Identify { .. } => {
                            // Already identified; ignored.
                        }
                        GatewayCommand::Subscribe { collections } => {
                            filters.collections = collections.into_iter().collect();
                        }
                        GatewayCommand::WatchComments { task_id } => {
                            filters.watched_tasks.insert(task_id);
                        }
                        GatewayCommand::UnwatchComments { task_id } => {
                            filters.watched_tasks.remove(&task_id);
                        }
                    }
                }
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever side finishes first tears the other down.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    dispatcher.disconnected(person, conn_id).await;
    info!("{} disconnected from gateway", person);
}

async fn wait_for_identify(
    receiver: &mut futures_util::stream::SplitStream<WebSocket>,
    db: &Arc<Database>,
) -> Option<(Uuid, Person)> {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else { continue };

        match serde_json::from_str::<GatewayCommand>(&text) {
            Ok(GatewayCommand::Identify { profile_id }) => {
                let db = db.clone();
                let lookup =
                    tokio::task::spawn_blocking(move || db.get_profile_by_id(profile_id)).await;
                match lookup {
                    Ok(Ok(Some(profile))) => return Some((profile.id, profile.display_name)),
                    Ok(Ok(None)) => {
                        warn!("Identify with unknown profile id {}", profile_id);
                        return None;
                    }
                    Ok(Err(e)) => {
                        warn!("Profile lookup failed during identify: {}", e);
                        return None;
                    }
                    Err(e) => {
                        warn!("Profile lookup task failed during identify: {}", e);
                        return None;
                    }
                }
            }
            Ok(_) => return None, // anything else before Identify is a protocol error
            Err(_) => return None,
        }
    }
    None
}

async fn send_event(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    event: &FeedEvent,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(event).unwrap_or_default();
    sender.send(Message::Text(text.into())).await
}
