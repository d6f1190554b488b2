//! Service wiring: item store, AI assistant, insights refresher and the
//! realtime channel shared by every handler.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tracing::{debug, info, warn};

use nexus_ai::InventoryAssistant;
use nexus_core::ItemId;
use nexus_infra::ai::{AiInsightSink, Insight, InsightsRefresher, InsightsRefresherHandle, LatestInsight, category_labels};
use nexus_infra::{DispatchError, FileKeyValueStore, InventoryService, KeyValueStore};
use nexus_inventory::{InventoryEvent, InventoryItem};

use crate::config::ApiConfig;

pub const TOPIC_INVENTORY_CHANGED: &str = "inventory.changed";
pub const TOPIC_INSIGHTS_UPDATED: &str = "insights.updated";

#[derive(Debug, Clone, Serialize)]
pub struct RealtimeMessage {
    pub topic: &'static str,
    pub payload: JsonValue,
}

/// Keeps the latest insight and announces it on the realtime channel.
#[derive(Debug)]
pub struct ApiInsightSink {
    latest: LatestInsight,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl ApiInsightSink {
    fn new(realtime_tx: broadcast::Sender<RealtimeMessage>) -> Self {
        Self {
            latest: LatestInsight::new(),
            realtime_tx,
        }
    }

    pub fn latest(&self) -> Option<Insight> {
        self.latest.get()
    }
}

impl AiInsightSink for ApiInsightSink {
    fn emit(&self, insight: Insight) {
        let payload = serde_json::to_value(&insight).unwrap_or(JsonValue::Null);
        self.latest.emit(insight);

        // Lossy broadcast; nobody listening is fine.
        let _ = self.realtime_tx.send(RealtimeMessage {
            topic: TOPIC_INSIGHTS_UPDATED,
            payload,
        });
    }
}

pub struct AppServices {
    inventory: Arc<Mutex<InventoryService>>,
    assistant: InventoryAssistant,
    insights: Arc<ApiInsightSink>,
    refresher: InsightsRefresherHandle,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

/// Production wiring: file-backed storage under the configured data dir.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<Arc<AppServices>> {
    let storage = FileKeyValueStore::open(&config.data_dir)?;
    info!(data_dir = %storage.dir().display(), "storage opened");

    let assistant = InventoryAssistant::from_config(&config.ai);
    Ok(AppServices::start(
        Arc::new(storage),
        assistant,
        config.insights_debounce,
        Handle::current(),
    ))
}

impl AppServices {
    /// Load state, start the refresher and the change subscriber.
    pub fn start(
        storage: Arc<dyn KeyValueStore>,
        assistant: InventoryAssistant,
        insights_debounce: Duration,
        runtime: Handle,
    ) -> Arc<Self> {
        let assistant = assistant.with_categories(category_labels());
        let service = InventoryService::load(storage);
        let subscription = service.subscribe();
        let inventory = Arc::new(Mutex::new(service));

        // Realtime channel (SSE): lossy broadcast.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

        let insights = Arc::new(ApiInsightSink::new(realtime_tx.clone()));
        let refresher = InsightsRefresher::new(insights_debounce).spawn(
            runtime.clone(),
            assistant.clone(),
            insights.clone(),
        );

        // Background subscriber: store events -> realtime + insights trigger.
        // Holds only a weak reference so dropping the services ends the loop.
        {
            let weak: Weak<Mutex<InventoryService>> = Arc::downgrade(&inventory);
            let realtime_tx = realtime_tx.clone();
            let refresher = refresher.clone();
            runtime.spawn_blocking(move || {
                loop {
                    let first = match subscription.recv_timeout(Duration::from_millis(250)) {
                        Ok(event) => event,
                        Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                            if weak.strong_count() == 0 {
                                break;
                            }
                            continue;
                        }
                        Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                    };

                    let mut batch = vec![first];
                    batch.extend(subscription.drain());
                    for event in &batch {
                        announce_change(&realtime_tx, event);
                    }

                    let Some(inventory) = weak.upgrade() else {
                        break;
                    };
                    let items = lock(&inventory).snapshot();
                    drop(inventory);
                    refresher.trigger(&items);
                }
                debug!("inventory change subscriber stopped");
            });
        }

        let services = Arc::new(Self {
            inventory,
            assistant,
            insights,
            refresher,
            realtime_tx,
        });

        // Initial insights for the loaded collection.
        services.refresh_insights();
        services
    }

    pub fn snapshot(&self) -> Vec<InventoryItem> {
        lock(&self.inventory).snapshot()
    }

    pub fn get_item(&self, item_id: ItemId) -> Option<InventoryItem> {
        lock(&self.inventory).get(item_id).cloned()
    }

    /// Run a mutation under the store lock.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut InventoryService) -> Result<T, DispatchError>,
    ) -> Result<T, DispatchError> {
        let mut guard = lock(&self.inventory);
        f(&mut guard)
    }

    pub fn assistant(&self) -> &InventoryAssistant {
        &self.assistant
    }

    pub fn latest_insight(&self) -> Option<Insight> {
        self.insights.latest()
    }

    /// Schedule an insights refresh for the current collection.
    pub fn refresh_insights(&self) -> Option<u64> {
        let items = self.snapshot();
        self.refresher.trigger(&items)
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }
}

fn lock(inventory: &Mutex<InventoryService>) -> MutexGuard<'_, InventoryService> {
    // A panic mid-mutation leaves the store consistent (apply is all-or-nothing).
    inventory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn announce_change(realtime_tx: &broadcast::Sender<RealtimeMessage>, event: &InventoryEvent) {
    let payload = match serde_json::to_value(event) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to encode inventory event");
            return;
        }
    };
    let _ = realtime_tx.send(RealtimeMessage {
        topic: TOPIC_INVENTORY_CHANGED,
        payload,
    });
}

pub fn sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        // Lagged receivers skip ahead.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
