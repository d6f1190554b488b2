use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, info};

use nexus_ai::{InventoryAssistant, InventoryItemSnapshot};
use nexus_inventory::InventoryItem;

use super::magic_fill::snapshot_items;

/// A published insights text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub text: String,
    /// Trigger number that produced this text; strictly increasing across publications.
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
}

/// Sink for AI insights.
///
/// AI outputs are advisory and are kept apart from the item event stream.
pub trait AiInsightSink: Send + Sync + 'static {
    fn emit(&self, insight: Insight);
}

/// Keeps only the most recent insight.
#[derive(Debug, Default)]
pub struct LatestInsight {
    inner: Mutex<Option<Insight>>,
}

impl LatestInsight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Insight> {
        self.inner.lock().ok().and_then(|g| g.clone())
    }
}

impl AiInsightSink for LatestInsight {
    fn emit(&self, insight: Insight) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(insight);
        }
    }
}

/// Config for the insights refresher.
#[derive(Debug, Clone)]
pub struct InsightsRefresher {
    pub debounce: Duration,
}

impl Default for InsightsRefresher {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
        }
    }
}

impl InsightsRefresher {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }

    /// Start accepting triggers. Work runs as tasks on `runtime`.
    pub fn spawn<S>(
        &self,
        runtime: Handle,
        assistant: InventoryAssistant,
        sink: Arc<S>,
    ) -> InsightsRefresherHandle
    where
        S: AiInsightSink,
    {
        info!(debounce_ms = self.debounce.as_millis() as u64, "insights refresher started");
        InsightsRefresherHandle {
            shared: Arc::new(Shared {
                assistant,
                sink,
                debounce: self.debounce,
                latest_trigger: AtomicU64::new(0),
                published: Mutex::new(0),
            }),
            runtime,
        }
    }
}

struct Shared {
    assistant: InventoryAssistant,
    sink: Arc<dyn AiInsightSink>,
    debounce: Duration,
    latest_trigger: AtomicU64,
    published: Mutex<u64>,
}

/// Trigger hook for the running refresher.
#[derive(Clone)]
pub struct InsightsRefresherHandle {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl core::fmt::Debug for InsightsRefresherHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InsightsRefresherHandle")
            .field("debounce", &self.shared.debounce)
            .field("latest_trigger", &self.latest_generation())
            .finish_non_exhaustive()
    }
}

impl InsightsRefresherHandle {
    /// Schedule a refresh for the given collection; call after each change.
    ///
    /// Returns the generation number, or `None` for an empty collection (no
    /// refresh is scheduled, but any pending one is superseded). Triggers
    /// arriving within the debounce window coalesce into the last one; a
    /// completion older than the newest published insight is discarded.
    pub fn trigger(&self, items: &[InventoryItem]) -> Option<u64> {
        let generation = self.shared.latest_trigger.fetch_add(1, Ordering::SeqCst) + 1;
        if items.is_empty() {
            debug!(generation, "empty inventory; insights refresh skipped");
            return None;
        }

        let snapshots = snapshot_items(items);
        let shared = self.shared.clone();
        self.runtime.spawn(async move { refresh(shared, generation, snapshots).await });
        Some(generation)
    }

    /// Number of the newest trigger so far (0 before the first).
    pub fn latest_generation(&self) -> u64 {
        self.shared.latest_trigger.load(Ordering::SeqCst)
    }
}

async fn refresh(shared: Arc<Shared>, generation: u64, snapshots: Vec<InventoryItemSnapshot>) {
    tokio::time::sleep(shared.debounce).await;

    if shared.latest_trigger.load(Ordering::SeqCst) != generation {
        debug!(generation, "insights refresh superseded before start");
        return;
    }

    let text = shared.assistant.generate_inventory_insights(&snapshots).await;

    let Ok(mut published) = shared.published.lock() else {
        return;
    };
    if generation <= *published {
        debug!(generation, published = *published, "stale insights discarded");
        return;
    }
    *published = generation;
    shared.sink.emit(Insight {
        text,
        generation,
        generated_at: Utc::now(),
    });
    debug!(generation, "insights published");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nexus_ai::{AiError, GenerationRequest, INSIGHTS_UNAVAILABLE_MESSAGE, TextGenerator};
    use nexus_core::ItemId;
    use nexus_inventory::ItemDraft;
    use std::sync::atomic::AtomicUsize;

    /// Answers call N (0-based) after `delays[N]` with `"answer N"`.
    struct ScriptedGenerator {
        delays: Vec<Duration>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, AiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays.get(n).copied().unwrap_or_default();
            tokio::time::sleep(delay).await;
            Ok(format!("answer {n}"))
        }
    }

    fn scripted(delays: Vec<Duration>) -> Arc<ScriptedGenerator> {
        Arc::new(ScriptedGenerator {
            delays,
            calls: AtomicUsize::new(0),
        })
    }

    fn items() -> Vec<InventoryItem> {
        let draft = ItemDraft {
            name: "Desk".to_string(),
            sku: "FUR-009".to_string(),
            ..ItemDraft::default()
        };
        vec![InventoryItem::from_draft(ItemId::new(), &draft, Utc::now()).unwrap()]
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn burst_of_triggers_makes_one_call() {
        let generator = scripted(vec![]);
        let sink = Arc::new(LatestInsight::new());
        let handle = InsightsRefresher::new(Duration::from_millis(50)).spawn(
            Handle::current(),
            InventoryAssistant::new(generator.clone()),
            sink.clone(),
        );

        for _ in 0..3 {
            handle.trigger(&items());
        }
        assert_eq!(handle.latest_generation(), 3);

        wait_for(|| sink.get().is_some()).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        let insight = sink.get().unwrap();
        assert_eq!(insight.generation, 3);
        assert_eq!(insight.text, "answer 0");
    }

    #[tokio::test]
    async fn stale_completion_never_overwrites_newer_insight() {
        // First call is slow, second is fast and finishes first.
        let generator = scripted(vec![Duration::from_millis(300), Duration::ZERO]);
        let sink = Arc::new(LatestInsight::new());
        let handle = InsightsRefresher::new(Duration::ZERO).spawn(
            Handle::current(),
            InventoryAssistant::new(generator.clone()),
            sink.clone(),
        );

        handle.trigger(&items());
        wait_for(|| generator.calls.load(Ordering::SeqCst) == 1).await;
        handle.trigger(&items());

        wait_for(|| sink.get().is_some_and(|i| i.generation == 2)).await;
        assert_eq!(sink.get().unwrap().text, "answer 1");

        // Let the slow first call complete; it must be discarded.
        tokio::time::sleep(Duration::from_millis(400)).await;
        let insight = sink.get().unwrap();
        assert_eq!(insight.generation, 2);
        assert_eq!(insight.text, "answer 1");
    }

    #[tokio::test]
    async fn empty_inventory_is_not_refreshed() {
        let generator = scripted(vec![]);
        let sink = Arc::new(LatestInsight::new());
        let handle = InsightsRefresher::new(Duration::ZERO).spawn(
            Handle::current(),
            InventoryAssistant::new(generator.clone()),
            sink.clone(),
        );

        assert_eq!(handle.trigger(&[]), None);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(sink.get().is_none());
    }

    #[tokio::test]
    async fn emptying_inventory_cancels_pending_refresh() {
        let generator = scripted(vec![]);
        let sink = Arc::new(LatestInsight::new());
        let handle = InsightsRefresher::new(Duration::from_millis(50)).spawn(
            Handle::current(),
            InventoryAssistant::new(generator.clone()),
            sink.clone(),
        );

        assert_eq!(handle.trigger(&items()), Some(1));
        assert_eq!(handle.trigger(&[]), None);
        assert_eq!(handle.latest_generation(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(sink.get().is_none());
    }

    #[tokio::test]
    async fn disabled_assistant_publishes_unavailable_message() {
        let sink = Arc::new(LatestInsight::new());
        let handle = InsightsRefresher::new(Duration::ZERO).spawn(
            Handle::current(),
            InventoryAssistant::disabled(),
            sink.clone(),
        );

        handle.trigger(&items());
        wait_for(|| sink.get().is_some()).await;
        assert_eq!(sink.get().unwrap().text, INSIGHTS_UNAVAILABLE_MESSAGE);
    }
}
