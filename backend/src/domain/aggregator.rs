//! Live, merged view of every schedule visible to one principal.
//!
//! Each visibility source (own schedules, the linked caregiver's pool, each
//! linked teacher for caregivers) is a spawned task holding its own
//! subscription to the schedules feed. Sources forward upsert/remove events
//! into one mpsc channel; a single merge task owns the keyed map and
//! publishes sorted snapshots through a watch channel. No lock is shared
//! between sources and the merge task.

use std::collections::{BTreeMap, HashMap, HashSet};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::schedule::Schedule;
use crate::storage::jsonfile::ScheduleRepository;
use crate::storage::traits::{ScheduleEvent, ScheduleStore};
use shared::Role;

const SOURCE_CHANNEL_CAPACITY: usize = 64;

/// One visibility predicate over the schedules collection.
#[derive(Debug, Clone, PartialEq)]
enum SourceFilter {
    /// Schedules owned by this user id.
    Owner(String),
    /// Schedules tagged with this caregiver id.
    Caregiver(String),
}

impl SourceFilter {
    fn matches(&self, schedule: &Schedule) -> bool {
        match self {
            SourceFilter::Owner(user_id) => schedule.user_id == *user_id,
            SourceFilter::Caregiver(caregiver_id) => {
                schedule.caregiver_id.as_deref() == Some(caregiver_id.as_str())
            }
        }
    }

    fn label(&self) -> String {
        match self {
            SourceFilter::Owner(user_id) => format!("owner {}", user_id),
            SourceFilter::Caregiver(caregiver_id) => format!("caregiver {}", caregiver_id),
        }
    }
}

/// Messages from a source task to the merge task.
#[derive(Debug)]
enum SourceEvent {
    Upsert(usize, Schedule),
    Remove(usize, String),
    /// The source has delivered its initial result set.
    Ready(usize),
    /// The source is frozen; its last contribution stays in the view.
    Error(usize, String),
}

/// The merged view published after every change.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    /// All visible schedules, `updated_at` descending, each id exactly once.
    pub schedules: Vec<Schedule>,
    /// Messages from sources that stopped delivering. Other sources keep
    /// the view live.
    pub source_errors: Vec<String>,
    /// True once every source has delivered its initial result set.
    pub ready: bool,
}

impl ScheduleSnapshot {
    pub fn published(&self) -> Vec<Schedule> {
        self.schedules.iter().filter(|s| s.is_published).cloned().collect()
    }

    pub fn drafts(&self) -> Vec<Schedule> {
        self.schedules.iter().filter(|s| !s.is_published).cloned().collect()
    }
}

/// Handle over the running aggregation. Dropping it unsubscribes every
/// source and stops the merge task.
pub struct ScheduleAggregator {
    snapshot_rx: watch::Receiver<ScheduleSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl ScheduleAggregator {
    /// Spawn one source task per visibility predicate of `identity` plus
    /// the merge task, and return the handle.
    pub fn spawn(identity: &ResolvedIdentity, repository: ScheduleRepository) -> Self {
        let filters = Self::filters_for(identity);
        debug!(
            "Aggregating {} sources for {}",
            filters.len(),
            identity.user_id
        );

        let (event_tx, event_rx) = mpsc::channel(SOURCE_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(ScheduleSnapshot::default());

        let mut tasks = Vec::with_capacity(filters.len() + 1);
        let source_labels: Vec<String> = filters.iter().map(|f| f.label()).collect();

        for (index, filter) in filters.into_iter().enumerate() {
            let repository = repository.clone();
            let tx = event_tx.clone();
            tasks.push(tokio::spawn(run_source(index, filter, repository, tx)));
        }
        drop(event_tx);

        tasks.push(tokio::spawn(run_merge(
            event_rx,
            snapshot_tx,
            source_labels,
        )));

        Self { snapshot_rx, tasks }
    }

    /// The visibility sources for a resolved identity. A fallback identity
    /// with no linkage degrades to the own-schedules source only.
    fn filters_for(identity: &ResolvedIdentity) -> Vec<SourceFilter> {
        let mut filters = vec![SourceFilter::Owner(identity.user_id.clone())];

        if let Some(caregiver_id) = &identity.caregiver_id {
            if *caregiver_id != identity.user_id {
                filters.push(SourceFilter::Caregiver(caregiver_id.clone()));
            }
        }

        if identity.role == Role::Caregiver {
            for teacher_id in &identity.teachers {
                filters.push(SourceFilter::Owner(teacher_id.clone()));
            }
        }

        filters
    }

    /// The most recently published view.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Wait for the next published view.
    pub async fn changed(&mut self) -> ScheduleSnapshot {
        // A closed sender means the merge task is gone; the last snapshot
        // stands.
        let _ = self.snapshot_rx.changed().await;
        self.snapshot_rx.borrow_and_update().clone()
    }

    /// Wait until every source has delivered its initial result set.
    pub async fn wait_ready(&mut self) -> ScheduleSnapshot {
        loop {
            {
                let snapshot = self.snapshot_rx.borrow_and_update();
                if snapshot.ready {
                    return snapshot.clone();
                }
            }
            if self.snapshot_rx.changed().await.is_err() {
                return self.snapshot_rx.borrow().clone();
            }
        }
    }
}

impl Drop for ScheduleAggregator {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// One source: subscribe, replay the matching initial rows, then forward
/// every matching change. Tracks the ids it currently claims so a schedule
/// edited out of the predicate is removed from the merged view.
async fn run_source(
    index: usize,
    filter: SourceFilter,
    repository: ScheduleRepository,
    tx: mpsc::Sender<SourceEvent>,
) {
    let feed = match repository.subscribe() {
        Ok(feed) => feed,
        Err(error) => {
            warn!("Source {} failed to subscribe: {}", filter.label(), error);
            let _ = tx.send(SourceEvent::Error(index, error.to_string())).await;
            let _ = tx.send(SourceEvent::Ready(index)).await;
            return;
        }
    };

    let mut membership: HashSet<String> = HashSet::new();
    let mut events = feed.events;

    for schedule in feed.initial {
        if filter.matches(&schedule) {
            membership.insert(schedule.id.clone());
            if tx.send(SourceEvent::Upsert(index, schedule)).await.is_err() {
                return;
            }
        }
    }
    if tx.send(SourceEvent::Ready(index)).await.is_err() {
        return;
    }

    loop {
        match events.recv().await {
            Ok(ScheduleEvent::Upserted(schedule)) => {
                let message = if filter.matches(&schedule) {
                    membership.insert(schedule.id.clone());
                    SourceEvent::Upsert(index, schedule)
                } else if membership.remove(&schedule.id) {
                    // No longer in this source's result set.
                    SourceEvent::Remove(index, schedule.id)
                } else {
                    continue;
                };
                if tx.send(message).await.is_err() {
                    return;
                }
            }
            Ok(ScheduleEvent::Removed(schedule_id)) => {
                if membership.remove(&schedule_id)
                    && tx.send(SourceEvent::Remove(index, schedule_id)).await.is_err()
                {
                    return;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                // Freeze this source rather than serve a view with holes.
                warn!("Source {} lagged by {} events", filter.label(), missed);
                let _ = tx
                    .send(SourceEvent::Error(
                        index,
                        format!("live feed lagged by {} events", missed),
                    ))
                    .await;
                return;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

/// The merge task: sole owner of the keyed map. A schedule leaves the view
/// only when no source still claims its id.
async fn run_merge(
    mut event_rx: mpsc::Receiver<SourceEvent>,
    snapshot_tx: watch::Sender<ScheduleSnapshot>,
    source_labels: Vec<String>,
) {
    let total_sources = source_labels.len();
    let mut schedules: HashMap<String, Schedule> = HashMap::new();
    let mut memberships: HashMap<String, HashSet<usize>> = HashMap::new();
    let mut ready_sources: HashSet<usize> = HashSet::new();
    let mut source_errors: BTreeMap<usize, String> = BTreeMap::new();

    while let Some(event) = event_rx.recv().await {
        match event {
            SourceEvent::Upsert(source, schedule) => {
                memberships.entry(schedule.id.clone()).or_default().insert(source);
                schedules.insert(schedule.id.clone(), schedule);
            }
            SourceEvent::Remove(source, schedule_id) => {
                let abandoned = match memberships.get_mut(&schedule_id) {
                    Some(sources) => {
                        sources.remove(&source);
                        sources.is_empty()
                    }
                    None => false,
                };
                if abandoned {
                    memberships.remove(&schedule_id);
                    schedules.remove(&schedule_id);
                }
            }
            SourceEvent::Ready(source) => {
                ready_sources.insert(source);
            }
            SourceEvent::Error(source, message) => {
                source_errors.insert(
                    source,
                    format!("{}: {}", source_labels[source], message),
                );
            }
        }

        let mut merged: Vec<Schedule> = schedules.values().cloned().collect();
        merged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let snapshot = ScheduleSnapshot {
            schedules: merged,
            source_errors: source_errors.values().cloned().collect(),
            ready: ready_sources.len() == total_sources,
        };
        if snapshot_tx.send(snapshot).is_err() {
            return;
        }
    }
}
