use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::ProgressStore;
use crate::domain::{JobId, JobStatus, ProgressEntry};

pub const DEFAULT_TERMINAL_GRACE: Duration = Duration::from_secs(3600);

struct Slot {
    entry: ProgressEntry,
    touched_at: Instant,
}

/// Job progress keyed by upstream job id.
///
/// Entries for jobs in a terminal status are pruned once they have been
/// idle for longer than the grace period; in-flight jobs are kept.
pub struct InMemoryProgressStore {
    slots: Mutex<HashMap<JobId, Slot>>,
    terminal_grace: Duration,
}

impl InMemoryProgressStore {
    pub fn new(terminal_grace: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            terminal_grace,
        }
    }

    fn prune(&self, slots: &mut HashMap<JobId, Slot>) {
        let before = slots.len();
        slots.retain(|_, slot| {
            let terminal = slot.entry.status.is_some_and(|s| s.is_terminal());
            !terminal || slot.touched_at.elapsed() < self.terminal_grace
        });
        let pruned = before - slots.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned finished job progress entries");
        }
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINAL_GRACE)
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn record(&self, job_id: &JobId, progress: u8, status: JobStatus) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut slots);
        slots.insert(
            job_id.clone(),
            Slot {
                entry: ProgressEntry::new(progress, status),
                touched_at: Instant::now(),
            },
        );
    }

    fn read(&self, job_id: &JobId) -> ProgressEntry {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_id)
            .map(|slot| slot.entry.clone())
            .unwrap_or_else(ProgressEntry::unknown)
    }

    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
