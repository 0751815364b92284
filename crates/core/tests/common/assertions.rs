//! Polling assertions for asynchronous scheduler state.
#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;
use vox_core::scheduler::JobScheduler;
use vox_protocol::JobRecord;

/// Default patience for a fake-tool pipeline to reach a state.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls the scheduler until the job's record satisfies `predicate`.
///
/// Panics with the last observed record when the timeout elapses.
pub async fn wait_for(
    scheduler: &Arc<JobScheduler>,
    job_id: Uuid,
    predicate: impl Fn(&JobRecord) -> bool,
) -> JobRecord {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    let mut last: Option<JobRecord> = None;
    loop {
        if let Some(record) = scheduler.status(job_id) {
            if predicate(&record) {
                return record;
            }
            last = Some(record);
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for job {job_id}; last record: {last:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Waits until the job reaches any terminal status.
pub async fn wait_terminal(scheduler: &Arc<JobScheduler>, job_id: Uuid) -> JobRecord {
    wait_for(scheduler, job_id, |record| record.status.is_terminal()).await
}

/// Whether a process with the given pid is still alive.
pub fn process_alive(pid: i32) -> bool {
    // signal 0 probes for existence without delivering anything
    unsafe { libc::kill(pid, 0) == 0 }
}
