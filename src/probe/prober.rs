// src/probe/prober.rs
// =============================================================================
// Checks whether the links of a page are reachable.
//
// How it works:
// 1. Spawn one tokio task per link. Each task does exactly one GET.
// 2. Collect task results as they finish. A link is accessible only when it
//    answered with a 2xx status; errors, timeouts and other statuses all count
//    as inaccessible.
// 3. Stop when every task finished OR the caller's CancellationToken fires,
//    whichever comes first.
//
// On cancellation we first collect every task that already finished, so a
// result that was ready before the cancel is never lost. The unfinished tasks
// are then detached, not aborted: their
// requests finish (or time out through the client timeout) on their own, and
// they no longer affect the count. The summary is marked Cancelled so a
// partial count is never mistaken for a complete one.
//
// Rust concepts:
// - JoinSet: a collection of spawned tasks you can await one by one
// - select!: wait on several futures, continue with the first that is ready
// - Arc<dyn Trait>: shared ownership of a trait object across tasks
// =============================================================================

use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use url::Url;

use super::fetcher::Fetcher;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Every probe finished
    #[default]
    Complete,
    /// The wait was cancelled before every probe finished
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Finished probes that were not reachable
    pub inaccessible: usize,
    /// Probes that finished before the wait ended
    pub finished: usize,
    pub status: ProbeStatus,
}

/// Probes every link concurrently and counts the inaccessible ones.
pub async fn probe_links(
    fetcher: Arc<dyn Fetcher>,
    links: Vec<Url>,
    cancel: &CancellationToken,
) -> ProbeSummary {
    // One task per link. Each task gets its own handle to the fetcher
    // (Arc::clone only bumps a reference count, no new HTTP client).
    let mut tasks = JoinSet::new();
    for url in links {
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move { is_accessible(fetcher.as_ref(), &url).await });
    }

    // Only this loop touches the summary, so no Mutex is needed:
    // the tasks hand their results back through the JoinSet.
    let mut summary = ProbeSummary {
        inaccessible: 0,
        finished: 0,
        status: ProbeStatus::Complete,
    };

    while !tasks.is_empty() {
        // select! waits on both futures and runs the branch of whichever is
        // ready first. `biased` checks them top to bottom, so cancellation
        // always wins over another join.
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                // Count what already finished before giving up on the rest.
                // now_or_never() polls join_next() once: Some(..) if a task is
                // done, None if everything left is still running.
                while let Some(Some(joined)) = tasks.join_next().now_or_never() {
                    summary.record(joined);
                }

                error!(
                    finished = summary.finished,
                    outstanding = tasks.len(),
                    "probing stopped due to cancellation"
                );
                // let in-flight requests run out on their own timeout
                tasks.detach_all();
                summary.status = ProbeStatus::Cancelled;
                break;
            }

            joined = tasks.join_next() => {
                // None means the set is empty; the while condition ends the loop
                let Some(joined) = joined else { break };
                summary.record(joined);
            }
        }
    }

    if summary.status == ProbeStatus::Complete {
        debug!(finished = summary.finished, "all probes finished");
    }
    summary
}

impl ProbeSummary {
    // Tallies one finished task. A task that panicked counts as inaccessible.
    fn record(&mut self, joined: Result<bool, JoinError>) {
        self.finished += 1;
        match joined {
            Ok(true) => {}
            Ok(false) => self.inaccessible += 1,
            Err(e) => {
                warn!(error = %e, "probe task failed");
                self.inaccessible += 1;
            }
        }
    }
}

// Checks a single link with one request. Never retried.
async fn is_accessible(fetcher: &dyn Fetcher, url: &Url) -> bool {
    match fetcher.fetch(url).await {
        Ok(status) if status.is_success() => {
            debug!(url = %url, "url is accessible");
            true
        }
        Ok(status) => {
            debug!(url = %url, status = status.as_u16(), "response code is not 2xx");
            false
        }
        Err(e) => {
            debug!(url = %url, error = %e, "url is not accessible");
            false
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why JoinSet instead of futures' buffer_unordered?
//    - Every task is a real tokio task, so probes run in parallel on all
//      worker threads
//    - detach_all() lets us stop waiting without killing the requests
//
// 2. What does CancellationToken do?
//    - cancel() flips it once; every clone sees the change
//    - cancelled() is a future that completes when that happens
//    - The analyzer's deadline timer is the one calling cancel()
//
// 3. Why is join_next() wrapped in Some(Some(..)) during the drain?
//    - join_next() returns Option: None when the set is empty
//    - now_or_never() adds another Option: None when nothing is ready yet
// -----------------------------------------------------------------------------
