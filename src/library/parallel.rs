//! Fan-out of a single template search over every stored image.
//!
//! Workers pull image indices from a shared atomic counter and publish to a
//! mutex-guarded best only when their own best improves. With the `rayon`
//! feature the workers run on a dedicated rayon pool, otherwise on scoped
//! std threads.

use crate::edged::EdgedImage;
use crate::search::{ImageMatch, MatchConfig, MatchContext, SearchOutcome};
use crate::template::Template;
use crate::util::{FrameMatchError, FrameMatchResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// Reduced result of a library-wide search.
pub(crate) struct FanOut {
    /// Best image index and its placement; `None` only for an empty slice.
    pub(crate) best: Option<(usize, ImageMatch)>,
    /// Per-image outcomes in input order.
    pub(crate) outcomes: Vec<SearchOutcome>,
    pub(crate) workers: usize,
}

/// `available - 1` workers (at least one), never more than `images`.
pub(crate) fn worker_count(images: usize) -> FrameMatchResult<usize> {
    let available = thread::available_parallelism()
        .map_err(|_| FrameMatchError::ParallelismUnavailable)?
        .get();
    Ok(available.saturating_sub(1).max(1).min(images.max(1)))
}

/// Whether `candidate` at `index` should replace `current`. Ties go to the
/// lower index so the reduction does not depend on scheduling.
fn beats(index: usize, candidate: &ImageMatch, current: Option<&(usize, ImageMatch)>) -> bool {
    match current {
        None => true,
        Some((best_index, best)) => {
            candidate.percentage > best.percentage
                || (candidate.percentage == best.percentage && index < *best_index)
        }
    }
}

type Drained = FrameMatchResult<Vec<(usize, SearchOutcome)>>;

/// Pulls indices from `next` until the slice is exhausted, publishing to
/// `shared` whenever this worker's own best improves.
fn drain(
    images: &[EdgedImage],
    template: &Template,
    cfg: &MatchConfig,
    context: Option<MatchContext>,
    next: &AtomicUsize,
    shared: &Mutex<Option<(usize, ImageMatch)>>,
) -> Drained {
    let mut local: Option<(usize, ImageMatch)> = None;
    let mut done = Vec::new();
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(image) = images.get(index) else {
            break;
        };
        let outcome = image.match_to(template, cfg, context)?;
        if beats(index, &outcome.best, local.as_ref()) {
            local = Some((index, outcome.best));
            let mut best = shared.lock().map_err(|_| FrameMatchError::WorkerPanicked)?;
            if beats(index, &outcome.best, best.as_ref()) {
                *best = Some((index, outcome.best));
            }
        }
        done.push((index, outcome));
    }
    Ok(done)
}

#[cfg(feature = "rayon")]
fn run_workers<F>(workers: usize, work: F) -> FrameMatchResult<Vec<Vec<(usize, SearchOutcome)>>>
where
    F: Fn() -> Drained + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("framematch-search-{idx}"))
        .build()
        .map_err(|err| FrameMatchError::WorkerPool(err.to_string()))?;
    let finished: Mutex<Vec<Drained>> = Mutex::new(Vec::with_capacity(workers));
    pool.scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|_| {
                let done = work();
                if let Ok(mut finished) = finished.lock() {
                    finished.push(done);
                }
            });
        }
    });
    let finished = finished
        .into_inner()
        .map_err(|_| FrameMatchError::WorkerPanicked)?;
    if finished.len() != workers {
        return Err(FrameMatchError::WorkerPanicked);
    }
    finished.into_iter().collect()
}

#[cfg(not(feature = "rayon"))]
fn run_workers<F>(workers: usize, work: F) -> FrameMatchResult<Vec<Vec<(usize, SearchOutcome)>>>
where
    F: Fn() -> Drained + Sync,
{
    thread::scope(|scope| {
        let work = &work;
        let handles: Vec<_> = (0..workers).map(|_| scope.spawn(work)).collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| FrameMatchError::WorkerPanicked)
                    .and_then(|done| done)
            })
            .collect()
    })
}

pub(crate) fn match_all(
    images: &[EdgedImage],
    template: &Template,
    cfg: &MatchConfig,
    context: Option<MatchContext>,
) -> FrameMatchResult<FanOut> {
    if images.is_empty() {
        return Ok(FanOut {
            best: None,
            outcomes: Vec::new(),
            workers: 0,
        });
    }
    let workers = worker_count(images.len())?;
    let next = AtomicUsize::new(0);
    let shared: Mutex<Option<(usize, ImageMatch)>> = Mutex::new(None);

    let results = run_workers(workers, || {
        drain(images, template, cfg, context, &next, &shared)
    })?;

    let mut outcomes = vec![SearchOutcome::default(); images.len()];
    for (index, outcome) in results.into_iter().flatten() {
        outcomes[index] = outcome;
    }
    let best = shared
        .into_inner()
        .map_err(|_| FrameMatchError::WorkerPanicked)?;
    Ok(FanOut {
        best,
        outcomes,
        workers,
    })
}
