use crate::crypto::curve::constants::ED25519_BASEPOINT_POINT;
use crate::crypto::curve::EdwardsPoint;
use crate::runner::{basepoint_multiple, check_point, CheckFailure, SelftestStats, CHECK_NAMES};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Copy)]
struct WorkerConfig {
    steps: u64,
    stride: u64,
}

struct SharedState {
    completed_steps: AtomicU64,
}

pub struct ProgressInfo {
    pub completed_steps: u64,
    pub elapsed_secs: u64,
    pub failures: usize,
    pub total_steps: u64,
}

/// Messages sent from workers to the collecting thread.
enum WorkerMessage {
    Failure(CheckFailure),
    Done { worker: usize, steps: u64 },
}

/// Walk `thread_count` chains of basepoint multiples in parallel and check
/// the group law at every point.
///
/// Worker `i` starts at `(i+1)·B` and advances by `thread_count·B`, so the
/// workers cover disjoint multiples.
pub fn run_selftest<F>(thread_count: usize, steps: u64, mut progress_callback: F) -> SelftestStats
where
    F: FnMut(ProgressInfo),
{
    let start_time = Instant::now();
    let thread_count = thread_count.max(1);
    let total_steps = steps * thread_count as u64;

    let worker_config = WorkerConfig {
        steps,
        stride: thread_count as u64,
    };

    let shared_state = Arc::new(SharedState {
        completed_steps: AtomicU64::new(0),
    });

    let (tx, rx): (Sender<WorkerMessage>, Receiver<WorkerMessage>) = bounded(thread_count * 2);

    let mut handles = Vec::with_capacity(thread_count);

    for worker in 0..thread_count {
        let config = worker_config;
        let state = shared_state.clone();
        let tx = tx.clone();

        let handle = thread::spawn(move || {
            worker_thread(worker, config, &state, &tx);
        });

        handles.push(handle);
    }

    // Drop the original sender so the channel closes when all workers are done
    drop(tx);

    let mut failures = Vec::new();
    let mut finished_workers = 0usize;
    let mut walked_steps = 0u64;
    let mut last_progress_report = Instant::now();
    let report_interval = Duration::from_secs(1);

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(WorkerMessage::Failure(failure)) => failures.push(failure),
            Ok(WorkerMessage::Done { steps, .. }) => {
                walked_steps += steps;
                finished_workers += 1;
                if finished_workers == thread_count {
                    break;
                }
            }
            Err(_) => {
                // A panicked worker never reports Done
                if handles.iter().all(std::thread::JoinHandle::is_finished) {
                    break;
                }
            }
        }

        if last_progress_report.elapsed() >= report_interval {
            progress_callback(ProgressInfo {
                completed_steps: shared_state.completed_steps.load(Ordering::Relaxed),
                elapsed_secs: start_time.elapsed().as_secs(),
                failures: failures.len(),
                total_steps,
            });
            last_progress_report = Instant::now();
        }
    }

    // Drain anything sent between the last receive and the workers exiting
    for message in rx.try_iter() {
        match message {
            WorkerMessage::Failure(failure) => failures.push(failure),
            WorkerMessage::Done { steps, .. } => walked_steps += steps,
        }
    }

    for (worker, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            failures.push(CheckFailure {
                worker,
                step: 0,
                check: "worker panicked",
            });
        }
    }

    failures.sort_by_key(|f| (f.worker, f.step));

    let elapsed = start_time.elapsed();
    progress_callback(ProgressInfo {
        completed_steps: walked_steps,
        elapsed_secs: elapsed.as_secs(),
        failures: failures.len(),
        total_steps,
    });

    SelftestStats {
        threads: thread_count,
        total_steps: walked_steps,
        total_checks: walked_steps * CHECK_NAMES.len() as u64,
        elapsed_nanos: elapsed.as_nanos(),
        failures,
    }
}

fn worker_thread(worker: usize, config: WorkerConfig, state: &Arc<SharedState>, tx: &Sender<WorkerMessage>) {
    const REPORT_INTERVAL: u64 = 16;

    let stride: EdwardsPoint = basepoint_multiple(config.stride);
    let mut point = &*ED25519_BASEPOINT_POINT + &basepoint_multiple(worker as u64);
    let mut local_steps = 0u64;
    let mut walked = 0u64;

    for step in 0..config.steps {
        for check in check_point(&point) {
            // Send result (ignore send errors if receiver is closed)
            let _ = tx.send(WorkerMessage::Failure(CheckFailure { worker, step, check }));
        }

        point += &stride;
        local_steps += 1;
        walked += 1;

        if local_steps >= REPORT_INTERVAL {
            state.completed_steps.fetch_add(local_steps, Ordering::Relaxed);
            local_steps = 0;
        }
    }

    if local_steps > 0 {
        state.completed_steps.fetch_add(local_steps, Ordering::Relaxed);
    }

    let _ = tx.send(WorkerMessage::Done { worker, steps: walked });
}
