use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use std::{slice, thread, vec};
use tracing::warn;
use crate::{BusId, Error};

/// The result of an operation on one bus.
#[derive(Debug)]
pub struct Outcome<T> {
    /// The bus the operation ran on.
    pub bus: BusId,
    /// What the operation returned.
    pub result: Result<T, Error>,
}

impl<T> Outcome<T> {
    /// Tag `result` with `bus`.
    pub fn new(bus: BusId, result: Result<T, Error>) -> Self {
        Outcome {
            bus,
            result,
        }
    }

    /// Whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `op` on every bus at once, one thread per bus, and wait for all of
/// them.
///
/// A failing or panicking bus does not affect the others. The outcomes are
/// listed in the order of `buses`, not in the order they completed.
pub fn apply_to_all<T, F>(buses: &[BusId], op: F) -> Vec<Outcome<T>> where
    T: Send,
    F: Fn(BusId) -> Result<T, Error> + Sync,
{
    let op = &op;
    thread::scope(|s| {
        let units: Vec<_> = buses.iter()
            .map(|&bus| (bus, s.spawn(move || op(bus))))
            .collect();

        units.into_iter()
            .map(|(bus, unit)| {
                let result = unit.join().unwrap_or_else(|_| Err(Error::WorkerPanicked { bus }));
                log_failure(bus, &result);
                Outcome::new(bus, result)
            })
            .collect()
    })
}

/// Like `apply_to_all`, but stop waiting once `timeout` has passed.
///
/// Every bus that has not reported by then gets an `Error::Timeout`
/// outcome. Its thread is detached and left to finish on its own, as a
/// blocked bus call cannot be interrupted.
pub fn apply_to_all_with_timeout<T, F>(buses: &[BusId], timeout: Duration, op: F) -> Vec<Outcome<T>> where
    T: Send + 'static,
    F: Fn(BusId) -> Result<T, Error> + Send + Sync + 'static,
{
    let deadline = Instant::now() + timeout;
    let op = Arc::new(op);
    let (tx, rx) = mpsc::channel();

    for (index, &bus) in buses.iter().enumerate() {
        let op = Arc::clone(&op);
        let tx = tx.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| op(bus)))
                .unwrap_or_else(|_| Err(Error::WorkerPanicked { bus }));
            // the receiver is gone if the deadline passed first
            let _ = tx.send((index, result));
        });
    }
    drop(tx);

    let mut results: Vec<Option<Result<T, Error>>> = buses.iter().map(|_| None).collect();
    let mut pending = buses.len();
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((index, result)) => {
                results[index] = Some(result);
                pending -= 1;
            },
            Err(_) => break,
        }
    }

    buses.iter().zip(results)
        .map(|(&bus, result)| {
            let result = result.unwrap_or(Err(Error::Timeout { bus }));
            log_failure(bus, &result);
            Outcome::new(bus, result)
        })
        .collect()
}

fn log_failure<T>(bus: BusId, result: &Result<T, Error>) {
    if let Err(e) = result {
        warn!(bus, error = %e, "operation failed");
    }
}

/// Every outcome of an operation applied to one or more buses.
#[derive(Debug)]
pub struct Report<T> {
    outcomes: Vec<Outcome<T>>,
}

impl<T> Report<T> {
    /// Collect `outcomes` into a report.
    pub fn new(outcomes: Vec<Outcome<T>>) -> Self {
        Report {
            outcomes,
        }
    }

    /// All outcomes.
    pub fn outcomes(&self) -> &[Outcome<T>] {
        &self.outcomes
    }

    /// Buses the operation succeeded on, with their values.
    pub fn succeeded(&self) -> impl Iterator<Item=(BusId, &T)> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok().map(|v| (o.bus, v)))
    }

    /// Buses the operation failed on, with their errors.
    pub fn failed(&self) -> impl Iterator<Item=(BusId, &Error)> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err().map(|e| (o.bus, e)))
    }

    /// No bus failed.
    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_ok)
    }

    /// Some buses failed and some succeeded.
    pub fn is_partial_failure(&self) -> bool {
        self.outcomes.iter().any(Outcome::is_ok) && !self.is_complete_success()
    }

    /// Every bus failed.
    pub fn is_total_failure(&self) -> bool {
        !self.outcomes.is_empty() && !self.outcomes.iter().any(Outcome::is_ok)
    }
}

impl<T> IntoIterator for Report<T> {
    type Item = Outcome<T>;
    type IntoIter = vec::IntoIter<Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Report<T> {
    type Item = &'a Outcome<T>;
    type IntoIter = slice::Iter<'a, Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
