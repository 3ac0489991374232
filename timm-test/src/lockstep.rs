//! A test-runner for detecting data-races and race-conditions.

use std::{
    sync::{Arc, atomic::{AtomicBool, AtomicUsize, Ordering}},
    thread,
};

/// Lockstep is a test-runner running the same step on multiple threads, in lock-step.
///
/// Each iteration of the step starts as simultaneously as possible on every thread, maximizing the contention on
/// whatever Global state the threads share.
///
/// #   Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use timm_test::Lockstep;
///
/// let lockstep = Lockstep::new(AtomicUsize::new(0), 4);
///
/// let results = lockstep.run(10, |thread| move |global: &AtomicUsize, _iteration| {
///     global.fetch_add(1, Ordering::Relaxed);
///     thread
/// });
///
/// assert_eq!(40, lockstep.global().load(Ordering::Relaxed));
/// assert_eq!(vec!(0; 10), results[0]);
/// assert_eq!(vec!(3; 10), results[3]);
/// ```
pub struct Lockstep<Global> {
    global: Arc<Global>,
    number_threads: usize,
}

impl<Global> Lockstep<Global>
    where
        Global: Send + Sync + 'static,
{
    /// Creates an instance, to run on `number_threads` threads.
    pub fn new(global: Global, number_threads: usize) -> Self {
        assert!(number_threads > 0, "Cannot run in lock-step without a single thread");

        Self { global: Arc::new(global), number_threads }
    }

    /// Returns a reference to the Global state.
    pub fn global(&self) -> &Global { &*self.global }

    /// Returns the number of threads.
    pub fn number_threads(&self) -> usize { self.number_threads }

    /// Runs `iterations` iterations of a step on each thread, returns the results per thread, then per iteration.
    ///
    /// The step of each thread is created by invoking `factory` with the index of the thread; it is then invoked
    /// with the Global state and the index of the iteration.
    ///
    /// #   Panics
    ///
    /// If any step panics; the other threads are then released rather than left waiting.
    pub fn run<Factory, Step, R>(&self, iterations: usize, mut factory: Factory) -> Vec<Vec<R>>
        where
            Factory: FnMut(usize) -> Step,
            Step: FnMut(&Global, usize) -> R + Send + 'static,
            R: Send + 'static,
    {
        let rendez_vous = Arc::new(RendezVous::new(self.number_threads));

        let threads: Vec<_> = (0..self.number_threads)
            .map(|index| {
                let global = self.global.clone();
                let rendez_vous = rendez_vous.clone();
                let mut step = factory(index);

                thread::spawn(move || {
                    let mut guard = PoisonGuard(Some(rendez_vous));

                    let results: Vec<R> = (0..iterations)
                        .map(|iteration| {
                            guard.wait_until_all_ready();
                            step(&*global, iteration)
                        })
                        .collect();

                    guard.dismiss();

                    results
                })
            })
            .collect();

        //  First join _all_ threads, then collect the results.
        let results: Vec<_> = threads.into_iter().map(|handle| handle.join()).collect();

        results.into_iter().map(|result| result.expect("No panic")).collect()
    }
}

//
//  Implementation details
//

//  If a single thread panics, then the other threads must not wait for it forever.
struct PoisonGuard(Option<Arc<RendezVous>>);

impl PoisonGuard {
    fn wait_until_all_ready(&self) {
        if let Some(rendez_vous) = &self.0 {
            rendez_vous.wait_until_all_ready();
        }
    }

    fn dismiss(&mut self) { self.0 = None; }
}

impl Drop for PoisonGuard {
    fn drop(&mut self) {
        if let Some(rendez_vous) = &self.0 {
            rendez_vous.poison();
        }
    }
}

//  A reusable rendez-vous point.
//
//  Each generation is released once `count` threads have arrived; the last thread to arrive re-arms it for the next
//  generation before releasing the others.
struct RendezVous {
    count: usize,
    waiting: AtomicUsize,
    generation: AtomicUsize,
    poisoned: AtomicBool,
}

impl RendezVous {
    fn new(count: usize) -> Self {
        Self {
            count,
            waiting: AtomicUsize::new(0),
            generation: AtomicUsize::new(0),
            poisoned: AtomicBool::new(false),
        }
    }

    fn poison(&self) { self.poisoned.store(true, Ordering::Release); }

    fn wait_until_all_ready(&self) {
        let generation = self.generation.load(Ordering::Acquire);

        if self.waiting.fetch_add(1, Ordering::AcqRel) + 1 == self.count {
            self.waiting.store(0, Ordering::Relaxed);
            self.generation.fetch_add(1, Ordering::Release);
            return;
        }

        while self.generation.load(Ordering::Acquire) == generation {
            assert!(!self.poisoned.load(Ordering::Acquire), "RendezVous poisoned by a panicking thread");
            thread::yield_now();
        }
    }
}

#[cfg(test)]
mod tests {

use std::sync::Mutex;

use super::*;

#[test]
fn lockstep_results() {
    let lockstep = Lockstep::new((), 3);

    let results = lockstep.run(4, |thread| move |_: &(), iteration| thread * 10 + iteration);

    assert_eq!(vec!(vec!(0, 1, 2, 3), vec!(10, 11, 12, 13), vec!(20, 21, 22, 23)), results);
}

#[test]
fn lockstep_in_step() {
    //  No thread starts iteration N + 1 before all threads started iteration N.
    let lockstep = Lockstep::new(Mutex::new(Vec::new()), 4);

    lockstep.run(8, |_| |global: &Mutex<Vec<usize>>, iteration| global.lock().unwrap().push(iteration));

    let log = lockstep.global().lock().unwrap();

    assert_eq!(32, log.len());
    assert!(log.windows(2).all(|w| w[0] <= w[1] && w[1] <= w[0] + 1), "{:?}", *log);
}

#[test]
#[should_panic]
fn lockstep_panic_releases() {
    let lockstep = Lockstep::new((), 2);

    lockstep.run(3, |thread| move |_: &(), iteration| {
        assert!(thread == 0 || iteration < 1, "Boom");
    });
}

} // mod tests
