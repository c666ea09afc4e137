use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_utils::sync::WaitGroup;
use taskpool::{PoolConfig, PoolError, SharedQueueThreadPool, ThreadPool, WaitStrategy};

const STRATEGIES: [WaitStrategy; 2] = [WaitStrategy::Yield, WaitStrategy::Block];

fn build_pool(threads: usize, wait: WaitStrategy) -> SharedQueueThreadPool {
    SharedQueueThreadPool::with_config(PoolConfig::default().threads(threads).wait(wait)).unwrap()
}

fn wait_until(cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for pool");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn zero_threads_is_rejected() {
    assert!(matches!(
        SharedQueueThreadPool::new(0),
        Err(PoolError::InvalidThreadCount(0))
    ));
}

#[test]
fn nul_in_name_prefix_is_rejected() {
    let result = SharedQueueThreadPool::with_config(
        PoolConfig::default().threads(2).name_prefix("bad\0name"),
    );
    assert!(matches!(result, Err(PoolError::InvalidName(name)) if name == "bad\0name"));
}

#[test]
fn default_pool_has_at_least_one_worker() {
    let pool = SharedQueueThreadPool::new_default().unwrap();
    assert!(pool.threads() >= 1);
    assert_eq!(pool.pending(), 0);
}

#[test]
fn runs_every_submitted_job() {
    for wait in STRATEGIES {
        let pool = build_pool(4, wait);
        assert_eq!(pool.threads(), 4);

        let counter = Arc::new(AtomicUsize::new(0));
        let wg = WaitGroup::new();
        for _ in 0..100 {
            let counter = counter.clone();
            let wg = wg.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(wg);
            });
        }
        wg.wait();

        assert_eq!(pool.shutdown(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }
}

#[test]
fn single_worker_runs_jobs_in_submission_order() {
    for wait in STRATEGIES {
        let pool = build_pool(1, wait);
        let order = Arc::new(Mutex::new(Vec::new()));
        let wg = WaitGroup::new();
        for i in 0..100 {
            let order = order.clone();
            let wg = wg.clone();
            pool.submit(move || {
                order.lock().unwrap().push(i);
                drop(wg);
            });
        }
        wg.wait();

        assert_eq!(*order.lock().unwrap(), (0..100).collect::<Vec<_>>());
    }
}

#[test]
fn each_job_runs_exactly_once() {
    for wait in STRATEGIES {
        let pool = build_pool(4, wait);
        let runs: Arc<Vec<AtomicUsize>> =
            Arc::new((0..1000).map(|_| AtomicUsize::new(0)).collect());
        let wg = WaitGroup::new();
        for i in 0..1000 {
            let runs = runs.clone();
            let wg = wg.clone();
            pool.submit(move || {
                runs[i].fetch_add(1, Ordering::SeqCst);
                drop(wg);
            });
        }
        wg.wait();
        drop(pool);

        assert!(runs.iter().all(|r| r.load(Ordering::SeqCst) == 1));
    }
}

#[test]
fn concurrent_submitters() {
    const PRODUCERS: usize = 8;
    const JOBS: usize = 250;

    for wait in STRATEGIES {
        let pool = build_pool(4, wait);
        let counter = Arc::new(AtomicUsize::new(0));
        let wg = WaitGroup::new();

        thread::scope(|s| {
            for _ in 0..PRODUCERS {
                let pool = &pool;
                let counter = counter.clone();
                let wg = wg.clone();
                s.spawn(move || {
                    for _ in 0..JOBS {
                        let counter = counter.clone();
                        let wg = wg.clone();
                        pool.submit(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                            drop(wg);
                        });
                    }
                });
            }
        });
        wg.wait();

        assert_eq!(counter.load(Ordering::SeqCst), PRODUCERS * JOBS);
    }
}

#[test]
fn shutdown_waits_for_running_job() {
    for wait in STRATEGIES {
        let pool = build_pool(2, wait);
        let finished = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = mpsc::channel();
        {
            let finished = finished.clone();
            pool.submit(move || {
                started_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(200));
                finished.store(true, Ordering::SeqCst);
            });
        }
        started_rx.recv().unwrap();

        drop(pool);
        assert!(finished.load(Ordering::SeqCst));
    }
}

#[test]
fn queued_jobs_are_abandoned_on_shutdown() {
    for wait in STRATEGIES {
        let pool = build_pool(1, wait);
        let counter = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = mpsc::channel();
        pool.submit(move || {
            started_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(100));
        });
        started_rx.recv().unwrap();

        for _ in 0..50 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(pool.pending(), 50);

        assert_eq!(pool.shutdown(), 50);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn slow_jobs_may_be_abandoned() {
    let pool = build_pool(4, WaitStrategy::Yield);
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..50 {
        let counter = counter.clone();
        pool.submit(move || {
            thread::sleep(Duration::from_secs(1));
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    let abandoned = pool.shutdown();
    let ran = counter.load(Ordering::SeqCst);
    assert!(ran <= 4);
    assert_eq!(ran + abandoned, 50);
}

#[test]
fn panicking_jobs_do_not_shrink_the_pool() {
    for wait in STRATEGIES {
        let pool = build_pool(2, wait);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            pool.submit(|| panic!("job failed"));
        }
        for _ in 0..100 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        wait_until(|| counter.load(Ordering::SeqCst) == 100 && pool.panicked() == 10);

        // Both workers survived: two jobs can block on the barrier at once.
        let barrier = Arc::new(Barrier::new(3));
        for _ in 0..2 {
            let barrier = barrier.clone();
            pool.submit(move || {
                barrier.wait();
            });
        }
        barrier.wait();
        assert_eq!(pool.threads(), 2);
    }
}

#[test]
fn workers_are_named_after_prefix() {
    let pool = SharedQueueThreadPool::with_config(
        PoolConfig::default().threads(1).name_prefix("demo"),
    )
    .unwrap();
    let (tx, rx) = mpsc::channel();
    pool.submit(move || {
        let name = thread::current().name().map(str::to_owned);
        tx.send(name).unwrap();
    });

    assert_eq!(rx.recv().unwrap().as_deref(), Some("demo-0"));
}
