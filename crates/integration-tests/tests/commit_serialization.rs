//! Multi-threaded serialization guarantees of `CustomerService`.
//!
//! Mutations across all customers share one write lock, so two threads
//! saving unrelated customers must never have their commits in flight at
//! the same time. A probing provider wrapper watches for overlap.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use reef_commerce::store::memory::MemoryStore;
use reef_commerce::store::{
    AnonymousCustomerRepository, CustomerRepository, StoreError, UnitOfWork, UnitOfWorkProvider,
};
use reef_commerce::{Customer, CustomerService};
use reef_integration_tests::init_tracing;

/// Watches commit entry/exit for overlap between sessions.
#[derive(Default)]
struct CommitProbe {
    in_commit: AtomicBool,
    overlapped: AtomicBool,
    commits: AtomicUsize,
}

/// Provider wrapper that routes every session's commit through the probe.
struct ProbingProvider {
    inner: MemoryStore,
    probe: Arc<CommitProbe>,
}

impl UnitOfWorkProvider for ProbingProvider {
    fn unit_of_work(&self) -> Result<Box<dyn UnitOfWork + '_>, StoreError> {
        Ok(Box::new(ProbingUnitOfWork {
            inner: self.inner.unit_of_work()?,
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct ProbingUnitOfWork<'a> {
    inner: Box<dyn UnitOfWork + 'a>,
    probe: Arc<CommitProbe>,
}

impl UnitOfWork for ProbingUnitOfWork<'_> {
    fn customers(&mut self) -> &mut dyn CustomerRepository {
        self.inner.customers()
    }

    fn anonymous_customers(&mut self) -> &mut dyn AnonymousCustomerRepository {
        self.inner.anonymous_customers()
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { inner, probe } = *self;
        if probe.in_commit.swap(true, Ordering::SeqCst) {
            probe.overlapped.store(true, Ordering::SeqCst);
        }
        // Widen the window so an unserialized commit would be caught.
        thread::sleep(Duration::from_millis(2));
        let result = inner.commit();
        probe.in_commit.store(false, Ordering::SeqCst);
        probe.commits.fetch_add(1, Ordering::SeqCst);
        result
    }
}

#[test]
fn test_concurrent_saves_never_interleave_commits() {
    init_tracing();

    const THREADS: usize = 4;
    const ROUNDS: usize = 25;

    let probe = Arc::new(CommitProbe::default());
    let provider = ProbingProvider {
        inner: MemoryStore::new(),
        probe: Arc::clone(&probe),
    };
    let service = Arc::new(CustomerService::new(Arc::new(provider)));

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut customer = Customer::new(&format!("Thread{i}"), "Worker", None, None);
                barrier.wait();
                for round in 0..ROUNDS {
                    customer.last_name = format!("Worker{round}");
                    service.save(&customer, false).expect("Failed to save");
                }
                customer.key()
            })
        })
        .collect();

    let keys: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Worker thread panicked"))
        .collect();

    assert!(
        !probe.overlapped.load(Ordering::SeqCst),
        "two commits were in flight at once"
    );
    assert_eq!(probe.commits.load(Ordering::SeqCst), THREADS * ROUNDS);

    // Every thread's customer survived with its final update.
    for key in keys {
        let customer = service
            .get_by_key(key)
            .expect("Failed to read back")
            .expect("Customer missing after concurrent saves");
        assert_eq!(customer.last_name, format!("Worker{}", ROUNDS - 1));
    }
}

#[test]
fn test_reads_do_not_require_the_mutation_lock() {
    init_tracing();

    let store = MemoryStore::new();
    let service = Arc::new(CustomerService::new(Arc::new(store)));

    let customer = service
        .create_customer_with_key("Pat", "Smith", None, None)
        .expect("Failed to create");

    // Reads from many threads at once, no writers involved: all succeed.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let key = customer.key();
            thread::spawn(move || {
                for _ in 0..50 {
                    let found = service.get_by_key(key).expect("Failed to read");
                    assert!(found.is_some());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Reader thread panicked");
    }
}
