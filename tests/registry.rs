use dashmap::DashMap;
use memdocdb::{DatabaseHandle, Invocation, Registry, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, OnceLock, Weak};
use std::thread;

/// Construction counts per database name, shared by every test in this file.
/// Each test uses its own names so counts never mix.
fn constructions() -> &'static DashMap<String, AtomicUsize> {
    static COUNTS: OnceLock<DashMap<String, AtomicUsize>> = OnceLock::new();
    COUNTS.get_or_init(DashMap::new)
}

fn construction_count(name: &str) -> usize {
    constructions()
        .get(name)
        .map(|count| count.load(Ordering::SeqCst))
        .unwrap_or(0)
}

#[derive(Debug)]
struct CountingDatabase {
    name: String,
    registry: Weak<Registry<CountingDatabase>>,
}

impl DatabaseHandle for CountingDatabase {
    fn open(registry: Weak<Registry<Self>>, name: &str) -> Self {
        constructions()
            .entry(name.to_string())
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::SeqCst);
        Self {
            name: name.to_string(),
            registry,
        }
    }
}

#[test]
fn concurrent_first_access_constructs_once() {
    const THREADS: usize = 16;

    let registry: Arc<Registry<CountingDatabase>> = Registry::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get_database("shared").unwrap()
            })
        })
        .collect();

    let results: Vec<Arc<CountingDatabase>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(construction_count("shared"), 1);
    assert_eq!(registry.database_names(), vec!["shared"]);
    for db in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], db));
    }
}

#[test]
fn concurrent_mixed_access_paths_agree() {
    const THREADS: usize = 12;

    let registry: Arc<Registry<CountingDatabase>> = Registry::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match i % 3 {
                    0 => registry.get_database("mixed_path").unwrap(),
                    1 => registry.database("mixed_path").unwrap(),
                    _ => registry
                        .invoke("mixed_path", &[])
                        .unwrap()
                        .into_database()
                        .unwrap(),
                }
            })
        })
        .collect();

    let results: Vec<Arc<CountingDatabase>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(construction_count("mixed_path"), 1);
    assert!(results.iter().all(|db| Arc::ptr_eq(&results[0], db)));
}

#[test]
fn listing_while_creating_sees_only_complete_entries() {
    let registry: Arc<Registry<CountingDatabase>> = Registry::new();

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..200 {
                registry.get_database(&format!("listing_{:03}", i)).unwrap();
            }
        })
    };

    for _ in 0..50 {
        for name in registry.database_names() {
            let db = registry.get_database(&name).unwrap();
            assert_eq!(db.name, name);
        }
    }
    writer.join().unwrap();

    let names = registry.database_names();
    assert_eq!(names.len(), 200);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.iter().all(|n| construction_count(n) == 1));
}

#[test]
fn handles_point_back_at_their_registry() {
    let registry: Arc<Registry<CountingDatabase>> = Registry::new();
    let db = registry.get_database("backref").unwrap();

    let owner = db.registry.upgrade().unwrap();
    assert!(Arc::ptr_eq(&owner, &registry));
}

#[test]
fn dynamic_access_reuses_existing_entry() {
    let registry: Arc<Registry<CountingDatabase>> = Registry::new();
    let direct = registry.get_database("inventory_dyn").unwrap();

    let dynamic = match registry.invoke("inventory_dyn", &["unused"]).unwrap() {
        Invocation::Database(db) => db,
        _ => panic!("expected a database handle"),
    };

    assert!(Arc::ptr_eq(&direct, &dynamic));
    assert_eq!(construction_count("inventory_dyn"), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn empty_name_never_reaches_the_constructor() {
    let registry: Arc<Registry<CountingDatabase>> = Registry::new();

    let err = registry.get_database("").unwrap_err();
    assert_eq!(err.kind(), "invalid_argument");
    assert!(matches!(
        registry.invoke("get_database", &[]),
        Err(RegistryError::InvalidArgument { .. })
    ));

    assert_eq!(construction_count(""), 0);
    assert!(registry.is_empty());
}

#[test]
fn public_methods_never_become_databases() {
    // Every public method on `Registry`, lifecycle included
    const PUBLIC_METHODS: &[&str] = &[
        "new",
        "with_config",
        "database_names",
        "get_database",
        "get_master",
        "default_database_name",
        "get_default_database",
        "contains",
        "len",
        "is_empty",
        "created_at",
        "summary",
        "database",
        "invoke",
    ];

    let registry: Arc<Registry<CountingDatabase>> = Registry::new();

    for method in PUBLIC_METHODS {
        assert!(memdocdb::registry::is_defined_operation(method), "{}", method);
        let created = registry
            .invoke(method, &[])
            .map(|invocation| invocation.into_database().is_some())
            .unwrap_or(false);
        assert!(!created, "{} resolved to a database", method);
        assert_eq!(construction_count(method), 0, "{}", method);
    }

    assert!(registry.is_empty());
}

#[test]
fn separate_registries_construct_separately() {
    let first: Arc<Registry<CountingDatabase>> = Registry::new();
    let second: Arc<Registry<CountingDatabase>> = Registry::new();

    let a = first.get_database("isolated").unwrap();
    let b = second.get_database("isolated").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(construction_count("isolated"), 2);
}
