//! Concurrency and thread safety tests for document resolution

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use apimount::{
    DocumentCache, DocumentResolver, DocumentStore, InstanceConfig, KeySource, RegistryScanner,
    RequestContext, RouterPaths, ScanError, ScannedApi, Scanner, SharedDocument, SharedScan,
    derive_key,
};

const REGISTRY: &str = r#"
- package: com.example.fast
  path: /fast
  operations:
    - method: get
- package: com.example.slow
  path: /slow
  operations:
    - method: get
"#;

/// Registry scanner that counts scans and can hold one package back.
struct GatedScanner {
    inner: RegistryScanner,
    calls: AtomicUsize,
    delay: Duration,
    gated_package: Option<&'static str>,
    started: AtomicBool,
    released: AtomicBool,
}

impl GatedScanner {
    fn new(delay: Duration, gated_package: Option<&'static str>) -> Self {
        Self {
            inner: RegistryScanner::from_yaml(REGISTRY).unwrap(),
            calls: AtomicUsize::new(0),
            delay,
            gated_package,
            started: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }
}

impl Scanner for GatedScanner {
    fn scan(&self, resource_package: &str) -> Result<ScannedApi, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated_package == Some(resource_package) {
            self.started.store(true, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(5);
            while !self.released.load(Ordering::SeqCst) {
                assert!(Instant::now() < deadline, "gated scan was never released");
                thread::sleep(Duration::from_millis(5));
            }
        } else {
            thread::sleep(self.delay);
        }
        self.inner.scan(resource_package)
    }
}

fn resolver(
    package: &str,
    prefix: &str,
    scanner: Arc<GatedScanner>,
    cache: &Arc<DocumentCache<SharedScan>>,
    store: &Arc<DocumentStore<SharedDocument>>,
) -> Arc<DocumentResolver> {
    let config = InstanceConfig::new(package).with_uri_prefix(prefix);
    Arc::new(
        DocumentResolver::new(
            Arc::new(config),
            RouterPaths::new("/", "/api"),
            "api",
            Arc::clone(cache),
            Arc::clone(store),
        )
        .with_scanner(scanner),
    )
}

#[test]
fn concurrent_resolve_scans_once() {
    let scanner = Arc::new(GatedScanner::new(Duration::from_millis(50), None));
    let cache = Arc::new(DocumentCache::new());
    let store = Arc::new(DocumentStore::new());
    let resolver = resolver("com.example.fast", "/v1", scanner.clone(), &cache, &store);
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                resolver
                    .resolve(&RequestContext::default())
                    .expect("resolve should succeed")
                    .expect("document should exist")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(scanner.calls.load(Ordering::SeqCst), 1, "scan must run once");
    let first = &results[0];
    for (i, doc) in results.iter().enumerate().skip(1) {
        assert!(Arc::ptr_eq(first, doc), "Thread {i} saw a different document");
    }
    assert!(first.paths.contains_key("/fast"));
    assert_eq!(cache.initialized_len(), 1);
}

#[test]
fn scans_for_different_keys_do_not_block_each_other() {
    let scanner = Arc::new(GatedScanner::new(Duration::ZERO, Some("com.example.slow")));
    let cache = Arc::new(DocumentCache::new());
    let store = Arc::new(DocumentStore::new());
    let slow = resolver("com.example.slow", "/slow", scanner.clone(), &cache, &store);
    let fast = resolver("com.example.fast", "/fast", scanner.clone(), &cache, &store);

    let slow_handle = {
        let slow = Arc::clone(&slow);
        thread::spawn(move || slow.resolve(&RequestContext::default()))
    };

    while !scanner.started.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }

    // The slow scan is still in flight; the other key resolves regardless.
    let doc = fast.resolve(&RequestContext::default()).unwrap().unwrap();
    assert!(doc.paths.contains_key("/fast"));
    assert!(!scanner.released.load(Ordering::SeqCst));

    scanner.released.store(true, Ordering::SeqCst);
    let slow_doc = slow_handle.join().unwrap().unwrap().unwrap();
    assert!(slow_doc.paths.contains_key("/slow"));
    assert_eq!(scanner.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_cache_resolve_same_key() {
    let cache: Arc<DocumentCache<usize>> = Arc::new(DocumentCache::new());
    let key = derive_key(&KeySource {
        router_name: "api",
        scanner_id: Some("shared"),
        config_id: None,
        use_path_based_config: true,
        base_path: "/v1",
    });
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let calls = Arc::clone(&calls);
            thread::spawn(move || {
                cache.resolve(&key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(20));
                    Ok::<_, ()>(i)
                })
            })
        })
        .collect();

    let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(values.iter().all(|v| *v == values[0]));
}
