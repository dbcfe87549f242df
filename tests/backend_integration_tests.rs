//! Integration Tests for Cache Backends
//!
//! Exercises the public API end to end: expiry over real time, persistence
//! of the file backend across instances, and backend selection from config.

use std::fs;
use std::sync::Arc;
use std::thread::{self, sleep};
use std::time::Duration;

use chrono::Utc;
use multicache::cache::DEFAULT_TTL_SECS;
use multicache::config::BackendKind;
use multicache::{Backend, CacheBackend, Config, FileCache, MemoryCache, NullCache};
use tempfile::TempDir;

// == Helper Functions ==

fn memory() -> MemoryCache<String> {
    MemoryCache::new(DEFAULT_TTL_SECS)
}

fn file_cache(dir: &TempDir) -> FileCache<String> {
    FileCache::open(dir.path(), DEFAULT_TTL_SECS).unwrap()
}

// == Contract Tests ==

#[test]
fn test_invalidate_after_put_misses() {
    let dir = TempDir::new().unwrap();
    let backends: Vec<Box<dyn CacheBackend<String>>> =
        vec![Box::new(memory()), Box::new(file_cache(&dir))];

    for cache in &backends {
        cache.put("resource", "body".to_string()).unwrap();
        assert_eq!(cache.get("resource").unwrap().as_deref(), Some("body"));

        cache.invalidate("resource").unwrap();
        assert_eq!(cache.get("resource").unwrap(), None);

        cache.invalidate("never_written").unwrap();
    }
}

#[test]
fn test_null_cache_disables_caching() {
    let cache: Box<dyn CacheBackend<String>> = Box::new(NullCache::<String>::new());

    assert_eq!(cache.get("k").unwrap(), None);
    cache.put("k", "v".to_string()).unwrap();
    assert_eq!(cache.get("k").unwrap(), None);
    cache.invalidate("k").unwrap();
}

#[test]
fn test_memory_listing() {
    let cache = memory();
    for i in 0..5 {
        cache.put(&format!("key{}", i), format!("value{}", i)).unwrap();
    }

    assert!(cache.list_keys().unwrap().contains(&"key3".to_string()));
    assert!(cache.list_values().unwrap().contains(&"value3".to_string()));
    assert_eq!(cache.sweep_expired().unwrap(), 0);
    assert_eq!(cache.len().unwrap(), 5);
}

// == Expiry Over Time ==

#[test]
fn test_ttl_two_seconds() {
    let dir = TempDir::new().unwrap();
    let memory = memory();
    let file = file_cache(&dir);

    memory.put_ttl("short", "value".to_string(), 2).unwrap();
    file.put_ttl("short", "value".to_string(), 2).unwrap();

    assert_eq!(memory.get("short").unwrap().as_deref(), Some("value"));
    assert_eq!(file.get("short").unwrap().as_deref(), Some("value"));

    sleep(Duration::from_millis(2100));

    assert_eq!(memory.get("short").unwrap(), None);
    assert_eq!(file.get("short").unwrap(), None);
}

#[test]
fn test_ttl_five_seconds_straddled() {
    let dir = TempDir::new().unwrap();
    let memory = memory();
    let file = file_cache(&dir);

    memory.put_ttl("five", "value".to_string(), 5).unwrap();
    file.put_ttl("five", "value".to_string(), 5).unwrap();

    sleep(Duration::from_secs(3));
    assert_eq!(memory.get("five").unwrap().as_deref(), Some("value"));
    assert_eq!(file.get("five").unwrap().as_deref(), Some("value"));

    sleep(Duration::from_secs(3));
    assert_eq!(memory.get("five").unwrap(), None);
    assert_eq!(file.get("five").unwrap(), None);
}

#[test]
fn test_explicit_expiry_is_honoured() {
    let cache = memory();
    let ex = Utc::now() + chrono::Duration::milliseconds(1500);

    // Explicit expiry wins over a long TTL
    cache.put_with("k", "v".to_string(), Some(ex), Some(3600)).unwrap();
    assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));

    sleep(Duration::from_millis(1600));
    assert_eq!(cache.get("k").unwrap(), None);
}

#[test]
fn test_sweep_then_get_misses() {
    let cache = memory();
    cache.put_ttl("stale", "a".to_string(), 1).unwrap();
    cache.put_ttl("fresh", "b".to_string(), 60).unwrap();

    sleep(Duration::from_millis(1100));

    assert_eq!(cache.sweep_expired().unwrap(), 1);
    assert_eq!(cache.list_keys().unwrap(), vec!["fresh".to_string()]);
    assert_eq!(cache.get("stale").unwrap(), None);
    assert_eq!(cache.get("fresh").unwrap().as_deref(), Some("b"));
}

// == File Persistence ==

#[test]
fn test_file_cache_persists_across_instances() {
    let dir = TempDir::new().unwrap();

    file_cache(&dir).put("resource", "body".to_string()).unwrap();

    let restarted = file_cache(&dir);
    assert_eq!(restarted.get("resource").unwrap().as_deref(), Some("body"));
}

#[test]
fn test_file_cache_creates_missing_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not").join("there").join("yet");
    assert!(!path.exists());

    let cache: FileCache<String> = FileCache::open(&path, DEFAULT_TTL_SECS).unwrap();
    cache.put("k", "v".to_string()).unwrap();

    let reopened: FileCache<String> = FileCache::open(&path, DEFAULT_TTL_SECS).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn test_file_cache_restart_then_expire_scenario() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh-cache");

    let first: FileCache<String> = FileCache::open(&path, DEFAULT_TTL_SECS).unwrap();
    first.put_ttl("a", "1".to_string(), 5).unwrap();

    let second: FileCache<String> = FileCache::open(&path, DEFAULT_TTL_SECS).unwrap();
    assert_eq!(second.get("a").unwrap().as_deref(), Some("1"));

    sleep(Duration::from_secs(6));

    assert_eq!(second.get("a").unwrap(), None);
    assert!(!second.path_for("a").exists(), "Stale file should be deleted on read");
}

#[test]
fn test_file_cache_overwrite_replaces_file() {
    let dir = TempDir::new().unwrap();
    let cache = file_cache(&dir);

    cache.put("k", "first".to_string()).unwrap();
    cache.put("k", "second".to_string()).unwrap();

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
    assert_eq!(file_cache(&dir).get("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn test_file_cache_structured_values() {
    let dir = TempDir::new().unwrap();
    let cache: FileCache<Vec<(String, u32)>> = FileCache::open(dir.path(), 60).unwrap();
    let value = vec![("a".to_string(), 1), ("b".to_string(), 2)];

    cache.put("list", value.clone()).unwrap();

    let reopened: FileCache<Vec<(String, u32)>> = FileCache::open(dir.path(), 60).unwrap();
    assert_eq!(reopened.get("list").unwrap(), Some(value));
}

// == Concurrency ==

// get is not linearizable with respect to concurrent put/invalidate: a reader
// may observe either side of a racing write, but never a torn entry.
#[test]
fn test_concurrent_writers_and_readers_on_shared_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let path = path.clone();
            thread::spawn(move || {
                let cache: FileCache<String> = FileCache::open(&path, 60).unwrap();
                for i in 0..25 {
                    cache.put("shared", format!("{}-{}", t, i)).unwrap();
                    if let Some(seen) = cache.get("shared").unwrap() {
                        assert!(seen.contains('-'));
                    }
                    if i % 5 == 0 {
                        cache.invalidate("shared").unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_memory_cache_shared_between_threads() {
    let cache = Arc::new(memory());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..50 {
                    cache.put(&format!("{}:{}", t, i), i.to_string()).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(cache.list_keys().unwrap().len(), 200);
}

// == Configuration ==

#[test]
fn test_backend_from_config() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        backend: BackendKind::File,
        path: dir.path().join("configured"),
        default_ttl: 120,
        ..Config::default()
    };

    let cache: Backend<String> = Backend::from_config(&config).unwrap();
    cache.put("k", "v".to_string()).unwrap();

    let direct: FileCache<String> = FileCache::open(&config.path, 120).unwrap();
    assert_eq!(direct.get("k").unwrap().as_deref(), Some("v"));
}
