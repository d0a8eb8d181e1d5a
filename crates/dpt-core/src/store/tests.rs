//! Behavior tests for the provenance store (temp dirs via tempfile).

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use super::ProvenanceStore;

/// Short debounce for tests that only need the flush path to exist.
const SHORT_DELAY: Duration = Duration::from_millis(100);

fn downloads_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().join("downloads")
}

fn store_file(tmp: &TempDir) -> PathBuf {
    tmp.path().join("state").join("origins.txt")
}

fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(downloads_dir(&tmp)).unwrap();
    tmp
}

fn put_file(tmp: &TempDir, name: &str) {
    fs::write(downloads_dir(tmp).join(name), b"data").unwrap();
}

async fn open_store(tmp: &TempDir, delay: Duration) -> ProvenanceStore {
    let store = ProvenanceStore::open_at(downloads_dir(tmp), store_file(tmp), delay);
    store.wait_ready().await;
    store
}

#[tokio::test]
async fn add_records_origin_for_existing_file() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "report.pdf");
    assert_eq!(store.get_host("report.pdf").as_deref(), Some("example.com"));
    assert!(store.knows_file("report.pdf"));
}

#[tokio::test]
async fn add_ignores_file_missing_from_download_dir() {
    let tmp = setup();
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "phantom.pdf");
    assert!(!store.knows_file("phantom.pdf"));
    assert!(store.entries().is_empty());
}

#[tokio::test]
async fn add_ignores_empty_arguments() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("", "report.pdf");
    store.add("example.com", "");
    assert!(store.entries().is_empty());
}

#[tokio::test]
async fn add_keeps_first_origin() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "report.pdf");
    store.add("other.org", "report.pdf");
    assert_eq!(store.get_host("report.pdf").as_deref(), Some("example.com"));
}

#[tokio::test]
async fn remove_rejected_while_file_still_exists() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "report.pdf");
    store.remove("report.pdf");
    assert!(store.knows_file("report.pdf"));
}

#[tokio::test]
async fn remove_forgets_deleted_file() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "report.pdf");
    fs::remove_file(downloads_dir(&tmp).join("report.pdf")).unwrap();
    store.remove("report.pdf");
    assert!(!store.knows_file("report.pdf"));

    store.flush_now().await;
    assert_eq!(fs::read_to_string(store_file(&tmp)).unwrap(), "");
}

#[tokio::test]
async fn transfer_moves_entry_preserving_host() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.add("example.com", "report.pdf");
    store.transfer("report.pdf", "report-final.pdf");
    assert_eq!(
        store.get_host("report-final.pdf").as_deref(),
        Some("example.com")
    );
    assert_eq!(store.get_host("report.pdf"), None);
}

#[tokio::test]
async fn transfer_of_unknown_file_is_noop() {
    let tmp = setup();
    let store = open_store(&tmp, SHORT_DELAY).await;

    store.transfer("nothing.txt", "still-nothing.txt");
    assert!(store.entries().is_empty());
}

#[tokio::test]
async fn flush_now_persists_without_waiting_for_debounce() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");
    // A window far longer than the test: only flush_now can write here.
    let store = open_store(&tmp, Duration::from_secs(60)).await;

    store.add("example.com", "report.pdf");
    assert!(!store_file(&tmp).exists());
    store.flush_now().await;
    assert_eq!(
        fs::read_to_string(store_file(&tmp)).unwrap(),
        "report.pdf example.com\n"
    );
}

#[tokio::test]
async fn debounced_flush_coalesces_bursts() {
    let tmp = setup();
    for name in ["a.bin", "b.bin", "c.bin"] {
        put_file(&tmp, name);
    }
    let store = open_store(&tmp, Duration::from_millis(800)).await;

    store.add("a.example", "a.bin");
    tokio::time::sleep(Duration::from_millis(200)).await;
    store.add("b.example", "b.bin");
    tokio::time::sleep(Duration::from_millis(200)).await;
    store.add("c.example", "c.bin");

    // 400ms past the first mutation, but each one restarted the window:
    // nothing may have reached disk yet.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!store_file(&tmp).exists());

    // One quiet window later the final state lands in a single write.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(
        fs::read_to_string(store_file(&tmp)).unwrap(),
        "a.bin a.example\nb.bin b.example\nc.bin c.example\n"
    );
}

#[tokio::test]
async fn reconcile_prunes_entries_for_missing_files() {
    let tmp = setup();
    put_file(&tmp, "keep.iso");
    fs::create_dir_all(store_file(&tmp).parent().unwrap()).unwrap();
    fs::write(
        store_file(&tmp),
        "keep.iso cdn.example.com\ngone.iso cdn.example.com\n",
    )
    .unwrap();

    let store = open_store(&tmp, SHORT_DELAY).await;
    assert!(store.knows_file("keep.iso"));
    assert!(!store.knows_file("gone.iso"));

    // Pruning changed state, so a debounced flush rewrites the file.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        fs::read_to_string(store_file(&tmp)).unwrap(),
        "keep.iso cdn.example.com\n"
    );
}

#[tokio::test]
async fn reconcile_with_empty_download_dir_deletes_store_file() {
    let tmp = setup();
    fs::create_dir_all(store_file(&tmp).parent().unwrap()).unwrap();
    fs::write(store_file(&tmp), "report.pdf example.com\n").unwrap();

    let store = open_store(&tmp, SHORT_DELAY).await;
    assert!(store.entries().is_empty());
    assert!(!store_file(&tmp).exists());

    // No flush may sneak in afterwards and recreate the file.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!store_file(&tmp).exists());
}

#[tokio::test]
async fn reconcile_with_missing_download_dir_treated_as_empty() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(store_file(&tmp).parent().unwrap()).unwrap();
    fs::write(store_file(&tmp), "report.pdf example.com\n").unwrap();

    let store = ProvenanceStore::open_at(downloads_dir(&tmp), store_file(&tmp), SHORT_DELAY);
    store.wait_ready().await;
    assert!(store.entries().is_empty());
    assert!(!store_file(&tmp).exists());
}

#[tokio::test]
async fn cold_unchanged_store_writes_nothing() {
    let tmp = setup();
    put_file(&tmp, "report.pdf");

    let store = open_store(&tmp, SHORT_DELAY).await;
    assert!(store.entries().is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!store_file(&tmp).exists());
}

#[tokio::test]
async fn load_splits_at_last_space_and_skips_malformed_lines() {
    let tmp = setup();
    put_file(&tmp, "my report final.pdf");
    put_file(&tmp, "x.txt");
    fs::create_dir_all(store_file(&tmp).parent().unwrap()).unwrap();
    fs::write(
        store_file(&tmp),
        "my report final.pdf example.com\nnoseparator\nx.txt first.example\nx.txt second.example\n",
    )
    .unwrap();

    let store = open_store(&tmp, SHORT_DELAY).await;
    assert_eq!(
        store.get_host("my report final.pdf").as_deref(),
        Some("example.com")
    );
    // Duplicate keys in the file resolve to the last occurrence.
    assert_eq!(store.get_host("x.txt").as_deref(), Some("second.example"));
    assert!(!store.knows_file("noseparator"));
}
