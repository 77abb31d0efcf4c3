use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream;
use sha2::{Digest, Sha256};

use scribeway::infrastructure::storage::{SpoolGuard, UploadError, UploadSpool};

fn spool_in(dir: &tempfile::TempDir, max_bytes: u64) -> UploadSpool {
    UploadSpool::new(dir.path().to_path_buf(), max_bytes, 4).unwrap()
}

fn files_in(dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

#[tokio::test]
async fn given_stream_within_ceiling_when_spooling_then_writes_file_with_size_and_digest() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 1024);
    let chunks: Vec<Result<Bytes, io::Error>> =
        vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];

    let spooled = spool
        .spool("meeting.wav", stream::iter(chunks))
        .await
        .unwrap();

    assert_eq!(spooled.size_bytes, 11);
    assert_eq!(std::fs::read(&spooled.path).unwrap(), b"hello world");
    assert_eq!(
        spooled.sha256,
        format!("{:x}", Sha256::digest(b"hello world"))
    );
    assert!(
        spooled
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_meeting.wav"))
    );
}

#[tokio::test]
async fn given_stream_crossing_ceiling_when_spooling_then_fails_and_leaves_no_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 10);
    let chunks: Vec<Result<Bytes, io::Error>> =
        vec![Ok(Bytes::from("0123456789")), Ok(Bytes::from("x"))];

    let result = spool.spool("big.wav", stream::iter(chunks)).await;

    assert!(matches!(result, Err(UploadError::TooLarge { .. })));
    assert_eq!(files_in(&dir), 0);
}

#[tokio::test]
async fn given_stream_exactly_at_ceiling_when_spooling_then_accepts() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 10);
    let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from("0123456789"))];

    let spooled = spool.spool("edge.wav", stream::iter(chunks)).await.unwrap();

    assert_eq!(spooled.size_bytes, 10);
}

#[tokio::test]
async fn given_broken_stream_when_spooling_then_fails_and_leaves_no_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 1024);
    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
    ];

    let result = spool.spool("clip.wav", stream::iter(chunks)).await;

    assert!(matches!(result, Err(UploadError::Stream(_))));
    assert_eq!(files_in(&dir), 0);
}

#[tokio::test]
async fn given_hostile_filename_when_spooling_then_stays_inside_spool_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 1024);
    let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from("abc"))];

    let spooled = spool
        .spool("../../etc/passwd", stream::iter(chunks))
        .await
        .unwrap();

    assert_eq!(spooled.path.parent(), Some(dir.path()));
}

#[tokio::test]
async fn given_spooled_file_when_discarding_twice_then_second_is_silent() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = spool_in(&dir, 1024);
    let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from("abc"))];
    let spooled = spool.spool("a.wav", stream::iter(chunks)).await.unwrap();

    spool.discard(&spooled.path).await;
    spool.discard(&spooled.path).await;

    assert!(!spooled.path.exists());
}

#[tokio::test]
async fn given_guarded_upload_when_owning_task_is_aborted_then_file_is_removed() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = Arc::new(spool_in(&dir, 1024));
    let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from("abc"))];
    let spooled = spool.spool("a.wav", stream::iter(chunks)).await.unwrap();
    let guard = SpoolGuard::new(Arc::clone(&spool), spooled.path.clone());

    let holder = tokio::spawn(async move {
        let _guard = guard;
        std::future::pending::<()>().await;
    });
    tokio::task::yield_now().await;
    holder.abort();
    let _ = holder.await;

    for _ in 0..50 {
        if files_in(&dir) == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(files_in(&dir), 0);
}

#[test]
fn given_guard_dropped_outside_runtime_when_dropping_then_file_is_removed() {
    let dir = tempfile::TempDir::new().unwrap();
    let spool = Arc::new(spool_in(&dir, 1024));
    let path = dir.path().join("orphan.wav");
    std::fs::write(&path, b"abc").unwrap();

    drop(SpoolGuard::new(spool, path.clone()));

    assert!(!path.exists());
}
