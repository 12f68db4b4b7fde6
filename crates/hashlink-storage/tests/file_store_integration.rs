use std::sync::Arc;

use hashlink_storage::{FileStore, InMemoryStore, ShortCode, Store, StoreError};
use tempfile::TempDir;

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("hashlink.json")
    }

    async fn open(&self) -> FileStore {
        FileStore::open_path(self.path()).await.expect("open store")
    }
}

#[tokio::test]
async fn snapshot_survives_restart() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.path(),
        r#"{"version":"v1","items":{"abc1234567":"https://example.com"}}"#,
    )
    .unwrap();

    let store = fixture.open().await;
    assert_eq!(
        store.get(&code("abc1234567")).await.unwrap(),
        "https://example.com"
    );
}

#[tokio::test]
async fn mutations_are_visible_to_a_fresh_instance() {
    let fixture = Fixture::new();

    {
        let store = fixture.open().await;
        store.add(&code("aaaaaaaaaa"), "https://a.com").await.unwrap();
        store.add(&code("bbbbbbbbbb"), "https://b.com").await.unwrap();
        store.remove(&code("aaaaaaaaaa")).await.unwrap();
    }

    let reopened = fixture.open().await;
    assert!(matches!(
        reopened.get(&code("aaaaaaaaaa")).await,
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(
        reopened.get(&code("bbbbbbbbbb")).await.unwrap(),
        "https://b.com"
    );
}

#[tokio::test]
async fn concurrent_adds_lose_no_updates() {
    const N: usize = 64;

    let fixture = Fixture::new();
    let store = Arc::new(fixture.open().await);

    let handles: Vec<_> = (0..N)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .add(&code(&format!("code{i:06}")), &format!("https://example{i}.com"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), N);
    for i in 0..N {
        assert_eq!(
            snapshot.items.get(&format!("code{i:06}")).map(String::as_str),
            Some(format!("https://example{i}.com").as_str())
        );
    }
}

#[tokio::test]
async fn instances_sharing_a_file_share_the_writer() {
    const N: usize = 32;

    let fixture = Fixture::new();
    let first = Arc::new(fixture.open().await);
    let second = Arc::new(fixture.open().await);

    let handles: Vec<_> = (0..N)
        .map(|i| {
            let store = if i % 2 == 0 {
                Arc::clone(&first)
            } else {
                Arc::clone(&second)
            };
            tokio::spawn(async move {
                store
                    .add(&code(&format!("code{i:06}")), "https://example.com")
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(first.snapshot().await.unwrap().len(), N);
}

#[tokio::test]
async fn concurrent_adds_of_one_code_admit_a_single_winner() {
    let fixture = Fixture::new();
    let store = Arc::new(fixture.open().await);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .add(&code("contested0"), &format!("https://example{i}.com"))
                    .await
            })
        })
        .collect();

    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(conflicts, 7);
    assert_eq!(store.snapshot().await.unwrap().len(), 1);
}

/// An instance that opens a missing file while another one is already
/// writing to it must not replace the committed snapshot with an empty one.
#[tokio::test]
async fn opening_a_missing_file_never_replaces_a_committed_add() {
    const ROUNDS: usize = 200;

    let fixture = Fixture::new();
    for round in 0..ROUNDS {
        let path = fixture.dir.path().join(format!("round{round}.json"));

        let writer = tokio::spawn({
            let path = path.clone();
            async move {
                let store = FileStore::open_path(path).await.unwrap();
                store.add(&code("aaaaaaaaaa"), "https://a.com").await
            }
        });
        let opener = tokio::spawn({
            let path = path.clone();
            async move {
                tokio::task::yield_now().await;
                FileStore::open_path(path).await.map(drop)
            }
        });

        writer.await.unwrap().unwrap();
        opener.await.unwrap().unwrap();

        let reopened = FileStore::open_path(&path).await.unwrap();
        assert_eq!(
            reopened.get(&code("aaaaaaaaaa")).await.unwrap(),
            "https://a.com",
            "round {round}"
        );
    }
}

/// Both variants honour the same contract when used through the trait.
#[tokio::test]
async fn variants_share_the_contract() {
    let fixture = Fixture::new();
    let stores: Vec<Arc<dyn Store>> = vec![
        Arc::new(InMemoryStore::new()),
        Arc::new(fixture.open().await),
    ];

    for store in stores {
        let c = code("abc1234567");

        store.add(&c, "https://example.com").await.unwrap();
        assert_eq!(store.get(&c).await.unwrap(), "https://example.com");

        assert!(matches!(
            store.add(&c, "https://other.com").await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.get(&c).await.unwrap(), "https://example.com");

        store.remove(&c).await.unwrap();
        assert!(matches!(store.get(&c).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.remove(&c).await, Err(StoreError::NotFound(_))));
    }
}
