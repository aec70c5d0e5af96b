//! # comprehensive store tests
//!
//! why: verify all error log store scenarios work correctly
//! relations: tests errlog-store crate, with summaries from errlog-core
//! what: persist/list/get round trips, lazy reads, stray files, concurrency, restarts

use std::fs;
use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use errlog_core::{resolve, DomainError, ErrorSummary, SteppingClock, RECORD_ID_WIDTH};
use errlog_store::{FileLogStore, InMemoryLogStore, LogStore, StoreConfig, StoreError};
use tempfile::tempdir;

fn stepping_clock() -> Arc<SteppingClock> {
    let start = Utc.with_ymd_and_hms(2024, 10, 5, 19, 40, 0).unwrap();
    Arc::new(SteppingClock::new(start, 1))
}

// =============================================================================
// SECTION 1: PERSIST
// =============================================================================

mod persist {
    use super::*;

    #[test]
    fn disk_full_scenario() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());

        let summary = resolve(anyhow::anyhow!("disk full"));
        let summary = store.persist(summary).unwrap();
        let id = summary.log_file_name().unwrap();

        assert_eq!(id.len(), RECORD_ID_WIDTH);
        assert!(id.bytes().all(|b| b.is_ascii_digit()));

        let listed = store.list().unwrap();
        assert_eq!(listed[0].record_id().to_string(), id);

        let handle = store.get(&id).unwrap();
        assert_eq!(handle.abstract_info().unwrap(), "disk full");
    }

    #[test]
    fn summary_without_cause_is_rejected() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());

        let err = store.persist(ErrorSummary::new("orphan", None)).unwrap_err();
        assert!(matches!(err, StoreError::InvariantViolation { .. }));
        // nothing was written, not even the directory
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn abstract_is_cause_message_not_summary_message() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());

        let err = anyhow::Error::new(DomainError::new("datasource mysql1 unreachable"))
            .context("running sync task");
        let summary = store.persist(resolve(err)).unwrap();
        assert_eq!(summary.message(), "datasource mysql1 unreachable");

        let handle = store.get(&summary.log_file_name().unwrap()).unwrap();
        assert_eq!(handle.abstract_info().unwrap(), "running sync task");
        let detail = handle.detail().unwrap();
        assert!(detail.contains("Caused by:"));
        assert!(detail.contains("datasource mysql1 unreachable"));
    }

    #[test]
    fn persisted_summary_keeps_abstract_info_setter_local() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());

        let mut summary = store.persist(resolve(anyhow::anyhow!("disk full"))).unwrap();
        summary.set_abstract_info("edited later");

        let handle = store.get(&summary.log_file_name().unwrap()).unwrap();
        assert_eq!(handle.abstract_info().unwrap(), "disk full");
        assert_eq!(summary.abstract_info(), Some("edited later"));
    }

    #[test]
    fn record_directory_from_config() {
        let root = tempdir().unwrap();
        let config = StoreConfig::new(root.path());
        let store = FileLogStore::from_config(&config);

        store.capture(anyhow::anyhow!("first")).unwrap();
        assert!(root.path().join("syserrs").is_dir());
        assert_eq!(store.dir(), config.error_dir());
    }

    #[test]
    fn persist_failure_is_surfaced() {
        let root = tempdir().unwrap();
        // a file where the directory should go
        let blocker = root.path().join("syserrs");
        fs::write(&blocker, b"not a directory").unwrap();
        let store = FileLogStore::new(&blocker);

        let err = store.capture(anyhow::anyhow!("lost")).unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));
    }
}

// =============================================================================
// SECTION 2: LIST
// =============================================================================

mod list {
    use super::*;

    #[test]
    fn newest_first() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        for msg in ["one", "two", "three"] {
            store.capture(anyhow::anyhow!(msg)).unwrap();
        }

        let listed = store.list().unwrap();
        let ids: Vec<u64> = listed.iter().map(|h| h.record_id().as_u64()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(listed[0].abstract_info().unwrap(), "three");
    }

    #[test]
    fn listing_does_not_read_content() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        store.capture(anyhow::anyhow!("one")).unwrap();
        store.capture(anyhow::anyhow!("two")).unwrap();

        let listed = store.list().unwrap();
        assert!(listed.iter().all(|h| !h.is_loaded()));
    }

    #[test]
    fn stray_files_are_skipped() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        store.capture(anyhow::anyhow!("real")).unwrap();

        fs::write(dir.path().join("README"), b"hello").unwrap();
        fs::write(dir.path().join("2024100519400000"), b"{}").unwrap();
        fs::write(dir.path().join("20241005194000000.bak"), b"{}").unwrap();
        fs::write(dir.path().join(".tmpAbC123"), b"").unwrap();
        fs::create_dir(dir.path().join("99999999999999999")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].abstract_info().unwrap(), "real");
    }

    #[test]
    fn every_listed_id_is_fetchable() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        for i in 0..5 {
            store.capture(anyhow::anyhow!("failure {i}")).unwrap();
        }

        for listed in store.list().unwrap() {
            let handle = store.get(&listed.record_id().to_string()).unwrap();
            assert!(handle.abstract_info().unwrap().starts_with("failure "));
            assert!(handle.create_time().is_ok());
        }
    }

    #[test]
    fn corrupt_record_is_listed_but_fails_on_read() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        fs::write(dir.path().join("20241005194000999"), b"{ truncated").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(matches!(
            listed[0].detail(),
            Err(StoreError::CorruptRecord { .. })
        ));
    }
}

// =============================================================================
// SECTION 3: GET AND LAZY HANDLES
// =============================================================================

mod get {
    use super::*;

    #[test]
    fn unknown_id_fails_only_on_read() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());

        let handle = store.get("20200723185600000").unwrap();
        assert!(matches!(handle.detail(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn empty_id_is_invalid() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());
        assert!(matches!(
            store.get(""),
            Err(StoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn path_like_id_is_invalid() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());
        assert!(matches!(
            store.get("../secrets"),
            Err(StoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn short_id_gets_handle_but_no_create_time() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::new(dir.path());

        let handle = store.get("42").unwrap();
        assert!(matches!(
            handle.create_time(),
            Err(StoreError::MalformedId(_))
        ));
    }

    #[test]
    fn create_time_matches_clock() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        store.capture(anyhow::anyhow!("x")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(
            listed[0].create_time().unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 5, 19, 40, 0).unwrap()
        );
    }

    #[test]
    fn handle_survives_file_removal_after_first_read() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        let summary = store.capture(anyhow::anyhow!("gone soon")).unwrap();
        let name = summary.log_file_name().unwrap();

        let handle = store.get(&name).unwrap();
        assert_eq!(handle.abstract_info().unwrap(), "gone soon");

        fs::remove_file(dir.path().join(&name)).unwrap();
        assert!(handle.detail().unwrap().starts_with("gone soon"));
        assert!(matches!(
            store.get(&name).unwrap().detail(),
            Err(StoreError::NotFound { .. })
        ));
    }
}

// =============================================================================
// SECTION 4: CONCURRENCY
// =============================================================================

mod concurrency {
    use super::*;

    #[test]
    fn concurrent_first_persists_create_directory_once() {
        let root = tempdir().unwrap();
        let dir = root.path().join("logs").join("syserrs");
        let store = Arc::new(FileLogStore::with_clock(&dir, stepping_clock()));

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.capture(anyhow::anyhow!("worker {i}")))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }

        assert_eq!(store.list().unwrap().len(), 8);
    }

    #[test]
    fn shared_handle_reads_consistently() {
        let dir = tempdir().unwrap();
        let store = FileLogStore::with_clock(dir.path(), stepping_clock());
        let summary = store.capture(anyhow::anyhow!("shared")).unwrap();
        let handle = Arc::new(store.get(&summary.log_file_name().unwrap()).unwrap());

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || handle.abstract_info().unwrap().to_owned())
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), "shared");
        }
        assert!(handle.is_loaded());
    }
}

// =============================================================================
// SECTION 5: RESTART AND PARITY
// =============================================================================

mod restart {
    use super::*;

    #[test]
    fn records_survive_restart() {
        let dir = tempdir().unwrap();

        // first "session"
        let id = {
            let store = FileLogStore::with_clock(dir.path(), stepping_clock());
            let summary = store.capture(anyhow::anyhow!("before restart")).unwrap();
            summary.log_file_name().unwrap()
        };

        // "restart" - new store instance
        {
            let store = FileLogStore::new(dir.path());
            let listed = store.list().unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].record_id().to_string(), id);
            assert_eq!(listed[0].abstract_info().unwrap(), "before restart");
        }
    }

    #[test]
    fn memory_and_file_stores_agree() {
        let dir = tempdir().unwrap();
        let stores: Vec<Box<dyn LogStore>> = vec![
            Box::new(FileLogStore::with_clock(dir.path(), stepping_clock())),
            Box::new(InMemoryLogStore::with_clock(stepping_clock())),
        ];

        for store in &stores {
            let summary = store
                .capture(anyhow::Error::new(DomainError::new("user facing")))
                .unwrap();
            assert_eq!(summary.message(), "user facing");

            let handle = store.get(&summary.log_file_name().unwrap()).unwrap();
            assert_eq!(handle.abstract_info().unwrap(), "user facing");
            assert!(handle.detail().unwrap().starts_with("user facing"));
        }
    }
}
