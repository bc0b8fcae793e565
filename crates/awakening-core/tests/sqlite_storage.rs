use awakening_core::storage::{
    EnrollmentFilter, NewProgram, Principal, ProgramFilter, ProgramId, ProtocolStore,
    SqliteStore,
};
use awakening_core::{ErrorCode, Protocol, TxContext};

fn ctx(caller: &str, height: u64) -> TxContext {
    TxContext::new(Principal::from(caller), height).expect("valid context")
}

#[test]
fn test_create_open_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("protocol.db");

    let store_id = SqliteStore::create(&path).expect("create should succeed");
    assert!(!store_id.is_nil());
    assert!(path.exists());

    let store = SqliteStore::open(&path).expect("open should succeed");
    let metadata = store.metadata().expect("metadata");
    assert_eq!(metadata.store_id, store_id);
    assert_eq!(store.program_counter().expect("counter"), ProgramId(0));
    store.check_database().expect("fresh store is valid");
}

#[test]
fn test_create_existing_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("protocol.db");

    SqliteStore::create(&path).expect("create should succeed");
    assert!(SqliteStore::create(&path).is_err());
}

#[test]
fn test_open_missing_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(SqliteStore::open(&dir.path().join("missing.db")).is_err());
}

#[test]
fn test_open_foreign_database_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("other.db");
    let conn = rusqlite::Connection::open(&path).expect("open sqlite");
    conn.execute_batch("CREATE TABLE unrelated (x INTEGER);")
        .expect("create table");
    drop(conn);

    assert!(SqliteStore::open(&path).is_err());
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("protocol.db");
    SqliteStore::create(&path).expect("create");

    {
        let mut protocol = Protocol::new(SqliteStore::open(&path).expect("open"));
        protocol
            .create_program(&ctx("guide1", 1000), &NewProgram::new("Mindful Awakening", 21, 3))
            .expect("create program");
        protocol.enroll(&ctx("user1", 1001), ProgramId(1)).expect("enroll");
        protocol
            .update_progress(&ctx("user1", 1500), ProgramId(1), 100)
            .expect("complete");
    }

    let mut protocol = Protocol::new(SqliteStore::open(&path).expect("reopen"));
    let id = protocol
        .create_program(&ctx("guide2", 1600), &NewProgram::new("Breathwork", 7, 1))
        .expect("create second program");
    assert_eq!(id, ProgramId(2));

    let enrollment = protocol
        .get_enrollment(&Principal::from("user1"), ProgramId(1))
        .expect("read")
        .expect("enrollment persisted");
    assert!(enrollment.completed);
    assert_eq!(enrollment.completion_date, 1500);

    let err = protocol
        .enroll(&ctx("user1", 1700), ProgramId(1))
        .expect_err("duplicate enrollment");
    assert_eq!(err.code(), Some(ErrorCode::AlreadyEnrolled));

    let by_guide = protocol
        .list_programs(&ProgramFilter::new().guide(Principal::from("guide2")))
        .expect("list");
    assert_eq!(by_guide.len(), 1);
    assert_eq!(by_guide[0].title, "Breathwork");

    let completed = protocol
        .list_enrollments(&EnrollmentFilter::new().completed(true))
        .expect("list");
    assert_eq!(completed.len(), 1);

    protocol.check_integrity().expect("consistent");
    protocol.store().check_database().expect("database valid");
}
