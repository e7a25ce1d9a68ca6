use cortex_storage::StoragePool;

#[test]
fn opening_a_fresh_database_lands_on_latest_schema_version() {
    let pool = StoragePool::open_in_memory().unwrap();
    let version = pool
        .with_write(|conn| cortex_storage::migrations::current_version(conn))
        .unwrap();
    assert_eq!(version, cortex_storage::migrations::LATEST_VERSION);
}

#[test]
fn reopening_an_up_to_date_database_applies_no_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cortex.db");

    {
        let _pool = StoragePool::open(&db_path).unwrap();
    }
    let pool = StoragePool::open(&db_path).unwrap();
    let version = pool
        .with_write(|conn| cortex_storage::migrations::current_version(conn))
        .unwrap();
    assert_eq!(version, cortex_storage::migrations::LATEST_VERSION);
}
