use super::*;

fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
    FileTokenStore::new(dir.path().join("nested").join("token"))
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(store_in(&dir).load().unwrap(), None);
}

#[test]
fn save_creates_parent_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.save("abc123").unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load().unwrap(), Some("abc123".to_owned()));
}

#[test]
fn save_replaces_previous_token() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.save("first").unwrap();
    store.save("second").unwrap();
    assert_eq!(store.load().unwrap(), Some("second".to_owned()));
}

#[test]
fn clear_removes_token_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.save("abc123").unwrap();
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn whitespace_only_file_is_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "  \n").unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn trailing_newline_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "abc123\n").unwrap();
    assert_eq!(store.load().unwrap(), Some("abc123".to_owned()));
}

#[cfg(unix)]
#[test]
fn saved_token_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.save("abc123").unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn save_tightens_existing_world_readable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "old-token-with-more-bytes").unwrap();
    std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

    store.save("abc123").unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "abc123");
}

#[test]
fn default_path_ends_with_token_file() {
    let path = default_token_path();
    assert!(path.ends_with(".mnstack/token"));
}
