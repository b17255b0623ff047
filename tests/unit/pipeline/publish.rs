use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "mediaseed_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn leftover_temps(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count()
}

#[test]
fn creates_parent_dirs_and_writes_bytes() {
    let root = temp_dir("publish_create");
    let path = root.join("images").join("a1.bmp");

    assert_eq!(publish_new(&path, b"hello").unwrap(), PublishOutcome::Created);
    assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    assert_eq!(leftover_temps(path.parent().unwrap()), 0);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn never_replaces_an_existing_file() {
    let root = temp_dir("publish_existing");
    let path = root.join("v1.wav");

    publish_new(&path, b"first").unwrap();
    assert_eq!(
        publish_new(&path, b"second").unwrap(),
        PublishOutcome::AlreadyExists
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"first");
    assert_eq!(leftover_temps(&root), 0);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn racing_writers_publish_exactly_once() {
    let root = temp_dir("publish_race");
    let path = root.join("race.bmp");
    std::fs::create_dir_all(&root).unwrap();

    let outcomes: Vec<PublishOutcome> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let path = path.clone();
                s.spawn(move || publish_new(&path, &[i; 64]).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let created = outcomes
        .iter()
        .filter(|o| **o == PublishOutcome::Created)
        .count();
    assert_eq!(created, 1);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 64);
    assert!(bytes.iter().all(|b| *b == bytes[0]));
    assert_eq!(leftover_temps(&root), 0);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn unwritable_parent_is_an_io_failure() {
    let root = temp_dir("publish_blocked");
    std::fs::create_dir_all(&root).unwrap();
    let blocker = root.join("images");
    std::fs::write(&blocker, b"not a dir").unwrap();

    let err = publish_new(&blocker.join("a1.bmp"), b"x").unwrap_err();
    assert!(matches!(err, MediaError::IoFailure { .. }));

    std::fs::remove_dir_all(&root).ok();
}

fn age(path: &Path, secs: u64) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn temp_names_match_the_publish_pattern() {
    assert!(is_temp_name(".a1.bmp.1234.0.tmp"));
    assert!(is_temp_name(".v.1.99.tmp"));
    assert!(!is_temp_name("a1.bmp.1234.0.tmp"));
    assert!(!is_temp_name(".a1.bmp.tmp"));
    assert!(!is_temp_name(".a1.bmp.x.0.tmp"));
    assert!(!is_temp_name("..1.2.tmp"));
    assert!(!is_temp_name(".a1.bmp.1.2"));
}

#[test]
fn sweep_removes_only_old_temp_files() {
    let root = temp_dir("publish_sweep");
    std::fs::create_dir_all(&root).unwrap();
    let old_tmp = root.join(".a1.bmp.77.3.tmp");
    let fresh_tmp = root.join(".a2.bmp.77.4.tmp");
    let old_asset = root.join("a3.bmp");
    for p in [&old_tmp, &fresh_tmp, &old_asset] {
        std::fs::write(p, b"x").unwrap();
    }
    age(&old_tmp, 3_600);
    age(&old_asset, 3_600);

    assert_eq!(sweep_stale_temps(&root, STALE_TEMP_AGE).unwrap(), 1);
    assert!(!old_tmp.exists());
    assert!(fresh_tmp.exists());
    assert!(old_asset.exists());

    std::fs::remove_dir_all(&root).ok();
}
