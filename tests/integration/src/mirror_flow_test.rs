//! Full mirroring lifecycle against real directory trees

use std::fs;

use mirror_core::{LocationStore, MirrorEngine, MirrorOptions, poll};
use tempfile::TempDir;

#[test]
fn hello_txt_lifecycle() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    fs::create_dir_all(source.join("root")).unwrap();
    fs::write(source.join("root/hello.txt"), "hi").unwrap();

    let store = LocationStore::open(temp.path().join("state/locations.toml")).unwrap();
    let mut engine = MirrorEngine::new(&source, &dest, store, MirrorOptions::default()).unwrap();

    let first = poll::run(&mut engine, None);
    assert!(first.success);
    assert_eq!(
        fs::read_to_string(dest.join("root/hello.txt")).unwrap(),
        "hi"
    );

    fs::create_dir(source.join("root/sub")).unwrap();
    fs::rename(
        source.join("root/hello.txt"),
        source.join("root/sub/hello.txt"),
    )
    .unwrap();

    poll::run(&mut engine, None);
    assert_eq!(
        fs::read_to_string(dest.join("root/sub/hello.txt")).unwrap(),
        "hi"
    );

    // the old path lingers one deferral cycle, then goes
    assert!(dest.join("root/hello.txt").exists());
    poll::run(&mut engine, None);
    assert!(!dest.join("root/hello.txt").exists());
}

#[test]
fn two_pairs_share_one_store() {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("state/locations.toml");

    for name in ["alpha", "beta"] {
        let source = temp.path().join(name).join("in");
        let dest = temp.path().join(name).join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("file.txt"), name).unwrap();

        let store = LocationStore::open(&store_path).unwrap();
        let mut engine =
            MirrorEngine::new(&source, &dest, store, MirrorOptions::default()).unwrap();
        let report = poll::run(&mut engine, None);
        assert!(report.success);
    }

    let store = LocationStore::open(&store_path).unwrap();
    assert_eq!(store.pairs().len(), 2);
    // records stay scoped to their own pair
    assert_eq!(store.locations().len(), 2);
    assert_eq!(
        fs::read_to_string(temp.path().join("alpha/out/file.txt")).unwrap(),
        "alpha"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("beta/out/file.txt")).unwrap(),
        "beta"
    );
}
