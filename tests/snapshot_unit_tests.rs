//! Unit tests for config snapshots

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use chrono::{DateTime, TimeZone as _, Utc};
    use devkit::error::DevkitError;
    use devkit::operations::snapshot::{
        create_snapshot, default_snapshot_name, list_snapshots, restore_snapshot,
        sanitize_snapshot_name, snapshots_dir,
    };
    use devkit::system::System as _;
    use devkit::system::mock::MockSystem;
    use std::path::{Path, PathBuf};

    const ROOT: &str = "/project";

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, hour, 5, 7).unwrap()
    }

    fn project(config: &str) -> MockSystem {
        MockSystem::new()
            .with_file("/project/.dev-env.yml", config.as_bytes())
            .unwrap()
    }

    #[test]
    fn sanitize_names() {
        assert_eq!(sanitize_snapshot_name("before-upgrade").unwrap(), "before-upgrade");
        assert_eq!(sanitize_snapshot_name("my snapshot!").unwrap(), "my-snapshot");
        assert_eq!(sanitize_snapshot_name("../../etc/passwd").unwrap(), "etc-passwd");
        assert_eq!(sanitize_snapshot_name("a//b").unwrap(), "a-b");
        assert_eq!(sanitize_snapshot_name("v1_2").unwrap(), "v1_2");
        assert_eq!(sanitize_snapshot_name("!!!").unwrap(), "snapshot");
        assert_eq!(sanitize_snapshot_name("").unwrap(), "snapshot");
    }

    #[test]
    fn default_name_uses_timestamp() {
        assert_eq!(default_snapshot_name(at(14)), "snapshot-2024-03-09T14-05-07");
    }

    #[test]
    fn create_writes_metadata_and_config() {
        let system = project("name: demo\n");
        let root = Path::new(ROOT);

        let meta = create_snapshot(&system, root, Some("before upgrade"), at(14)).unwrap();
        assert_eq!(meta.name, "before upgrade");
        assert_eq!(meta.created_at, "2024-03-09T14:05:07.000Z");

        let dir = snapshots_dir(root).join("before-upgrade");
        assert_eq!(dir, PathBuf::from("/project/.devkit/snapshots/before-upgrade"));
        assert_eq!(
            system.read_to_string(&dir.join("dev-env.yml")).unwrap(),
            "name: demo\n"
        );

        let metadata: serde_json::Value =
            serde_json::from_str(&system.read_to_string(&dir.join("metadata.json")).unwrap())
                .unwrap();
        assert_eq!(metadata["name"], "before upgrade");
        assert_eq!(metadata["createdAt"], "2024-03-09T14:05:07.000Z");
    }

    #[test]
    fn create_without_name_uses_timestamp() {
        let system = project("name: demo\n");
        let meta = create_snapshot(&system, Path::new(ROOT), None, at(9)).unwrap();

        assert_eq!(meta.name, "snapshot-2024-03-09T09-05-07");
        assert!(system.is_dir(Path::new(
            "/project/.devkit/snapshots/snapshot-2024-03-09T09-05-07"
        )));
    }

    #[test]
    fn create_refuses_duplicates() {
        let system = project("name: demo\n");
        let root = Path::new(ROOT);
        create_snapshot(&system, root, Some("one"), at(9)).unwrap();

        let err = create_snapshot(&system, root, Some("one"), at(10)).unwrap_err();
        let devkit_err = err.downcast_ref::<DevkitError>().unwrap();
        assert!(matches!(devkit_err, DevkitError::Snapshot { .. }));
        assert_eq!(devkit_err.exit_code(), 4);
    }

    #[test]
    fn create_requires_valid_config() {
        let system = MockSystem::new().with_dir(ROOT).unwrap();
        let err = create_snapshot(&system, Path::new(ROOT), Some("x"), at(9)).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));

        let system = project("version: '1'\n");
        let err = create_snapshot(&system, Path::new(ROOT), Some("x"), at(9)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevkitError>(),
            Some(DevkitError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn list_newest_first() {
        let system = project("name: demo\n");
        let root = Path::new(ROOT);
        create_snapshot(&system, root, Some("morning"), at(8)).unwrap();
        create_snapshot(&system, root, Some("evening"), at(20)).unwrap();
        create_snapshot(&system, root, Some("noon"), at(12)).unwrap();

        let names: Vec<String> = list_snapshots(&system, root)
            .unwrap()
            .into_iter()
            .map(|meta| meta.name)
            .collect();
        assert_eq!(names, vec!["evening", "noon", "morning"]);
    }

    #[test]
    fn list_skips_broken_entries() {
        let system = project("name: demo\n")
            .with_file("/project/.devkit/snapshots/broken/metadata.json", b"{not json")
            .unwrap()
            .with_dir("/project/.devkit/snapshots/empty")
            .unwrap()
            .with_file("/project/.devkit/snapshots/stray.txt", b"x")
            .unwrap();
        let root = Path::new(ROOT);
        create_snapshot(&system, root, Some("good"), at(8)).unwrap();

        let snapshots = list_snapshots(&system, root).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "good");
    }

    #[test]
    fn list_without_snapshots() {
        let system = project("name: demo\n");
        assert!(list_snapshots(&system, Path::new(ROOT)).unwrap().is_empty());
    }

    #[test]
    fn restore_overwrites_config() {
        let system = project("name: original\n");
        let root = Path::new(ROOT);
        create_snapshot(&system, root, Some("v1"), at(8)).unwrap();
        system
            .write(Path::new("/project/.dev-env.yml"), b"name: changed\n")
            .unwrap();

        let restored = restore_snapshot(&system, root, "v1").unwrap();
        assert_eq!(restored, PathBuf::from("/project/.dev-env.yml"));
        assert_eq!(system.read_to_string(&restored).unwrap(), "name: original\n");
    }

    #[test]
    fn restore_unknown_snapshot() {
        let system = project("name: demo\n");
        let err = restore_snapshot(&system, Path::new(ROOT), "nope").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DevkitError>(),
            Some(DevkitError::Snapshot { .. })
        ));
        assert!(err.to_string().contains("devkit snapshot list"));
        assert_eq!(
            system.read_to_string(Path::new("/project/.dev-env.yml")).unwrap(),
            "name: demo\n"
        );
    }
}
