//! Whole sessions: dry runs against real runs, and the log file framing

use super::*;
use chrono::NaiveDateTime;
use filetime::FileTime;
use rstest::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write_at(path: &Path, content: &str, offset: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(1_600_000_000 + offset, 0)).unwrap();
}

/// Relative path, content and mtime of every entry under `root`
fn snapshot(root: &Path) -> Vec<(PathBuf, Option<String>, i64)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read_to_string(entry.path()).unwrap());
            let mtime = if entry.file_type().is_file() {
                FileTime::from_last_modification_time(&entry.metadata().unwrap()).unix_seconds()
            } else {
                0
            };
            (relative, content, mtime)
        })
        .collect()
}

/// Scratch roots holding a bit of every case under `docs` and `more`
fn populated() -> (TempDir, SyncConfig) {
    let temp_dir = TempDir::new().unwrap();
    let local = temp_dir.path().join("local");
    let external = temp_dir.path().join("external");

    write_at(&local.join("docs/newer_here.txt"), "local", 60);
    write_at(&external.join("docs/newer_here.txt"), "external", 0);
    write_at(&local.join("docs/newer_there.txt"), "local", 0);
    write_at(&external.join("docs/newer_there.txt"), "external", 60);
    write_at(&local.join("docs/same.txt"), "same", 0);
    write_at(&external.join("docs/same.txt"), "same", 1);
    write_at(&local.join("docs/only_local.txt"), "l", 0);
    write_at(&external.join("docs/only_external.txt"), "e", 0);
    write_at(&local.join("docs/nested/ltree/a/b.txt"), "b", 0);
    write_at(&external.join("docs/nested/etree/c/d.txt"), "d", 0);
    write_at(&local.join("more/m.txt"), "m", 0);
    fs::create_dir_all(external.join("more")).unwrap();

    let directories = vec![PathBuf::from("docs"), PathBuf::from("more")];
    (temp_dir, SyncConfig::new(local, external, directories))
}

fn run(
    config: &SyncConfig,
    choice: Choice,
    prompter: &mut ScriptedPrompter,
) -> (RunStats, Vec<String>) {
    let mut log = MemoryLog::new();
    let stats = Session::new(config, choice).run(prompter, &mut log).unwrap();
    (stats, log.into_lines())
}

mod parity_tests {
    use super::*;

    #[rstest]
    #[case(Policy::Match, vec![true])]
    #[case(Policy::Match, vec![false])]
    #[case(Policy::LocalToExternal, vec![true, true])]
    #[case(Policy::LocalToExternal, vec![false, true])]
    #[case(Policy::ExternalToLocal, vec![true, false, true, true])]
    #[case(Policy::ExternalToLocal, vec![false, false, false, false])]
    fn test_simulation_matches_execution(#[case] policy: Policy, #[case] answers: Vec<bool>) {
        let (temp_dir, config) = populated();
        let before = snapshot(temp_dir.path());

        let mut dry_prompter = ScriptedPrompter::new(answers.clone());
        let (dry_stats, dry_log) =
            run(&config, Choice::new(policy, Mode::Simulate), &mut dry_prompter);
        assert_eq!(snapshot(temp_dir.path()), before, "a dry run must not touch the filesystem");

        let mut real_prompter = ScriptedPrompter::new(answers);
        let (real_stats, real_log) =
            run(&config, Choice::new(policy, Mode::Execute), &mut real_prompter);

        assert!(!real_log.is_empty());
        assert_eq!(dry_log, real_log);
        assert_eq!(dry_prompter.asked(), real_prompter.asked());
        assert_eq!(dry_stats, real_stats);
    }

    #[test]
    fn test_directories_run_in_configured_order() {
        let (_temp_dir, mut config) = populated();
        config.directories.reverse();

        let (_, log) = run(
            &config,
            Choice::new(Policy::LocalToExternal, Mode::Simulate),
            &mut ScriptedPrompter::always_yes(),
        );

        let more = config.local_root.join("more/m.txt").display().to_string();
        assert!(log[0].contains(&more), "first line was {}", log[0]);
    }

    #[test]
    fn test_sync_directories_runs_the_session() {
        let (temp_dir, config) = populated();

        let mut log = MemoryLog::new();
        let stats = sync_directories(
            &config,
            Choice::new(Policy::LocalToExternal, Mode::Execute),
            &mut ScriptedPrompter::always_yes(),
            &mut log,
        )
        .unwrap();

        assert_eq!(stats.copied, 2);
        assert_eq!(stats.replaced, 2);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.trees_copied, 1);
        assert_eq!(stats.trees_deleted, 1);
        assert_eq!(stats.total_operations(), 7);

        // `same.txt` stays one second apart, so compare names and content only.
        let contents = |root: PathBuf| -> Vec<(PathBuf, Option<String>)> {
            snapshot(&root).into_iter().map(|(path, content, _)| (path, content)).collect()
        };
        assert_eq!(
            contents(temp_dir.path().join("local")),
            contents(temp_dir.path().join("external"))
        );
    }
}

mod log_file_tests {
    use super::*;

    fn parse_timestamp(text: &str) {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
    }

    #[test]
    fn test_successful_run_is_framed() {
        let (temp_dir, config) = populated();
        let log_path = temp_dir.path().join("synclog.txt");

        let mut log = FileLog::create(&log_path).unwrap();
        let session = Session::new(&config, Choice::new(Policy::Match, Mode::Execute));
        session.run_logged(&mut ScriptedPrompter::always_yes(), &mut log).unwrap();
        log.finish().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines.len() > 2);

        let first = lines[0].strip_prefix("Ran at ").unwrap();
        parse_timestamp(first);
        let last = lines[lines.len() - 1].strip_prefix("Finished successfully at ").unwrap();
        parse_timestamp(last);
        let is_action = |line: &&str| {
            ["Copied ", "Deleted ", "Created "]
                .iter()
                .any(|prefix| line.starts_with(prefix))
        };
        assert!(lines[1..lines.len() - 1].iter().all(is_action));
    }

    #[test]
    fn test_failed_run_still_writes_completion() {
        let temp_dir = TempDir::new().unwrap();
        write_at(&temp_dir.path().join("local/docs/a.txt"), "a", 0);
        let config = SyncConfig::new(
            temp_dir.path().join("local"),
            temp_dir.path().join("unplugged"),
            vec![PathBuf::from("docs")],
        );

        let mut log = MemoryLog::new();
        let session = Session::new(&config, Choice::new(Policy::LocalToExternal, Mode::Execute));
        let err = session
            .run_logged(&mut ScriptedPrompter::always_yes(), &mut log)
            .unwrap_err();

        assert!(matches!(err, SyncError::MissingParent { .. }));
        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Ran at "));
        let tail = lines[1].strip_prefix("Finished with error at ").unwrap();
        let (stamp, message) = tail.split_once(": ").unwrap();
        parse_timestamp(stamp);
        assert_eq!(message, err.to_string());
    }
}
