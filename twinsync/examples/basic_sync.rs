//! Basic example: a dry run, the real run, then a second run with nothing to do

use std::error::Error;
use std::fs;
use twinsync::{Choice, MemoryLog, Mode, Policy, ScriptedPrompter, Session, SyncConfig};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    println!("Basic Twinsync Example");
    println!("======================");

    let temp_dir = tempfile::TempDir::new()?;
    let local = temp_dir.path().join("local");
    let external = temp_dir.path().join("external");

    fs::create_dir_all(local.join("docs/subdir"))?;
    fs::write(local.join("docs/file1.txt"), b"This is file 1 content")?;
    fs::write(local.join("docs/subdir/file2.txt"), b"This is file 2 content")?;
    fs::create_dir_all(external.join("docs"))?;
    fs::write(external.join("docs/stale.txt"), b"Only on the drive")?;

    let config = SyncConfig::new(&local, &external, vec!["docs".into()]);
    config.validate()?;

    for mode in [Mode::Simulate, Mode::Execute, Mode::Execute] {
        let session = Session::new(&config, Choice::new(Policy::LocalToExternal, mode));
        let mut prompter = ScriptedPrompter::always_yes();
        let mut log = MemoryLog::new();
        let stats = session.run(&mut prompter, &mut log)?;

        println!();
        println!("{} ({})", Policy::LocalToExternal, mode);
        for question in prompter.asked() {
            println!("  asked: {question}");
        }
        for line in log.lines() {
            println!("  {line}");
        }
        println!("  {}", stats.summary());
    }

    assert!(external.join("docs/subdir/file2.txt").exists());
    assert!(!external.join("docs/stale.txt").exists());
    Ok(())
}
