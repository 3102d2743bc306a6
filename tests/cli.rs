use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn trax(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("trax").unwrap();
    cmd.env("TRAX_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    trax(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    trax(&dir)
        .args(["unit", "check-in", "XBX-101", "--paid", "35.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in: XBX-101"));
    trax(&dir)
        .args([
            "part", "add", "Capacitor kit", "CAP-100", "--qty", "5", "--cost", "2.50",
        ])
        .assert()
        .success();
    dir
}

#[test]
fn test_attach_decrements_then_goes_pending() {
    let dir = setup();

    trax(&dir)
        .args(["use", "attach", "CAP-100", "XBX-101", "--qty", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stock remaining: 2"));

    trax(&dir)
        .args(["use", "attach", "CAP-100", "XBX-101", "--qty", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded as pending"));

    trax(&dir)
        .args(["part", "show", "CAP-100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("In Stock: 2"));

    trax(&dir)
        .args(["unit", "show", "XBX-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[pending stock]"))
        .stdout(predicate::str::contains("$17.50"));
}

#[test]
fn test_duplicate_sku_rejected() {
    let dir = setup();

    trax(&dir)
        .args(["part", "add", "Other kit", "CAP-100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_unknown_unit_fails() {
    let dir = setup();

    trax(&dir)
        .args(["timer", "start", "NOPE-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unit not found"));
}

#[test]
fn test_timer_start_stop() {
    let dir = setup();

    trax(&dir)
        .args(["timer", "start", "XBX-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer started on XBX-101"));
    trax(&dir)
        .args(["timer", "start", "XBX-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already running"));
    trax(&dir)
        .args(["timer", "stop", "XBX-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer stopped on XBX-101"));
    trax(&dir)
        .args(["timer", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No timers running."));
}

#[test]
fn test_backup_reminder_and_restore() {
    let dir = setup();

    trax(&dir)
        .args(["part", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Reminder"));

    trax(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trax-backup-"));

    trax(&dir)
        .args(["part", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Reminder").not());

    trax(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));

    trax(&dir)
        .args(["unit", "check-in", "XBX-202"])
        .assert()
        .success();

    trax(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    trax(&dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete!"));

    trax(&dir)
        .args(["unit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("XBX-101"))
        .stdout(predicate::str::contains("XBX-202").not());
}

#[test]
fn test_export_csv() {
    let dir = setup();
    trax(&dir)
        .args(["unit", "edit", "XBX-101", "--asking", "120", "--grade", "excellent"])
        .assert()
        .success();

    let out = dir.path().join("listing.csv");
    trax(&dir)
        .args(["export", "csv"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 unit(s)"));

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.starts_with("SKU,Title,ConditionDescription,Price"));
    assert!(contents.contains("XBX-101,XBX-101,Excellent,120.00,1"));
}
