//! Drives `cli::run` against real filesystem fixtures.

#![cfg(unix)]

use std::fs::File;
use std::os::fd::AsRawFd;

use cli::{EXIT_FAILURE, EXIT_OK, run};
use test_support::Fixture;

fn run_capture(args: &[String]) -> (i32, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(args.iter().cloned(), &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("stdout is UTF-8"),
        String::from_utf8(stderr).expect("stderr is UTF-8"),
    )
}

fn args(items: &[&str]) -> Vec<String> {
    std::iter::once("oc-stat")
        .chain(items.iter().copied())
        .map(str::to_owned)
        .collect()
}

#[test]
fn reports_each_operand_in_order() {
    let fixture = Fixture::new().unwrap();
    let first = fixture.file("first", b"abc").unwrap();
    let dir = fixture.dir("second").unwrap();

    let (code, stdout, stderr) = run_capture(&args(&[
        "-j",
        "2",
        first.to_str().unwrap(),
        dir.to_str().unwrap(),
    ]));
    assert_eq!(code, EXIT_OK, "{stderr}");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("{}: ", first.display())));
    assert!(lines[0].contains(" kind=regular "));
    assert!(lines[0].contains(" size=3 "));
    assert!(lines[1].contains(" kind=directory "));
}

#[test]
fn no_dereference_reports_the_link() {
    let fixture = Fixture::new().unwrap();
    fixture.file("target", b"").unwrap();
    let link = fixture.symlink("target", "link").unwrap();
    let link = link.to_str().unwrap();

    let (_, followed, _) = run_capture(&args(&[link]));
    assert!(followed.contains(" kind=regular "), "{followed}");
    let (code, physical, _) = run_capture(&args(&["-P", link]));
    assert_eq!(code, EXIT_OK);
    assert!(physical.contains(" kind=symlink "), "{physical}");
}

#[test]
fn failure_sets_exit_code_but_keeps_other_results() {
    let fixture = Fixture::new().unwrap();
    let present = fixture.file("present", b"x").unwrap();
    let missing = fixture.join("missing");

    let (code, stdout, stderr) = run_capture(&args(&[
        missing.to_str().unwrap(),
        present.to_str().unwrap(),
    ]));
    assert_eq!(code, EXIT_FAILURE);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains(" kind=regular "));
    assert!(
        stderr.starts_with(&format!("oc-stat: stat '{}': ", missing.display())),
        "{stderr}"
    );
}

#[test]
fn descriptor_operand_is_reported() {
    let fixture = Fixture::new().unwrap();
    let path = fixture.file("open", b"12345").unwrap();
    let file = File::open(&path).unwrap();
    let fd = file.as_raw_fd().to_string();

    let (code, stdout, stderr) = run_capture(&args(&["--fd", &fd, "--narrow"]));
    assert_eq!(code, EXIT_OK, "{stderr}");
    assert!(stdout.starts_with(&format!("fd:{fd}: ")));
    assert!(stdout.contains(" size=5 "));
}

#[cfg(feature = "json")]
#[test]
fn json_output_is_one_object_per_operand() {
    let fixture = Fixture::new().unwrap();
    let pipe = fixture.fifo("pipe").unwrap();
    let missing = fixture.join("gone");

    let (code, stdout, _) = run_capture(&args(&[
        "--json",
        "-P",
        pipe.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]));
    assert_eq!(code, EXIT_FAILURE);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["syscall"], "lstat");
    assert_eq!(records[0]["status"]["kind"], "fifo");
    assert_eq!(records[1]["error"]["code"], libc::ENOENT);
}

