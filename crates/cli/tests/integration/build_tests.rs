use predicates::prelude::*;

use super::common::TestRepo;

#[test]
fn builds_libraries_in_order_then_docs() {
  let repo = TestRepo::new();
  repo.write_config("");

  repo
    .docbuild()
    .assert()
    .success()
    .stdout(predicate::str::contains("BUILDING - A"))
    .stdout(predicate::str::contains("BUILDING - B"))
    .stdout(predicate::str::contains("BUILDING - DOCS"))
    .stdout(predicate::str::contains("Build complete: 3 step(s)"));

  assert_eq!(repo.built_dirs(), vec!["A", "B", "site"]);
}

#[test]
fn banners_follow_build_order() {
  let repo = TestRepo::new();
  repo.write_config("");

  let output = repo.docbuild().output().unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  let a = stdout.find("BUILDING - A").unwrap();
  let b = stdout.find("BUILDING - B").unwrap();
  let docs = stdout.find("BUILDING - DOCS").unwrap();
  assert!(a < b && b < docs, "unexpected banner order:\n{stdout}");
}

#[test]
fn first_library_failure_stops_the_run() {
  let repo = TestRepo::new();
  repo.write_config("");
  repo.fail_in("A");

  repo
    .docbuild()
    .assert()
    .code(7)
    .stderr(predicate::str::contains("build step A failed"));

  // The failing build exits before logging, so nothing was recorded.
  assert!(repo.built_dirs().is_empty());
}

#[test]
fn docs_are_not_built_after_a_library_fails() {
  let repo = TestRepo::new();
  repo.write_config("");
  repo.fail_in("B");

  repo.docbuild().assert().code(7);

  assert_eq!(repo.built_dirs(), vec!["A"]);
}

#[test]
fn docs_failure_is_fatal() {
  let repo = TestRepo::new();
  repo.write_config("");
  repo.fail_in("site");

  repo
    .docbuild()
    .assert()
    .code(7)
    .stderr(predicate::str::contains("DOCS"));

  assert_eq!(repo.built_dirs(), vec!["A", "B"]);
}

#[test]
fn missing_library_directory_fails() {
  let repo = TestRepo::new();
  repo.write_config("");
  std::fs::remove_dir(repo.root().join("B")).unwrap();

  repo
    .docbuild()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("directory not found"));

  assert_eq!(repo.built_dirs(), vec!["A"]);
}

#[test]
fn dry_run_lists_steps_without_running() {
  let repo = TestRepo::new();
  repo.write_config("");

  repo
    .docbuild()
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"))
    .stdout(predicate::str::contains("1. → A"))
    .stdout(predicate::str::contains("3. → DOCS"));

  assert!(repo.built_dirs().is_empty());
}

#[test]
fn json_report_lists_completed_steps() {
  let repo = TestRepo::new();
  repo.write_config("");

  let output = repo.docbuild().args(["--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["success"], true);
  let steps = report["steps"].as_array().unwrap();
  assert_eq!(steps.len(), 3);
  assert_eq!(steps[0]["kind"], "library");
  assert_eq!(steps[0]["path"], "A");
  assert_eq!(steps[2]["kind"], "docs");
  assert!(steps[2]["duration_ms"].is_u64());
}

#[test]
fn json_report_describes_failure() {
  let repo = TestRepo::new();
  repo.write_config("");
  repo.fail_in("B");

  let output = repo.docbuild().args(["--output", "json"]).output().unwrap();
  assert_eq!(output.status.code(), Some(7));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["success"], false);
  assert_eq!(report["failed"]["step"]["path"], "B");
  assert_eq!(report["failed"]["exit_code"], 7);
  assert_eq!(report["steps"].as_array().unwrap().len(), 1);
}

#[test]
fn json_report_stays_parseable_when_builds_print() {
  let repo = TestRepo::new();
  repo.write_config_printing("> build", "");

  let output = repo.docbuild().args(["--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["steps"].as_array().unwrap().len(), 3);

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.matches("> build").count(), 3, "stderr:\n{stderr}");
}

#[test]
fn json_failure_report_stays_parseable_when_builds_print() {
  let repo = TestRepo::new();
  repo.write_config_printing("> build", "");
  repo.fail_in("B");

  let output = repo.docbuild().args(["--output", "json"]).output().unwrap();
  assert_eq!(output.status.code(), Some(7));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["failed"]["step"]["path"], "B");
}

#[test]
fn text_mode_keeps_build_output_on_stdout() {
  let repo = TestRepo::new();
  repo.write_config_printing("> build", "");

  repo
    .docbuild()
    .assert()
    .success()
    .stdout(predicate::str::contains("> build"));
}

#[test]
fn failure_is_reported_once() {
  let repo = TestRepo::new();
  repo.write_config("");
  repo.fail_in("A");

  let output = repo.docbuild().output().unwrap();
  assert_eq!(output.status.code(), Some(7));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.matches("build step A failed").count(), 1, "stderr:\n{stderr}");
  assert!(!stderr.contains("ERROR"), "stderr:\n{stderr}");
}

#[test]
fn options_after_positional_arguments_are_honored() {
  let repo = TestRepo::new();
  repo.write_output();
  let viewer = repo.install_viewer();
  repo.write_config(&format!("viewer = \"{}\"\n", viewer.display()));

  repo
    .docbuild()
    .args(["o", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"));

  assert!(repo.built_dirs().is_empty());
  assert!(repo.opened_files().is_empty());
}

#[test]
fn root_after_a_positional_argument_is_used() {
  let repo = TestRepo::new();
  repo.write_config("");

  let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("docbuild");
  cmd
    .env_remove("DOCBUILD_ROOT")
    .arg("x")
    .arg("--root")
    .arg(repo.root())
    .assert()
    .success();

  assert_eq!(repo.built_dirs(), vec!["A", "B", "site"]);
}

#[test]
fn unknown_options_are_rejected_before_building() {
  let repo = TestRepo::new();
  repo.write_config("");

  repo
    .docbuild()
    .args(["--bogus", "--dry-run"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--bogus"));

  assert!(repo.built_dirs().is_empty());
}

#[test]
fn root_can_come_from_the_environment() {
  let repo = TestRepo::new();
  repo.write_config("");

  let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("docbuild");
  cmd.env("DOCBUILD_ROOT", repo.root()).assert().success();

  assert_eq!(repo.built_dirs(), vec!["A", "B", "site"]);
}

#[test]
fn explicit_config_file_is_used() {
  let repo = TestRepo::new();
  repo.write_config("");
  let other = repo.root().join("only-b.toml");
  std::fs::write(
    &other,
    format!(
      "libs = [\"B\"]\ndocs = \"site\"\ncommand = \"pwd >> '{}'\"\n",
      repo.build_log().display()
    ),
  )
  .unwrap();

  repo.docbuild().arg("--config").arg(&other).assert().success();

  assert_eq!(repo.built_dirs(), vec!["B", "site"]);
}
