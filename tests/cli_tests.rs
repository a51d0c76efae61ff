//! Integration tests for the Wizflow CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test, isolated from the user's config
fn wizflow_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wizflow").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env("RUST_LOG", "error")
        .env_remove("WIZFLOW_BASE_URL")
        .env_remove("WIZFLOW_CLIENTSET");
    cmd
}

const SCALE_SCENARIO: &str = r#"
workflow: scaleResources
query: {query: api}
input: {clientset: east}
results:
  - cluster: prod
    namespace: default
    name: api
    deploymentSpec:
      template:
        spec:
          containers:
            - name: web
              resources:
                limits: {cpu: "1", memory: 1Gi}
edits:
  - path: deploymentSpec.template.spec.containers[0].resources.limits.cpu
    value: "2"
"#;

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    wizflow_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("guided k8s workflows"));
}

#[test]
fn test_list_shows_catalogue_and_hydrators() {
    let home = TempDir::new().unwrap();
    wizflow_cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("deletePod"))
        .stdout(predicate::str::contains("k8s/hpa/resize"))
        .stdout(predicate::str::contains("k8s.updateDeployment"));
}

// ============================================================================
// Layout Validation Tests
// ============================================================================

#[test]
fn test_validate_valid_layout() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scale.yaml");
    fs::write(
        &file,
        r#"
nodes:
  - name: resolverInput
  - name: resourceData
  - name: updateData
    deps: [resourceData, resolverInput]
    hydrator: k8s.updateDeployment
steps:
  - name: Lookup
  - name: Modify
    backing: resourceData
"#,
    )
    .unwrap();

    wizflow_cmd(&home)
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Derived nodes: 1"));
}

#[test]
fn test_validate_forward_dependency_fails_with_fix() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("bad.yaml");
    fs::write(
        &file,
        r#"
nodes:
  - name: updateData
    deps: [resourceData]
    hydrator: k8s.deletePod
  - name: resourceData
"#,
    )
    .unwrap();

    wizflow_cmd(&home)
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIZ-012"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_validate_missing_file_fails() {
    let home = TempDir::new().unwrap();
    wizflow_cmd(&home)
        .args(["validate", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// Run Tests
// ============================================================================

#[test]
fn test_run_scale_resources_with_mock_transport() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scenario.yaml");
    fs::write(&file, SCALE_SCENARIO).unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Modify"))
        .stdout(predicate::str::contains("Done"))
        .stdout(predicate::str::contains("\"containerName\": \"web\""))
        .stdout(predicate::str::contains("\"cpu\": \"2\""))
        .stdout(predicate::str::contains("\"clientset\": \"east\""));
}

#[test]
fn test_run_with_events_prints_event_log() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scenario.yaml");
    fs::write(&file, SCALE_SCENARIO).unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .arg("--events")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"transport_called\""))
        .stdout(predicate::str::contains("\"type\": \"wizard_done\""));
}

#[test]
fn test_run_ambiguous_lookup_fails() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scenario.yaml");
    fs::write(
        &file,
        r#"
workflow: pod/delete
results:
  - {cluster: prod, namespace: jobs, name: worker-1}
  - {cluster: prod, namespace: jobs, name: worker-2}
"#,
    )
    .unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("blocked"))
        .stderr(predicate::str::contains("matched 2"));
}

#[test]
fn test_run_unknown_workflow_fails() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scenario.yaml");
    fs::write(&file, "workflow: kubeDashboard\nresults: []\n").unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIZ-051"));
}

#[test]
fn test_run_http_without_base_url_fails() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("scenario.yaml");
    fs::write(&file, SCALE_SCENARIO).unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .args(["--transport", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn test_run_uses_configured_default_clientset() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("wizflow");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[defaults]\nclientset = \"west\"\n",
    )
    .unwrap();

    let file = home.path().join("scenario.yaml");
    fs::write(
        &file,
        r#"
workflow: deletePod
results:
  - {cluster: prod, namespace: jobs, name: worker-1}
"#,
    )
    .unwrap();

    wizflow_cmd(&home)
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"clientset\": \"west\""));
}
