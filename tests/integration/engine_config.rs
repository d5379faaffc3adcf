use crate::common::{FileAssert, TestProject};
use crate::fixtures::{PRODUCTS_CELL_YAML, UNMATCHED_OVERRIDES_YAML};
use predicates::prelude::*;

/// `meshcell.toml` in the working directory sets the output directory.
#[test]
fn test_local_config_sets_output_dir() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("meshcell.toml", "[output]\ndir = \"instances\"\n").unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1"])
        .assert()
        .success();

    FileAssert::exists(project.path().join("instances/pet-be-1.yaml"));
    FileAssert::not_exists(project.default_output_dir());
}

/// `--output-dir` wins over the config file.
#[test]
fn test_flag_overrides_config() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("meshcell.toml", "[output]\ndir = \"instances\"\n").unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1", "--output-dir", "flag-out"])
        .assert()
        .success();

    FileAssert::exists(project.path().join("flag-out/pet-be-1.yaml"));
    FileAssert::not_exists(project.path().join("instances"));
}

/// The `error` policy turns an unmatched override into a failure.
#[test]
fn test_unmatched_error_policy_from_env_config() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", UNMATCHED_OVERRIDES_YAML).unwrap();
    let config = project
        .write_file("conf/strict.toml", "[overrides]\nunmatched = \"error\"\n")
        .unwrap();

    project
        .meshcell_command()
        .env("MESHCELL_CONFIG", &config)
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1", "-o", "overrides.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inventory"));

    FileAssert::not_exists(project.default_output_dir());
}

/// `--unmatched` on the command line relaxes the configured policy.
#[test]
fn test_unmatched_flag_overrides_config() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", UNMATCHED_OVERRIDES_YAML).unwrap();
    project.write_file("meshcell.toml", "[overrides]\nunmatched = \"error\"\n").unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1", "-o", "overrides.yaml"])
        .args(["--unmatched", "ignore"])
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("broken.toml", "[output\n").unwrap();

    project
        .meshcell_command()
        .args(["--config", "broken.toml", "validate", "-t", "pet-be.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse engine config"));
}
