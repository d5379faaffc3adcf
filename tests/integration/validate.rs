use crate::common::{FileAssert, TestProject};
use crate::fixtures::{
    HR_BINDINGS_YAML, HR_COMPOSITE_YAML, PARTIAL_BINDINGS_YAML, PRODUCTS_CELL_YAML,
    PRODUCTS_OVERRIDES_YAML, UNMATCHED_OVERRIDES_YAML,
};
use predicates::prelude::*;

#[test]
fn test_validate_bound_template() {
    let project = TestProject::new().unwrap();
    project.write_file("hr.yaml", HR_COMPOSITE_YAML).unwrap();
    project.write_file("deps.yaml", HR_BINDINGS_YAML).unwrap();

    project
        .meshcell_command()
        .args(["validate", "-t", "hr.yaml", "-b", "deps.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependency 'stockCompDep' is bound"))
        .stdout(predicate::str::contains("Template is valid"));

    FileAssert::not_exists(project.default_output_dir());
}

#[test]
fn test_validate_reports_unbound_alias() {
    let project = TestProject::new().unwrap();
    project.write_file("hr.yaml", HR_COMPOSITE_YAML).unwrap();
    project.write_file("deps.yaml", PARTIAL_BINDINGS_YAML).unwrap();

    project
        .meshcell_command()
        .args(["validate", "-t", "hr.yaml", "-b", "deps.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Dependency 'employeeCompDep' is not bound"));
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::new().unwrap();
    project.write_file("hr.yaml", HR_COMPOSITE_YAML).unwrap();
    project.write_file("deps.yaml", PARTIAL_BINDINGS_YAML).unwrap();

    let output = project
        .meshcell_command()
        .args(["validate", "-t", "hr.yaml", "-b", "deps.yaml", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results["valid"], false);
    assert_eq!(results["kind"], "Composite");
    assert_eq!(results["bound_aliases"], serde_json::json!(["stockCompDep"]));
    assert_eq!(results["unbound_aliases"], serde_json::json!(["employeeCompDep"]));
    assert_eq!(results["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn test_validate_cell_with_overrides() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", PRODUCTS_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["validate", "-t", "pet-be.yaml", "-o", "overrides.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cell 'pet-be' (2 component(s))"))
        .stdout(predicate::str::contains("No dependencies"));
}

#[test]
fn test_validate_warns_on_unmatched_override() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", UNMATCHED_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["validate", "-t", "pet-be.yaml", "-o", "overrides.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("override for unknown component 'inventory'"));
}

#[test]
fn test_validate_missing_probe_fails() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project
        .write_file(
            "overrides.yaml",
            "components:\n  customers:\n    - kind: probes\n      readiness:\n        periodSeconds: 3\n",
        )
        .unwrap();

    project
        .meshcell_command()
        .args(["validate", "-t", "pet-be.yaml", "-o", "overrides.yaml", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("readiness probe"));
}
