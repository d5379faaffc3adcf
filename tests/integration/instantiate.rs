use crate::common::{FileAssert, TestProject};
use crate::fixtures::{
    HR_BINDINGS_YAML, HR_COMPOSITE_YAML, PARTIAL_BINDINGS_YAML, PRODUCTS_CELL_YAML,
    PRODUCTS_OVERRIDES_YAML, PRODUCTS_TLS_OVERRIDES_YAML, UNKNOWN_KIND_OVERRIDES_YAML,
};
use meshcell::codec;
use predicates::prelude::*;

/// Dependency placeholders are replaced with the bound instance names.
#[test]
fn test_instantiate_composite_with_dependencies() {
    let project = TestProject::new().unwrap();
    project.write_file("hr.yaml", HR_COMPOSITE_YAML).unwrap();
    project.write_file("deps.yaml", HR_BINDINGS_YAML).unwrap();
    project.write_file("overrides.yaml", "components:\n  hr:\n    - kind: env\n      vars: {}\n").unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "hr.yaml", "-i", "hr-inst"])
        .args(["--bindings", "deps.yaml", "--overrides", "overrides.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Instantiated Composite 'hr' as 'hr-inst'"));

    let output = project.default_output_dir().join("hr-inst.yaml");
    FileAssert::exists(&output);
    FileAssert::contains(&output, "http://stock-inst--stock-service:8080");
    FileAssert::contains(&output, "http://emp-inst--employee-service:8080");

    let instance = codec::parse_template(&std::fs::read(&output).unwrap(), "out").unwrap();
    assert_eq!(instance.name(), "hr-inst");
    let annotation = &instance.metadata.annotations["mesh.cellery.io/cell-dependencies"];
    assert!(annotation.contains(r#""instance":"emp-inst""#));
    assert!(!annotation.contains("alias"));
}

/// An unbound alias fails the run and nothing is written.
#[test]
fn test_instantiate_unbound_alias_writes_nothing() {
    let project = TestProject::new().unwrap();
    project.write_file("hr.yaml", HR_COMPOSITE_YAML).unwrap();
    project.write_file("deps.yaml", PARTIAL_BINDINGS_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "hr.yaml", "-i", "hr-inst", "-b", "deps.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("employeeCompDep"))
        .stderr(predicate::str::contains("suggestion"));

    FileAssert::not_exists(project.default_output_dir());
}

/// Env, probe, resource and ingress overrides all land in the instance.
#[test]
fn test_instantiate_cell_with_overrides() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", PRODUCTS_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1", "-o", "overrides.yaml"])
        .args(["--output-dir", "deploy"])
        .assert()
        .success();

    let bytes = std::fs::read(project.path().join("deploy/pet-be-1.yaml")).unwrap();
    let instance = codec::parse_template(&bytes, "out").unwrap();

    let products = &instance.component("products").unwrap().containers()[0];
    let env: Vec<_> =
        products.env.iter().map(|e| (e.name.as_str(), e.value.as_deref())).collect();
    assert_eq!(
        env,
        vec![
            ("CATEGORIES_HOST", Some("pet-be-1--categories-service")),
            ("LOG_LEVEL", Some("info")),
            ("PROMO_CODE", Some("")),
        ]
    );

    let liveness = products.liveness_probe.as_ref().unwrap();
    assert_eq!(liveness.initial_delay_seconds, Some(30));
    assert_eq!(liveness.period_seconds, Some(10));
    assert!(liveness.extra.contains_key("httpGet"));

    let resources = products.resources.as_ref().unwrap();
    assert!(resources.limits.contains_key("memory"));
    assert!(!resources.limits.contains_key("cpu"));

    let ingress = &instance.spec.gateway.as_ref().unwrap().spec.ingress;
    assert_eq!(ingress.extensions.cluster_ingress.host.as_deref(), Some("products-1"));
    let contexts: Vec<_> = ingress.http.iter().map(|api| api.context.as_str()).collect();
    assert_eq!(contexts, vec!["customers-1", "products-1"]);

    // No TLS, no secret.
    assert_eq!(std::fs::read_dir(project.path().join("deploy")).unwrap().count(), 1);
}

/// TLS material produces a secret document next to the instance.
#[test]
fn test_instantiate_tls_secret() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", PRODUCTS_TLS_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "cust-inst", "-o", "overrides.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cust-inst--tls-secret.yaml"));

    let out = project.default_output_dir();
    let secret = out.join("cust-inst--tls-secret.yaml");
    FileAssert::contains(&secret, "kind: Secret");
    FileAssert::contains(&secret, "type: kubernetes.io/tls");
    FileAssert::contains(&secret, "tls.crt: ");
    FileAssert::contains(&secret, "tls.key: ");
    FileAssert::contains(&out.join("cust-inst.yaml"), "secret: cust-inst--tls-secret");
    FileAssert::contains(&out.join("cust-inst.yaml"), "host: shop.example.com");
}

/// `--dry-run` prints every document and writes nothing.
#[test]
fn test_instantiate_dry_run() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", PRODUCTS_TLS_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "cust-inst", "-o", "overrides.yaml"])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("name: cust-inst"))
        .stdout(predicate::str::contains("kind: Secret"));

    FileAssert::not_exists(project.default_output_dir());
}

/// Malformed overrides are rejected before anything is written.
#[test]
fn test_instantiate_rejects_unknown_override_kind() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();
    project.write_file("overrides.yaml", UNKNOWN_KIND_OVERRIDES_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "pet-be-1", "-o", "overrides.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("products"))
        .stderr(predicate::str::contains("grpc-ingress"));

    FileAssert::not_exists(project.default_output_dir());
}

#[test]
fn test_instantiate_rejects_invalid_instance_name() {
    let project = TestProject::new().unwrap();
    project.write_file("pet-be.yaml", PRODUCTS_CELL_YAML).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "pet-be.yaml", "-i", "Pet_Be"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid instance name 'Pet_Be'"));
}

#[test]
fn test_instantiate_missing_template() {
    let project = TestProject::new().unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "missing.yaml", "-i", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template"));
}

/// A composite may not declare a gateway.
#[test]
fn test_instantiate_rejects_composite_with_gateway() {
    let project = TestProject::new().unwrap();
    let doc = PRODUCTS_CELL_YAML.replace("kind: Cell", "kind: Composite");
    project.write_file("bad.yaml", &doc).unwrap();

    project
        .meshcell_command()
        .args(["instantiate", "-t", "bad.yaml", "-i", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not declare a gateway"));
}
