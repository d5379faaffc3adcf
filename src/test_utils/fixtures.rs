//! Sample templates and run-time inputs shared by tests.

use crate::codec;
use crate::model::{HttpApi, HttpDefinition, UnitTemplate};
use crate::overrides::WebIngress;
use crate::resolver::{DependencyBindings, DependencyIdentity};

/// Annotation key used by the sample templates.
pub const DEPENDENCIES_ANNOTATION: &str = "mesh.cellery.io/cell-dependencies";

/// HR composite depending on the employee and stock composites.
pub const HR_COMPOSITE_YAML: &str = r#"apiVersion: mesh.cellery.io/v1alpha2
kind: Composite
metadata:
  name: hr
  annotations:
    mesh.cellery.io/cell-image-org: myorg
    mesh.cellery.io/cell-image-name: hr-comp
    mesh.cellery.io/cell-image-version: 1.0.0
    mesh.cellery.io/cell-dependencies: '[{"org":"myorg","name":"employee-comp","version":"1.0.0","alias":"employeeCompDep","kind":"Composite"},{"org":"myorg","name":"stock-comp","version":"1.0.0","alias":"stockCompDep","kind":"Composite"}]'
spec:
  components:
    - metadata:
        name: hr
      spec:
        type: Deployment
        template:
          containers:
            - name: hr
              image: docker.io/wso2cellery/sampleapp-hr:0.3.0
              ports:
                - containerPort: 8080
              env:
                - name: stock_api_url
                  value: "http://{{stockCompDep}}--stock-service:8080"
                - name: employee_api_url
                  value: "http://{{employeeCompDep}}--employee-service:8080"
"#;

/// Products cell with a gateway, probes and resource limits.
pub const PRODUCTS_CELL_YAML: &str = r#"apiVersion: mesh.cellery.io/v1alpha2
kind: Cell
metadata:
  name: pet-be
spec:
  gateway:
    spec:
      type: Envoy
      ingress:
        http:
          - context: customers-1
            backend: customers
            definitions:
              - path: /*
                method: GET
  components:
    - metadata:
        name: products
      spec:
        template:
          containers:
            - name: products
              image: myorg/products:1.0.0
              env:
                - name: CATEGORIES_HOST
                  value: localhost
                - name: LOG_LEVEL
                  value: info
                - name: PROMO_CODE
                  value: ""
              livenessProbe:
                httpGet:
                  path: /health
                  port: 80
                initialDelaySeconds: 5
                periodSeconds: 10
              readinessProbe:
                tcpSocket:
                  port: 80
                periodSeconds: 5
              resources:
                limits:
                  memory: 128Mi
                  cpu: 500m
    - metadata:
        name: customers
      spec:
        template:
          containers:
            - name: customers
              image: myorg/customers:1.0.0
"#;

/// The HR composite as a parsed template.
///
/// # Panics
///
/// Never for the embedded document.
#[must_use]
pub fn hr_composite() -> UnitTemplate {
    codec::parse_template(HR_COMPOSITE_YAML.as_bytes(), "hr.yaml").expect("hr fixture parses")
}

/// The products cell as a parsed template.
///
/// # Panics
///
/// Never for the embedded document.
#[must_use]
pub fn products_cell() -> UnitTemplate {
    codec::parse_template(PRODUCTS_CELL_YAML.as_bytes(), "pet-be.yaml")
        .expect("products fixture parses")
}

/// Bindings for both HR dependencies.
#[must_use]
pub fn hr_bindings() -> DependencyBindings {
    DependencyBindings::new()
        .with("employeeCompDep", DependencyIdentity::new("myorg", "employee-comp", "1.0.0", "emp-inst"))
        .with("stockCompDep", DependencyIdentity::new("myorg", "stock-comp", "1.0.0", "stock-inst"))
}

/// Web ingress exposing `products` as `products-1` with a single `GET /*` route.
#[must_use]
pub fn products_ingress() -> WebIngress {
    WebIngress {
        vhost: "products-1".to_string(),
        http_api: HttpApi {
            context: "products-1".to_string(),
            backend: Some("products".to_string()),
            definitions: vec![HttpDefinition::new("GET", "/*")],
            ..HttpApi::default()
        },
        tls: None,
        oidc: None,
    }
}
