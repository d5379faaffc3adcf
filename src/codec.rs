//! YAML encoding of templates, finalized instances and secrets.

use crate::core::{MeshError, Result};
use crate::model::{FinalizedInstance, Secret, UnitTemplate};

/// Parse a unit template. `origin` names the source in errors (usually a file path).
///
/// # Errors
///
/// Returns [`MeshError::TemplateParseError`] for invalid YAML or a document that is
/// not a unit, and [`MeshError::InvalidTemplate`] for a structurally inconsistent unit.
pub fn parse_template(bytes: &[u8], origin: &str) -> Result<UnitTemplate> {
    let template: UnitTemplate =
        serde_yaml::from_slice(bytes).map_err(|e| MeshError::TemplateParseError {
            file: origin.to_string(),
            reason: e.to_string(),
        })?;
    template.validate()?;
    Ok(template)
}

/// Serialize a finalized instance.
///
/// # Errors
///
/// Returns [`MeshError::SerializeFailed`] if YAML encoding fails.
pub fn serialize_instance(instance: &FinalizedInstance) -> Result<String> {
    serde_yaml::to_string(instance).map_err(|e| MeshError::SerializeFailed {
        artifact: format!("instance '{}'", instance.name()),
        reason: e.to_string(),
    })
}

/// Serialize a secret document.
///
/// # Errors
///
/// Returns [`MeshError::SerializeFailed`] if YAML encoding fails.
pub fn serialize_secret(secret: &Secret) -> Result<String> {
    serde_yaml::to_string(secret).map_err(|e| MeshError::SerializeFailed {
        artifact: format!("secret '{}'", secret.name()),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitKind;
    use std::collections::BTreeMap;

    const CELL: &str = r#"
apiVersion: mesh.cellery.io/v1alpha2
kind: Cell
metadata:
  name: pet-be
  annotations:
    mesh.cellery.io/cell-image-org: myorg
spec:
  gateway:
    spec:
      type: Envoy
      ingress:
        http:
          - context: controller
            backend: controller
  components:
    - metadata:
        name: controller
      spec:
        type: Deployment
        template:
          containers:
            - name: controller
              image: myorg/pet-be-controller:1.0.0
              ports:
                - containerPort: 80
              env:
                - name: CATALOG_HOST
                  value: "{{instance_name}}--catalog-service"
"#;

    #[test]
    fn test_parse_cell() {
        let template = parse_template(CELL.as_bytes(), "pet-be.yaml").unwrap();
        assert_eq!(template.kind, UnitKind::Cell);
        assert_eq!(template.name(), "pet-be");
        assert!(template.spec.gateway.is_some());
        assert_eq!(template.component_names().collect::<Vec<_>>(), vec!["controller"]);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let template = parse_template(CELL.as_bytes(), "pet-be.yaml").unwrap();
        let yaml = serialize_instance(&template).unwrap();
        assert!(yaml.contains("image: myorg/pet-be-controller:1.0.0"));
        assert!(yaml.contains("containerPort: 80"));
        assert!(yaml.contains("type: Envoy"));

        let reparsed = parse_template(yaml.as_bytes(), "roundtrip").unwrap();
        assert_eq!(reparsed, template);
    }

    #[test]
    fn test_invalid_yaml_names_origin() {
        let err = parse_template(b"kind: [unclosed", "broken.yaml").unwrap_err();
        match err {
            MeshError::TemplateParseError {
                file,
                ..
            } => assert_eq!(file, "broken.yaml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let doc = CELL.replace("kind: Cell", "kind: Service");
        assert!(parse_template(doc.as_bytes(), "svc.yaml").is_err());
    }

    #[test]
    fn test_composite_with_gateway_rejected() {
        let doc = CELL.replace("kind: Cell", "kind: Composite");
        let err = parse_template(doc.as_bytes(), "pet-be.yaml").unwrap_err();
        assert!(matches!(err, MeshError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_serialize_secret_layout() {
        let data = BTreeMap::from([
            ("tls.key".to_string(), "S0VZ".to_string()),
            ("tls.crt".to_string(), "Q0VSVA==".to_string()),
        ]);
        let yaml = serialize_secret(&Secret::tls("cust-inst--tls-secret", data)).unwrap();

        assert!(yaml.starts_with("apiVersion: v1\nkind: Secret\n"));
        assert!(yaml.contains("name: cust-inst--tls-secret"));
        assert!(yaml.contains("type: kubernetes.io/tls"));
        let crt = yaml.find("tls.crt").unwrap();
        let key = yaml.find("tls.key").unwrap();
        assert!(crt < key);
    }
}
