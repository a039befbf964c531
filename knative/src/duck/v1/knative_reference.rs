use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KReference contains enough information to refer to another object.
/// It's a trimmed down version of corev1.ObjectReference.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KReference {
    /// Kind of the referent.
    /// More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds
    pub kind: String,
    /// Namespace of the referent.
    /// More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/namespaces/
    /// This is optional field, it gets defaulted to the object holding it if left out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Name of the referent.
    /// More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names
    pub name: String,
    /// API version of the referent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Group of the API, without the version of the group. This can be used as an alternative to the APIVersion, and then resolved using ResolveGroup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl KReference {
    /// Default the namespace to that of the object holding the reference.
    pub fn set_default_namespace(&mut self, parent_namespace: &str) {
        if self.namespace.as_deref().map_or(true, str::is_empty) {
            self.namespace = Some(parent_namespace.to_string());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn broker() -> KReference {
        KReference {
            kind: "Broker".into(),
            namespace: None,
            name: "default".into(),
            api_version: Some("eventing.knative.dev/v1".into()),
            group: None,
        }
    }

    #[test]
    fn namespace_defaults_to_parent() {
        let mut reference = broker();
        reference.set_default_namespace("ns1");
        assert_eq!(reference.namespace.as_deref(), Some("ns1"));

        reference.namespace = Some("other".into());
        reference.set_default_namespace("ns1");
        assert_eq!(reference.namespace.as_deref(), Some("other"));
    }
}
