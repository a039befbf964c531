use super::knative_reference::KReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Destination represents a target of an invocation over HTTP.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Destination {
    /// Ref points to an Addressable.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    ref_: Option<KReference>,
    /// URI can be an absolute URL(non-empty scheme and non-empty host) pointing to the target or a relative URI.
    /// Relative URIs will be resolved using the base URI retrieved from Ref.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<url::Url>,
}

impl From<KReference> for Destination {
    fn from(reference: KReference) -> Self {
        Destination {
            ref_: Some(KReference {
                // combine the group and api_version, handling the case that this was done already
                api_version: match (reference.api_version, reference.group) {
                    (Some(api_version), _) if api_version.contains('/') => Some(api_version),
                    (Some(api_version), Some(group)) => Some(group + "/" + &api_version),
                    (Some(api_version), None) => Some(api_version),
                    (None, _) => None,
                },
                group: None,
                kind: reference.kind,
                namespace: reference.namespace,
                name: reference.name,
            }),
            uri: None,
        }
    }
}

impl From<url::Url> for Destination {
    fn from(uri: url::Url) -> Self {
        Destination {
            ref_: None,
            uri: Some(uri),
        }
    }
}

impl Destination {
    /// The Addressable this destination points to, if any.
    pub fn reference(&self) -> Option<&KReference> {
        self.ref_.as_ref()
    }

    /// A destination must name at least one of a Ref or a URI.
    pub fn is_empty(&self) -> bool {
        self.ref_.is_none() && self.uri.is_none()
    }

    /// Default the namespace of the Ref to that of the object holding the destination.
    pub fn set_defaults(&mut self, parent_namespace: &str) {
        if let Some(reference) = self.ref_.as_mut() {
            reference.set_default_namespace(parent_namespace);
        }
    }
}

/// CloudEventOverrides defines arguments for a Source that control the output
/// format of the CloudEvents produced by the Source.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudEventOverrides {
    /// Extensions specify what attribute are added or overridden on the
    /// outbound event. Each `Extensions` key-value pair are set on the event as
    /// an attribute extension independently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn destination_from_kreference_joins_group() {
        let destination = Destination::from(KReference {
            kind: "Broker".into(),
            namespace: None,
            name: "default".into(),
            api_version: Some("v1".into()),
            group: Some("eventing.knative.dev".into()),
        });
        let reference = destination.reference().unwrap();
        assert_eq!(reference.api_version.as_deref(), Some("eventing.knative.dev/v1"));
        assert_eq!(reference.group, None);
        assert!(!destination.is_empty());
    }

    #[test]
    fn destination_serializes_ref_key() {
        let destination = Destination::from(KReference {
            kind: "Service".into(),
            namespace: Some("ns1".into()),
            name: "event-display".into(),
            api_version: Some("serving.knative.dev/v1".into()),
            group: None,
        });
        assert_eq!(
            serde_json::to_value(&destination).unwrap(),
            json!({
                "ref": {
                    "kind": "Service",
                    "namespace": "ns1",
                    "name": "event-display",
                    "apiVersion": "serving.knative.dev/v1"
                }
            })
        );
        assert!(Destination::default().is_empty());
    }

    #[test]
    fn set_defaults_fills_ref_namespace() {
        let mut destination = Destination::from(KReference {
            kind: "Broker".into(),
            namespace: None,
            name: "default".into(),
            api_version: Some("eventing.knative.dev/v1".into()),
            group: None,
        });
        destination.set_defaults("ns1");
        assert_eq!(
            destination.reference().and_then(|r| r.namespace.as_deref()),
            Some("ns1")
        );

        let mut uri_only = Destination::from("http://example.com".parse::<url::Url>().unwrap());
        uri_only.set_defaults("ns1");
        assert!(uri_only.reference().is_none());
    }

    #[test]
    fn overrides_deserialize_extensions() {
        let overrides: CloudEventOverrides = serde_json::from_value(json!({
            "extensions": { "foo": "bar" }
        }))
        .unwrap();
        let extensions = overrides.extensions.unwrap();
        assert_eq!(extensions.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn empty_overrides_serialize_to_empty_object() {
        assert_eq!(serde_json::to_string(&CloudEventOverrides::default()).unwrap(), "{}");
    }
}
