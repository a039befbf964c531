use super::{SampleSource, SampleSourceSpec};
use knative::apis::Defaultable;

/// The service account used when none is given.
pub const DEFAULT_SERVICE_ACCOUNT_NAME: &str = "default";

impl Defaultable for SampleSource {
    fn set_defaults(&mut self) {
        self.spec.set_defaults();
        let namespace = self.metadata.namespace.as_deref();
        if let (Some(sink), Some(namespace)) = (self.spec.sink.as_mut(), namespace) {
            sink.set_defaults(namespace);
        }
    }
}

impl Defaultable for SampleSourceSpec {
    fn set_defaults(&mut self) {
        if self.service_account_name.as_deref().map_or(true, str::is_empty) {
            self.service_account_name = Some(DEFAULT_SERVICE_ACCOUNT_NAME.to_string());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use knative::knative_reference::KReference;
    use knative::source_types::Destination;

    fn source(service_account_name: Option<&str>) -> SampleSource {
        SampleSource::new(
            "sample",
            SampleSourceSpec {
                service_account_name: service_account_name.map(String::from),
                interval: "10s".into(),
                sink: None,
            },
        )
    }

    #[test]
    fn defaults_unset_service_account() {
        let mut s = source(None);
        s.set_defaults();
        assert_eq!(s.spec.service_account_name.as_deref(), Some("default"));
    }

    #[test]
    fn defaults_empty_service_account() {
        let mut s = source(Some(""));
        s.set_defaults();
        assert_eq!(s.spec.service_account_name.as_deref(), Some("default"));
    }

    #[test]
    fn keeps_given_service_account() {
        let mut s = source(Some("robot"));
        s.set_defaults();
        s.set_defaults();
        assert_eq!(s.spec.service_account_name.as_deref(), Some("robot"));
        assert_eq!(s.spec.interval, "10s");
    }

    #[test]
    fn sink_ref_defaults_to_source_namespace() {
        let mut s = source(Some("robot"));
        s.metadata.namespace = Some("ns1".into());
        s.spec.sink = Some(Destination::from(KReference {
            kind: "Service".into(),
            namespace: None,
            name: "event-display".into(),
            api_version: Some("serving.knative.dev/v1".into()),
            group: None,
        }));
        s.set_defaults();

        let reference = s.spec.sink.as_ref().and_then(Destination::reference).unwrap();
        assert_eq!(reference.namespace.as_deref(), Some("ns1"));
    }
}
