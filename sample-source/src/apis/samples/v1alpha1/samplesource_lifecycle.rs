use super::SampleSourceStatus;
use knative::status_types::{Condition, ConditionSet, ConditionType};

const SAMPLE_SOURCE_CONDITION_SET: ConditionSet =
    ConditionSet::living(&[ConditionType::SinkProvided]);

impl SampleSourceStatus {
    /// Set every condition the SampleSource depends on to Unknown, unless already set.
    pub fn init_conditions(&mut self) {
        SAMPLE_SOURCE_CONDITION_SET.initialize(self.status.conditions_mut());
    }

    pub fn get_condition(&self, type_: ConditionType) -> Option<&Condition> {
        self.status.get_condition(type_)
    }

    /// Returns true if the resource is ready overall.
    pub fn is_ready(&self) -> bool {
        self.status
            .conditions
            .as_ref()
            .map_or(false, |c| SAMPLE_SOURCE_CONDITION_SET.is_happy(c))
    }

    /// Record the resolved sink and mark it provided.
    pub fn mark_sink(&mut self, uri: url::Url) {
        self.sink_uri = Some(uri);
        SAMPLE_SOURCE_CONDITION_SET
            .mark_true(self.status.conditions_mut(), ConditionType::SinkProvided);
    }

    /// Clear the sink and mark it not provided.
    pub fn mark_no_sink(&mut self, reason: &str, message: Option<String>) {
        self.sink_uri = None;
        SAMPLE_SOURCE_CONDITION_SET.mark_false(
            self.status.conditions_mut(),
            ConditionType::SinkProvided,
            reason,
            message,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use knative::status_types::ConditionStatus;

    #[test]
    fn initialized_status_is_not_ready() {
        let mut status = SampleSourceStatus::default();
        status.init_conditions();
        assert!(!status.is_ready());
        assert_eq!(
            status.get_condition(ConditionType::SinkProvided).map(|c| c.status),
            Some(ConditionStatus::Unknown)
        );
    }

    #[test]
    fn sink_makes_ready() {
        let mut status = SampleSourceStatus::default();
        status.init_conditions();
        let uri: url::Url = "http://event-display.default.svc.cluster.local".parse().unwrap();
        status.mark_sink(uri.clone());
        assert_eq!(status.sink_uri, Some(uri));
        assert!(status.is_ready());
    }

    #[test]
    fn no_sink_is_not_ready() {
        let mut status = SampleSourceStatus::default();
        status.init_conditions();
        status.mark_sink("http://url".parse().unwrap());
        status.mark_no_sink("SinkNotFound", Some("sink event-display does not exist".into()));
        assert_eq!(status.sink_uri, None);
        assert!(!status.is_ready());
        let ready = status.get_condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason.as_deref(), Some("SinkNotFound"));
    }
}
