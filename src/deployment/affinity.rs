use k8s_openapi::api::core::v1::{Affinity, PodAffinityTerm, PodAntiAffinity, WeightedPodAffinityTerm};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};

pub const LABEL_HOSTNAME: &str = "kubernetes.io/hostname";

/// Prefers placing pods of the given services on distinct hosts.
///
/// The term is only a preference, so replicas still schedule onto a shared node when
/// no other node is available.
pub fn distribute_pods(selector_key: &str, selector_values: &[&str], topology_key: &str) -> Affinity {
    let term = WeightedPodAffinityTerm {
        weight: 100,
        pod_affinity_term: PodAffinityTerm {
            label_selector: Some(LabelSelector {
                match_expressions: Some(vec![LabelSelectorRequirement {
                    key: selector_key.to_string(),
                    operator: "In".to_string(),
                    values: Some(selector_values.iter().map(|value| value.to_string()).collect()),
                }]),
                ..LabelSelector::default()
            }),
            topology_key: topology_key.to_string(),
            ..PodAffinityTerm::default()
        },
    };

    Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![term]),
            ..PodAntiAffinity::default()
        }),
        ..Affinity::default()
    }
}
