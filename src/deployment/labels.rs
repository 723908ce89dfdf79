use std::collections::BTreeMap;

/// Label key selecting every pod of a service.
pub const APP_SELECTOR: &str = "service";
pub const COMPONENT_SELECTOR: &str = "component";

pub fn service_labels(service_name: &str, component: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(APP_SELECTOR.to_string(), service_name.to_string());
    labels.insert(COMPONENT_SELECTOR.to_string(), component.to_string());
    labels
}
