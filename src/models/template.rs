use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_replicas() -> i32 {
    1
}

fn default_service_selector() -> String {
    "HeatPassword".to_string()
}

fn default_auth_encryption_key_selector() -> String {
    "HeatAuthEncryptionKey".to_string()
}

/// Keys in the credentials secret.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSelector {
    #[serde(default = "default_service_selector")]
    pub service: String,

    #[serde(default = "default_auth_encryption_key_selector")]
    pub auth_encryption_key: String,
}

impl Default for PasswordSelector {
    fn default() -> Self {
        PasswordSelector {
            service: default_service_selector(),
            auth_encryption_key: default_auth_encryption_key_selector(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
pub struct ResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, String>>,
}

impl ResourceSpec {
    pub fn to_requirements(&self) -> ResourceRequirements {
        let quantities = |values: &Option<BTreeMap<String, String>>| {
            values.as_ref().map(|values| {
                values
                    .iter()
                    .map(|(name, amount)| (name.clone(), Quantity(amount.clone())))
                    .collect()
            })
        };

        ResourceRequirements {
            limits: quantities(&self.limits),
            requests: quantities(&self.requests),
        }
    }
}

/// Settings shared by every Heat component.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatServiceTemplate {
    pub container_image: String,

    #[serde(default = "default_replicas")]
    pub replicas: i32,

    // empty means no constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub resources: ResourceSpec,

    pub service_account: String,

    pub database_hostname: String,

    /// Secret holding the service password and auth encryption key.
    pub secret: String,

    #[serde(default)]
    pub password_selectors: PasswordSelector,

    /// Secret holding the message bus `transport_url`.
    #[serde(rename = "transportURLSecret")]
    pub transport_url_secret: String,
}
