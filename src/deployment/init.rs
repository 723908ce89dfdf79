use k8s_openapi::api::core::v1::{Container, SecurityContext, VolumeMount};
use std::collections::BTreeMap;

use super::env::{merge_envs, EnvSetter};

const INIT_CONTAINER_COMMAND: &str = "/usr/local/bin/container-scripts/init.sh";
const DATABASE_USER: &str = "heat";

/// Inputs for the containers that render configuration before the service starts.
#[derive(Debug, Clone, PartialEq)]
pub struct InitContainerDetails {
    pub container_image: String,
    pub database_host: String,
    pub database_name: String,
    /// Secret holding the credentials below.
    pub osp_secret: String,
    pub user_password_selector: String,
    pub auth_encryption_key_selector: String,
    pub volume_mounts: Vec<VolumeMount>,
    /// Secret holding the message bus `transport_url`.
    pub transport_url: String,
}

pub trait InitContainerBuilder {
    fn init_containers(&self, details: &InitContainerDetails) -> Vec<Container>;
}

/// Runs the container-scripts `init.sh`, which merges configuration into `config-data-merged`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatInitContainer;

impl InitContainerBuilder for HeatInitContainer {
    fn init_containers(&self, details: &InitContainerDetails) -> Vec<Container> {
        let mut envs = BTreeMap::new();
        envs.insert("DatabaseHost".to_string(), EnvSetter::value(&details.database_host));
        envs.insert("DatabaseName".to_string(), EnvSetter::value(&details.database_name));
        envs.insert("DatabaseUser".to_string(), EnvSetter::value(DATABASE_USER));
        envs.insert(
            "DatabasePassword".to_string(),
            EnvSetter::secret_key(&details.osp_secret, &details.user_password_selector),
        );
        envs.insert(
            "AuthEncryptionKey".to_string(),
            EnvSetter::secret_key(&details.osp_secret, &details.auth_encryption_key_selector),
        );
        envs.insert(
            "TransportURL".to_string(),
            EnvSetter::secret_key(&details.transport_url, "transport_url"),
        );

        vec![Container {
            name: "init".to_string(),
            image: Some(details.container_image.clone()),
            command: Some(vec!["/bin/bash".to_string()]),
            args: Some(vec!["-c".to_string(), INIT_CONTAINER_COMMAND.to_string()]),
            security_context: Some(SecurityContext {
                run_as_user: Some(0),
                ..SecurityContext::default()
            }),
            env: Some(merge_envs(vec![], &envs)),
            volume_mounts: Some(details.volume_mounts.clone()),
            ..Container::default()
        }]
    }
}
