use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource};
use log::{debug, info};

use crate::deployment::deployment;
use crate::deployment::labels::service_labels;
use crate::models::heat::HeatComponent;
use crate::utils::error::Error;
use crate::utils::hash::config_hash;

pub const FIELD_MANAGER: &str = "heat-operator";

/// Controller reference from a workload to the Heat component resource that owns it.
///
/// Only resources read back from the API server carry a uid; anything else is rejected.
pub fn owner_reference<K: Resource<DynamicType = ()>>(owner: &K) -> Result<OwnerReference, Error> {
    let meta = owner.meta();
    let name = meta
        .name
        .clone()
        .ok_or_else(|| Error::UserInputError(format!("{} has no name", K::kind(&()))))?;
    let uid = meta
        .uid
        .clone()
        .ok_or_else(|| Error::UserInputError(format!("{} {} has no uid", K::kind(&()), name)))?;

    Ok(OwnerReference {
        api_version: K::api_version(&()).to_string(),
        kind: K::kind(&()).to_string(),
        name,
        uid,
        controller: Some(true),
        block_owner_deletion: Some(true),
    })
}

/// Applies the Deployment of a Heat component resource.
pub struct ComponentController {
    client: Client,
}

impl ComponentController {
    pub fn new(client: Client) -> Self {
        ComponentController { client }
    }

    /// Hashes the rendered configuration of an instance.
    ///
    /// # Arguments:
    /// - `name` - Name of the Heat component resource. Its configuration lives in `<name>-config-data`.
    /// - `namespace` - Namespace where the resource and its secret reside.
    pub async fn config_hash(&self, name: &str, namespace: &str) -> Result<String, Error> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get(&format!("{}-config-data", name)).await?;

        Ok(config_hash(&secret.data.unwrap_or_default()))
    }

    /// Assembles the component's Deployment and server-side applies it.
    ///
    /// The Deployment is owned by the component resource, so deleting the resource
    /// garbage-collects it.
    pub async fn apply_deployment<K>(&self, component: &K) -> Result<Deployment, Error>
    where
        K: HeatComponent + Resource<DynamicType = ()>,
    {
        let name = component.instance_name();
        let namespace = component.instance_namespace().ok_or_else(|| {
            Error::UserInputError(format!(
                "Expected {} to be namespaced. Can't deploy to an unknown namespace.",
                name
            ))
        })?;

        let hash = self.config_hash(&name, &namespace).await?;
        debug!("{}/{} config hash {}", namespace, name, hash);

        let profile = K::profile();
        let labels = service_labels(&profile.service_name, &profile.component);

        let mut deployment = deployment(component, &hash, &labels)?;
        deployment.metadata.owner_references = Some(vec![owner_reference(component)?]);

        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &namespace);
        let params = PatchParams::apply(FIELD_MANAGER).force();
        let applied = api
            .patch(&profile.workload_name(), &params, &Patch::Apply(&deployment))
            .await?;

        info!("applied {}/{}", namespace, profile.workload_name());

        Ok(applied)
    }
}
