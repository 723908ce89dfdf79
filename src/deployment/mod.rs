pub mod affinity;
pub mod db_sync;
pub mod env;
pub mod init;
pub mod labels;
pub mod probes;
pub mod profile;
pub mod tls;
pub mod volumes;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec, SecurityContext, VolumeMount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use log::debug;
use std::collections::BTreeMap;

use self::affinity::{distribute_pods, LABEL_HOSTNAME};
use self::env::{merge_envs, EnvSetter};
use self::init::{HeatInitContainer, InitContainerBuilder, InitContainerDetails};
use self::labels::APP_SELECTOR;
use self::probes::probes;
use self::profile::{ComponentProfile, DATABASE_NAME};
use self::tls::{inject_ca_bundle, inject_endpoint_certs, WorkloadVolumes};
use crate::models::heat::HeatComponent;
use crate::models::template::HeatServiceTemplate;
use crate::models::tls::{ApiTlsSpec, CaSpec, Endpoint};
use crate::utils::error::Error;

/// Matches the default oslo.service graceful_shutdown_timeout.
pub const TERMINATION_GRACE_PERIOD_SECONDS: i64 = 60;

const RUN_AS_USER: i64 = 0;

/// The instance fields a workload is assembled from.
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    pub name: &'a str,
    pub namespace: Option<&'a str>,
    pub template: &'a HeatServiceTemplate,
    pub ca: &'a CaSpec,
    /// `None` for components without HTTP endpoints.
    pub api_tls: Option<&'a ApiTlsSpec>,
}

/// Environment shared by every container of a workload.
pub fn service_envs(config_hash: &str) -> BTreeMap<String, EnvSetter> {
    let mut envs = BTreeMap::new();
    envs.insert("KOLLA_CONFIG_STRATEGY".to_string(), EnvSetter::value("COPY_ALWAYS"));
    envs.insert("CONFIG_HASH".to_string(), EnvSetter::value(config_hash));
    envs
}

/// Init container inputs for an instance, mounting `volume_mounts`.
pub fn init_details(instance: &Instance<'_>, volume_mounts: Vec<VolumeMount>) -> InitContainerDetails {
    let template = instance.template;
    InitContainerDetails {
        container_image: template.container_image.clone(),
        database_host: template.database_hostname.clone(),
        database_name: DATABASE_NAME.to_string(),
        osp_secret: template.secret.clone(),
        user_password_selector: template.password_selectors.service.clone(),
        auth_encryption_key_selector: template.password_selectors.auth_encryption_key.clone(),
        volume_mounts,
        transport_url: template.transport_url_secret.clone(),
    }
}

/// Builds the Deployment of one Heat component from its profile.
pub struct WorkloadAssembler<B = HeatInitContainer> {
    pub profile: ComponentProfile,
    pub init: B,
}

impl WorkloadAssembler<HeatInitContainer> {
    pub fn new(profile: ComponentProfile) -> Self {
        WorkloadAssembler {
            profile,
            init: HeatInitContainer,
        }
    }
}

impl<B: InitContainerBuilder> WorkloadAssembler<B> {
    pub fn with_init(profile: ComponentProfile, init: B) -> Self {
        WorkloadAssembler { profile, init }
    }

    /// Base volumes and mounts of the component with TLS material added.
    pub fn workload_volumes(&self, instance: &Instance<'_>) -> Result<WorkloadVolumes, Error> {
        let base = WorkloadVolumes {
            volumes: volumes::volumes(&self.profile, instance.name),
            init_volume_mounts: volumes::init_volume_mounts(&self.profile),
            volume_mounts: volumes::volume_mounts(&self.profile),
        };

        let with_ca = inject_ca_bundle(instance.ca, base);
        match instance.api_tls {
            Some(api) => inject_endpoint_certs(api, with_ca),
            None => Ok(with_ca),
        }
    }

    /// Assembles the Deployment.
    ///
    /// The only failure is an unresolvable endpoint certificate; nothing is built in that case.
    pub fn assemble(
        &self,
        instance: &Instance<'_>,
        config_hash: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Deployment, Error> {
        let profile = &self.profile;
        let template = instance.template;

        let WorkloadVolumes {
            volumes,
            init_volume_mounts,
            volume_mounts,
        } = self.workload_volumes(instance)?;

        let public_tls = instance
            .api_tls
            .map_or(false, |api| api.enabled(Endpoint::Public));
        let probes = probes(&profile.probe, public_tls);

        let env = merge_envs(vec![], &service_envs(config_hash));
        let resources = template.resources.to_requirements();
        let security_context = SecurityContext {
            run_as_user: Some(RUN_AS_USER),
            ..SecurityContext::default()
        };

        let (log_command, log_args) = profile.log_tail.command();
        let log_container = Container {
            name: format!("{}-log", instance.name),
            command: Some(log_command),
            args: Some(log_args),
            image: Some(template.container_image.clone()),
            security_context: Some(security_context.clone()),
            env: Some(env.clone()),
            volume_mounts: Some(volume_mounts.clone()),
            resources: Some(resources.clone()),
            ..Container::default()
        };

        let main_container = Container {
            name: profile.workload_name(),
            command: Some(profile.command.clone()),
            args: Some(profile.args.clone()),
            image: Some(template.container_image.clone()),
            security_context: Some(security_context),
            env: Some(env),
            volume_mounts: Some(volume_mounts),
            resources: Some(resources),
            liveness_probe: Some(probes.liveness),
            readiness_probe: Some(probes.readiness),
            ..Container::default()
        };

        let node_selector = template
            .node_selector
            .clone()
            .filter(|node_selector| !node_selector.is_empty());

        let init_containers = self
            .init
            .init_containers(&init_details(instance, init_volume_mounts));

        debug!(
            "assembled {} for {} with {} volumes",
            profile.workload_name(),
            instance.name,
            volumes.len()
        );

        Ok(Deployment {
            metadata: ObjectMeta {
                name: Some(profile.workload_name()),
                namespace: instance.namespace.map(str::to_string),
                ..ObjectMeta::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(template.replicas),
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..LabelSelector::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(labels.clone()),
                        ..ObjectMeta::default()
                    }),
                    spec: Some(PodSpec {
                        service_account_name: Some(template.service_account.clone()),
                        containers: vec![log_container, main_container],
                        init_containers: Some(init_containers),
                        termination_grace_period_seconds: Some(TERMINATION_GRACE_PERIOD_SECONDS),
                        volumes: Some(volumes),
                        // co-location is still allowed when no other host fits
                        affinity: Some(distribute_pods(
                            APP_SELECTOR,
                            &[profile.service_name.as_str()],
                            LABEL_HOSTNAME,
                        )),
                        node_selector,
                        ..PodSpec::default()
                    }),
                },
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        })
    }
}

/// Assembles the Deployment of a Heat component resource with the default init container.
pub fn deployment<K: HeatComponent>(
    component: &K,
    config_hash: &str,
    labels: &BTreeMap<String, String>,
) -> Result<Deployment, Error> {
    let name = component.instance_name();
    let namespace = component.instance_namespace();
    let instance = Instance {
        name: &name,
        namespace: namespace.as_deref(),
        template: component.template(),
        ca: component.ca(),
        api_tls: component.api_tls(),
    };

    WorkloadAssembler::new(K::profile()).assemble(&instance, config_hash, labels)
}
