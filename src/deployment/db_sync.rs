use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec, SecurityContext};
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

use super::env::{merge_envs, EnvSetter};
use super::init::InitContainerBuilder;
use super::profile::ComponentProfile;
use super::tls::{inject_ca_bundle, WorkloadVolumes};
use super::volumes::{db_sync_volume_mounts, init_volume_mounts, volumes};
use super::{init_details, service_envs, Instance};

const DB_SYNC_COMMAND: &str = "/usr/local/bin/kolla_set_configs && su -s /bin/sh -c \"heat-manage db_sync\" heat";

pub fn db_sync_job_name(instance_name: &str) -> String {
    format!("{}-db-sync", instance_name)
}

/// Builds the Job that creates or migrates the Heat database schema.
///
/// Runs with the engine's volume layout plus the kolla bootstrap config; endpoint
/// certificates are not needed, the CA bundle is.
pub fn db_sync_job<B: InitContainerBuilder>(
    instance: &Instance<'_>,
    config_hash: &str,
    labels: &BTreeMap<String, String>,
    init: &B,
) -> Job {
    let profile = ComponentProfile::engine();
    let template = instance.template;

    let WorkloadVolumes {
        volumes,
        init_volume_mounts,
        volume_mounts,
    } = inject_ca_bundle(
        instance.ca,
        WorkloadVolumes {
            volumes: volumes(&profile, instance.name),
            init_volume_mounts: init_volume_mounts(&profile),
            volume_mounts: db_sync_volume_mounts(&profile),
        },
    );

    let mut envs = service_envs(config_hash);
    envs.insert("KOLLA_BOOTSTRAP".to_string(), EnvSetter::value("true"));

    let container = Container {
        name: db_sync_job_name(instance.name),
        command: Some(vec!["/bin/bash".to_string()]),
        args: Some(vec!["-c".to_string(), DB_SYNC_COMMAND.to_string()]),
        image: Some(template.container_image.clone()),
        security_context: Some(SecurityContext {
            run_as_user: Some(0),
            ..SecurityContext::default()
        }),
        env: Some(merge_envs(vec![], &envs)),
        volume_mounts: Some(volume_mounts),
        ..Container::default()
    };

    Job {
        metadata: ObjectMeta {
            name: Some(db_sync_job_name(instance.name)),
            namespace: instance.namespace.map(str::to_string),
            labels: Some(labels.clone()),
            ..ObjectMeta::default()
        },
        spec: Some(JobSpec {
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels.clone()),
                    ..ObjectMeta::default()
                }),
                spec: Some(PodSpec {
                    restart_policy: Some("OnFailure".to_string()),
                    service_account_name: Some(template.service_account.clone()),
                    containers: vec![container],
                    init_containers: Some(
                        init.init_containers(&init_details(instance, init_volume_mounts)),
                    ),
                    volumes: Some(volumes),
                    ..PodSpec::default()
                }),
            },
            ..JobSpec::default()
        }),
        ..Job::default()
    }
}
