use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, SecretVolumeSource, Volume, VolumeMount};

use super::profile::ComponentProfile;

const SCRIPTS_VOLUME_DEFAULT_MODE: i32 = 0o755;
const CONFIG_DATA_DEFAULT_MODE: i32 = 0o640;

const SCRIPTS_PATH: &str = "/usr/local/bin/container-scripts";
const CONFIG_DATA_PATH: &str = "/var/lib/config-data/default";
const CONFIG_DATA_MERGED_PATH: &str = "/var/lib/config-data/merged";
const KOLLA_CONFIG_FILE: &str = "/var/lib/kolla/config_files/config.json";
const HTTPD_LOGS_PATH: &str = "/var/log/httpd";

pub fn secret_volume(name: &str, secret_name: &str, default_mode: i32) -> Volume {
    Volume {
        name: name.to_string(),
        secret: Some(SecretVolumeSource {
            secret_name: Some(secret_name.to_string()),
            default_mode: Some(default_mode),
            ..SecretVolumeSource::default()
        }),
        ..Volume::default()
    }
}

fn empty_dir_volume(name: &str) -> Volume {
    Volume {
        name: name.to_string(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Volume::default()
    }
}

pub fn mount(name: &str, mount_path: &str, sub_path: Option<&str>, read_only: bool) -> VolumeMount {
    VolumeMount {
        name: name.to_string(),
        mount_path: mount_path.to_string(),
        sub_path: sub_path.map(str::to_string),
        read_only: Some(read_only),
        ..VolumeMount::default()
    }
}

fn logs_volume_name(service_name: &str) -> String {
    format!("{}-logs", service_name)
}

fn logs_mount(service_name: &str) -> VolumeMount {
    mount(
        &logs_volume_name(service_name),
        &format!("/var/log/{}", service_name),
        None,
        false,
    )
}

fn my_cnf_mount() -> VolumeMount {
    mount("config-data", "/etc/my.cnf", Some("my.cnf"), true)
}

/// Volumes every Heat workload starts from, in a fixed order.
///
/// Secrets are looked up by `instance_name`, the logs volume is named after the service.
pub fn volumes(profile: &ComponentProfile, instance_name: &str) -> Vec<Volume> {
    let mut volumes = vec![
        secret_volume(
            "scripts",
            &format!("{}-scripts", instance_name),
            SCRIPTS_VOLUME_DEFAULT_MODE,
        ),
        secret_volume(
            "config-data",
            &format!("{}-config-data", instance_name),
            CONFIG_DATA_DEFAULT_MODE,
        ),
        empty_dir_volume("config-data-merged"),
        empty_dir_volume(&logs_volume_name(&profile.service_name)),
    ];

    if profile.httpd {
        volumes.push(empty_dir_volume("httpd-logs"));
    }

    volumes
}

/// Mounts for the init container, which renders `config-data` into `config-data-merged`.
pub fn init_volume_mounts(profile: &ComponentProfile) -> Vec<VolumeMount> {
    vec![
        mount("scripts", SCRIPTS_PATH, None, true),
        mount("config-data", CONFIG_DATA_PATH, None, true),
        mount("config-data-merged", CONFIG_DATA_MERGED_PATH, None, false),
        my_cnf_mount(),
        logs_mount(&profile.service_name),
    ]
}

/// Mounts for the main containers. Raw `config-data` is only visible through `my.cnf`.
pub fn volume_mounts(profile: &ComponentProfile) -> Vec<VolumeMount> {
    let mut mounts = vec![
        mount("scripts", SCRIPTS_PATH, None, true),
        mount("config-data-merged", CONFIG_DATA_MERGED_PATH, None, false),
        my_cnf_mount(),
        logs_mount(&profile.service_name),
    ];

    if profile.httpd {
        mounts.push(mount("httpd-logs", HTTPD_LOGS_PATH, None, false));
    }

    mounts
}

/// Main mounts plus the kolla config used by the bootstrap/sync step.
pub fn db_sync_volume_mounts(profile: &ComponentProfile) -> Vec<VolumeMount> {
    let mut mounts = volume_mounts(profile);
    mounts.push(mount(
        "config-data-merged",
        KOLLA_CONFIG_FILE,
        Some("db-sync-config.json"),
        true,
    ));
    mounts
}
