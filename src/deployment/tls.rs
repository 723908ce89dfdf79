use k8s_openapi::api::core::v1::{Volume, VolumeMount};
use log::debug;

use super::volumes::{mount, secret_volume};
use crate::models::tls::{ApiTlsSpec, CaSpec, CertService, Endpoint};
use crate::utils::error::Error;

pub const CA_BUNDLE_VOLUME: &str = "combined-ca-bundle";
const CA_BUNDLE_DEFAULT_MODE: i32 = 0o444;
const CA_BUNDLE_MOUNT_PATH: &str = "/etc/pki/ca-trust/extracted/pem/tls-ca-bundle.pem";
const CA_BUNDLE_KEY: &str = "tls-ca-bundle.pem";

const CERT_DEFAULT_MODE: i32 = 0o440;

/// Volumes and mounts of one workload, before and after TLS material is added.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadVolumes {
    pub volumes: Vec<Volume>,
    pub init_volume_mounts: Vec<VolumeMount>,
    pub volume_mounts: Vec<VolumeMount>,
}

impl CertService {
    pub fn volume_name(endpoint: Endpoint) -> String {
        format!("{}-tls-certs", endpoint)
    }

    pub fn create_volume(&self, endpoint: Endpoint) -> Volume {
        secret_volume(
            &Self::volume_name(endpoint),
            &self.secret_name,
            CERT_DEFAULT_MODE,
        )
    }

    pub fn create_volume_mounts(&self, endpoint: Endpoint) -> Vec<VolumeMount> {
        vec![mount(
            &Self::volume_name(endpoint),
            &format!("/var/lib/config-data/tls/{}", endpoint),
            None,
            true,
        )]
    }
}

fn ca_bundle_volume(secret_name: &str) -> Volume {
    secret_volume(CA_BUNDLE_VOLUME, secret_name, CA_BUNDLE_DEFAULT_MODE)
}

fn ca_bundle_volume_mounts() -> Vec<VolumeMount> {
    vec![mount(
        CA_BUNDLE_VOLUME,
        CA_BUNDLE_MOUNT_PATH,
        Some(CA_BUNDLE_KEY),
        true,
    )]
}

/// Adds the CA bundle to the volumes and to both mount sets.
pub fn inject_ca_bundle(ca: &CaSpec, mut base: WorkloadVolumes) -> WorkloadVolumes {
    if let Some(secret_name) = ca.ca_bundle() {
        base.volumes.push(ca_bundle_volume(secret_name));
        base.volume_mounts.extend(ca_bundle_volume_mounts());
        base.init_volume_mounts.extend(ca_bundle_volume_mounts());
    }
    base
}

/// Adds the certificates of every TLS-enabled endpoint to the volumes and main mounts.
///
/// Endpoints are visited in `Endpoint::ALL` order. Nothing is returned if any enabled
/// endpoint fails to resolve.
pub fn inject_endpoint_certs(api: &ApiTlsSpec, mut base: WorkloadVolumes) -> Result<WorkloadVolumes, Error> {
    for endpoint in Endpoint::ALL.iter().copied() {
        if !api.enabled(endpoint) {
            continue;
        }

        let service = api.service(endpoint).to_service(endpoint)?;
        debug!("mounting {} certificates from {}", endpoint, service.secret_name);

        base.volumes.push(service.create_volume(endpoint));
        base.volume_mounts.extend(service.create_volume_mounts(endpoint));
    }

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::{inject_ca_bundle, inject_endpoint_certs, WorkloadVolumes, CA_BUNDLE_VOLUME};
    use crate::deployment::profile::ComponentProfile;
    use crate::deployment::volumes::{init_volume_mounts, volume_mounts, volumes};
    use crate::models::tls::{ApiTlsSpec, CaSpec, GenericService};
    use crate::utils::error::Error;

    fn base() -> WorkloadVolumes {
        let profile = ComponentProfile::cfn_api();
        WorkloadVolumes {
            volumes: volumes(&profile, "heat-cfnapi"),
            init_volume_mounts: init_volume_mounts(&profile),
            volume_mounts: volume_mounts(&profile),
        }
    }

    fn service(secret_name: &str) -> GenericService {
        GenericService {
            secret_name: Some(secret_name.to_string()),
        }
    }

    #[test]
    fn no_ca_bundle_adds_nothing() {
        assert_eq!(inject_ca_bundle(&CaSpec::default(), base()), base());
    }

    #[test]
    fn ca_bundle_is_mounted_everywhere() {
        let ca = CaSpec {
            ca_bundle_secret_name: Some("combined-ca-bundle".to_string()),
        };
        let before = base();
        let after = inject_ca_bundle(&ca, base());

        assert_eq!(after.volumes.len(), before.volumes.len() + 1);
        assert_eq!(after.volumes.last().unwrap().name, CA_BUNDLE_VOLUME);
        assert_eq!(after.volume_mounts.len(), before.volume_mounts.len() + 1);
        assert_eq!(after.init_volume_mounts.len(), before.init_volume_mounts.len() + 1);
        assert_eq!(after.volume_mounts.last().unwrap().name, CA_BUNDLE_VOLUME);
        assert_eq!(after.init_volume_mounts.last().unwrap().name, CA_BUNDLE_VOLUME);
        assert_eq!(&after.volume_mounts[..before.volume_mounts.len()], &before.volume_mounts[..]);
    }

    #[test]
    fn public_certs_skip_init_mounts() {
        let api = ApiTlsSpec {
            public: service("cert-heat-cfnapi-public-svc"),
            ..ApiTlsSpec::default()
        };

        let before = base();
        let after = inject_endpoint_certs(&api, base()).unwrap();

        assert_eq!(after.volumes.len(), before.volumes.len() + 1);
        assert_eq!(after.volume_mounts.len(), before.volume_mounts.len() + 1);
        assert_eq!(after.init_volume_mounts, before.init_volume_mounts);

        let volume = after.volumes.last().unwrap();
        assert_eq!(volume.name, "public-tls-certs");
        assert_eq!(
            volume.secret.as_ref().unwrap().secret_name,
            Some("cert-heat-cfnapi-public-svc".to_string())
        );
        assert_eq!(after.volume_mounts.last().unwrap().mount_path, "/var/lib/config-data/tls/public");
    }

    #[test]
    fn endpoints_follow_fixed_order() {
        let api = ApiTlsSpec {
            internal: service("cert-internal"),
            public: service("cert-public"),
        };

        let after = inject_endpoint_certs(&api, base()).unwrap();
        let added: Vec<&str> = after.volumes[base().volumes.len()..]
            .iter()
            .map(|volume| volume.name.as_str())
            .collect();

        assert_eq!(added, vec!["internal-tls-certs", "public-tls-certs"]);
    }

    #[test]
    fn malformed_reference_fails() {
        let api = ApiTlsSpec {
            internal: service("cert-internal"),
            public: service("Not A Secret"),
        };

        match inject_endpoint_certs(&api, base()) {
            Err(Error::TlsError { endpoint, .. }) => assert_eq!(endpoint, "public"),
            other => panic!("expected TLS error, got {:?}", other),
        }
    }
}
