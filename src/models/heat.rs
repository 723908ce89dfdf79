use kube::ResourceExt;
use kube_derive::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::HeatServiceTemplate;
use super::tls::{ApiTlsSpec, CaSpec, TlsSpec};
use crate::deployment::profile::ComponentProfile;

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "heat.openstack.org",
    version = "v1beta1",
    kind = "HeatAPI",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HeatAPISpec {
    #[serde(flatten)]
    pub template: HeatServiceTemplate,

    #[serde(default)]
    pub tls: TlsSpec,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "heat.openstack.org",
    version = "v1beta1",
    kind = "HeatCfnAPI",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HeatCfnAPISpec {
    #[serde(flatten)]
    pub template: HeatServiceTemplate,

    #[serde(default)]
    pub tls: TlsSpec,
}

/// The engine has no HTTP surface, so its TLS configuration is the CA bundle alone.
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "heat.openstack.org",
    version = "v1beta1",
    kind = "HeatEngine",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HeatEngineSpec {
    #[serde(flatten)]
    pub template: HeatServiceTemplate,

    #[serde(default)]
    pub tls: CaSpec,
}

/// Uniform view over the Heat component resources.
pub trait HeatComponent {
    fn instance_name(&self) -> String;
    fn instance_namespace(&self) -> Option<String>;
    fn template(&self) -> &HeatServiceTemplate;
    fn ca(&self) -> &CaSpec;
    /// Endpoint certificates, for components that serve HTTP.
    fn api_tls(&self) -> Option<&ApiTlsSpec>;
    fn profile() -> ComponentProfile;
}

macro_rules! heat_component {
    ($kind:ty, $profile:expr, api_tls) => {
        heat_component!($kind, $profile, {
            fn ca(&self) -> &CaSpec {
                &self.spec.tls.ca
            }

            fn api_tls(&self) -> Option<&ApiTlsSpec> {
                Some(&self.spec.tls.api)
            }
        });
    };
    ($kind:ty, $profile:expr, ca_only) => {
        heat_component!($kind, $profile, {
            fn ca(&self) -> &CaSpec {
                &self.spec.tls
            }

            fn api_tls(&self) -> Option<&ApiTlsSpec> {
                None
            }
        });
    };
    ($kind:ty, $profile:expr, { $($tls:tt)* }) => {
        impl HeatComponent for $kind {
            fn instance_name(&self) -> String {
                self.name()
            }

            fn instance_namespace(&self) -> Option<String> {
                self.namespace()
            }

            fn template(&self) -> &HeatServiceTemplate {
                &self.spec.template
            }

            $($tls)*

            fn profile() -> ComponentProfile {
                $profile
            }
        }
    };
}

heat_component!(HeatAPI, ComponentProfile::api(), api_tls);
heat_component!(HeatCfnAPI, ComponentProfile::cfn_api(), api_tls);
heat_component!(HeatEngine, ComponentProfile::engine(), ca_only);
