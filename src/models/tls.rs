use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::Error;

const DNS1123_SUBDOMAIN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$";
const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Network exposure surfaces of a service, each with its own TLS enablement.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    Internal,
    Public,
}

impl Endpoint {
    /// Every endpoint, in the order certificates are mounted.
    pub const ALL: [Endpoint; 2] = [Endpoint::Internal, Endpoint::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Internal => "internal",
            Endpoint::Public => "public",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Certificate service configuration for one endpoint.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericService {
    /// Secret holding `tls.crt` and `tls.key` for the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

/// A certificate service whose secret reference has been validated.
#[derive(Debug, PartialEq, Clone)]
pub struct CertService {
    pub secret_name: String,
}

impl GenericService {
    pub fn enabled(&self) -> bool {
        self.secret_name.is_some()
    }

    /// Resolves the configuration into a certificate service.
    ///
    /// Fails when no secret is referenced or the reference is not a valid secret name.
    pub fn to_service(&self, endpoint: Endpoint) -> Result<CertService, Error> {
        let secret_name = self.secret_name.as_deref().ok_or_else(|| Error::TlsError {
            endpoint: endpoint.to_string(),
            reason: "no certificate secret configured".to_string(),
        })?;

        let valid = Regex::new(DNS1123_SUBDOMAIN).map_err(|err| Error::TlsError {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        })?;
        if secret_name.len() > DNS1123_SUBDOMAIN_MAX_LENGTH || !valid.is_match(secret_name) {
            return Err(Error::TlsError {
                endpoint: endpoint.to_string(),
                reason: format!("invalid certificate secret name {:?}", secret_name),
            });
        }

        Ok(CertService {
            secret_name: secret_name.to_string(),
        })
    }
}

/// Per-endpoint certificate configuration of an HTTP service.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiTlsSpec {
    #[serde(default)]
    pub internal: GenericService,

    #[serde(default)]
    pub public: GenericService,
}

impl ApiTlsSpec {
    pub fn service(&self, endpoint: Endpoint) -> &GenericService {
        match endpoint {
            Endpoint::Internal => &self.internal,
            Endpoint::Public => &self.public,
        }
    }

    pub fn enabled(&self, endpoint: Endpoint) -> bool {
        self.service(endpoint).enabled()
    }
}

/// CA bundle trusted by every container. Not tied to an endpoint.
///
/// This is all the TLS configuration the engine accepts.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle_secret_name: Option<String>,
}

impl CaSpec {
    pub fn ca_bundle(&self) -> Option<&str> {
        self.ca_bundle_secret_name
            .as_deref()
            .filter(|secret_name| !secret_name.is_empty())
    }
}

/// TLS configuration of an HTTP service: endpoint certificates plus the CA bundle.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsSpec {
    #[serde(default)]
    pub api: ApiTlsSpec,

    #[serde(flatten)]
    pub ca: CaSpec,
}
