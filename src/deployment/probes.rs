use k8s_openapi::api::core::v1::{ExecAction, HTTPGetAction, Probe};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::profile::ProbeStrategy;

/// Liveness and readiness checks of a main container.
#[derive(Debug, Clone, PartialEq)]
pub struct Probes {
    pub liveness: Probe,
    pub readiness: Probe,
}

// API warm-up is slower than engine startup
fn http_probe(port: i32, tls: bool) -> Probe {
    Probe {
        timeout_seconds: Some(10),
        period_seconds: Some(5),
        initial_delay_seconds: Some(5),
        http_get: Some(HTTPGetAction {
            path: Some("/".to_string()),
            port: IntOrString::Int(port),
            scheme: Some(if tls { "HTTPS" } else { "HTTP" }.to_string()),
            ..HTTPGetAction::default()
        }),
        ..Probe::default()
    }
}

fn process_probe(name: &str) -> Probe {
    Probe {
        timeout_seconds: Some(5),
        period_seconds: Some(5),
        exec: Some(ExecAction {
            command: Some(vec![
                "/usr/bin/pgrep".to_string(),
                "-r".to_string(),
                "DRST".to_string(),
                name.to_string(),
            ]),
        }),
        ..Probe::default()
    }
}

/// Builds the probes for a component.
///
/// `public_tls` selects the HTTPS scheme for HTTP probes even though they target the
/// internal port: the scheme follows the public endpoint's certificate.
pub fn probes(strategy: &ProbeStrategy, public_tls: bool) -> Probes {
    let probe = match strategy {
        ProbeStrategy::Http { port } => http_probe(*port, public_tls),
        ProbeStrategy::Process { name } => process_probe(name),
    };

    Probes {
        liveness: probe.clone(),
        readiness: probe,
    }
}
