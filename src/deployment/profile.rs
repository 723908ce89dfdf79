pub const SERVICE_NAME: &str = "heat";
pub const DATABASE_NAME: &str = "heat";

pub const API_COMPONENT: &str = "api";
pub const CFN_API_COMPONENT: &str = "cfnapi";
pub const ENGINE_COMPONENT: &str = "engine";

pub const HEAT_INTERNAL_PORT: i32 = 8004;
pub const HEAT_CFN_INTERNAL_PORT: i32 = 8000;

const HTTPD_SERVICE_COMMAND: &str = "/usr/local/bin/kolla_httpd_setup && /usr/local/bin/kolla_start";
const ENGINE_SERVICE_COMMAND: &str = "/usr/local/bin/kolla_start";
const ENGINE_LOG_FILE: &str = "/var/log/heat/heat-engine.log";
const HTTPD_LOG_DIR: &str = "/var/log/httpd";

/// How liveness and readiness of the main container are checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeStrategy {
    /// `GET /` against the internal port.
    Http { port: i32 },
    /// Look for a running process with the given name.
    Process { name: String },
}

/// How the log sidecar follows the component's logs.
#[derive(Debug, Clone, PartialEq)]
pub enum LogTail {
    /// Follow a single file under an init process.
    File(String),
    /// Follow every file below a directory.
    Directory(String),
}

impl LogTail {
    pub fn command(&self) -> (Vec<String>, Vec<String>) {
        match self {
            LogTail::File(path) => (
                vec!["/usr/bin/dumb-init".to_string()],
                vec![
                    "--single-child".to_string(),
                    "--".to_string(),
                    "/usr/bin/tail".to_string(),
                    "-n+1".to_string(),
                    "-F".to_string(),
                    path.clone(),
                ],
            ),
            LogTail::Directory(path) => (
                vec!["/bin/bash".to_string()],
                vec![
                    "-c".to_string(),
                    format!("find {} -type f -exec tail -n+1 -F {{}} +", path),
                ],
            ),
        }
    }
}

/// Everything that differs between the Heat components.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProfile {
    pub service_name: String,
    pub component: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub probe: ProbeStrategy,
    pub log_tail: LogTail,
    /// Whether the component serves httpd and therefore gets an `httpd-logs` volume.
    pub httpd: bool,
}

impl ComponentProfile {
    pub fn api() -> Self {
        Self::httpd_profile(API_COMPONENT, HEAT_INTERNAL_PORT)
    }

    pub fn cfn_api() -> Self {
        Self::httpd_profile(CFN_API_COMPONENT, HEAT_CFN_INTERNAL_PORT)
    }

    pub fn engine() -> Self {
        ComponentProfile {
            service_name: SERVICE_NAME.to_string(),
            component: ENGINE_COMPONENT.to_string(),
            command: vec!["/bin/bash".to_string()],
            args: vec!["-c".to_string(), ENGINE_SERVICE_COMMAND.to_string()],
            probe: ProbeStrategy::Process {
                name: format!("{}-{}", SERVICE_NAME, ENGINE_COMPONENT),
            },
            log_tail: LogTail::File(ENGINE_LOG_FILE.to_string()),
            httpd: false,
        }
    }

    fn httpd_profile(component: &str, port: i32) -> Self {
        ComponentProfile {
            service_name: SERVICE_NAME.to_string(),
            component: component.to_string(),
            command: vec!["/bin/bash".to_string()],
            args: vec!["-c".to_string(), HTTPD_SERVICE_COMMAND.to_string()],
            probe: ProbeStrategy::Http { port },
            log_tail: LogTail::Directory(HTTPD_LOG_DIR.to_string()),
            httpd: true,
        }
    }

    /// `heat-engine`, `heat-api`, ...; names both the workload and its main container.
    pub fn workload_name(&self) -> String {
        format!("{}-{}", self.service_name, self.component)
    }
}
