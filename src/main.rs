use futures::future::join3;
use futures::stream::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::Resource;
use kube::{api::ListParams, client::Client, Api};
use kube_runtime::controller::{Context, ReconcilerAction};
use kube_runtime::Controller;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use heat_operator::controllers::component::ComponentController;
use heat_operator::models::heat::{HeatAPI, HeatCfnAPI, HeatComponent, HeatEngine};
use heat_operator::utils::config::OperatorConfig;
use heat_operator::utils::error::Error;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match OperatorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    // First, a Kubernetes client must be obtained using the `kube` crate
    // The client will later be moved to the custom controllers
    let kubernetes_client: Client = match Client::try_default().await {
        Ok(client) => client,
        Err(err) => {
            error!("Expected a valid KUBECONFIG environment variable: {}", err);
            std::process::exit(1);
        }
    };

    info!("starting heat-operator with {:?}", config);

    join3(
        run_controller::<HeatAPI>(kubernetes_client.clone(), &config),
        run_controller::<HeatCfnAPI>(kubernetes_client.clone(), &config),
        run_controller::<HeatEngine>(kubernetes_client, &config),
    )
    .await;
}

fn scoped_api<K>(client: Client, config: &OperatorConfig) -> Api<K>
where
    K: Resource<DynamicType = ()>,
{
    match &config.watch_namespace {
        Some(namespace) => Api::namespaced(client, namespace),
        None => Api::all(client),
    }
}

/// Runs the controller for one Heat component kind until the watch ends.
///
/// The controller also watches the Deployments it owns, so drift on a Deployment
/// triggers reconciliation of its owner.
async fn run_controller<K>(client: Client, config: &OperatorConfig)
where
    K: HeatComponent
        + Resource<DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
{
    let crd_api: Api<K> = scoped_api(client.clone(), config);
    let deployment_api: Api<Deployment> = scoped_api(client.clone(), config);
    let context: Context<ContextData> = Context::new(ContextData::new(client, config.clone()));

    Controller::new(crd_api, ListParams::default())
        .owns(deployment_api, ListParams::default())
        .run(reconcile::<K>, on_error, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok((object, _)) => {
                    info!("Reconciliation successful. Resource: {:?}", object);
                }
                Err(reconciliation_err) => {
                    warn!("Reconciliation error: {:?}", reconciliation_err)
                }
            }
        })
        .await;
}

/// Context injected with each `reconcile` and `on_error` method invocation.
struct ContextData {
    controller: ComponentController,
    config: OperatorConfig,
}

impl ContextData {
    /// Constructs a new instance of ContextData.
    ///
    /// # Arguments:
    /// - `client`: A Kubernetes client to make Kubernetes REST API requests with. Deployments
    /// will be applied with this client.
    /// - `config`: Requeue settings.
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        let controller = ComponentController::new(client);
        ContextData { controller, config }
    }
}

/// Action to be taken upon a Heat component resource during reconciliation
enum Action {
    /// Assemble the Deployment and apply it
    Apply,
    /// The resource is being deleted; its Deployment is garbage collected through the owner reference
    NoOp,
}

async fn reconcile<K>(component: K, context: Context<ContextData>) -> Result<ReconcilerAction, Error>
where
    K: HeatComponent + Resource<DynamicType = ()>,
{
    let data = context.get_ref();

    match determine_action(&component) {
        Action::Apply => {
            data.controller.apply_deployment(&component).await?;

            Ok(ReconcilerAction {
                requeue_after: Some(data.config.requeue_after),
            })
        }
        Action::NoOp => Ok(ReconcilerAction {
            requeue_after: None,
        }),
    }
}

/// Resources arrive into the reconciliation queue in a certain state. This function looks at
/// the state of the given resource and decides which action needs to be performed.
fn determine_action<K: Resource>(component: &K) -> Action {
    if component.meta().deletion_timestamp.is_some() {
        Action::NoOp
    } else {
        Action::Apply
    }
}

/// Actions to be taken when a reconciliation fails - for whatever reason.
/// Logs the error and requeues the resource after the configured error delay.
fn on_error(error: &Error, context: Context<ContextData>) -> ReconcilerAction {
    warn!("Reconciliation error:\n{:?}", error);
    ReconcilerAction {
        requeue_after: Some(context.get_ref().config.error_requeue_after),
    }
}
