use stratus_model::DeployObservation;
use tokio::sync::mpsc::Sender;

/// Channel end the polling loops publish observations on.
///
/// Delivery is best-effort: a slow or departed consumer never stalls or
/// fails convergence, observations are dropped instead.
pub type ProgressSender = Sender<DeployObservation>;

pub(crate) fn emit(progress: &ProgressSender, observation: DeployObservation) {
    let _ = progress.try_send(observation);
}
