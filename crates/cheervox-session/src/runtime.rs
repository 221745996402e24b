use crate::coordinator::{AssistantCommand, SessionCoordinator, SessionStatus};
use cheervox_trigger::TriggerGate;
use cheervox_types::{AssistantEvent, ChatEvent, StartedCall};
use cheervox_voice::AssistantClient;
use std::sync::Arc;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Inputs buffered ahead of the coordinator task.
const INPUT_CHANNEL_SIZE: usize = 256;

/// Everything the coordinator task reacts to, funnelled through one channel
/// so it is handled strictly in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorInput {
    Chat(ChatEvent),
    Assistant(AssistantEvent),
    SessionCreated(StartedCall),
    StartFailed(String),
    SendFailed { username: String, reason: String },
    Shutdown,
}

/// Owner's handle on a running coordinator.
#[derive(Debug)]
pub struct CoordinatorHandle {
    inputs: mpsc::Sender<CoordinatorInput>,
    status: watch::Receiver<SessionStatus>,
    task: JoinHandle<TriggerGate>,
}

impl CoordinatorHandle {
    /// A sender for producers that outlive a borrow of the handle.
    pub fn sender(&self) -> mpsc::Sender<CoordinatorInput> {
        self.inputs.clone()
    }

    pub async fn send(&self, input: CoordinatorInput) -> Result<(), SendError<CoordinatorInput>> {
        self.inputs.send(input).await
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    /// Ends any open session, waits for outstanding assistant calls, and
    /// returns the gate so its recency history can seed the next coordinator.
    pub async fn shutdown(self) -> Option<TriggerGate> {
        if self.inputs.send(CoordinatorInput::Shutdown).await.is_err() {
            debug!("coordinator already stopped before shutdown");
        }
        drop(self.inputs);
        match self.task.await {
            Ok(gate) => Some(gate),
            Err(e) => {
                error!(error = %e, "coordinator task failed");
                None
            }
        }
    }
}

/// Spawns the coordinator task and its assistant worker.
///
/// The coordinator task owns the gate, the queue, and the session state; no
/// other task touches them. Assistant calls run on a separate worker in
/// command order, and their failures come back as inputs.
pub fn spawn_coordinator(gate: TriggerGate, client: Arc<dyn AssistantClient>) -> CoordinatorHandle {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_SIZE);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let coordinator = SessionCoordinator::new(gate.config().assistant_id.clone());
    let (status_tx, status_rx) = watch::channel(coordinator.status());

    let worker = tokio::spawn(run_worker(client, command_rx, input_tx.downgrade()));
    let task = tokio::spawn(run_coordinator(
        gate,
        coordinator,
        input_rx,
        command_tx,
        status_tx,
        worker,
    ));

    CoordinatorHandle {
        inputs: input_tx,
        status: status_rx,
        task,
    }
}

async fn run_coordinator(
    mut gate: TriggerGate,
    mut coordinator: SessionCoordinator,
    mut inputs: mpsc::Receiver<CoordinatorInput>,
    commands: mpsc::UnboundedSender<AssistantCommand>,
    status: watch::Sender<SessionStatus>,
    worker: JoinHandle<()>,
) -> TriggerGate {
    loop {
        let deadline = coordinator.next_deadline().map(Instant::from_std);
        let turn_elapsed = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        let command = tokio::select! {
            input = inputs.recv() => {
                let now = Instant::now().into_std();
                match input {
                    Some(CoordinatorInput::Chat(event)) => gate
                        .admit(&event, now)
                        .and_then(|username| coordinator.enqueue(username)),
                    Some(CoordinatorInput::Assistant(event)) => coordinator.handle_event(event, now),
                    Some(CoordinatorInput::SessionCreated(call)) => {
                        coordinator.session_created(call);
                        None
                    }
                    Some(CoordinatorInput::StartFailed(reason)) => {
                        warn!(error = %reason, "assistant session failed to start");
                        coordinator.start_failed()
                    }
                    Some(CoordinatorInput::SendFailed { username, reason }) => {
                        warn!(username = %username, error = %reason, "user context delivery failed");
                        coordinator.send_failed(&username)
                    }
                    Some(CoordinatorInput::Shutdown) | None => break,
                }
            }
            _ = turn_elapsed => coordinator.poll_turn(Instant::now().into_std()),
        };

        if let Some(command) = command {
            dispatch(&commands, command);
        }
        status.send_replace(coordinator.status());
    }

    info!("coordinator shutting down");
    if let Some(command) = coordinator.shutdown() {
        dispatch(&commands, command);
    }
    status.send_replace(coordinator.status());

    // The worker may be blocked reporting a failure; closing the input side
    // releases it.
    drop(inputs);
    drop(commands);
    if let Err(e) = worker.await {
        error!(error = %e, "assistant worker failed");
    }
    gate
}

fn dispatch(commands: &mpsc::UnboundedSender<AssistantCommand>, command: AssistantCommand) {
    if commands.send(command).is_err() {
        error!("assistant worker is gone, dropping command");
    }
}

async fn run_worker(
    client: Arc<dyn AssistantClient>,
    mut commands: mpsc::UnboundedReceiver<AssistantCommand>,
    feedback: mpsc::WeakSender<CoordinatorInput>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            AssistantCommand::StartSession { assistant_id } => {
                info!(assistant_id = %assistant_id, "starting assistant session");
                let input = match client.start_session(&assistant_id).await {
                    Ok(call) => CoordinatorInput::SessionCreated(call),
                    Err(e) => CoordinatorInput::StartFailed(e.to_string()),
                };
                report(&feedback, input).await;
            }
            AssistantCommand::SendUserContext { username } => {
                if let Err(e) = client.send_user_context(&username).await {
                    let reason = e.to_string();
                    report(&feedback, CoordinatorInput::SendFailed { username, reason }).await;
                }
            }
            AssistantCommand::EndSession => {
                info!("ending assistant session");
                if let Err(e) = client.end_session().await {
                    warn!(error = %e, "failed to end assistant session");
                }
            }
        }
    }
}

async fn report(feedback: &mpsc::WeakSender<CoordinatorInput>, input: CoordinatorInput) {
    let Some(sender) = feedback.upgrade() else {
        debug!(input = ?input, "coordinator gone, dropping assistant feedback");
        return;
    };
    if let Err(e) = sender.send(input).await {
        debug!(input = ?e.0, "coordinator stopped, dropping assistant feedback");
    }
}
