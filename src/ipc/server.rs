use crate::controller::{ControllerError, QuestController};
use crate::env::ipc::STOP_REASON_PREFIX;
use crate::ipc::client::IpcClient;
use crate::ipc::types::*;
use crate::quest::{ClassJob, ElementId};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Reason recorded when a quest is started from another tool
pub const IPC_START_REASON: &str = "IPCQuestSelection";

/// Receiving end of the request channel, owned by the tick thread
#[derive(Debug)]
pub struct IpcServer {
    receiver: mpsc::UnboundedReceiver<IpcRequest>,
}

/// Connected client/server pair
pub fn ipc_channel() -> (IpcClient, IpcServer) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (IpcClient::new(sender), IpcServer { receiver })
}

impl IpcServer {
    /// Answer every queued request against `controller`. Call once per tick,
    /// before [`QuestController::tick`]. Returns how many requests were handled.
    pub fn drain(&mut self, controller: &mut QuestController, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(request) = self.receiver.try_recv() {
            handle_request(controller, request, now);
            handled += 1;
        }
        handled
    }
}

fn parse_quest_id(quest_id: &str) -> Option<ElementId> {
    match quest_id.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            debug!("Rejecting IPC quest id: {}", e);
            None
        }
    }
}

// A dropped receiver only means the caller stopped waiting.
fn answer<T>(reply: Reply<T>, value: T) {
    let _ = reply.send(value);
}

pub fn handle_request(controller: &mut QuestController, request: IpcRequest, now: Instant) {
    debug!("Handling IPC request {}", request.name());
    match request {
        IpcRequest::IsRunning(reply) => answer(reply, controller.is_running()),
        IpcRequest::GetCurrentQuestId(reply) => {
            answer(reply, controller.current_quest_id().map(|id| id.to_string()))
        }
        IpcRequest::GetCurrentStepData(reply) => answer(reply, controller.current_step_data()),
        IpcRequest::StartQuest {
            quest_id,
            single,
            reply,
        } => answer(reply, start_quest(controller, &quest_id, single, now)),
        IpcRequest::IsQuestLocked { quest_id, reply } => {
            let locked = match parse_quest_id(&quest_id) {
                Some(id) if controller.registry().is_known_quest(&id) => {
                    controller.services().oracle.is_quest_locked(&id)
                }
                _ => true,
            };
            answer(reply, locked);
        }
        IpcRequest::IsQuestComplete { quest_id, reply } => answer(
            reply,
            parse_quest_id(&quest_id)
                .is_some_and(|id| controller.services().oracle.is_quest_complete(&id)),
        ),
        IpcRequest::IsReadyToAcceptQuest { quest_id, reply } => answer(
            reply,
            parse_quest_id(&quest_id)
                .is_some_and(|id| controller.services().oracle.is_ready_to_accept(&id)),
        ),
        IpcRequest::IsQuestAccepted { quest_id, reply } => answer(
            reply,
            parse_quest_id(&quest_id)
                .is_some_and(|id| controller.services().oracle.is_quest_accepted(&id)),
        ),
        IpcRequest::IsQuestUnobtainable { quest_id, reply } => answer(
            reply,
            parse_quest_id(&quest_id)
                .is_some_and(|id| controller.services().oracle.is_quest_unobtainable(&id)),
        ),
        IpcRequest::ImportQuestPriority { encoded, reply } => {
            let imported = match controller.import_encoded_quest_priority(&encoded) {
                Ok(count) => {
                    info!("Imported {} priority quest(s) over IPC", count);
                    true
                }
                Err(e) => {
                    warn!("Unable to import priority list: {}", e);
                    false
                }
            };
            answer(reply, imported);
        }
        IpcRequest::ClearQuestPriority(reply) => {
            controller.clear_quest_priority();
            answer(reply, true);
        }
        IpcRequest::AddQuestPriority { quest_id, reply } => {
            let added = match parse_quest_id(&quest_id) {
                Some(id) => controller.add_quest_priority(id),
                None => true,
            };
            answer(reply, added);
        }
        IpcRequest::InsertQuestPriority {
            index,
            quest_id,
            reply,
        } => {
            let inserted = match (usize::try_from(index), parse_quest_id(&quest_id)) {
                (Ok(index), Some(id)) => controller.insert_quest_priority(index, id),
                (Err(_), _) => false,
                (Ok(_), None) => true,
            };
            answer(reply, inserted);
        }
        IpcRequest::ExportQuestPriority(reply) => answer(reply, controller.export_quest_priority()),
        IpcRequest::StartGathering {
            gathering_point_id,
            item_id,
            class_job,
            quantity,
            collectability,
            reply,
        } => {
            let started = match (ClassJob::from_id(class_job), u32::try_from(quantity)) {
                (Some(class_job), Ok(quantity)) => controller.start_gathering(
                    gathering_point_id,
                    item_id,
                    class_job,
                    quantity,
                    collectability,
                ),
                _ => {
                    warn!(
                        "Invalid gathering request: class {}, quantity {}",
                        class_job, quantity
                    );
                    false
                }
            };
            answer(reply, started);
        }
        IpcRequest::Stop { label, reply } => {
            controller
                .stop_all_due_to_condition_failed(&format!("{}: {}", STOP_REASON_PREFIX, label));
            answer(reply, true);
        }
    }
}

fn start_quest(controller: &mut QuestController, quest_id: &str, single: bool, now: Instant) -> bool {
    let Some(id) = parse_quest_id(quest_id) else {
        return false;
    };
    match controller.start_quest(id, single, IPC_START_REASON, now) {
        Ok(()) => true,
        Err(e @ (ControllerError::UnknownQuest(_) | ControllerError::QuestDisabled(_))) => {
            info!("Not starting quest over IPC: {}", e);
            false
        }
        // The quest was selected; the failure is already reported as a stop.
        Err(e) => {
            warn!("Quest {} selected over IPC but failed to start: {}", id, e);
            true
        }
    }
}
