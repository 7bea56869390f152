use crate::controller::StepData;
use crate::ipc::types::*;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Handle other tools use to talk to the quest controller.
///
/// Calls are queued and answered on the next tick; the returned futures
/// resolve once [`IpcServer::drain`](crate::ipc::IpcServer::drain) has run.
#[derive(Debug, Clone)]
pub struct IpcClient {
    sender: mpsc::UnboundedSender<IpcRequest>,
}

impl IpcClient {
    pub(crate) fn new(sender: mpsc::UnboundedSender<IpcRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> IpcRequest,
    ) -> Result<T, IpcChannelError> {
        let (reply, response) = oneshot::channel();
        let request = build(reply);
        debug!("Sending IPC request {}", request.name());
        self.sender
            .send(request)
            .map_err(|_| IpcChannelError::Closed)?;
        response.await.map_err(|_| IpcChannelError::NoReply)
    }

    pub async fn is_running(&self) -> Result<bool, IpcChannelError> {
        self.call(IpcRequest::IsRunning).await
    }

    pub async fn current_quest_id(&self) -> Result<Option<String>, IpcChannelError> {
        self.call(IpcRequest::GetCurrentQuestId).await
    }

    pub async fn current_step_data(&self) -> Result<Option<StepData>, IpcChannelError> {
        self.call(IpcRequest::GetCurrentStepData).await
    }

    pub async fn start_quest(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::StartQuest {
            quest_id: quest_id.to_string(),
            single: false,
            reply,
        })
        .await
    }

    pub async fn start_single_quest(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::StartQuest {
            quest_id: quest_id.to_string(),
            single: true,
            reply,
        })
        .await
    }

    pub async fn is_quest_locked(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::IsQuestLocked {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn is_quest_complete(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::IsQuestComplete {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn is_ready_to_accept_quest(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::IsReadyToAcceptQuest {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn is_quest_accepted(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::IsQuestAccepted {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn is_quest_unobtainable(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::IsQuestUnobtainable {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn import_quest_priority(&self, encoded: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::ImportQuestPriority {
            encoded: encoded.to_string(),
            reply,
        })
        .await
    }

    pub async fn clear_quest_priority(&self) -> Result<bool, IpcChannelError> {
        self.call(IpcRequest::ClearQuestPriority).await
    }

    pub async fn add_quest_priority(&self, quest_id: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::AddQuestPriority {
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn insert_quest_priority(
        &self,
        index: i32,
        quest_id: &str,
    ) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::InsertQuestPriority {
            index,
            quest_id: quest_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn export_quest_priority(&self) -> Result<String, IpcChannelError> {
        self.call(IpcRequest::ExportQuestPriority).await
    }

    pub async fn start_gathering(
        &self,
        gathering_point_id: u32,
        item_id: u32,
        class_job: u8,
        quantity: i32,
    ) -> Result<bool, IpcChannelError> {
        self.start_gathering_complex(gathering_point_id, item_id, class_job, quantity, 0)
            .await
    }

    pub async fn start_gathering_complex(
        &self,
        gathering_point_id: u32,
        item_id: u32,
        class_job: u8,
        quantity: i32,
        collectability: u16,
    ) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::StartGathering {
            gathering_point_id,
            item_id,
            class_job,
            quantity,
            collectability,
            reply,
        })
        .await
    }

    pub async fn stop(&self, label: &str) -> Result<bool, IpcChannelError> {
        self.call(|reply| IpcRequest::Stop {
            label: label.to_string(),
            reply,
        })
        .await
    }
}
