use crate::controller::StepData;
use thiserror::Error;
use tokio::sync::oneshot;

/// Reply half of a request
pub type Reply<T> = oneshot::Sender<T>;

/// One call from another tool. Quest ids travel as strings and are parsed on
/// the tick thread; every request carries the sender for its answer.
#[derive(Debug)]
pub enum IpcRequest {
    IsRunning(Reply<bool>),
    GetCurrentQuestId(Reply<Option<String>>),
    GetCurrentStepData(Reply<Option<StepData>>),
    StartQuest {
        quest_id: String,
        single: bool,
        reply: Reply<bool>,
    },
    IsQuestLocked {
        quest_id: String,
        reply: Reply<bool>,
    },
    IsQuestComplete {
        quest_id: String,
        reply: Reply<bool>,
    },
    IsReadyToAcceptQuest {
        quest_id: String,
        reply: Reply<bool>,
    },
    IsQuestAccepted {
        quest_id: String,
        reply: Reply<bool>,
    },
    IsQuestUnobtainable {
        quest_id: String,
        reply: Reply<bool>,
    },
    ImportQuestPriority {
        encoded: String,
        reply: Reply<bool>,
    },
    ClearQuestPriority(Reply<bool>),
    AddQuestPriority {
        quest_id: String,
        reply: Reply<bool>,
    },
    InsertQuestPriority {
        index: i32,
        quest_id: String,
        reply: Reply<bool>,
    },
    ExportQuestPriority(Reply<String>),
    StartGathering {
        gathering_point_id: u32,
        item_id: u32,
        class_job: u8,
        quantity: i32,
        collectability: u16,
        reply: Reply<bool>,
    },
    Stop {
        label: String,
        reply: Reply<bool>,
    },
}

impl IpcRequest {
    /// Call name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            IpcRequest::IsRunning(_) => "IsRunning",
            IpcRequest::GetCurrentQuestId(_) => "GetCurrentQuestId",
            IpcRequest::GetCurrentStepData(_) => "GetCurrentStepData",
            IpcRequest::StartQuest { single: false, .. } => "StartQuest",
            IpcRequest::StartQuest { single: true, .. } => "StartSingleQuest",
            IpcRequest::IsQuestLocked { .. } => "IsQuestLocked",
            IpcRequest::IsQuestComplete { .. } => "IsQuestComplete",
            IpcRequest::IsReadyToAcceptQuest { .. } => "IsReadyToAcceptQuest",
            IpcRequest::IsQuestAccepted { .. } => "IsQuestAccepted",
            IpcRequest::IsQuestUnobtainable { .. } => "IsQuestUnobtainable",
            IpcRequest::ImportQuestPriority { .. } => "ImportQuestPriority",
            IpcRequest::ClearQuestPriority(_) => "ClearQuestPriority",
            IpcRequest::AddQuestPriority { .. } => "AddQuestPriority",
            IpcRequest::InsertQuestPriority { .. } => "InsertQuestPriority",
            IpcRequest::ExportQuestPriority(_) => "ExportQuestPriority",
            IpcRequest::StartGathering { .. } => "StartGathering",
            IpcRequest::Stop { .. } => "Stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpcChannelError {
    #[error("Quest controller is no longer accepting requests")]
    Closed,
    #[error("Quest controller dropped the request without answering")]
    NoReply,
}
