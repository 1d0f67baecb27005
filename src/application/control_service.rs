// Control service - Serialized access to the control supervisor
use crate::application::clock::Clock;
use crate::application::control_supervisor::{ControlSupervisor, SupervisorStatus};
use crate::domain::command::{Command, CommandLogEntry, DispatchOutcome};
use crate::domain::control::ControlState;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ControlService {
    supervisor: Arc<Mutex<ControlSupervisor>>,
    clock: Arc<dyn Clock>,
}

impl ControlService {
    pub fn new(supervisor: ControlSupervisor, clock: Arc<dyn Clock>) -> Self {
        Self {
            supervisor: Arc::new(Mutex::new(supervisor)),
            clock,
        }
    }

    pub async fn get_state(&self) -> ControlState {
        self.supervisor.lock().await.state()
    }

    pub async fn status(&self) -> SupervisorStatus {
        self.supervisor.lock().await.status()
    }

    pub async fn dispatch(&self, command: Command) -> DispatchOutcome {
        let mut supervisor = self.supervisor.lock().await;
        supervisor.dispatch(command, self.clock.now()).into()
    }

    pub async fn history(&self) -> Vec<CommandLogEntry> {
        self.supervisor.lock().await.history()
    }
}
