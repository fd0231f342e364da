use serde::{Deserialize, Serialize};

/// Logical actions the simulation understands. Physical key bindings live in
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Run,
    Dash,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Run,
        Action::Dash,
    ];
}

/// Which actions are held during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub run: bool,
    pub dash: bool,
}

impl InputSnapshot {
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut snapshot = Self::default();
        for &action in actions {
            snapshot.set(action, true);
        }
        snapshot
    }

    pub fn held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::Jump => self.jump,
            Action::Run => self.run,
            Action::Dash => self.dash,
        }
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveLeft => self.move_left = held,
            Action::MoveRight => self.move_right = held,
            Action::Jump => self.jump = held,
            Action::Run => self.run = held,
            Action::Dash => self.dash = held,
        }
    }

    /// -1 (left), 0, or +1 (right). Opposing directions cancel.
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.move_left {
            axis -= 1.0;
        }
        if self.move_right {
            axis += 1.0;
        }
        axis
    }

    pub fn is_idle(&self) -> bool {
        Action::ALL.iter().all(|&a| !self.held(a))
    }
}
