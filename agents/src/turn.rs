use battle_core::{Action, Role};

/// Whose turn it is from one agent's point of view.
///
/// The match host calls every agent once per half-move, so the flag flips on
/// every call. It starts as `role != White`, which makes the first call flip
/// it to true exactly for the side that moves first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TurnTracker {
    role: Role,
    own_turn: bool,
}

/// What a single call to [`TurnTracker::advance`] learned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Turn {
    /// Side that played the received action, if one was received
    pub last_mover: Option<Role>,
    /// True if this call must produce this agent's move
    pub own_turn: bool,
}

impl TurnTracker {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            own_turn: !role.moves_first(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The flag as left by the previous call.
    pub fn own_turn(&self) -> bool {
        self.own_turn
    }

    /// Side that made the most recent half-move. Only meaningful before the
    /// flag is flipped for the current call.
    pub fn last_mover(&self) -> Role {
        if self.own_turn {
            self.role
        } else {
            self.role.opponent()
        }
    }

    /// Attributes the received action and flips the flag.
    pub fn advance(&mut self, last_action: Option<&Action>) -> Turn {
        let last_mover = last_action.map(|_| self.last_mover());
        self.own_turn = !self.own_turn;
        Turn {
            last_mover,
            own_turn: self.own_turn,
        }
    }
}
