use fieldcore::prelude::TeamIdentity;
use fieldcore::TeamId;
use log::info;

/// Team identity fixed at startup from configuration.
pub struct StaticIdentity {
    team: TeamId,
}

impl StaticIdentity {
    pub fn new(team: TeamId) -> Self {
        Self { team }
    }
}

impl TeamIdentity for StaticIdentity {
    fn team_id(&self) -> TeamId {
        self.team.clone()
    }

    fn logout(&self) {
        info!("team {} logged out", self.team);
    }
}
