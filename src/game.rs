//! The play loop's per-frame logic, shared by the terminal and headless modes.
//!
//! Adapter actions follow the same decision cycle as [`AgentEnv::step`]: an
//! accepted action waits [`DECISION_FRAMES`] frames, is tapped on the last of
//! them, and is answered with the observation after that frame. By then the
//! move-repeat timer has always passed the move delay, so `left` and `right`
//! are never swallowed by rate limiting. Only one action is in flight at a
//! time; later requests stay queued in the adapter until it is answered.
//!
//! [`AgentEnv::step`]: crate::core::AgentEnv::step

use crate::adapter::protocol::{build_observation, LastEvent};
use crate::adapter::{Adapter, InboundPayload, ServerMessage};
use crate::core::{Session, SessionConfig, SimpleRng};
use crate::types::{AgentAction, Controls, DECISION_FRAMES, TICK_MS};

/// An adapter action waiting for the end of its decision cycle
#[derive(Debug, Clone, Copy)]
struct InFlight {
    client_id: u64,
    seq: u64,
    action: AgentAction,
    frames_left: u32,
    /// Most recent lock during the cycle
    event: Option<LastEvent>,
}

pub struct Game {
    session: Session,
    config: SessionConfig,
    seed: u32,
    in_flight: Option<InFlight>,
}

impl Game {
    pub fn new(config: SessionConfig, seed: u32) -> Self {
        Self {
            session: Session::new(config, SimpleRng::new(seed)),
            config,
            seed,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Start a fresh session with the next seed.
    pub fn reset(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.session = Session::new(self.config, SimpleRng::new(self.seed));
        self.in_flight = None;
    }

    /// Advance one [`TICK_MS`] frame with the player's `controls`, serving
    /// adapter requests when an adapter is attached.
    pub fn frame(&mut self, mut controls: Controls, mut adapter: Option<&mut Adapter>) {
        if let Some(adapter) = adapter.as_deref_mut() {
            self.poll_adapter(adapter);
        }

        let mut last_frame = false;
        if let Some(cycle) = self.in_flight.as_mut() {
            cycle.frames_left = cycle.frames_left.saturating_sub(1);
            if cycle.frames_left == 0 {
                controls.press(cycle.action.command());
                last_frame = true;
            }
        }

        let was_over = self.session.is_game_over();
        self.session.tick(TICK_MS, &controls);
        let event = self.session.take_last_event().map(LastEvent::from);
        let game_over = self.session.is_game_over();
        if !was_over && game_over {
            println!("[Game] Game over, score {}", self.session.score());
        }

        let Some(mut cycle) = self.in_flight.take() else {
            return;
        };
        cycle.event = event.or(cycle.event);
        if !(last_frame || game_over) {
            self.in_flight = Some(cycle);
            return;
        }
        if let Some(adapter) = adapter {
            adapter.reply(cycle.client_id, self.observation(cycle.seq, cycle.event));
        }
    }

    /// Take requests until one action is in flight.
    fn poll_adapter(&mut self, adapter: &mut Adapter) {
        while self.in_flight.is_none() {
            let Some(cmd) = adapter.try_recv() else {
                break;
            };
            match cmd.payload {
                InboundPayload::Action(action) => {
                    self.in_flight = Some(InFlight {
                        client_id: cmd.client_id,
                        seq: cmd.seq,
                        action,
                        frames_left: DECISION_FRAMES,
                        event: None,
                    });
                }
                InboundPayload::Observe => {
                    adapter.reply(cmd.client_id, self.observation(cmd.seq, None));
                }
                InboundPayload::Reset => {
                    self.reset();
                    println!("[Game] Reset by client {}, seed {}", cmd.client_id, self.seed);
                    adapter.reply(cmd.client_id, self.observation(cmd.seq, None));
                }
            }
        }
    }

    fn observation(&self, seq: u64, event: Option<LastEvent>) -> ServerMessage {
        ServerMessage::Observation(build_observation(seq, &self.session.snapshot(), event))
    }
}
