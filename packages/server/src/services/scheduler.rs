//! Per-room phase timers.
//!
//! Each running game owns one tokio task that sleeps through the current
//! phase and then resolves it. The task handle lives in `PhaseScheduler` so the
//! room manager can abort it when the room goes away or a rematch starts.

use std::collections::HashMap;
use std::time::Duration;

use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::{debug, info};

use crate::{
    game::{bot, night, voting, winning_judgement},
    models::{
        event::ServerEvent,
        role::Faction,
        room::{Room, RoomState},
    },
    state::AppState,
};

/// Used when a room is configured with a zero-length phase.
const FALLBACK_PHASE_SECONDS: u64 = 10;

#[derive(Default)]
pub struct PhaseScheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handle` as the room's timer, aborting any previous one.
    /// Handles of loops that already ran to completion are dropped here.
    pub async fn arm(&self, code: &str, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, h| !h.is_finished());
        if let Some(old) = tasks.insert(code.to_string(), handle) {
            old.abort();
        }
    }

    /// Number of timer handles currently held.
    pub async fn tracked(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn cancel(&self, code: &str) {
        if let Some(handle) = self.tasks.lock().await.remove(code) {
            handle.abort();
            debug!(room = %code, "phase timer cancelled");
        }
    }

    pub async fn cancel_all(&self) {
        for (_, handle) in self.tasks.lock().await.drain() {
            handle.abort();
        }
    }

    pub async fn is_running(&self, code: &str) -> bool {
        self.tasks
            .lock()
            .await
            .get(code)
            .map_or(false, |h| !h.is_finished())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// The phase resolved and the room moved on to this one.
    Advanced(RoomState),
    Finished(Faction),
    /// Room is gone or not in a timed phase.
    Stopped,
}

fn phase_duration(room: &Room) -> Option<Duration> {
    let seconds = room.settings.duration_for(room.state)?;
    let seconds = if seconds == 0 {
        FALLBACK_PHASE_SECONDS
    } else {
        seconds
    };
    Some(Duration::from_secs(seconds))
}

/// Entry work for a night or day: announce it and let the bots move.
pub fn enter_phase(state: &AppState, room: &mut Room) {
    let Some(duration) = phase_duration(room) else {
        return;
    };
    if room.state == RoomState::Night {
        room.round += 1;
    }
    state.notifier.broadcast(
        room,
        ServerEvent::PhaseStarted {
            phase: room.state,
            duration: duration.as_secs(),
        },
    );
    let acted = bot::act_all(room, &state.config.bot_tuning, &mut rand::thread_rng());
    info!(room = %room.code, phase = ?room.state, round = room.round, bots = acted, "phase started");
}

/// Timer expiry: resolve the phase that just ran out and move on.
pub async fn expire_phase(state: &AppState, code: &str) -> PhaseStep {
    let mut rooms = state.rooms.lock().await;
    let Some(room) = rooms.get_mut(code) else {
        return PhaseStep::Stopped;
    };

    bot::act_all(room, &state.config.bot_tuning, &mut rand::thread_rng());

    let next = match room.state {
        RoomState::Night => {
            let outcome = night::resolve_night(room);
            for reveal in &outcome.reveals {
                state.notifier.send_to(
                    &reveal.seer,
                    ServerEvent::InspectResult {
                        target: reveal.target.clone(),
                        role: reveal.role,
                    },
                );
            }
            info!(
                room = %code,
                killed = ?outcome.killed,
                saved = ?outcome.saved,
                poisoned = ?outcome.poisoned,
                "night resolved"
            );
            RoomState::Day
        }
        RoomState::Day => {
            let outcome = voting::resolve_day(room);
            info!(room = %code, eliminated = ?outcome.eliminated, ballots = outcome.ballots, "day resolved");
            RoomState::Night
        }
        RoomState::Lobby | RoomState::Ended => return PhaseStep::Stopped,
    };

    if let Some(winner) = winning_judgement::conclude(room) {
        state
            .notifier
            .broadcast(room, ServerEvent::GameOver { winner });
        state.notifier.broadcast_room(room);
        state.store.game_completed(code);
        return PhaseStep::Finished(winner);
    }

    room.state = next;
    state.notifier.broadcast_room(room);
    enter_phase(state, room);
    PhaseStep::Advanced(next)
}

async fn current_duration(state: &AppState, code: &str) -> Option<Duration> {
    let rooms = state.rooms.lock().await;
    rooms.get(code).and_then(phase_duration)
}

async fn run_phase_loop(state: AppState, code: String) {
    while let Some(duration) = current_duration(&state, &code).await {
        sleep(duration).await;
        match expire_phase(&state, &code).await {
            PhaseStep::Advanced(_) => continue,
            PhaseStep::Finished(_) | PhaseStep::Stopped => break,
        }
    }
    debug!(room = %code, "phase loop finished");
}

/// Starts the timer chain for a room that has just entered its first night.
pub async fn start(state: &AppState, code: &str) {
    let handle = tokio::spawn(run_phase_loop(state.clone(), code.to_string()));
    state.scheduler.arm(code, handle).await;
}
