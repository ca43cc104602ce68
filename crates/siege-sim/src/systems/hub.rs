//! Hub controller: capture-progress state machine for the central objective.
//!
//! The only writer of `HubStats`. Runs after combat so occupant counts
//! reflect this tick's deaths.

use hecs::World;

use siege_core::components::{Health, TankBody};
use siege_core::constants::*;
use siege_core::enums::{Faction, HubState};
use siege_core::events::SimEvent;
use siege_core::state::HubStats;
use siege_core::types::Position;

use crate::match_state::MatchState;
use crate::systems::EPSILON;

/// Advance hub progress given the distinct factions present this tick.
/// Returns the faction that just took ownership, if any.
pub fn update(hub: &mut HubStats, present: &[Faction], dt: f64) -> Option<Faction> {
    match present {
        [] => {
            if hub.owner != Faction::Neutral && hub.capturing == hub.owner {
                hub.progress = (hub.progress + HUB_DECAY_RATE * dt).min(HUB_MAX_PROGRESS);
            } else {
                hub.progress -= HUB_DECAY_RATE * dt;
                if hub.progress <= EPSILON {
                    hub.progress = 0.0;
                    hub.capturing = hub.owner;
                }
            }
            hub.state = if hub.owner != Faction::Neutral {
                HubState::Secured
            } else {
                HubState::Neutral
            };
            None
        }
        [faction] => {
            let faction = *faction;
            if faction != hub.capturing && hub.progress <= 0.0 {
                hub.capturing = faction;
            }
            if faction == hub.capturing {
                hub.progress += HUB_CAPTURE_RATE * dt;
                if hub.progress >= HUB_MAX_PROGRESS - EPSILON {
                    hub.progress = HUB_MAX_PROGRESS;
                }
            } else {
                hub.progress -= HUB_CAPTURE_RATE * dt;
                if hub.progress <= EPSILON {
                    hub.progress = 0.0;
                    hub.capturing = faction;
                }
            }

            let mut captured = None;
            if hub.progress >= HUB_MAX_PROGRESS && hub.capturing != hub.owner {
                hub.owner = hub.capturing;
                hub.repair_timer = HUB_BUFF_REPAIR_INTERVAL;
                captured = Some(hub.owner);
            }
            hub.state = if faction == hub.owner && hub.progress >= HUB_MAX_PROGRESS {
                HubState::Secured
            } else {
                HubState::Capturing
            };
            captured
        }
        _ => {
            hub.state = HubState::Contested;
            None
        }
    }
}

/// Distinct factions with a living tank inside the hub radius, in
/// `Faction::PLAYABLE` order. Neutral tanks never count.
pub fn factions_present(world: &World, center: &Position) -> Vec<Faction> {
    let mut seen = [false; 4];
    for (_e, (body, health, pos)) in world.query::<(&TankBody, &Health, &Position)>().iter() {
        if health.dead || pos.distance_to(center) > HUB_RADIUS {
            continue;
        }
        if let Some(i) = Faction::PLAYABLE.iter().position(|f| *f == body.faction) {
            seen[i] = true;
        }
    }
    Faction::PLAYABLE
        .iter()
        .zip(seen)
        .filter_map(|(f, s)| s.then_some(*f))
        .collect()
}

/// Run the hub controller and the owner's repair pulse.
pub fn run(world: &mut World, state: &mut MatchState, events: &mut Vec<SimEvent>, now: f64) {
    let present = factions_present(world, &state.hub.position);
    if let Some(owner) = update(&mut state.hub, &present, DT) {
        tracing::info!(faction = owner.name(), "hub captured");
        state.alert.raise(
            "HUB CAPTURED",
            &format!("{} controls the hub", owner.name()),
            owner.color(),
            now,
        );
        events.push(SimEvent::HubCaptured { faction: owner });
    }

    let owner = state.hub.owner;
    if owner == Faction::Neutral {
        return;
    }
    state.hub.repair_timer -= DT;
    if state.hub.repair_timer > 0.0 {
        return;
    }
    state.hub.repair_timer += HUB_BUFF_REPAIR_INTERVAL;
    for (_e, (body, health)) in world.query_mut::<(&TankBody, &mut Health)>() {
        if body.faction == owner && !health.dead {
            health.hp = (health.hp + HUB_BUFF_REPAIR).min(health.max_hp);
        }
    }
}
