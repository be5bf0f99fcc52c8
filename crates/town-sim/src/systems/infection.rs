//! Infection System
//!
//! Pairwise contact check over all agents after movement. Flags written
//! earlier in a pass are visible to later pairs of the same pass, so one
//! pass can chain through several agents.

use bevy_ecs::prelude::*;
use town_events::{Point, SimEvent};

use crate::components::agent::{AgentId, Infection, Position};
use crate::components::world::{SimClock, SimParams};
use crate::events::TickEvents;

/// One participant in an infection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: Point,
    pub infected: bool,
}

impl Contact {
    pub fn new(position: Point, infected: bool) -> Self {
        Self { position, infected }
    }
}

/// A transmission that happened during a pass: `(newly infected, source)`
/// as indices into the slice handed to [`update_infections`].
pub type Transmission = (usize, usize);

/// Visit every unordered pair `(i, j)`, `i < j`, in order. When the pair is
/// closer than `contact_radius` and either is infected, both become
/// infected.
pub fn update_infections(contacts: &mut [Contact], contact_radius: f32) -> Vec<Transmission> {
    let mut transmissions = Vec::new();

    for i in 0..contacts.len() {
        for j in (i + 1)..contacts.len() {
            let (a, b) = (contacts[i], contacts[j]);
            if a.infected == b.infected {
                continue;
            }
            if a.position.distance(&b.position) >= contact_radius {
                continue;
            }

            if a.infected {
                contacts[j].infected = true;
                transmissions.push((j, i));
            } else {
                contacts[i].infected = true;
                transmissions.push((i, j));
            }
        }
    }

    transmissions
}

/// System: run one infection pass, ordered by agent ID
pub fn spread_infection(
    params: Res<SimParams>,
    clock: Res<SimClock>,
    mut events: ResMut<TickEvents>,
    mut query: Query<(&AgentId, &Position, &mut Infection)>,
) {
    let mut agents: Vec<_> = query.iter_mut().collect();
    agents.sort_by(|a, b| a.0.cmp(b.0));

    let mut contacts: Vec<Contact> = agents
        .iter()
        .map(|(_, position, infection)| Contact::new(position.0, infection.is_infected()))
        .collect();

    let transmissions = update_infections(&mut contacts, params.contact_radius);

    for (target, source) in transmissions {
        if agents[target].2.infect() {
            tracing::debug!("{} infected by {}", agents[target].0 .0, agents[source].0 .0);
            events.push(SimEvent::Infected {
                tick: clock.current_tick,
                agent_id: agents[target].0 .0.clone(),
                source_id: agents[source].0 .0.clone(),
            });
        }
    }
}
