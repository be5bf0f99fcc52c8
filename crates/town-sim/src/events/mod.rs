//! Simulation Events
//!
//! The per-tick event queue and the JSONL frame logger.

pub mod logger;

use bevy_ecs::prelude::*;
use town_events::SimEvent;

pub use logger::FrameLogger;

/// Resource: events emitted since the host last drained them
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    events: Vec<SimEvent>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_events::Point;

    #[test]
    fn test_tick_events_drain() {
        let mut events = TickEvents::new();
        assert!(events.is_empty());

        events.push(SimEvent::Arrived {
            tick: 1,
            agent_id: "commuter_0000".into(),
            position: Point::planar(0.0, 0.0),
            arrivals: 1,
        });
        assert_eq!(events.len(), 1);

        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert!(events.is_empty());
    }
}
