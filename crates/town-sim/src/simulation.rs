//! Simulation Driver
//!
//! Owns the ECS world (graph, agents, tuning) and the per-tick schedule.
//! The host calls [`Simulation::tick`] from its own loop; nothing here keeps
//! a timer or reschedules itself.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use town_events::{EdgeKind, Point, SessionHeader, SimEvent, TickFrame};

use crate::components::agent::{
    AgentCounter, AgentId, ArrivalPolicy, Infection, PathFollower,
};
use crate::components::graph::{Edge, RoadGraph};
use crate::components::world::{positive, SimClock, SimParams};
use crate::config::{Config, Variant};
use crate::error::{ConfigError, PathError};
use crate::events::TickEvents;
use crate::output::capture_frame;
use crate::pathfinding::{find_path, Route};
use crate::setup::{self, CityLayout};
use crate::systems::tick_schedule;
use crate::SimRng;

pub struct Simulation {
    world: World,
    schedule: Schedule,
    layout: Option<CityLayout>,
    seed: u64,
    variant: Variant,
    arrival: ArrivalPolicy,
}

impl Simulation {
    /// Validate `config`, build the town and spawn the configured population.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout = setup::create_city(&config.city, config.graph.coordinate_tolerance);
        let mut sim = Self::assemble(
            config.params(),
            layout.graph.clone(),
            config.simulation.seed,
        );
        sim.layout = Some(layout);
        sim.variant = config.simulation.variant;
        sim.arrival = config.commute.arrival;

        match config.simulation.variant {
            Variant::Outbreak => {
                let mut rng = sim.take_rng();
                setup::spawn_outbreak(&mut sim.world, &config.outbreak, &mut rng);
                sim.world.insert_resource(SimRng(rng));
            }
            Variant::Commute => {
                for _ in 0..config.commute.commuters {
                    sim.spawn_random_commuter();
                }
            }
        }

        let agents = sim.agent_count();
        tracing::info!(
            "Session ready: {} variant, seed {}, {} agents, {} edges",
            sim.variant,
            sim.seed,
            agents,
            sim.graph().len()
        );
        Ok(sim)
    }

    /// A driver over a caller-supplied graph with no agents.
    pub fn with_graph(
        params: SimParams,
        graph: RoadGraph,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        positive("graph.coordinate_tolerance", graph.tolerance())?;
        Ok(Self::assemble(params, graph, seed))
    }

    fn assemble(params: SimParams, graph: RoadGraph, seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(params);
        world.insert_resource(graph);
        world.insert_resource(SimClock::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
        world.insert_resource(TickEvents::new());
        world.insert_resource(AgentCounter::new());

        Self {
            world,
            schedule: tick_schedule(),
            layout: None,
            seed,
            variant: Variant::Outbreak,
            arrival: ArrivalPolicy::default(),
        }
    }

    // Take the RNG out to avoid borrow conflicts with the world
    fn take_rng(&mut self) -> SmallRng {
        self.world
            .remove_resource::<SimRng>()
            .map(|r| r.0)
            .unwrap_or_else(|| SmallRng::seed_from_u64(self.seed))
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        self.schedule.run(&mut self.world);
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimClock>().current_tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn params(&self) -> SimParams {
        *self.world.resource::<SimParams>()
    }

    pub fn graph(&self) -> &RoadGraph {
        self.world.resource::<RoadGraph>()
    }

    pub fn layout(&self) -> Option<&CityLayout> {
        self.layout.as_ref()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn set_arrival_policy(&mut self, policy: ArrivalPolicy) {
        self.arrival = policy;
    }

    /// Spawn a free-walking blob.
    pub fn spawn_blob(&mut self, position: Point, infected: bool) -> Entity {
        setup::spawn_blob(&mut self.world, position, infected)
    }

    /// Route from `start` to `target` and spawn a commuter on it. A failed
    /// route is logged and skipped.
    pub fn spawn_path_agent(&mut self, start: Point, target: Point) -> Option<Entity> {
        let result = find_path(self.graph(), start, target);
        match result {
            Ok(route) => Some(self.spawn_on_route(route)),
            Err(e) => {
                self.skip_spawn(start, target, &e);
                None
            }
        }
    }

    /// Spawn a commuter on an already computed route.
    pub fn spawn_on_route(&mut self, route: Route) -> Entity {
        let hops = route.hops();
        let entity = setup::spawn_commuter(&mut self.world, route, self.arrival);
        tracing::debug!("Spawned commuter with a {}-edge route", hops);
        entity
    }

    /// Pick two distinct connector doors at random and send a commuter
    /// between them.
    pub fn spawn_random_commuter(&mut self) -> Option<Entity> {
        let mut rng = self.take_rng();
        let picked = {
            let graph = self.world.resource::<RoadGraph>();
            pick_doors(graph, &mut rng)
        };
        self.world.insert_resource(SimRng(rng));

        match picked {
            Ok((start, target)) => self.spawn_path_agent(start, target),
            Err(e) => {
                let (from, to) = match e {
                    PathError::NoPathFound { from, to } => (from, to),
                    PathError::EmptyGraph => (Point::default(), Point::default()),
                };
                self.skip_spawn(from, to, &e);
                None
            }
        }
    }

    fn skip_spawn(&mut self, from: Point, to: Point, error: &PathError) {
        tracing::warn!("Skipping path agent: {}", error);
        let tick = self.current_tick();
        self.world.resource_mut::<TickEvents>().push(SimEvent::PathUnavailable {
            tick,
            from,
            to,
            reason: error.to_string(),
        });
    }

    /// Renderer-facing state of every agent.
    pub fn frame(&mut self) -> TickFrame {
        capture_frame(&mut self.world)
    }

    /// Events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<TickEvents>().drain()
    }

    pub fn agent_count(&mut self) -> usize {
        self.world.query::<&AgentId>().iter(&self.world).count()
    }

    pub fn infected_count(&mut self) -> usize {
        self.world
            .query::<&Infection>()
            .iter(&self.world)
            .filter(|i| i.is_infected())
            .count()
    }

    /// Path-follow state of one agent.
    pub fn follower(&self, entity: Entity) -> Option<&PathFollower> {
        self.world.get::<PathFollower>(entity)
    }

    pub fn header(&mut self) -> SessionHeader {
        let agents = self.agent_count();
        SessionHeader::new(self.seed, self.variant.as_str(), agents, self.graph().len())
    }
}

/// Two connector doors at different graph nodes. Duplicate connectors and
/// connectors sharing a door count as one door.
fn pick_doors(graph: &RoadGraph, rng: &mut SmallRng) -> Result<(Point, Point), PathError> {
    let start = graph
        .random_edge_of(EdgeKind::Connector, rng)
        .ok_or(PathError::EmptyGraph)?
        .start;
    let start_key = graph.key(&start);

    let others: Vec<Point> = graph
        .edges_of(EdgeKind::Connector)
        .map(|e| e.start)
        .filter(|door| graph.key(door) != start_key)
        .collect();
    let target = others.choose(rng).copied().ok_or(PathError::NoPathFound {
        from: start,
        to: start,
    })?;
    Ok((start, target))
}

/// Host-side controls: play/stop, path visibility and staged
/// reconfiguration that applies on the next restart.
pub struct Session {
    simulation: Simulation,
    config: Config,
    pending: Option<Config>,
    playing: bool,
    show_paths: bool,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let simulation = Simulation::new(&config)?;
        Ok(Self {
            simulation,
            config,
            pending: None,
            playing: true,
            show_paths: false,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip play/stop; returns the new state.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn show_paths(&self) -> bool {
        self.show_paths
    }

    pub fn set_show_paths(&mut self, visible: bool) {
        self.show_paths = visible;
    }

    /// Edges for the renderer to draw, if path display is on.
    pub fn visible_edges(&self) -> Option<std::slice::Iter<'_, Edge>> {
        self.show_paths.then(|| self.simulation.graph().all_edges())
    }

    /// Run one tick if playing. Returns whether a tick ran.
    pub fn advance(&mut self) -> bool {
        if self.playing {
            self.simulation.tick();
        }
        self.playing
    }

    /// Stage a new configuration; it is validated now and applied by
    /// [`Session::restart`].
    pub fn reconfigure(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.pending = Some(config);
        Ok(())
    }

    pub fn has_pending_config(&self) -> bool {
        self.pending.is_some()
    }

    /// Rebuild the session from the staged config (or the current one).
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let config = self.pending.take().unwrap_or_else(|| self.config.clone());
        self.simulation = Simulation::new(&config)?;
        self.config = config;
        tracing::info!("Session restarted");
        Ok(())
    }
}
