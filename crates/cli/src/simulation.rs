//! Scripted arena run for generated skills.
//!
//! A hero with every generated skill subscribed faces a fixed pack of
//! monsters. Virtual time advances in fixed ticks; each tick drains the task
//! queue, then emits the scripted events for that instant.

use std::cell::RefCell;
use std::rc::Rc;

use forge::GeneratedSkill;
use serde::Serialize;
use skill_core::{
    Entity, EntityId, EntityKind, EventBus, EventContext, InvocationOutcome, QueueScheduler,
    ResourceKind, Team, Vec2, WalkOutcome, World, execute_assembly, run_due_tasks,
};

const ATTACK_EVERY_MS: u64 = 250;
const CAST_EVERY_MS: u64 = 1_000;
const HIT_TAKEN_EVERY_MS: u64 = 700;
const REGEN_EVERY_MS: u64 = 1_000;
const MONSTER_HIT: u32 = 12;
const LOW_HEALTH_PERMILLE: u32 = 400;

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub duration_ms: u64,
    pub tick_ms: u64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 6_000,
            tick_ms: 50,
            seed: 0,
        }
    }
}

/// Per-skill invocation counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SkillStats {
    pub template_id: String,
    pub signature: String,
    pub event: String,
    pub triggers: u32,
    pub throttled: u32,
    pub completed: u32,
    pub fizzled: u32,
    pub suspended: u32,
    pub actions: u32,
}

impl SkillStats {
    fn record(&mut self, outcome: InvocationOutcome) {
        self.triggers += 1;
        match outcome {
            InvocationOutcome::Throttled(_) => self.throttled += 1,
            InvocationOutcome::Ran(report) => {
                self.actions += report.stats.actions_run;
                match report.outcome {
                    WalkOutcome::Completed => self.completed += 1,
                    WalkOutcome::Fizzled { .. } => self.fizzled += 1,
                    WalkOutcome::Suspended { .. } => self.suspended += 1,
                }
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Survivor {
    pub id: EntityId,
    pub kind: EntityKind,
    pub hp: u32,
    pub max_hp: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub skills: Vec<SkillStats>,
    pub kills: Vec<EntityId>,
    pub survivors: Vec<Survivor>,
    pub hero_hp: u32,
    pub tasks_run: usize,
    pub ended_at: u64,
}

/// Hero at the origin facing east, five monsters spread in front of it.
pub fn spawn_arena(world: &mut World) {
    world.spawn(
        Entity::new(EntityId::HERO, EntityKind::Hero, Team::Players, Vec2::ORIGIN, 100)
            .with_resource(ResourceKind::Mana, 60)
            .with_resource(ResourceKind::Rage, 20)
            .with_resource(ResourceKind::Energy, 10),
    );
    let monsters = [
        (EntityKind::Minion, Vec2::new(3.0, 0.0), 60),
        (EntityKind::Minion, Vec2::new(4.0, 2.0), 60),
        (EntityKind::Minion, Vec2::new(5.0, -2.0), 60),
        (EntityKind::Elite, Vec2::new(7.0, 1.0), 150),
        (EntityKind::Boss, Vec2::new(10.0, 0.0), 400),
    ];
    for (index, (kind, position, hp)) in monsters.into_iter().enumerate() {
        let id = EntityId(index as u32 + 1);
        world.spawn(Entity::new(id, kind, Team::Monsters, position, hp));
    }
}

/// Subscribes every skill to its trigger event with an outcome recorder.
fn subscribe(skills: &[GeneratedSkill], stats: &Rc<RefCell<Vec<SkillStats>>>) -> EventBus {
    let mut bus = EventBus::new();
    for (index, skill) in skills.iter().enumerate() {
        let assembly = skill.assembly.clone();
        let stats = Rc::clone(stats);
        let event = assembly.event.clone();
        bus.subscribe(event, move |ctx: &EventContext, world: &mut World| {
            let outcome = execute_assembly(&assembly, ctx.clone(), world, &QueueScheduler);
            stats.borrow_mut()[index].record(outcome);
        });
    }
    bus
}

pub fn run(skills: &[GeneratedSkill], config: &SimulationConfig) -> SimulationReport {
    let mut world = World::new();
    spawn_arena(&mut world);

    let stats = Rc::new(RefCell::new(
        skills
            .iter()
            .map(|skill| SkillStats {
                template_id: skill.template_id.clone(),
                signature: skill.signature.clone(),
                event: skill.assembly.event.clone(),
                ..SkillStats::default()
            })
            .collect::<Vec<_>>(),
    ));
    let bus = subscribe(skills, &stats);

    let tick = config.tick_ms.max(1);
    let mut kills = Vec::new();
    let mut tasks_run = 0;
    let mut now = 0;

    while now <= config.duration_ms {
        tasks_run += run_due_tasks(&mut world, now, &QueueScheduler);
        let emit = |world: &mut World, event: &str| {
            let ctx = EventContext::new(now, EntityId::HERO, config.seed.wrapping_add(now));
            bus.emit(event, &ctx, world);
        };

        if now % REGEN_EVERY_MS == 0 && now > 0 {
            world.grant_resource(EntityId::HERO, ResourceKind::Mana, 10);
            world.grant_resource(EntityId::HERO, ResourceKind::Rage, 5);
            world.grant_resource(EntityId::HERO, ResourceKind::Energy, 5);
        }
        if now % ATTACK_EVERY_MS == 0 {
            emit(&mut world, "on_attack");
            emit(&mut world, "on_hit");
        }
        if now % CAST_EVERY_MS == 0 {
            emit(&mut world, "on_cast");
        }
        if now % HIT_TAKEN_EVERY_MS == 0 && now > 0 && monsters_alive(&world) {
            world.apply_damage(EntityId::HERO, MONSTER_HIT, now);
            emit(&mut world, "on_damaged");
            let low = world
                .entity(EntityId::HERO)
                .is_some_and(|hero| hero.is_alive() && hero.hp_permille() < LOW_HEALTH_PERMILLE);
            if low {
                emit(&mut world, "on_low_health");
            }
        }

        for dead in std::mem::take(&mut world.pending_deaths) {
            tracing::debug!(%dead, at = now, "entity died");
            if dead == EntityId::HERO {
                continue;
            }
            kills.push(dead);
            emit(&mut world, "on_kill");
        }

        let hero_down = world.entity(EntityId::HERO).is_none_or(|hero| !hero.is_alive());
        if hero_down || !monsters_alive(&world) {
            break;
        }
        now += tick;
    }

    let survivors = world
        .entities
        .values()
        .filter(|e| e.team == Team::Monsters && e.is_alive())
        .map(|e| Survivor {
            id: e.id,
            kind: e.kind,
            hp: e.hp,
            max_hp: e.max_hp,
        })
        .collect();
    let hero_hp = world.entity(EntityId::HERO).map_or(0, |hero| hero.hp);
    drop(bus);
    let skills = Rc::try_unwrap(stats)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone());

    SimulationReport {
        skills,
        kills,
        survivors,
        hero_hp,
        tasks_run,
        ended_at: now.min(config.duration_ms),
    }
}

fn monsters_alive(world: &World) -> bool {
    world
        .entities
        .values()
        .any(|e| e.team == Team::Monsters && e.is_alive())
}
