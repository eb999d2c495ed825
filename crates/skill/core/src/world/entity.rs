//! Combat entities mutated by action ops.

use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for an entity in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Conventional id for the controllable hero.
    pub const HERO: Self = Self(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity classification used by target-type conditions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    Hero,
    Minion,
    Elite,
    Boss,
}

/// Allegiance. Target selectors only consider entities on another team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Players,
    Monsters,
}

// ============================================================================
// Geometry
// ============================================================================

/// 2D position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing from `self` to `other`, or `None` when they coincide.
    pub fn direction_to(self, other: Vec2) -> Option<Vec2> {
        let len = self.distance(other);
        if len <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new((other.x - self.x) / len, (other.y - self.y) / len))
    }

    /// Unit vector for an angle in radians.
    pub fn from_angle(radians: f32) -> Vec2 {
        Vec2::new(radians.cos(), radians.sin())
    }

    pub fn offset(self, direction: Vec2, distance: f32) -> Vec2 {
        Vec2::new(self.x + direction.x * distance, self.y + direction.y * distance)
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

// ============================================================================
// Resources & Status
// ============================================================================

/// Spendable caster resources checked by resource-threshold conditions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Mana,
    Energy,
    Rage,
}

/// Timed debuff kinds an action can apply.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DebuffKind {
    /// Movement slowed by `magnitude` percent.
    Slow,
    /// Cannot act.
    Stun,
    /// Takes `magnitude` percent extra damage.
    Vulnerable,
}

/// A debuff instance. Active while `now < expires_at`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Debuff {
    pub kind: DebuffKind,
    pub magnitude: u32,
    pub expires_at: u64,
}

/// Mark stacks left on an entity, cashed in by mark-reward payouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkStack {
    pub source: EntityId,
    pub stacks: u32,
    pub expires_at: u64,
}

// ============================================================================
// Entity
// ============================================================================

/// Mutable combat record for one entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub team: Team,
    pub position: Vec2,
    /// Facing angle in radians.
    pub facing: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub debuffs: Vec<Debuff>,
    pub marks: Option<MarkStack>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, team: Team, position: Vec2, max_hp: u32) -> Self {
        Self {
            id,
            kind,
            team,
            position,
            facing: 0.0,
            hp: max_hp,
            max_hp,
            resources: BTreeMap::new(),
            debuffs: Vec::new(),
            marks: None,
        }
    }

    /// Builder: set a resource pool.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceKind, amount: u32) -> Self {
        self.resources.insert(resource, amount);
        self
    }

    /// Builder: set facing angle (radians).
    #[must_use]
    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = facing;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn resource(&self, resource: ResourceKind) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    /// Strongest active magnitude of a debuff kind, if any.
    pub fn debuff(&self, kind: DebuffKind, now: u64) -> Option<u32> {
        self.debuffs
            .iter()
            .filter(|d| d.kind == kind && now < d.expires_at)
            .map(|d| d.magnitude)
            .max()
    }

    /// Active mark stacks at `now`.
    pub fn mark_stacks(&self, now: u64) -> u32 {
        match self.marks {
            Some(mark) if now < mark.expires_at => mark.stacks,
            _ => 0,
        }
    }

    /// Hit points as a per-mille ratio, used for lowest-health ordering.
    pub fn hp_permille(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        ((self.hp as u64 * 1000) / self.max_hp as u64) as u32
    }

    pub fn is_hostile_to(&self, other: &Entity) -> bool {
        self.team != other.team
    }
}
