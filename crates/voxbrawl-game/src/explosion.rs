//! Grenade detonation: area damage to the opposing team, then terrain
//! destruction around the blast centre.

use std::fmt;

use tracing::debug;
use voxbrawl_proto::packets::{BlockAction, BlockActionKind, DamageKind, Packet, SetHp};
use voxbrawl_world::map::{BlockPos, MAX_XY, MAX_Z};

use crate::context::GameContext;
use crate::events::Notification;
use crate::player::{PlayerId, Position};
use crate::team::TeamId;

/// Highest damage a single grenade deals.
pub const GRENADE_MAX_DAMAGE: i32 = 100;

/// Distance beyond which a grenade does no damage.
pub const GRENADE_RADIUS: f32 = 16.0;

/// Distance-to-damage function of a detonation.
pub type DamageFn = Box<dyn Fn(Position) -> i32>;

/// A detonation handed over by the projectile system. Consumed once.
pub struct Grenade {
    pub position: Position,
    /// Team of the player who threw it.
    pub team: TeamId,
    damage: DamageFn,
}

impl Grenade {
    /// Grenade with the standard inverse-square falloff.
    pub fn new(position: Position, team: TeamId) -> Self {
        Self::with_damage(position, team, move |target| falloff_damage(position, target))
    }

    pub fn with_damage(
        position: Position,
        team: TeamId,
        damage: impl Fn(Position) -> i32 + 'static,
    ) -> Self {
        Self {
            position,
            team,
            damage: Box::new(damage),
        }
    }

    /// Damage dealt to a player standing at `target`.
    pub fn damage_at(&self, target: Position) -> i32 {
        (self.damage)(target)
    }

    pub fn in_bounds(&self) -> bool {
        let Position { x, y, z } = self.position;
        let xy = 0.0..=MAX_XY as f32;
        xy.contains(&x) && xy.contains(&y) && (0.0..=MAX_Z as f32).contains(&z)
    }
}

impl fmt::Debug for Grenade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grenade")
            .field("position", &self.position)
            .field("team", &self.team)
            .finish_non_exhaustive()
    }
}

/// `4096 / d²`, at most [`GRENADE_MAX_DAMAGE`], zero outside [`GRENADE_RADIUS`]
/// or when the distance is not finite.
pub fn falloff_damage(center: Position, target: Position) -> i32 {
    let d2 = center.distance_squared(target);
    if !d2.is_finite() || d2 >= GRENADE_RADIUS * GRENADE_RADIUS {
        return 0;
    }
    ((4096.0 / d2.max(1.0)) as i32).min(GRENADE_MAX_DAMAGE)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExplosionRules {
    /// Whether the thrower is caught in their own blast.
    pub self_damage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionOutcome {
    UnknownActor,
    Spectator,
    Nameless,
    OutOfBounds,
    ForeignTeam,
    DeadActor,
    Resolved {
        hits: u32,
        kills: u32,
        blocks_removed: u32,
    },
}

/// Resolve a detonation from the perspective of `actor`.
///
/// Guards run in order and any failure returns before touching the world
/// or any player. Damage is applied before terrain is destroyed.
pub fn resolve_explosion(
    ctx: &mut GameContext,
    actor: PlayerId,
    grenade: &Grenade,
    rules: &ExplosionRules,
) -> ExplosionOutcome {
    let Some(conn) = ctx.roster.get(actor) else {
        debug!("Explosion ignored: unknown actor #{actor}");
        return ExplosionOutcome::UnknownActor;
    };
    let outcome = if ctx.teams.is_spectator(conn.team) {
        Some(ExplosionOutcome::Spectator)
    } else if conn.name.is_none() {
        Some(ExplosionOutcome::Nameless)
    } else if !grenade.in_bounds() {
        Some(ExplosionOutcome::OutOfBounds)
    } else if grenade.team != conn.team {
        Some(ExplosionOutcome::ForeignTeam)
    } else if !conn.is_alive() {
        Some(ExplosionOutcome::DeadActor)
    } else {
        None
    };
    if let Some(outcome) = outcome {
        debug!("Explosion by #{actor} ignored: {outcome:?}");
        return outcome;
    }

    let mut victims: Vec<PlayerId> = ctx
        .teams
        .opponents(conn.team)
        .map(|t| t.members().collect())
        .unwrap_or_default();
    if rules.self_damage {
        victims.push(actor);
    }

    let mut hits = 0;
    let mut kills = 0;
    for victim in victims {
        let Some(target) = ctx.roster.get_mut(victim) else {
            continue;
        };
        if !target.is_alive() {
            continue;
        }
        let damage = grenade.damage_at(target.position);
        if damage <= 0 {
            continue;
        }
        let hp = target.apply_damage(damage);
        let killed = hp == 0;
        hits += 1;
        if killed {
            kills += 1;
        }
        ctx.sink.notify(Notification::SendPacket {
            player: victim,
            packet: Packet::SetHp(SetHp {
                hp: hp.clamp(0, u8::MAX as i32) as u8,
                kind: DamageKind::Weapon,
                source: grenade.position.as_tuple(),
            }),
        });
        ctx.sink.notify(Notification::Hit {
            attacker: actor,
            victim,
            damage,
            killed,
        });
    }

    let center = grenade.position.block();
    let mut removed = 0u32;
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let pos = BlockPos::new(center.x + dx, center.y + dy, center.z + dz);
                let count = ctx.map.destroy_point(pos.x, pos.y, pos.z);
                if count > 0 {
                    ctx.sink.notify(Notification::BlockRemoved { player: actor, pos });
                }
                removed = removed.saturating_add(count);
            }
        }
    }

    if let Some(conn) = ctx.roster.get_mut(actor) {
        conn.total_blocks_removed = conn.total_blocks_removed.saturating_add(removed);
    }

    if removed > 0 {
        ctx.sink.notify(Notification::BroadcastPacket(Packet::BlockAction(
            BlockAction {
                player_id: actor,
                kind: BlockActionKind::GrenadeDestroy,
                x: center.x,
                y: center.y,
                z: center.z,
            },
        )));
        ctx.sink.notify(Notification::EntitiesChanged);
    }

    debug!("Explosion by #{actor}: {hits} hits, {kills} kills, {removed} blocks");
    ExplosionOutcome::Resolved {
        hits,
        kills,
        blocks_removed: removed,
    }
}
