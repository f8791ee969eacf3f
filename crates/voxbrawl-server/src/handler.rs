//! Owns the world and the roster and feeds inbound events through the game
//! core, one at a time.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use voxbrawl_command::{parse_command_line, CommandContext, CommandRegistry, CommandResult};
use voxbrawl_game::explosion::{resolve_explosion, ExplosionOutcome, ExplosionRules, Grenade};
use voxbrawl_game::line_build::{resolve_line_build, BuildRules, LineBuild, LineBuildOutcome};
use voxbrawl_game::movement::FLOOR_CLEARANCE;
use voxbrawl_game::{
    CommandError, CommandSender, Connection, GameContext, Notification, PlayerId, Position, Roster,
    TeamId, Teams,
};
use voxbrawl_proto::codec::{ProtoDecode, ProtoEncode};
use voxbrawl_proto::error::ProtoError;
use voxbrawl_proto::packets::BlockLine;
use voxbrawl_world::map::{BlockPos, VoxelMap, VoxelSurface};

use crate::config::ServerConfig;
use crate::permissions::PermissionBook;

/// Columns where each combat team spawns.
const BLUE_SPAWN: (f32, f32) = (64.0, 256.0);
const GREEN_SPAWN: (f32, f32) = (448.0, 256.0);
const SPECTATOR_SPAWN: (f32, f32) = (256.0, 256.0);

pub struct GameHandler {
    map: VoxelMap,
    roster: Roster,
    teams: Teams,
    commands: CommandRegistry,
    permissions: PermissionBook,
    explosion_rules: ExplosionRules,
    build_rules: BuildRules,
    spawn_blocks: u32,
    rapid_hack_detect: bool,
    rapid_window_entries: usize,
    rapid_window: Duration,
    outbox: Vec<Notification>,
    tick: u64,
}

impl GameHandler {
    pub fn new(config: &ServerConfig, map: VoxelMap) -> Self {
        Self {
            map,
            roster: Roster::new(),
            teams: Teams::default(),
            commands: CommandRegistry::new(),
            permissions: PermissionBook::from_config(&config.permissions),
            explosion_rules: ExplosionRules {
                self_damage: config.gameplay.grenade_self_damage,
            },
            build_rules: BuildRules {
                max_distance: config.anticheat.max_build_distance,
            },
            spawn_blocks: config.gameplay.max_blocks,
            rapid_hack_detect: config.anticheat.rapid_hack_detect,
            rapid_window_entries: config.anticheat.rapid_window_entries,
            rapid_window: config.anticheat.rapid_window(),
            outbox: Vec::new(),
            tick: 0,
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Add a participant and spawn them. Returns `None` when the server is full.
    pub fn join(&mut self, name: &str, team: TeamId) -> Option<PlayerId> {
        let id = self.roster.next_free_id()?;
        let mut conn = Connection::new(id, name, team)
            .with_rapid_window(self.rapid_window_entries, self.rapid_window);
        conn.rapid_hack_detect = self.rapid_hack_detect;
        self.permissions.apply(&mut conn);
        info!(
            "{name} joined as #{id} (admin: {}, groups: {:?})",
            conn.admin,
            self.permissions.groups_of(name)
        );
        self.roster.insert(conn);
        if !self.teams.assign(&mut self.roster, id, team) {
            warn!("Unknown team {team:?} for {name}, moving to spectators");
            self.teams.assign(&mut self.roster, id, TeamId::SPECTATOR);
        }
        self.respawn(id);
        Some(id)
    }

    pub fn leave(&mut self, player: PlayerId) {
        if let Some(conn) = self.roster.remove(player) {
            self.teams.remove_player(player);
            info!("{} (#{player}) left", conn.display_name());
        }
    }

    /// Put a player back at their team's spawn column, on the ground.
    pub fn respawn(&mut self, player: PlayerId) {
        let Some(conn) = self.roster.get_mut(player) else {
            return;
        };
        let (x, y) = match conn.team {
            TeamId::BLUE => BLUE_SPAWN,
            TeamId::GREEN => GREEN_SPAWN,
            _ => SPECTATOR_SPAWN,
        };
        let z = (self.map.height_at(x as i32, y as i32) - FLOOR_CLEARANCE) as f32;
        conn.respawn(Position::new(x, y, z), self.spawn_blocks);
        debug!("Respawned #{player} at ({x}, {y}, {z})");
    }

    pub fn handle_console_command(&mut self, line: &str) -> CommandResult {
        self.run_command(&CommandSender::console(), line)
    }

    /// Console line with the simulation verbs that stand in for client
    /// traffic: `join`, `leave`, `respawn`, `grenade`, `line`. Anything else
    /// goes to the command registry.
    pub fn handle_console_line(&mut self, line: &str) -> CommandResult {
        let Some((verb, args)) = parse_command_line(line) else {
            return CommandResult::err("Empty command");
        };
        match verb.as_str() {
            "join" => {
                let team = match args.get(1).map(|t| t.to_lowercase()).as_deref() {
                    None | Some("blue") => TeamId::BLUE,
                    Some("green") => TeamId::GREEN,
                    Some(_) => TeamId::SPECTATOR,
                };
                match args.first() {
                    Some(name) => match self.join(name, team) {
                        Some(id) => CommandResult::ok(format!("{name} joined as #{id}")),
                        None => CommandResult::err("Server is full"),
                    },
                    None => CommandResult::err("Usage: join <name> [blue|green|spectator]"),
                }
            }
            "leave" | "respawn" => match self.console_target(&args) {
                Ok(id) => {
                    if verb == "leave" {
                        self.leave(id);
                    } else {
                        self.respawn(id);
                    }
                    CommandResult::done()
                }
                Err(e) => e.into(),
            },
            "grenade" => {
                let coords: Option<[f32; 3]> = parse_floats(args.get(1..).unwrap_or_default());
                match (self.console_target(&args[..args.len().min(1)]), coords) {
                    (Ok(id), Some([x, y, z])) => {
                        let outcome = self.handle_grenade(id, Position::new(x, y, z));
                        CommandResult::ok(format!("{outcome:?}"))
                    }
                    (Err(e), _) => e.into(),
                    _ => CommandResult::err("Usage: grenade <player> <x> <y> <z>"),
                }
            }
            "line" => {
                let coords: Option<[i32; 6]> = parse_ints(args.get(1..).unwrap_or_default());
                match (self.console_target(&args[..args.len().min(1)]), coords) {
                    (Ok(id), Some([x1, y1, z1, x2, y2, z2])) => {
                        self.handle_line_start(id, BlockPos::new(x1, y1, z1));
                        let packet = BlockLine {
                            player_id: id,
                            start: (x1, y1, z1),
                            end: (x2, y2, z2),
                        };
                        let mut payload = Vec::new();
                        packet.proto_encode(&mut payload);
                        match self.handle_block_line(id, &payload) {
                            Ok(outcome) => CommandResult::ok(format!("{outcome:?}")),
                            Err(e) => CommandResult::err(e.to_string()),
                        }
                    }
                    (Err(e), _) => e.into(),
                    _ => CommandResult::err("Usage: line <player> <x1> <y1> <z1> <x2> <y2> <z2>"),
                }
            }
            _ => self.handle_console_command(line),
        }
    }

    fn console_target(&self, args: &[String]) -> Result<PlayerId, CommandError> {
        match args.first() {
            Some(name) => self.roster.find(name),
            None => Err(CommandError::RequiredPlayer),
        }
    }

    pub fn handle_player_command(&mut self, player: PlayerId, line: &str) -> CommandResult {
        let Some(conn) = self.roster.get(player) else {
            return CommandResult::err(format!("Unknown player #{player}"));
        };
        let sender = CommandSender::from_connection(conn);
        self.run_command(&sender, line)
    }

    fn run_command(&mut self, sender: &CommandSender, line: &str) -> CommandResult {
        let Some((name, args)) = parse_command_line(line) else {
            return CommandResult::err("Empty command");
        };
        let mut game = GameContext::new(
            &mut self.map,
            &mut self.roster,
            &self.teams,
            &mut self.outbox,
        );
        let ctx = CommandContext { sender, args };
        self.commands.execute(&mut game, &name, &ctx)
    }

    /// A grenade thrown by `thrower` went off at `position`.
    pub fn handle_grenade(&mut self, thrower: PlayerId, position: Position) -> ExplosionOutcome {
        let team = self
            .roster
            .get(thrower)
            .map_or(TeamId::SPECTATOR, |c| c.team);
        let grenade = Grenade::new(position, team);
        let mut game = GameContext::new(
            &mut self.map,
            &mut self.roster,
            &self.teams,
            &mut self.outbox,
        );
        resolve_explosion(&mut game, thrower, &grenade, &self.explosion_rules)
    }

    /// The client pressed build at `pos`: start a new line there.
    pub fn handle_line_start(&mut self, player: PlayerId, pos: BlockPos) {
        if let Some(conn) = self.roster.get_mut(player) {
            if conn.is_alive() {
                conn.begin_line_build(pos);
            }
        }
    }

    /// Decode a BlockLine packet body from `player` and try to build it.
    pub fn handle_block_line(
        &mut self,
        player: PlayerId,
        mut payload: &[u8],
    ) -> Result<LineBuildOutcome, ProtoError> {
        let packet = BlockLine::proto_decode(&mut payload)?;
        let intent = LineBuild::from(&packet);
        let mut game = GameContext::new(
            &mut self.map,
            &mut self.roster,
            &self.teams,
            &mut self.outbox,
        );
        Ok(resolve_line_build(
            &mut game,
            player,
            &intent,
            Instant::now(),
            &self.build_rules,
        ))
    }

    pub fn game_tick(&mut self) -> Vec<Notification> {
        self.tick += 1;
        self.flush()
    }

    /// Hand everything the core produced to the outbound layer and log it.
    pub fn flush(&mut self) -> Vec<Notification> {
        let events = std::mem::take(&mut self.outbox);
        for event in &events {
            match event {
                Notification::Broadcast(line) => info!("[chat] {line}"),
                Notification::AdminRelay(line) => info!("[admin] {line}"),
                Notification::Private { player, message } => debug!("[to #{player}] {message}"),
                Notification::BroadcastPacket(packet) => {
                    let bytes = packet.to_bytes();
                    debug!("Broadcast packet 0x{:02X} ({} bytes)", packet.id(), bytes.len());
                }
                Notification::SendPacket { player, packet } => {
                    let bytes = packet.to_bytes();
                    debug!(
                        "Packet 0x{:02X} ({} bytes) to #{player}",
                        packet.id(),
                        bytes.len()
                    );
                }
                Notification::Hit {
                    attacker,
                    victim,
                    damage,
                    killed,
                } => {
                    if *killed {
                        info!("#{attacker} killed #{victim} ({damage} damage)");
                    } else {
                        debug!("#{attacker} hit #{victim} for {damage}");
                    }
                }
                Notification::BlockRemoved { player, pos } => {
                    debug!("#{player} removed block at {pos:?}")
                }
                Notification::HackAttempt { player, reason } => {
                    warn!("Hack attempt by #{player}: {reason}")
                }
                Notification::EntitiesChanged => debug!("World entities need re-evaluation"),
            }
        }
        events
    }
}

fn parse_floats<const N: usize>(tokens: &[String]) -> Option<[f32; N]> {
    let values: Vec<f32> = tokens.iter().map(|t| t.parse().ok()).collect::<Option<_>>()?;
    values.try_into().ok()
}

fn parse_ints<const N: usize>(tokens: &[String]) -> Option<[i32; N]> {
    let values: Vec<i32> = tokens.iter().map(|t| t.parse().ok()).collect::<Option<_>>()?;
    values.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use voxbrawl_world::flat_generator::generate_flat;

    fn config(extra: &str) -> ServerConfig {
        let toml_str = format!(
            r#"
            [server]
            name = "test"

            [world]
            generator = "flat"
            seed = 0

            [logging]
            level = "info"

            [permissions]
            admins = ["Admin"]

            [[permissions.groups]]
            name = "mover"
            members = ["Mover"]
            rights = ["move_others"]
            {extra}
            "#
        );
        toml::from_str(&toml_str).unwrap()
    }

    fn handler() -> GameHandler {
        GameHandler::new(&config(""), generate_flat(40))
    }

    fn encode(packet: &BlockLine) -> Vec<u8> {
        let mut buf = Vec::new();
        packet.proto_encode(&mut buf);
        buf
    }

    #[test]
    fn join_applies_permissions_and_spawns() {
        let mut h = handler();
        let admin = h.join("Admin", TeamId::BLUE).unwrap();
        let mover = h.join("Mover", TeamId::GREEN).unwrap();
        assert_eq!((admin, mover), (0, 1));

        let a = h.roster().get(admin).unwrap();
        assert!(a.admin);
        assert_eq!(a.position, Position::new(64.0, 256.0, 38.0));
        let m = h.roster().get(mover).unwrap();
        assert!(!m.admin);
        assert!(m.rights.allows("move_others"));
        assert_eq!(m.blocks, 50);
    }

    #[test]
    fn console_and_player_commands() {
        let mut h = handler();
        let mover = h.join("Mover", TeamId::GREEN).unwrap();
        h.join("Target", TeamId::BLUE).unwrap();

        let result = h.handle_player_command(mover, "/move target A1");
        assert!(result.success, "{:?}", result.messages);
        assert_eq!(
            h.roster().get(1).unwrap().position,
            Position::new(32.0, 32.0, 38.0)
        );

        let result = h.handle_console_command("where mover");
        assert_eq!(result, CommandResult::ok("Mover is in H5 (448, 256, 38)"));

        let events = h.flush();
        assert!(events.contains(&Notification::Broadcast(
            "Mover teleported Target to location A1".into()
        )));
        assert!(h.flush().is_empty());
    }

    #[test]
    fn grenade_hits_opponent_and_digs() {
        let mut h = handler();
        let thrower = h.join("Thrower", TeamId::BLUE).unwrap();
        let victim = h.join("Victim", TeamId::GREEN).unwrap();
        h.handle_console_command(&format!("/moves #{victim} 100 100 30"));
        h.flush();

        let outcome = h.handle_grenade(thrower, Position::new(100.5, 100.5, 40.5));
        assert!(matches!(
            outcome,
            ExplosionOutcome::Resolved {
                hits: 1,
                blocks_removed: 18,
                ..
            }
        ));
        assert!(h.roster().get(victim).unwrap().hp < 100);
        assert_eq!(h.roster().get(thrower).unwrap().total_blocks_removed, 18);
    }

    #[test]
    fn grenade_from_unknown_player_is_ignored() {
        let mut h = handler();
        let outcome = h.handle_grenade(7, Position::new(10.0, 10.0, 10.0));
        assert_eq!(outcome, ExplosionOutcome::UnknownActor);
        assert!(h.flush().is_empty());
    }

    #[test]
    fn block_line_packets() {
        let mut h = handler();
        let builder = h.join("Builder", TeamId::BLUE).unwrap();
        let packet = BlockLine {
            player_id: builder,
            start: (64, 256, 39),
            end: (66, 256, 39),
        };

        // No segment started yet.
        let outcome = h.handle_block_line(builder, &encode(&packet)).unwrap();
        assert_eq!(outcome, LineBuildOutcome::NoActiveSegment);

        h.handle_line_start(builder, BlockPos::new(64, 256, 39));
        let outcome = h.handle_block_line(builder, &encode(&packet)).unwrap();
        assert_eq!(outcome, LineBuildOutcome::Built { placed: 3 });
        assert_eq!(h.roster().get(builder).unwrap().blocks, 47);

        let events = h.flush();
        assert!(events.contains(&Notification::EntitiesChanged));
    }

    #[test]
    fn truncated_block_line_is_an_error() {
        let mut h = handler();
        let builder = h.join("Builder", TeamId::BLUE).unwrap();
        let mut raw = Vec::new();
        raw.put_u8(builder);
        raw.put_i32_le(1);
        assert!(matches!(
            h.handle_block_line(builder, &raw),
            Err(ProtoError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn anticheat_settings_reach_connections() {
        let mut h = GameHandler::new(
            &config("\n[anticheat]\nrapid_hack_detect = false"),
            generate_flat(40),
        );
        let id = h.join("Builder", TeamId::BLUE).unwrap();
        assert!(!h.roster().get(id).unwrap().rapid_hack_detect);
    }

    #[test]
    fn leave_and_tick() {
        let mut h = handler();
        let id = h.join("Quitter", TeamId::GREEN).unwrap();
        h.leave(id);
        assert!(h.roster().is_empty());
        h.game_tick();
        assert_eq!(h.current_tick(), 1);
    }

    #[test]
    fn console_simulation_verbs() {
        let mut h = handler();
        assert_eq!(
            h.handle_console_line("join Red green"),
            CommandResult::ok("Red joined as #0")
        );
        assert_eq!(
            h.handle_console_line("join Blu"),
            CommandResult::ok("Blu joined as #1")
        );

        let result = h.handle_console_line("line blu 64 256 39 66 256 39");
        assert_eq!(result, CommandResult::ok("Built { placed: 3 }"));

        let result = h.handle_console_line("grenade blu 448.5 256.5 40.5");
        assert!(result.success);
        assert!(result.messages[0].starts_with("Resolved"));
        assert!(h.roster().get(0).unwrap().hp < 100);

        let result = h.handle_console_line("grenade blu 1 2");
        assert!(!result.success);
        let result = h.handle_console_line("grenade");
        assert_eq!(
            result,
            CommandResult::err("Both player and target player are required")
        );

        h.handle_console_line("respawn red");
        assert_eq!(h.roster().get(0).unwrap().hp, 100);
        h.handle_console_line("leave red");
        assert_eq!(h.roster().len(), 1);

        let result = h.handle_console_line("where blu");
        assert!(result.success);
    }
}
