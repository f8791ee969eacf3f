//! Admin list and rights groups from the configuration file.

use std::collections::HashSet;

use tracing::info;
use voxbrawl_game::rights::Rights;
use voxbrawl_game::Connection;

use crate::config::PermissionsSection;

struct Group {
    name: String,
    members: HashSet<String>,
    rights: Rights,
}

/// Who is an admin and which rights each player holds. Names are matched
/// case-insensitively.
pub struct PermissionBook {
    admins: HashSet<String>,
    groups: Vec<Group>,
}

impl PermissionBook {
    pub fn from_config(section: &PermissionsSection) -> Self {
        let lower = |names: &[String]| -> HashSet<String> {
            names.iter().map(|n| n.to_lowercase()).collect()
        };
        let groups: Vec<Group> = section
            .groups
            .iter()
            .map(|g| Group {
                name: g.name.clone(),
                members: lower(&g.members),
                rights: g.rights.iter().cloned().collect(),
            })
            .collect();
        info!(
            "Loaded {} admins and {} rights groups",
            section.admins.len(),
            groups.len()
        );
        Self {
            admins: lower(&section.admins),
            groups,
        }
    }

    pub fn is_admin(&self, name: &str) -> bool {
        self.admins.contains(&name.to_lowercase())
    }

    /// Union of the rights of every group `name` belongs to.
    pub fn rights_for(&self, name: &str) -> Rights {
        let name = name.to_lowercase();
        let mut rights = Rights::new();
        for group in self.groups.iter().filter(|g| g.members.contains(&name)) {
            rights.extend(&group.rights);
        }
        rights
    }

    /// Names of the groups `name` belongs to.
    pub fn groups_of(&self, name: &str) -> Vec<&str> {
        let name = name.to_lowercase();
        self.groups
            .iter()
            .filter(|g| g.members.contains(&name))
            .map(|g| g.name.as_str())
            .collect()
    }

    /// Stamp admin status and rights onto a freshly joined connection.
    pub fn apply(&self, conn: &mut Connection) {
        let Some(name) = conn.name.as_deref() else {
            return;
        };
        conn.admin = self.is_admin(name);
        conn.rights = self.rights_for(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupSection;
    use voxbrawl_game::rights::{MOVE_OTHERS, TELEPORT_OTHER};
    use voxbrawl_game::TeamId;

    fn book() -> PermissionBook {
        PermissionBook::from_config(&PermissionsSection {
            admins: vec!["Alice".into()],
            groups: vec![
                GroupSection {
                    name: "mover".into(),
                    members: vec!["bob".into()],
                    rights: vec![MOVE_OTHERS.into()],
                },
                GroupSection {
                    name: "porter".into(),
                    members: vec!["Bob".into(), "carol".into()],
                    rights: vec![TELEPORT_OTHER.into()],
                },
            ],
        })
    }

    #[test]
    fn admins_match_case_insensitively() {
        let book = book();
        assert!(book.is_admin("alice"));
        assert!(book.is_admin("ALICE"));
        assert!(!book.is_admin("bob"));
    }

    #[test]
    fn rights_are_merged_across_groups() {
        let book = book();
        let bob = book.rights_for("BOB");
        assert!(bob.allows(MOVE_OTHERS));
        assert!(bob.allows(TELEPORT_OTHER));
        assert_eq!(book.groups_of("bob"), vec!["mover", "porter"]);

        let carol = book.rights_for("carol");
        assert!(!carol.allows(MOVE_OTHERS));
        assert!(carol.allows(TELEPORT_OTHER));

        assert_eq!(book.rights_for("dave"), Rights::new());
    }

    #[test]
    fn apply_to_connection() {
        let book = book();
        let mut alice = Connection::new(0, "Alice", TeamId::BLUE);
        book.apply(&mut alice);
        assert!(alice.admin);

        let mut bob = Connection::new(1, "bob", TeamId::GREEN);
        book.apply(&mut bob);
        assert!(!bob.admin);
        assert!(bob.rights.allows(MOVE_OTHERS));

        let mut ghost = Connection::unnamed(2, TeamId::SPECTATOR);
        book.apply(&mut ghost);
        assert!(!ghost.admin);
    }
}
