//! Named capabilities granted to a player on top of the admin flag.

use std::collections::BTreeMap;

/// Move another player with `/move` or `/moves`.
pub const MOVE_OTHERS: &str = "move_others";

/// Teleport one player to another with `/teleport` or `/tpsilent`.
pub const TELEPORT_OTHER: &str = "teleport_other";

/// Mapping from right name to whether it is granted. Unknown rights are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rights {
    granted: BTreeMap<String, bool>,
}

impl Rights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, right: impl Into<String>) {
        self.granted.insert(right.into(), true);
    }

    pub fn allows(&self, right: &str) -> bool {
        self.granted.get(right).copied().unwrap_or(false)
    }

    /// Merge another set into this one; a right granted in either stays granted.
    pub fn extend(&mut self, other: &Rights) {
        for (name, &on) in &other.granted {
            let entry = self.granted.entry(name.clone()).or_insert(false);
            *entry |= on;
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Rights {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut rights = Rights::new();
        for right in iter {
            rights.grant(right);
        }
        rights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rights_are_denied() {
        let rights = Rights::new();
        assert!(!rights.allows(MOVE_OTHERS));
    }

    #[test]
    fn collected_rights_are_granted() {
        let rights: Rights = [MOVE_OTHERS].into_iter().collect();
        assert!(rights.allows(MOVE_OTHERS));
        assert!(!rights.allows(TELEPORT_OTHER));
    }

    #[test]
    fn extend_keeps_grants() {
        let mut a: Rights = [MOVE_OTHERS].into_iter().collect();
        let mut b = Rights::new();
        b.grant(TELEPORT_OTHER);
        a.extend(&b);
        assert!(a.allows(MOVE_OTHERS));
        assert!(a.allows(TELEPORT_OTHER));
    }
}
