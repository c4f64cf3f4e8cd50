use rand::{seq::SliceRandom, Rng};

use crate::models::{player::Potions, role::Role, room::Room};

/// Pads `pool` with villagers or truncates it so there is one role per player.
pub fn reconcile_pool(pool: &[Role], players: usize) -> Vec<Role> {
    let mut roles: Vec<Role> = pool.iter().copied().take(players).collect();
    roles.resize(players, Role::Villager);
    roles
}

/// Deals the room's role pool to its members.
///
/// The reconciled pool is shuffled (Fisher–Yates via `SliceRandom::shuffle`)
/// and handed out in join order. Every member comes back alive with a full set
/// of potions.
pub fn assign_roles<R: Rng + ?Sized>(room: &mut Room, rng: &mut R) {
    let mut roles = reconcile_pool(&room.settings.role_pool, room.players.len());
    roles.shuffle(rng);

    for (player, role) in room.players.iter_mut().zip(roles) {
        player.role = Some(role);
        player.alive = true;
        player.potions = Potions::default();
    }
}
