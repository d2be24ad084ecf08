use crate::config::CombatConfig;
use crate::state::{Actor, ActorId, ActorKind, Roster};

/// Initiative value for one actor, falling back to the per-kind default.
pub fn speed_of(actor: &Actor, config: &CombatConfig) -> i32 {
    actor.speed.unwrap_or(match actor.kind {
        ActorKind::Player => config.player_default_speed,
        ActorKind::Enemy => config.enemy_default_speed,
    })
}

/// Turn order for one round: the player and every living enemy, sorted by
/// descending speed. Ties keep roster order, so the player goes first among
/// equals and enemies keep their spawn order.
pub fn initiative_order(roster: &Roster, config: &CombatConfig) -> Vec<ActorId> {
    let mut order: Vec<(ActorId, i32)> = roster
        .ids()
        .filter(|id| id.is_player() || roster.is_alive(*id))
        .filter_map(|id| roster.get(id).map(|actor| (id, speed_of(actor, config))))
        .collect();

    // sort_by_key is stable
    order.sort_by_key(|(_, speed)| core::cmp::Reverse(*speed));
    order.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BaseStats, EnemyProfile};

    fn enemy(name: &str) -> Actor {
        Actor::enemy(name, BaseStats::new(10, 2, 0), EnemyProfile::default())
    }

    #[test]
    fn defaults_put_player_first() {
        let roster = Roster::new(
            Actor::player("hero", BaseStats::new(30, 5, 1)),
            [enemy("a"), enemy("b")],
        );
        let order = initiative_order(&roster, &CombatConfig::default());
        assert_eq!(order, vec![ActorId(0), ActorId(1), ActorId(2)]);
    }

    #[test]
    fn ties_keep_roster_order_and_dead_are_skipped() {
        let mut roster = Roster::new(
            Actor::player("hero", BaseStats::new(30, 5, 1)).with_speed(5),
            [
                enemy("a").with_speed(5),
                enemy("b").with_speed(9),
                enemy("c").with_speed(5),
                enemy("d").with_speed(7),
            ],
        );
        let config = CombatConfig::default();
        assert_eq!(
            initiative_order(&roster, &config),
            vec![ActorId(2), ActorId(4), ActorId(0), ActorId(1), ActorId(3)]
        );

        roster.get_mut(ActorId(2)).unwrap().take_damage(100);
        assert_eq!(
            initiative_order(&roster, &config),
            vec![ActorId(4), ActorId(0), ActorId(1), ActorId(3)]
        );
    }
}
