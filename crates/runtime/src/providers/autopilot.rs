use combat_core::env::ItemEffect;
use combat_core::{
    Actor, ActorId, EncounterView, IntentKind, PlayerChoice, PlayerInput, TargetKind,
};

/// Heuristic player policy used when no script is given.
///
/// In order: drink a healing item when low, brace against a channel that is
/// about to fire, spend resource on a damaging skill, otherwise attack the
/// weakest enemy.
#[derive(Clone, Copy, Debug)]
pub struct AutoPilot {
    /// Fraction of max hp below which healing items are used.
    pub heal_below: f64,
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self { heal_below: 0.35 }
    }
}

impl AutoPilot {
    fn healing_item(player: &Actor) -> Option<String> {
        player
            .inventory
            .iter()
            .find(|entry| {
                entry.count > 0
                    && entry
                        .item
                        .use_effects
                        .iter()
                        .any(|effect| matches!(effect, ItemEffect::Heal { .. }))
            })
            .map(|entry| entry.item.id.clone())
    }

    fn damage_skill(view: &EncounterView<'_>, target: &Actor) -> Option<String> {
        let player = view.player();
        player
            .skills
            .iter()
            .filter_map(|id| view.env.skill(id))
            .find(|skill| {
                skill.target == TargetKind::Enemy
                    && skill.damage.is_some()
                    && player.cooldown(&skill.id) == 0
                    && skill.cost.unwrap_or(0) <= player.resource.current()
                    && !skill
                        .forbid_if_target_has
                        .iter()
                        .any(|status| target.has_status(status))
            })
            .map(|skill| skill.id.clone())
    }
}

impl PlayerInput for AutoPilot {
    fn choose(&mut self, view: &EncounterView<'_>) -> PlayerChoice {
        // A rejected plan is not retried
        if view.rejection.is_some() {
            return PlayerChoice::Attack { target: None };
        }

        let player = view.player();
        let Some((target, enemy)) = view
            .living_enemies()
            .min_by_key(|(id, enemy)| (enemy.hp(), *id))
        else {
            return PlayerChoice::Defend;
        };

        let hp_ratio = player.hp() as f64 / player.max_hp().max(1) as f64;
        if hp_ratio < self.heal_below
            && let Some(item) = Self::healing_item(player)
        {
            return PlayerChoice::item(item, Some(ActorId::PLAYER));
        }

        let about_to_fire = view.living_enemies().any(|(id, _)| {
            view.intent_of(id)
                .is_some_and(|intent| intent.kind == IntentKind::Charging && intent.turns <= Some(1))
        });
        if about_to_fire {
            return PlayerChoice::Defend;
        }

        match Self::damage_skill(view, enemy) {
            Some(skill) => PlayerChoice::skill(skill, Some(target)),
            None => PlayerChoice::attack(target),
        }
    }
}
