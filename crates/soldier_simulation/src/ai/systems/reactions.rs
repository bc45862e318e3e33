//! AI reactions на soldier notifications (observers).
//!
//! Detected/lost авторитетны сразу, независимо от polling:
//! Patrol → Follow и {Follow, Attack} → Patrol только здесь.

use bevy::prelude::*;

use crate::ai::{transition_on_detected, transition_on_lost, AIState};
use crate::combat::Dead;
use crate::soldier::{
    Posture, SetupFailed, SoldierAnimation, SoldierAttacked, SoldierDamaged, TargetDetected, TargetLost,
};

/// Observer: target detected → Follow (поза Pursue)
pub fn on_target_detected(
    trigger: Trigger<TargetDetected>,
    mut soldiers: Query<(&mut AIState, &mut SoldierAnimation), (Without<Dead>, Without<SetupFailed>)>,
) {
    let entity = trigger.target();
    let Ok((mut state, mut animation)) = soldiers.get_mut(entity) else {
        return;
    };
    let Some(next) = transition_on_detected(*state) else {
        return;
    };

    animation.posture = Posture::Pursue;
    crate::logger::log(&format!(
        "🎯 {:?}: {:?} → {:?} (spotted {:?})",
        entity,
        *state,
        next,
        trigger.event().target
    ));
    *state = next;
}

/// Observer: target lost → Patrol (поза Idle, Patrol action поставит Walk)
pub fn on_target_lost(
    trigger: Trigger<TargetLost>,
    mut soldiers: Query<(&mut AIState, &mut SoldierAnimation), (Without<Dead>, Without<SetupFailed>)>,
) {
    let entity = trigger.target();
    let Ok((mut state, mut animation)) = soldiers.get_mut(entity) else {
        return;
    };
    let Some(next) = transition_on_lost(*state) else {
        return;
    };

    animation.posture = Posture::Idle;
    crate::logger::log(&format!("🔙 {:?}: {:?} → {:?} (target lost)", entity, *state, next));
    *state = next;
}

/// Observer: попытка атаки → поза Attack
pub fn on_soldier_attacked(
    trigger: Trigger<SoldierAttacked>,
    mut soldiers: Query<&mut SoldierAnimation, Without<Dead>>,
) {
    if let Ok(mut animation) = soldiers.get_mut(trigger.target()) {
        animation.posture = Posture::Attack;
    }
}

/// Observer: ранен → flinch (one-shot, сбрасывается в начале тика)
pub fn on_soldier_damaged(
    trigger: Trigger<SoldierDamaged>,
    mut soldiers: Query<&mut SoldierAnimation, Without<Dead>>,
) {
    if let Ok(mut animation) = soldiers.get_mut(trigger.target()) {
        animation.flinch = true;
    }
}
