// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The yard aggregate: bundles, the lift, and their history.

use std::collections::{BTreeMap, BTreeSet};

use kurbo::Point;
use yard_geometry::{Footprint, RigidMotion, segment_intersects_rectangle};

use crate::config::YardConfig;
use crate::dto::{BundleDto, BundleEdit, CollisionQuery, LiftDto};
use crate::error::YardError;
use crate::graph::{transitive_colliders, transitive_colliders_where};
use crate::history::History;
use crate::lift::{Lift, LiftCommand, LiftEdit};
use crate::stacking::{place_on_top, reflow_after_edit};
use crate::store::BundleStore;
use crate::types::{Bundle, BundleDraft, BundleId, BundleMetadata};

/// A full copy of yard content, as stored in history.
///
/// The transport flag is an operating mode and not part of the content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YardState {
    /// Every bundle by identifier.
    pub bundles: BTreeMap<BundleId, Bundle>,
    /// The lift.
    pub lift: Lift,
}

impl YardState {
    /// Pairs of bundles that overlap in footprint and in height.
    ///
    /// Each pair is reported once as `(lower, upper)`, ordered by base and
    /// then identifier. Every state a [`Yard`] reaches yields an empty list.
    pub fn stacking_violations(&self) -> Vec<(BundleId, BundleId)> {
        let bundles: Vec<&Bundle> = self.bundles.values().collect();
        let mut out = Vec::new();
        for (i, a) in bundles.iter().enumerate() {
            for b in &bundles[i + 1..] {
                if a.collides_with(b) {
                    let (lower, upper) = if (b.z, b.id) < (a.z, a.id) {
                        (b, a)
                    } else {
                        (a, b)
                    };
                    out.push((lower.id, upper.id));
                }
            }
        }
        out
    }
}

/// A storage yard.
///
/// Every mutating operation either commits completely and records one
/// history entry, or fails and leaves both the yard and its history as they
/// were.
#[derive(Clone, Debug)]
pub struct Yard {
    config: YardConfig,
    store: BundleStore,
    lift: Lift,
    next_id: BundleId,
    transport: bool,
    history: History<YardState>,
}

impl Default for Yard {
    fn default() -> Self {
        Self::new()
    }
}

impl Yard {
    /// An empty yard with the default configuration.
    pub fn new() -> Self {
        Self::build(YardConfig::default())
    }

    /// An empty yard.
    ///
    /// # Errors
    ///
    /// [`YardError::InvalidGeometry`] when the configuration is unusable.
    pub fn with_config(config: YardConfig) -> Result<Self, YardError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: YardConfig) -> Self {
        Self {
            store: BundleStore::new(config.index_cell_size),
            lift: Lift::from_defaults(&config.lift),
            next_id: BundleId::new(1),
            transport: false,
            history: History::new(config.history_limit),
            config,
        }
    }

    /// A yard holding `state`, with empty history.
    ///
    /// # Errors
    ///
    /// - [`YardError::InvalidGeometry`] for an unusable configuration, lift or bundle.
    /// - [`YardError::InvalidState`] when two bundles occupy the same volume.
    /// - [`YardError::CollidesWithBundle`] when the lift stands inside a bundle.
    /// - [`YardError::IdsExhausted`] when a bundle holds the last identifier.
    pub fn from_state(config: YardConfig, state: YardState) -> Result<Self, YardError> {
        config.validate()?;
        state.lift.validate()?;
        for b in state.bundles.values() {
            check_bundle(&b.footprint, b.height)?;
            if !(b.z.is_finite() && b.z >= 0.0) {
                return Err(YardError::InvalidGeometry("bundle elevation must not be negative"));
            }
        }
        if let Some((lower, upper)) = state.stacking_violations().first().copied() {
            return Err(YardError::InvalidState { lower, upper });
        }
        let mut yard = Self::build(config);
        yard.lift = state.lift;
        yard.store = BundleStore::from_bundles(
            yard.config.index_cell_size,
            state.bundles.into_values(),
        );
        if let Some(b) = yard.first_blocker(&yard.lift, &BTreeSet::new()) {
            return Err(YardError::CollidesWithBundle(b));
        }
        yard.next_id = match yard.store.iter().map(|b| b.id).max() {
            Some(last) => last.next().ok_or(YardError::IdsExhausted)?,
            None => BundleId::new(1),
        };
        tracing::debug!(bundles = yard.store.len(), "yard loaded");
        Ok(yard)
    }

    /// Configuration in effect.
    pub fn config(&self) -> &YardConfig {
        &self.config
    }

    /// Copy of the current content.
    pub fn state(&self) -> YardState {
        YardState {
            bundles: self.store.to_map(),
            lift: self.lift,
        }
    }

    /// Undo and redo stacks.
    pub fn history(&self) -> &History<YardState> {
        &self.history
    }

    // ---- bundles -------------------------------------------------------

    /// Look up a bundle.
    pub fn bundle(&self, id: BundleId) -> Option<&Bundle> {
        self.store.get(id)
    }

    /// All bundles in ascending identifier order.
    pub fn bundles(&self) -> impl Iterator<Item = &Bundle> + '_ {
        self.store.iter()
    }

    /// Number of bundles.
    pub fn bundle_count(&self) -> usize {
        self.store.len()
    }

    /// Value copies of all bundles.
    pub fn bundle_dtos(&self) -> Vec<BundleDto> {
        self.store.iter().map(BundleDto::from).collect()
    }

    /// Bundles whose footprint contains `p`, lowest first.
    pub fn bundles_at(&self, p: Point) -> Vec<&Bundle> {
        self.store.bundles_at(p)
    }

    /// The highest bundle whose footprint contains `p`.
    pub fn top_bundle_at(&self, p: Point) -> Option<&Bundle> {
        self.store.top_bundle_at(p)
    }

    /// Add a bundle with the default dimensions centered on `at`.
    ///
    /// # Errors
    ///
    /// [`YardError::CollidesWithLift`] when the placed bundle would enclose
    /// the lift at its operating height.
    pub fn create_bundle(&mut self, at: Point) -> Result<BundleId, YardError> {
        let d = &self.config.bundle;
        let draft = BundleDraft {
            footprint: Footprint::new(at, d.width, d.length, d.angle),
            height: d.height,
            metadata: BundleMetadata {
                essence: d.essence.clone(),
                plank_size: d.plank_size.clone(),
                ..BundleMetadata::default()
            },
        };
        self.create_bundle_with(draft)
    }

    /// Add a bundle with explicit geometry and metadata.
    ///
    /// The bundle rests on the highest bundle its footprint overlaps.
    ///
    /// # Errors
    ///
    /// - [`YardError::InvalidGeometry`] for a degenerate footprint or height.
    /// - [`YardError::CollidesWithLift`] as for [`create_bundle`](Self::create_bundle).
    /// - [`YardError::IdsExhausted`] when no identifier is left.
    pub fn create_bundle_with(&mut self, draft: BundleDraft) -> Result<BundleId, YardError> {
        check_bundle(&draft.footprint, draft.height)?;
        let id = self.next_id;
        let following = id.next().ok_or(YardError::IdsExhausted)?;
        let mut bundle = Bundle {
            id,
            footprint: draft.footprint,
            height: draft.height,
            z: 0.0,
            metadata: draft.metadata,
        };
        bundle.z = place_on_top(&bundle, self.store.iter());
        if self.lift.blocked_by(&bundle) {
            tracing::warn!(bundle = %id, z = bundle.z, "create rejected: lift in the way");
            return Err(YardError::CollidesWithLift(id));
        }
        self.record();
        tracing::debug!(bundle = %id, z = bundle.z, "bundle created");
        self.store.insert(bundle);
        self.next_id = following;
        Ok(id)
    }

    /// Remove a bundle. Bundles resting on it keep their elevation.
    ///
    /// # Errors
    ///
    /// [`YardError::NotFound`] for an unknown identifier.
    pub fn delete_bundle(&mut self, id: BundleId) -> Result<Bundle, YardError> {
        if !self.store.contains(id) {
            return Err(YardError::NotFound(id));
        }
        self.record();
        let removed = self.store.remove(id).ok_or(YardError::NotFound(id))?;
        tracing::debug!(bundle = %id, "bundle deleted");
        Ok(removed)
    }

    /// Change any subset of a bundle's geometry and metadata.
    ///
    /// Geometric edits place the bundle again on whatever it now overlaps and
    /// restack the bundles that were stacked on it.
    ///
    /// # Errors
    ///
    /// - [`YardError::NotFound`] for an unknown identifier.
    /// - [`YardError::InvalidGeometry`] for a degenerate result.
    /// - [`YardError::CollidesWithLift`] when any restacked bundle would
    ///   enclose the lift.
    pub fn modify_bundle_properties(&mut self, edit: &BundleEdit) -> Result<(), YardError> {
        let current = self.store.get(edit.id).ok_or(YardError::NotFound(edit.id))?;
        let edited = edit.apply_to(current);
        check_bundle(&edited.footprint, edited.height)?;

        if !edit.is_geometric() {
            self.record();
            self.store.insert(edited);
            tracing::debug!(bundle = %edit.id, "bundle metadata edited");
            return Ok(());
        }

        let mut next = self.store.clone();
        let mut moved = reflow_after_edit(&mut next, edited);
        if !moved.contains(&edit.id) {
            moved.push(edit.id);
        }
        for id in &moved {
            if next.get(*id).is_some_and(|b| self.lift.blocked_by(b)) {
                tracing::warn!(bundle = %id, edited = %edit.id, "edit rejected: lift in the way");
                return Err(YardError::CollidesWithLift(*id));
            }
        }
        self.record();
        self.store = next;
        tracing::debug!(
            bundle = %edit.id,
            z = self.store.get(edit.id).map_or(0.0, |b| b.z),
            affected = moved.len() - 1,
            "bundle edited"
        );
        Ok(())
    }

    /// Move a bundle's center, keeping its size and orientation.
    ///
    /// # Errors
    ///
    /// As for [`modify_bundle_properties`](Self::modify_bundle_properties).
    pub fn modify_bundle_position(&mut self, id: BundleId, at: Point) -> Result<(), YardError> {
        self.modify_bundle_properties(&BundleEdit {
            center: Some(at),
            ..BundleEdit::new(id)
        })
    }

    /// Whether a bundle overlapping this one sits higher.
    ///
    /// # Errors
    ///
    /// [`YardError::NotFound`] for an unknown identifier.
    pub fn is_covered(&self, id: BundleId) -> Result<bool, YardError> {
        let bundle = self.store.get(id).ok_or(YardError::NotFound(id))?;
        Ok(self
            .store
            .neighbors(id)
            .into_iter()
            .filter_map(|other| self.store.get(other))
            .any(|other| other.z > bundle.z))
    }

    /// Bundles whose footprint overlaps the query, at any height.
    ///
    /// # Errors
    ///
    /// [`YardError::NotFound`] when querying an unknown bundle.
    pub fn query_collisions(&self, query: &CollisionQuery) -> Result<Vec<BundleId>, YardError> {
        match query {
            CollisionQuery::Bundle(id) => {
                if !self.store.contains(*id) {
                    return Err(YardError::NotFound(*id));
                }
                Ok(self.store.neighbors(*id))
            }
            CollisionQuery::Footprint(f) => Ok(self.store.colliding(f)),
        }
    }

    /// The collision group reachable from `id`, without `id` itself.
    ///
    /// # Errors
    ///
    /// [`YardError::NotFound`] for an unknown identifier.
    pub fn transitive_colliders(&self, id: BundleId) -> Result<BTreeSet<BundleId>, YardError> {
        if !self.store.contains(id) {
            return Err(YardError::NotFound(id));
        }
        Ok(transitive_colliders(&self.store, id))
    }

    // ---- lift ----------------------------------------------------------

    /// The lift.
    pub fn lift(&self) -> &Lift {
        &self.lift
    }

    /// Value copy of the lift.
    pub fn lift_dto(&self) -> LiftDto {
        LiftDto::from(&self.lift)
    }

    /// Whether lift steps drag the carried group.
    pub fn transport_mode(&self) -> bool {
        self.transport
    }

    /// Enable or disable dragging of the carried group.
    pub fn set_transport_mode(&mut self, enabled: bool) {
        self.transport = enabled;
        tracing::debug!(enabled, "transport mode");
    }

    /// Bundles resting on the arm platform, and everything stacked on them.
    ///
    /// Seeds overlap the platform with a base within the carry tolerance of
    /// the arm height. The group grows through overlapping bundles whose base
    /// is not below the arms.
    pub fn carried_group(&self) -> BTreeSet<BundleId> {
        let tol = self.config.carry_tolerance;
        let arms_height = self.lift.arms_height;
        let seeds = self
            .store
            .colliding(&self.lift.arms())
            .into_iter()
            .filter(|id| {
                self.store
                    .get(*id)
                    .is_some_and(|b| (b.z - arms_height).abs() <= tol)
            });
        transitive_colliders_where(&self.store, seeds, |b| b.z >= arms_height - tol)
    }

    /// Run one lift command.
    ///
    /// Steps and pose changes are checked against every bundle spanning the
    /// operating height; in transport mode the carried group moves with a
    /// step and is checked against the remaining bundles. Arm height changes
    /// are not checked. On any failure the lift, the bundles, and the history
    /// are untouched.
    ///
    /// # Errors
    ///
    /// - [`YardError::InvalidGeometry`] for an unusable pose.
    /// - [`YardError::CollidesWithBundle`] naming the first bundle in the way.
    pub fn command_lift(&mut self, command: LiftCommand) -> Result<(), YardError> {
        if let LiftCommand::RaiseArms(delta) | LiftCommand::LowerArms(delta) = &command
            && !delta.is_finite()
        {
            return Err(YardError::InvalidGeometry("arm height change must be finite"));
        }
        let step = command.motion(&self.lift, self.config.move_step, self.config.turn_step);
        let candidate = match &command {
            LiftCommand::RaiseArms(delta) => Lift {
                arms_height: self.lift.arms_height + delta,
                ..self.lift
            },
            LiftCommand::LowerArms(delta) => Lift {
                arms_height: (self.lift.arms_height - delta).max(0.0),
                ..self.lift
            },
            LiftCommand::SetScale(scale) => Lift {
                scale: *scale,
                ..self.lift
            },
            LiftCommand::SetPose(edit) => edit.apply_to(&self.lift),
            LiftCommand::MoveForward
            | LiftCommand::MoveBackward
            | LiftCommand::TurnLeft
            | LiftCommand::TurnRight => step.map_or(self.lift, |m| self.lift.moved(&m)),
        };
        candidate.validate()?;

        let arms_only = matches!(
            command,
            LiftCommand::RaiseArms(_) | LiftCommand::LowerArms(_)
        );
        let (group, cargo) = match step {
            Some(motion) if self.transport => self.dragged_cargo(&motion),
            _ => (BTreeSet::new(), Vec::new()),
        };
        if !arms_only {
            if let Some(id) = self.first_blocker(&candidate, &group) {
                tracing::warn!(?command, bundle = %id, "lift command rejected");
                return Err(YardError::CollidesWithBundle(id));
            }
            for moved in &cargo {
                if let Some(id) = self.first_collision_outside(moved, &group) {
                    tracing::warn!(
                        ?command,
                        cargo = %moved.id,
                        bundle = %id,
                        "cargo would collide"
                    );
                    return Err(YardError::CollidesWithBundle(id));
                }
            }
        }

        self.record();
        self.lift = candidate;
        for moved in cargo {
            self.store.insert(moved);
        }
        tracing::debug!(
            ?command,
            x = self.lift.center().x,
            y = self.lift.center().y,
            angle = self.lift.angle(),
            cargo = group.len(),
            "lift moved"
        );
        Ok(())
    }

    /// One step forward.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn move_lift_forward(&mut self) -> Result<(), YardError> {
        self.command_lift(LiftCommand::MoveForward)
    }

    /// One step backward.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn move_lift_backward(&mut self) -> Result<(), YardError> {
        self.command_lift(LiftCommand::MoveBackward)
    }

    /// One counter-clockwise turn step.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn turn_lift_left(&mut self) -> Result<(), YardError> {
        self.command_lift(LiftCommand::TurnLeft)
    }

    /// One clockwise turn step.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn turn_lift_right(&mut self) -> Result<(), YardError> {
        self.command_lift(LiftCommand::TurnRight)
    }

    /// Raise the arms by `delta`.
    ///
    /// # Errors
    ///
    /// [`YardError::InvalidGeometry`] when the arms would end below the ground.
    pub fn rise_arms(&mut self, delta: f64) -> Result<(), YardError> {
        self.command_lift(LiftCommand::RaiseArms(delta))
    }

    /// Lower the arms by `delta`, stopping at the ground.
    ///
    /// # Errors
    ///
    /// [`YardError::InvalidGeometry`] for a non-finite `delta`.
    pub fn lower_arms(&mut self, delta: f64) -> Result<(), YardError> {
        self.command_lift(LiftCommand::LowerArms(delta))
    }

    /// Resize the lift.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn set_lift_scale(&mut self, scale: f64) -> Result<(), YardError> {
        self.command_lift(LiftCommand::SetScale(scale))
    }

    /// Replace any subset of the lift attributes.
    ///
    /// # Errors
    ///
    /// As for [`command_lift`](Self::command_lift).
    pub fn set_lift_pose(&mut self, edit: LiftEdit) -> Result<(), YardError> {
        self.command_lift(LiftCommand::SetPose(edit))
    }

    /// Drive straight ahead until the body touches the nearest bundle in front.
    ///
    /// Three probes point forward from the body center and the two outer
    /// corners of the arm platform. The target is the nearest bundle hit by a
    /// probe that spans the operating height. The lift then advances whole
    /// steps for as long as the next step stays clear. Cargo is not dragged.
    ///
    /// Returns the bundle that stopped the lift. That is the target unless
    /// another bundle outside the probes stands in the way first.
    ///
    /// # Errors
    ///
    /// - [`YardError::NoApproachTarget`] when no probe hits a blocking bundle.
    /// - [`YardError::ApproachUnreachable`] when the step bound runs out first.
    pub fn move_lift_to_bundle(&mut self) -> Result<BundleId, YardError> {
        let lift = self.lift;
        let reach = lift.forward() * self.config.approach_probe_length;
        let [_, _, front_right, front_left] = lift.arms().corners();
        let origins = [lift.center(), front_right, front_left];
        let target = self
            .store
            .iter()
            .filter(|b| b.spans_height(lift.height))
            .filter(|b| {
                origins
                    .iter()
                    .any(|o| segment_intersects_rectangle(*o, *o + reach, &b.footprint))
            })
            .min_by(|a, b| {
                let da = (a.footprint.center - lift.center()).hypot();
                let db = (b.footprint.center - lift.center()).hypot();
                da.total_cmp(&db).then(a.id.cmp(&b.id))
            })
            .map(|b| b.id)
            .ok_or_else(|| {
                tracing::warn!("approach found no target");
                YardError::NoApproachTarget
            })?;

        let step = RigidMotion::translate(lift.forward() * self.config.move_step);
        let none = BTreeSet::new();
        let mut parked = lift;
        let mut steps = 0;
        let reached = loop {
            let next = parked.moved(&step);
            if let Some(blocker) = self.first_blocker(&next, &none) {
                break blocker;
            }
            if steps == self.config.approach_max_steps {
                tracing::warn!(bundle = %target, steps, "approach gave up");
                return Err(YardError::ApproachUnreachable { target, steps });
            }
            parked = next;
            steps += 1;
        };
        self.record();
        self.lift = parked;
        tracing::debug!(bundle = %reached, target = %target, steps, "lift approached bundle");
        Ok(reached)
    }

    // ---- history -------------------------------------------------------

    /// Restore the state before the last mutation.
    ///
    /// # Errors
    ///
    /// [`YardError::HistoryEmpty`] when there is nothing to undo.
    pub fn undo(&mut self) -> Result<YardState, YardError> {
        if !self.history.can_undo() {
            return Err(YardError::HistoryEmpty);
        }
        let current = self.state();
        let previous = self.history.undo(current)?;
        self.restore(previous.clone());
        tracing::debug!(undo = self.history.undo_len(), redo = self.history.redo_len(), "undo");
        Ok(previous)
    }

    /// Reapply the last undone mutation.
    ///
    /// # Errors
    ///
    /// [`YardError::HistoryEmpty`] when there is nothing to redo.
    pub fn redo(&mut self) -> Result<YardState, YardError> {
        if !self.history.can_redo() {
            return Err(YardError::HistoryEmpty);
        }
        let current = self.state();
        let next = self.history.redo(current)?;
        self.restore(next.clone());
        tracing::debug!(undo = self.history.undo_len(), redo = self.history.redo_len(), "redo");
        Ok(next)
    }

    /// Whether [`undo`](Self::undo) would succeed.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`redo`](Self::redo) would succeed.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Forget all undo and redo entries.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ---- internals -----------------------------------------------------

    fn record(&mut self) {
        let snapshot = self.state();
        self.history.push(snapshot);
    }

    fn restore(&mut self, state: YardState) {
        let cell_size = self.store.cell_size();
        self.store = BundleStore::from_bundles(cell_size, state.bundles.into_values());
        self.lift = state.lift;
    }

    /// First bundle outside `skip` that blocks `lift`.
    fn first_blocker(&self, lift: &Lift, skip: &BTreeSet<BundleId>) -> Option<BundleId> {
        self.store
            .colliding(&lift.body())
            .into_iter()
            .filter(|id| !skip.contains(id))
            .find(|id| self.store.get(*id).is_some_and(|b| lift.blocked_by(b)))
    }

    /// First bundle outside `skip` sharing volume with `bundle`.
    fn first_collision_outside(
        &self,
        bundle: &Bundle,
        skip: &BTreeSet<BundleId>,
    ) -> Option<BundleId> {
        self.store
            .colliding(&bundle.footprint)
            .into_iter()
            .filter(|id| *id != bundle.id && !skip.contains(id))
            .find(|id| self.store.get(*id).is_some_and(|b| b.shares_height_with(bundle)))
    }

    /// The carried group and its members after `motion`.
    fn dragged_cargo(&self, motion: &RigidMotion) -> (BTreeSet<BundleId>, Vec<Bundle>) {
        let group = self.carried_group();
        let cargo = group
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|b| Bundle {
                footprint: motion.apply(&b.footprint),
                ..b.clone()
            })
            .collect();
        (group, cargo)
    }
}

fn check_bundle(footprint: &Footprint, height: f64) -> Result<(), YardError> {
    if !footprint.is_valid() {
        return Err(YardError::InvalidGeometry("bundle dimensions must be positive"));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(YardError::InvalidGeometry("bundle height must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> BundleId {
        BundleId::new(raw)
    }

    fn draft(x: f64, y: f64, height: f64) -> BundleDraft {
        BundleDraft {
            footprint: Footprint::axis_aligned(Point::new(x, y), 10.0, 10.0),
            height,
            metadata: BundleMetadata::default(),
        }
    }

    fn z_of(yard: &Yard, raw: u64) -> f64 {
        yard.bundle(id(raw)).map_or(f64::NAN, |b| b.z)
    }

    #[test]
    fn stacking_scenario() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(z_of(&yard, 1), 0.0);
        let b = yard.create_bundle(Point::new(5.0, 5.0)).unwrap();
        let top = yard.bundle(b).map(|b| (b.z, b.top_z()));
        assert_eq!(top, Some((5.0, 10.0)));

        let removed = yard.delete_bundle(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(z_of(&yard, 2), 5.0, "deleting does not drop the stack");
        assert_eq!(yard.delete_bundle(a), Err(YardError::NotFound(a)));
    }

    #[test]
    fn identifiers_are_never_reused() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        yard.undo().unwrap();
        let b = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "2");
    }

    #[test]
    fn create_inside_lift_is_rejected_without_history() {
        let mut yard = Yard::new();
        let before = yard.state();
        let err = yard.create_bundle(Point::new(0.0, -40.0));
        assert_eq!(err, Err(YardError::CollidesWithLift(id(1))));
        assert_eq!(yard.state(), before);
        assert!(!yard.can_undo());
        // The rejected attempt does not spend an identifier.
        assert_eq!(yard.create_bundle(Point::new(50.0, 0.0)), Ok(id(1)));
    }

    #[test]
    fn degenerate_bundles_are_rejected() {
        let mut yard = Yard::new();
        assert!(matches!(
            yard.create_bundle_with(draft(0.0, 0.0, 0.0)),
            Err(YardError::InvalidGeometry(_))
        ));
        let mut flat = draft(0.0, 0.0, 1.0);
        flat.footprint.width = -1.0;
        assert!(yard.create_bundle_with(flat).is_err());
        assert_eq!(yard.bundle_count(), 0);
    }

    #[test]
    fn lift_motion_into_bundle_is_rolled_back() {
        let mut yard = Yard::new();
        // Occupies [0, 4) in height and y in [-40, -30].
        let b = yard.create_bundle_with(draft(0.0, -35.0, 4.0)).unwrap();
        // The body front starts at y = -44.
        for _ in 0..4 {
            yard.move_lift_forward().unwrap();
        }
        let before = *yard.lift();
        let undo_len = yard.history().undo_len();
        assert_eq!(yard.move_lift_forward(), Err(YardError::CollidesWithBundle(b)));
        assert_eq!(*yard.lift(), before);
        assert_eq!(yard.history().undo_len(), undo_len);
        yard.move_lift_backward().unwrap();
        assert_eq!(yard.lift().center(), Point::new(0.0, -47.0));
    }

    #[test]
    fn lift_passes_bundles_outside_its_height() {
        let mut yard = Yard::new();
        yard.create_bundle_with(draft(0.0, -35.0, 2.0)).unwrap();
        for _ in 0..10 {
            yard.move_lift_forward().unwrap();
        }
        assert_eq!(yard.lift().center(), Point::new(0.0, -40.0));
    }

    #[test]
    fn turning_into_a_bundle_is_rejected() {
        let mut yard = Yard::new();
        // Just clear of the body's right side.
        let b = yard.create_bundle_with(draft(9.0, -50.0, 5.0)).unwrap();
        assert_eq!(yard.turn_lift_left(), Err(YardError::CollidesWithBundle(b)));
        assert_eq!(yard.turn_lift_right(), Err(YardError::CollidesWithBundle(b)));
        assert_eq!(yard.lift().angle(), 0.0);
    }

    #[test]
    fn moving_a_base_restacks_and_undoes() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let b = yard.create_bundle(Point::new(5.0, 5.0)).unwrap();
        yard.modify_bundle_position(a, Point::new(40.0, 0.0)).unwrap();
        assert_eq!(z_of(&yard, 2), 0.0);
        assert!(yard.state().stacking_violations().is_empty());

        yard.undo().unwrap();
        assert_eq!(yard.bundle(a).map(|b| b.footprint.center), Some(Point::ORIGIN));
        assert_eq!(yard.bundle(b).map(|b| b.z), Some(5.0));
    }

    #[test]
    fn edit_onto_lift_is_rejected() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let before = yard.state();
        let undo_len = yard.history().undo_len();
        let err = yard.modify_bundle_position(a, Point::new(0.0, -45.0));
        assert_eq!(err, Err(YardError::CollidesWithLift(a)));
        assert_eq!(yard.state(), before);
        assert_eq!(yard.history().undo_len(), undo_len);
    }

    #[test]
    fn restacked_neighbor_onto_lift_is_rejected() {
        let mut yard = Yard::new();
        // Under the lift body, below its operating height.
        let low = yard.create_bundle_with(draft(6.0, -50.0, 1.0)).unwrap();
        let top = yard.create_bundle_with(draft(8.0, -50.0, 1.0)).unwrap();
        assert_eq!(z_of(&yard, 2), 1.0);
        // A taller `low` would lift `top` to [2.5, 3.5), across the
        // operating height.
        let edit = BundleEdit {
            height: Some(2.5),
            ..BundleEdit::new(low)
        };
        assert_eq!(
            yard.modify_bundle_properties(&edit),
            Err(YardError::CollidesWithLift(top))
        );
        assert_eq!(z_of(&yard, 2), 1.0);
        assert_eq!(yard.bundle(low).map(|b| b.height), Some(1.0));
    }

    #[test]
    fn moving_onto_a_stack_climbs_it() {
        let mut yard = Yard::new();
        let base = yard.create_bundle(Point::new(40.0, 0.0)).unwrap();
        let upper = yard.create_bundle(Point::new(45.0, 0.0)).unwrap();
        let mover = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        yard.modify_bundle_position(mover, Point::new(38.0, 0.0)).unwrap();
        assert_eq!(yard.bundle(base).map(|b| b.z), Some(0.0));
        assert_eq!(yard.bundle(upper).map(|b| b.z), Some(5.0));
        assert_eq!(yard.bundle(mover).map(|b| b.z), Some(10.0));
        assert!(yard.state().stacking_violations().is_empty());
    }

    #[test]
    fn metadata_edit_keeps_geometry() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let edit = BundleEdit {
            metadata: Some(BundleMetadata {
                barcode: "YARD-7".into(),
                essence: "spruce".into(),
                ..BundleMetadata::default()
            }),
            ..BundleEdit::new(a)
        };
        yard.modify_bundle_properties(&edit).unwrap();
        let b = yard.bundle(a).unwrap();
        assert_eq!(b.metadata.barcode, "YARD-7");
        assert_eq!(b.footprint.width, 10.0);
        assert_eq!(yard.history().undo_len(), 2);
        let missing = BundleEdit::new(id(9));
        assert_eq!(
            yard.modify_bundle_properties(&missing),
            Err(YardError::NotFound(id(9)))
        );
    }

    #[test]
    fn covered_and_collision_queries() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let b = yard.create_bundle(Point::new(5.0, 5.0)).unwrap();
        let c = yard.create_bundle(Point::new(40.0, 0.0)).unwrap();
        assert_eq!(yard.is_covered(a), Ok(true));
        assert_eq!(yard.is_covered(b), Ok(false));
        assert_eq!(yard.is_covered(c), Ok(false));
        assert_eq!(yard.is_covered(id(9)), Err(YardError::NotFound(id(9))));

        assert_eq!(yard.query_collisions(&CollisionQuery::Bundle(a)), Ok(vec![b]));
        let probe = Footprint::axis_aligned(Point::new(38.0, 0.0), 2.0, 2.0);
        assert_eq!(
            yard.query_collisions(&CollisionQuery::Footprint(probe)),
            Ok(vec![c])
        );
        assert_eq!(
            yard.transitive_colliders(b).map(|s| s.into_iter().collect::<Vec<_>>()),
            Ok(vec![a])
        );

        assert_eq!(yard.top_bundle_at(Point::new(1.0, 1.0)).map(|t| t.id), Some(b));
        assert_eq!(yard.bundles_at(Point::new(1.0, 1.0)).len(), 2);
    }

    #[test]
    fn huge_footprints_use_the_wide_path() {
        let mut yard = Yard::new();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let b = yard.create_bundle(Point::new(40.0, 0.0)).unwrap();
        let everything = Footprint::axis_aligned(Point::ORIGIN, 1.0e12, 1.0e12);
        assert_eq!(
            yard.query_collisions(&CollisionQuery::Footprint(everything)),
            Ok(vec![a, b])
        );

        // A slab over the whole yard, clear of the lift at its height.
        let mut slab = draft(0.0, 500.0, 1.0);
        slab.footprint.width = 1.0e9;
        slab.footprint.length = 1.0e9;
        let slab = yard.create_bundle_with(slab).unwrap();
        assert_eq!(yard.bundle(slab).map(|s| s.z), Some(5.0));
        let c = yard.create_bundle(Point::new(-200.0, 0.0)).unwrap();
        assert_eq!(yard.bundle(c).map(|c| c.z), Some(6.0));
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut yard = Yard::new();
        let start = yard.state();
        let a = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        yard.create_bundle(Point::new(5.0, 5.0)).unwrap();
        yard.move_lift_forward().unwrap();
        yard.turn_lift_left().unwrap();
        yard.modify_bundle_position(a, Point::new(-20.0, 0.0)).unwrap();
        yard.rise_arms(2.0).unwrap();
        let end = yard.state();

        for _ in 0..6 {
            yard.undo().unwrap();
        }
        assert_eq!(yard.state(), start);
        assert_eq!(yard.undo(), Err(YardError::HistoryEmpty));
        for _ in 0..6 {
            yard.redo().unwrap();
        }
        assert_eq!(yard.state(), end);
        assert_eq!(yard.redo(), Err(YardError::HistoryEmpty));
    }

    #[test]
    fn arms_clamp_at_ground() {
        let mut yard = Yard::new();
        yard.rise_arms(1.5).unwrap();
        assert_eq!(yard.lift().arms_height, 1.5);
        yard.lower_arms(10.0).unwrap();
        assert_eq!(yard.lift().arms_height, 0.0);
        assert_eq!(yard.history().undo_len(), 2);
        assert!(yard.rise_arms(-1.0).is_err());
        assert!(yard.lower_arms(f64::NAN).is_err());
        assert_eq!(yard.history().undo_len(), 2);
    }

    #[test]
    fn pose_changes_are_validated() {
        let mut yard = Yard::new();
        let long_arms = LiftEdit {
            arms_length: Some(12.0),
            ..LiftEdit::default()
        };
        assert!(matches!(
            yard.set_lift_pose(long_arms),
            Err(YardError::InvalidGeometry(_))
        ));
        assert!(yard.set_lift_scale(0.0).is_err());

        let b = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let onto = LiftEdit {
            center: Some(Point::new(0.0, 2.0)),
            ..LiftEdit::default()
        };
        assert_eq!(yard.set_lift_pose(onto), Err(YardError::CollidesWithBundle(b)));
        // Doubling the body reaches y = -38, still clear of the bundle at -5.
        yard.set_lift_scale(2.0).unwrap();
        assert_eq!(yard.lift().body().length, 24.0);
        assert_eq!(yard.set_lift_scale(8.0), Err(YardError::CollidesWithBundle(b)));
    }

    #[test]
    fn transport_drags_the_load() {
        let mut yard = Yard::new();
        // Rests on the arm platform, which spans y in [-44, -38], half a
        // unit ahead of the body.
        let load = yard.create_bundle(Point::new(0.0, -38.5)).unwrap();
        assert_eq!(yard.carried_group().into_iter().collect::<Vec<_>>(), [load]);

        assert_eq!(yard.move_lift_forward(), Err(YardError::CollidesWithBundle(load)));
        yard.set_transport_mode(true);
        yard.move_lift_forward().unwrap();
        assert_eq!(
            yard.bundle(load).map(|b| b.footprint.center),
            Some(Point::new(0.0, -37.5))
        );

        let pivot = yard.lift().center();
        let before = yard.bundle(load).unwrap().footprint;
        yard.turn_lift_left().unwrap();
        let expected = RigidMotion::rotate_about(5.0, pivot).apply(&before);
        let after = yard.bundle(load).unwrap();
        assert_eq!(after.footprint.angle, 5.0);
        assert!((after.footprint.center - expected.center).hypot() < 1e-9);
        assert_eq!(after.z, 0.0);
    }

    #[test]
    fn transported_load_cannot_push_through_bundles() {
        let mut yard = Yard::new();
        let load = yard.create_bundle(Point::new(0.0, -38.5)).unwrap();
        // Room for one step of the load but not two.
        let wall = yard.create_bundle(Point::new(0.0, -27.0)).unwrap();
        yard.set_transport_mode(true);
        yard.move_lift_forward().unwrap();
        let before = yard.state();
        assert_eq!(yard.move_lift_forward(), Err(YardError::CollidesWithBundle(wall)));
        assert_eq!(yard.state(), before);
        assert_eq!(yard.bundle(load).map(|b| b.footprint.center.y), Some(-37.5));
    }

    #[test]
    fn loads_above_the_arms_tolerance_stay_behind() {
        let mut yard = Yard::new();
        yard.create_bundle(Point::new(0.0, -38.0)).unwrap();
        yard.rise_arms(1.0).unwrap();
        assert!(yard.carried_group().is_empty());
    }

    #[test]
    fn approach_parks_one_step_short() {
        let mut yard = Yard::new();
        // Near edge at y = -15; the body front starts at -44.
        let target = yard.create_bundle(Point::new(0.0, -10.0)).unwrap();
        let undo_len = yard.history().undo_len();
        assert_eq!(yard.move_lift_to_bundle(), Ok(target));
        assert_eq!(yard.lift().center(), Point::new(0.0, -21.0));
        assert_eq!(yard.history().undo_len(), undo_len + 1);
        assert_eq!(yard.move_lift_forward(), Err(YardError::CollidesWithBundle(target)));
    }

    #[test]
    fn approach_prefers_the_nearest_target() {
        let mut yard = Yard::new();
        let far = yard.create_bundle(Point::new(0.0, 30.0)).unwrap();
        let near = yard.create_bundle(Point::new(2.0, -10.0)).unwrap();
        assert_ne!(far, near);
        assert_eq!(yard.move_lift_to_bundle(), Ok(near));
    }

    #[test]
    fn approach_reports_the_bundle_that_stops_it() {
        let mut yard = Yard::new();
        let target = yard.create_bundle(Point::new(0.0, -10.0)).unwrap();
        // Between the probes and inside the body's sweep.
        let post = yard
            .create_bundle_with(BundleDraft {
                footprint: Footprint::axis_aligned(Point::new(4.0, -30.0), 1.0, 2.0),
                height: 5.0,
                metadata: BundleMetadata::default(),
            })
            .unwrap();
        assert_ne!(post, target);
        assert_eq!(yard.move_lift_to_bundle(), Ok(post));
        assert_eq!(yard.lift().center(), Point::new(0.0, -37.0));
    }

    #[test]
    fn approach_without_target_or_within_bound() {
        let mut yard = Yard::new();
        assert_eq!(yard.move_lift_to_bundle(), Err(YardError::NoApproachTarget));
        // Behind the lift.
        yard.create_bundle(Point::new(0.0, -80.0)).unwrap();
        // Ahead, but lower than the operating height.
        yard.create_bundle_with(draft(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(yard.move_lift_to_bundle(), Err(YardError::NoApproachTarget));

        let config = YardConfig {
            approach_max_steps: 5,
            ..YardConfig::default()
        };
        let mut yard = Yard::with_config(config).unwrap();
        let target = yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        let before = *yard.lift();
        assert_eq!(
            yard.move_lift_to_bundle(),
            Err(YardError::ApproachUnreachable { target, steps: 5 })
        );
        assert_eq!(*yard.lift(), before);
    }

    #[test]
    fn from_state_validates() {
        let mut yard = Yard::new();
        yard.create_bundle(Point::new(0.0, 0.0)).unwrap();
        yard.create_bundle(Point::new(5.0, 5.0)).unwrap();
        let state = yard.state();

        let mut loaded = Yard::from_state(YardConfig::default(), state.clone()).unwrap();
        assert_eq!(loaded.state(), state);
        assert!(!loaded.can_undo());
        assert_eq!(loaded.create_bundle(Point::new(50.0, 0.0)), Ok(id(3)));

        let mut sunk = state.clone();
        if let Some(b) = sunk.bundles.get_mut(&id(2)) {
            b.z = 1.0;
        }
        assert_eq!(
            Yard::from_state(YardConfig::default(), sunk).map(|_| ()),
            Err(YardError::InvalidState {
                lower: id(1),
                upper: id(2)
            })
        );

        let mut parked = state.clone();
        parked.lift.footprint.center = Point::ORIGIN;
        assert_eq!(
            Yard::from_state(YardConfig::default(), parked).map(|_| ()),
            Err(YardError::CollidesWithBundle(id(1)))
        );

        let mut last = state;
        if let Some(mut b) = last.bundles.remove(&id(2)) {
            b.id = id(u64::MAX);
            last.bundles.insert(b.id, b);
        }
        assert_eq!(
            Yard::from_state(YardConfig::default(), last).map(|_| ()),
            Err(YardError::IdsExhausted)
        );
    }

    #[test]
    fn identifier_counter_stops_at_the_last_id() {
        let mut state = Yard::new().state();
        let b = Bundle {
            id: id(u64::MAX - 1),
            footprint: Footprint::axis_aligned(Point::new(40.0, 0.0), 10.0, 10.0),
            height: 5.0,
            z: 0.0,
            metadata: BundleMetadata::default(),
        };
        state.bundles.insert(b.id, b);
        let mut yard = Yard::from_state(YardConfig::default(), state).unwrap();
        let before = yard.state();
        assert_eq!(
            yard.create_bundle(Point::new(80.0, 0.0)),
            Err(YardError::IdsExhausted)
        );
        assert_eq!(yard.state(), before);
        assert!(!yard.can_undo());
    }

    #[test]
    fn history_limit_is_respected() {
        let config = YardConfig {
            history_limit: 3,
            ..YardConfig::default()
        };
        let mut yard = Yard::with_config(config).unwrap();
        for i in 0..5 {
            yard.create_bundle(Point::new(f64::from(i) * 20.0, 0.0)).unwrap();
        }
        assert_eq!(yard.history().undo_len(), 3);
        for _ in 0..3 {
            yard.undo().unwrap();
        }
        assert_eq!(yard.bundle_count(), 2);
        assert_eq!(yard.undo(), Err(YardError::HistoryEmpty));
    }
}
