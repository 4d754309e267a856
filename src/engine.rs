//! The canvas session: owns every piece of interaction state and turns host
//! events into [`Action`]s.
//!
//! DESIGN
//! ======
//! `EngineCore` is the single owner of the document, selection, camera,
//! gesture, timers, and modal stack. The host feeds it pointer, wheel, key,
//! and timer events plus explicit commands, and carries out the returned
//! actions. Nothing here touches the DOM, so the whole session is testable
//! natively.
//!
//! Ids that vanished mid-interaction are ignored. Every removal prunes the
//! selection, the gesture, the highlight, and the context menu in the same
//! call.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::actors::{ActorDirectory, ActorId, VoteChoice, VoteTally};
use crate::camera::{Camera, CanvasDelta, CanvasPoint, ScreenDelta, ScreenPoint};
use crate::config::CanvasConfig;
use crate::consts::{GRID_COLUMNS, GRID_GAP};
use crate::doc::{CanvasEntity, DocStore, EntityId, Group, GroupColor, GroupId, LoadReport};
use crate::drag::{DragController, DragEffect, Gesture};
use crate::error::CanvasError;
use crate::input::{Key, Modifiers, PointerInput, WheelDelta};
use crate::modal::{CanvasModal, ModalLayer, ModalStack};
use crate::persist::{CanvasSnapshot, DisplayOptions, PanOffset, SnapshotStore};
use crate::selection::Selection;
use crate::sort::{self, GroupSortKey, SortDirection};
use crate::timers::{TimerId, TimerKind, TimerRequest, Timers};
use crate::viewport::{self, ViewportSize, ZoomDirection};

/// Work for the host, returned from every event handler and command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Something visible changed; redraw once.
    RenderNeeded,
    ScheduleTimer { id: TimerId, delay_ms: u32 },
    CancelTimer { id: TimerId },
    Haptic { duration_ms: u32 },
    EntityAdded { id: EntityId, actor_ref: ActorId },
    EntitiesRemoved { ids: Vec<EntityId> },
    SelectionChanged { ids: Vec<EntityId> },
    GroupCreated { id: GroupId },
    GroupDeleted { id: GroupId },
    ContextMenuOpened { entity_id: EntityId, at: ScreenPoint },
    ContextMenuClosed,
    /// The modal stack changed; `depth` entries remain.
    ModalsChanged { depth: usize },
    /// Ask the external store to record a vote. The canvas never edits actors.
    VoteIntent { actor_ref: ActorId, label: String, user_id: String, choice: VoteChoice },
}

/// An open context menu on one card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextMenu {
    pub entity_id: EntityId,
    pub at: ScreenPoint,
}

/// Context-menu entries, applied to the card the menu is open on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextMenuCommand {
    Remove,
    Duplicate,
    MoveActor,
    AddToGroup { group_id: GroupId },
    CreateNewGroup,
}

/// What the view layer needs to draw one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: EntityId,
    pub actor_ref: ActorId,
    /// Actor name, or the raw reference when the directory lacks the actor.
    pub name: String,
    /// Present only while labels are shown.
    pub label: Option<String>,
    pub headshot: Option<String>,
    /// Present only while votes are shown.
    pub tally: Option<VoteTally>,
    /// Top-left corner on screen.
    pub screen: ScreenPoint,
    pub selected: bool,
    pub highlighted: bool,
    pub group_id: Option<GroupId>,
}

/// Core canvas session state.
#[derive(Debug)]
pub struct EngineCore {
    config: CanvasConfig,
    doc: DocStore,
    selection: Selection,
    camera: Camera,
    viewport: ViewportSize,
    sidebar_width: f64,
    drag: DragController,
    timers: Timers,
    modals: ModalStack<CanvasModal>,
    context_menu: Option<ContextMenu>,
    highlight: Option<(EntityId, TimerId)>,
    display: DisplayOptions,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with a custom config. The config is validated first.
    pub fn try_new(config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: CanvasConfig) -> Self {
        Self {
            doc: DocStore::new(config.card_size()),
            config,
            selection: Selection::new(),
            camera: Camera::default(),
            viewport: ViewportSize::default(),
            sidebar_width: 0.0,
            drag: DragController::new(),
            timers: Timers::new(),
            modals: ModalStack::new(),
            context_menu: None,
            highlight: None,
            display: DisplayOptions::default(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&CanvasEntity> {
        self.doc.entity(id)
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.doc.group(id)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.drag.gesture()
    }

    #[must_use]
    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    #[must_use]
    pub fn modals(&self) -> &ModalStack<CanvasModal> {
        &self.modals
    }

    /// Z-index and backdrop for each open modal, bottom first.
    #[must_use]
    pub fn modal_layers(&self) -> Vec<ModalLayer> {
        self.modals.layers(self.config.modal_z_base, self.config.modal_z_step)
    }

    #[must_use]
    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    /// The card currently flashing after a vote.
    #[must_use]
    pub fn highlighted(&self) -> Option<EntityId> {
        self.highlight.map(|(id, _)| id)
    }

    /// Groups in a presentation order; stored order is untouched.
    #[must_use]
    pub fn sorted_groups(&self, key: GroupSortKey, direction: SortDirection) -> Vec<&Group> {
        sort::sorted_groups(self.doc.groups(), key, direction)
    }

    #[must_use]
    pub fn card_view(&self, id: &EntityId, actors: &impl ActorDirectory) -> Option<CardView> {
        let entity = self.doc.entity(id)?;
        let actor = actors.actor(&entity.actor_ref);
        Some(CardView {
            id: entity.id,
            actor_ref: entity.actor_ref.clone(),
            name: actor.map_or_else(|| entity.actor_ref.clone(), |a| a.name.clone()),
            label: self.display.show_labels.then(|| entity.label.clone()),
            headshot: actor.and_then(|a| a.primary_headshot()).map(str::to_owned),
            tally: if self.display.show_votes { actor.map(|a| a.tally()) } else { None },
            screen: self.camera.canvas_to_screen(entity.position),
            selected: self.selection.contains(&entity.id),
            highlighted: self.highlighted() == Some(entity.id),
            group_id: entity.group_id,
        })
    }

    /// Views of every card in render order.
    #[must_use]
    pub fn card_views(&self, actors: &impl ActorDirectory) -> Vec<CardView> {
        self.doc.entities().iter().filter_map(|e| self.card_view(&e.id, actors)).collect()
    }

    // --- Viewport ---

    /// Record the canvas element size and the width of the left sidebar.
    pub fn set_viewport(&mut self, width: f64, height: f64, sidebar_width: f64) {
        let finite = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.viewport = ViewportSize::new(finite(width), finite(height));
        self.sidebar_width = finite(sidebar_width);
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.set_camera(viewport::zoom_in(self.camera, self.viewport, self.sidebar_width, &self.config))
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.set_camera(viewport::zoom_out(self.camera, self.viewport, self.sidebar_width, &self.config))
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.set_camera(viewport::reset_view())
    }

    pub fn fit_to_content(&mut self) -> Vec<Action> {
        let entities: Vec<&CanvasEntity> = self.doc.entities().iter().collect();
        let next = viewport::fit_to_content(&entities, self.viewport, self.sidebar_width, self.camera, &self.config);
        self.set_camera(next)
    }

    pub fn fit_to_selection(&mut self) -> Vec<Action> {
        let ids = self.selection.to_sorted_vec();
        let selected = self.doc.entities_by_ids(&ids);
        let next = viewport::fit_to_selection(&selected, self.viewport, self.sidebar_width, self.camera, &self.config);
        self.set_camera(next)
    }

    fn set_camera(&mut self, next: Camera) -> Vec<Action> {
        if next == self.camera {
            return Vec::new();
        }
        self.camera = next;
        vec![Action::RenderNeeded]
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, input: &PointerInput) -> Vec<Action> {
        if !input.point.is_finite() {
            trace!(point = ?input.point, "non-finite pointer press dropped");
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.close_context_menu(&mut actions);
        let effects = self.drag.press(input, &mut self.timers, &self.config);
        self.apply_effects(effects, &mut actions);
        self.finish(actions)
    }

    pub fn on_pointer_move(&mut self, point: ScreenPoint) -> Vec<Action> {
        if !point.is_finite() {
            trace!(?point, "non-finite pointer move dropped");
            return Vec::new();
        }
        let mut actions = Vec::new();
        let effects = self.drag.move_to(point, &mut self.timers, &self.config);
        self.apply_effects(effects, &mut actions);
        self.finish(actions)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let effects = self.drag.release(&mut self.timers);
        self.apply_effects(effects, &mut actions);
        self.finish(actions)
    }

    /// Browser took the pointer away (scroll, system gesture).
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.drag.cancel(&mut self.timers);
        self.finish(Vec::new())
    }

    /// Every wheel event zooms at the pointer: up zooms in, down zooms out.
    pub fn on_wheel(&mut self, point: ScreenPoint, delta: WheelDelta) -> Vec<Action> {
        if !point.is_finite() || !delta.dy.is_finite() || delta.dy.abs() < f64::EPSILON {
            return Vec::new();
        }
        let direction = if delta.dy < 0.0 { ZoomDirection::In } else { ZoomDirection::Out };
        self.set_camera(viewport::zoom_at_point(point, direction, self.camera, &self.config))
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if key.as_str() == "Escape" {
            if self.context_menu.is_some() {
                self.close_context_menu(&mut actions);
            } else if self.dialog_open() {
                actions.extend(self.close_modal());
            } else {
                actions.extend(self.clear_selection());
            }
            return self.finish(actions);
        }
        if self.dialog_open() {
            return Vec::new();
        }
        match key.as_str() {
            "Delete" | "Backspace" => actions.extend(self.delete_selected()),
            "+" | "=" => actions.extend(self.zoom_in()),
            "-" => actions.extend(self.zoom_out()),
            "0" => actions.extend(self.reset_view()),
            "F" => actions.extend(self.fit_to_selection()),
            "f" if modifiers.shift => actions.extend(self.fit_to_selection()),
            "f" => actions.extend(self.fit_to_content()),
            "a" | "A" if modifiers.is_multi() => actions.extend(self.select_all()),
            _ => {}
        }
        self.finish(actions)
    }

    /// A host timer elapsed.
    pub fn on_timer(&mut self, id: TimerId) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.timers.fire(id) {
            None => warn!(timer = id.0, "stale timer ignored"),
            Some(TimerKind::LongPress) => {
                let effects = self.drag.long_press_fired(id);
                self.apply_effects(effects, &mut actions);
            }
            Some(TimerKind::Highlight) => {
                if self.highlight.is_some_and(|(_, t)| t == id) {
                    self.highlight = None;
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        self.finish(actions)
    }

    fn apply_effects(&mut self, effects: Vec<DragEffect>, actions: &mut Vec<Action>) {
        for effect in effects {
            self.apply_effect(effect, actions);
        }
    }

    fn apply_effect(&mut self, effect: DragEffect, actions: &mut Vec<Action>) {
        match effect {
            DragEffect::Select { id, multi } => {
                if !self.doc.contains_entity(&id) {
                    return;
                }
                if multi {
                    self.selection.toggle(id);
                } else if !self.selection.contains(&id) {
                    self.selection.select(id, false);
                } else {
                    return;
                }
                self.selection_changed(actions);
            }
            DragEffect::SelectOnly { id } => {
                if !self.doc.contains_entity(&id) {
                    return;
                }
                if self.selection.len() == 1 && self.selection.contains(&id) {
                    return;
                }
                self.selection.select(id, false);
                self.selection_changed(actions);
            }
            DragEffect::ToggleSelect { id } => {
                if self.doc.contains_entity(&id) {
                    self.selection.toggle(id);
                    self.selection_changed(actions);
                }
            }
            DragEffect::ClearSelection => actions.extend(self.clear_selection()),
            DragEffect::MoveEntity { id, delta } => {
                if !self.doc.contains_entity(&id) {
                    self.drag.forget_entity(&id, &mut self.timers);
                    return;
                }
                let ids = if self.selection.contains(&id) { self.selection.to_sorted_vec() } else { vec![id] };
                let moved = self.doc.translate_entities(&ids, self.canvas_delta(delta));
                if moved > 0 {
                    actions.push(Action::RenderNeeded);
                }
            }
            DragEffect::MoveGroup { id, delta } => {
                if self.doc.group(&id).is_none() {
                    self.drag.forget_group(&id, &mut self.timers);
                    return;
                }
                let members = self.doc.members_of(&id);
                if self.doc.translate_entities(&members, self.canvas_delta(delta)) > 0 {
                    actions.push(Action::RenderNeeded);
                }
            }
            DragEffect::Pan { delta } => {
                if delta.dx.is_finite() && delta.dy.is_finite() {
                    self.camera.pan_by(delta);
                    actions.push(Action::RenderNeeded);
                }
            }
            DragEffect::Haptic => actions.push(Action::Haptic { duration_ms: self.config.haptic_pulse_ms }),
            DragEffect::OpenContextMenu { id, at } => {
                if self.doc.contains_entity(&id) {
                    self.context_menu = Some(ContextMenu { entity_id: id, at });
                    actions.push(Action::ContextMenuOpened { entity_id: id, at });
                }
            }
        }
    }

    fn canvas_delta(&self, delta: ScreenDelta) -> CanvasDelta {
        viewport::sanitize(self.camera, &self.config).screen_delta_to_canvas(delta)
    }

    // --- Placements ---

    /// Drop an actor from an external list at `at` (screen space).
    ///
    /// The payload is the actor id. Blank payloads and actors the directory
    /// does not know are ignored.
    pub fn drop_actor(&mut self, payload: &str, at: ScreenPoint, actors: &impl ActorDirectory) -> Vec<Action> {
        let actor_ref = payload.trim();
        if actor_ref.is_empty() {
            return Vec::new();
        }
        if actors.actor(actor_ref).is_none() {
            warn!(actor_ref, "drop of unknown actor ignored");
            return Vec::new();
        }
        let position = self.camera.screen_to_canvas(at);
        if !position.is_finite() {
            return Vec::new();
        }
        let entity = CanvasEntity::new(actor_ref, position);
        let mut actions = vec![Action::EntityAdded { id: entity.id, actor_ref: entity.actor_ref.clone() }];
        debug!(id = %entity.id, actor_ref, "actor dropped");
        self.doc.insert_entity(entity);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Place a batch of actors (the "add from database" dialog) in a grid to
    /// the right of the existing cards, or at the origin on an empty canvas.
    pub fn add_actors(&mut self, actor_refs: &[ActorId], actors: &impl ActorDirectory) -> Vec<Action> {
        let card = self.config.card_size();
        let rightmost_top = self
            .doc
            .entities()
            .iter()
            .map(|e| e.position)
            .reduce(|a, b| CanvasPoint::new(a.x.max(b.x), a.y.min(b.y)));
        let origin = match rightmost_top {
            Some(p) => CanvasPoint::new(p.x + card.width + GRID_GAP, p.y),
            None => CanvasPoint::default(),
        };
        let mut actions = Vec::new();
        let mut placed = 0_usize;
        for actor_ref in actor_refs {
            let actor_ref = actor_ref.trim();
            if actor_ref.is_empty() || actors.actor(actor_ref).is_none() {
                continue;
            }
            let (col, row) = (placed % GRID_COLUMNS, placed / GRID_COLUMNS);
            #[allow(clippy::cast_precision_loss)]
            let position = CanvasPoint::new(
                origin.x + col as f64 * (card.width + GRID_GAP),
                origin.y + row as f64 * (card.height + GRID_GAP),
            );
            let entity = CanvasEntity::new(actor_ref, position);
            actions.push(Action::EntityAdded { id: entity.id, actor_ref: entity.actor_ref.clone() });
            self.doc.insert_entity(entity);
            placed += 1;
        }
        if placed > 0 {
            info!(count = placed, "actors added to canvas");
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Copy a placement: new id, offset position, ungrouped, not selected.
    pub fn duplicate(&mut self, id: &EntityId) -> Vec<Action> {
        let offset = CanvasDelta::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let Some(copy) = self.doc.duplicate_entity(id, offset) else {
            return Vec::new();
        };
        let actor_ref = self.doc.entity(&copy).map(|e| e.actor_ref.clone()).unwrap_or_default();
        vec![Action::EntityAdded { id: copy, actor_ref }, Action::RenderNeeded]
    }

    pub fn remove(&mut self, id: &EntityId) -> Vec<Action> {
        let Some(removed) = self.doc.remove_entity(id) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        self.after_removal(&[removed.id], &mut actions);
        self.finish(actions)
    }

    /// Bulk-remove the selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let ids = self.selection.to_sorted_vec();
        if ids.is_empty() {
            return Vec::new();
        }
        let removed: Vec<EntityId> = self.doc.remove_entities(&ids).into_iter().map(|e| e.id).collect();
        let mut actions = Vec::new();
        self.after_removal(&removed, &mut actions);
        if !self.selection.is_empty() {
            self.selection.clear();
            self.selection_changed(&mut actions);
        }
        self.finish(actions)
    }

    fn after_removal(&mut self, removed: &[EntityId], actions: &mut Vec<Action>) {
        if removed.is_empty() {
            return;
        }
        let before = self.selection.len();
        self.selection.retain(|id| !removed.contains(id));
        if self.selection.len() != before {
            self.selection_changed(actions);
        }
        for id in removed {
            self.drag.forget_entity(id, &mut self.timers);
        }
        if let Some((id, timer)) = self.highlight {
            if removed.contains(&id) {
                self.timers.cancel(timer);
                self.highlight = None;
            }
        }
        if self.context_menu.is_some_and(|m| removed.contains(&m.entity_id)) {
            self.close_context_menu(actions);
        }
        debug!(count = removed.len(), "placements removed");
        actions.push(Action::EntitiesRemoved { ids: removed.to_vec() });
        actions.push(Action::RenderNeeded);
    }

    pub fn set_label(&mut self, id: &EntityId, label: &str) -> Vec<Action> {
        if self.doc.set_label(id, label) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Selection ---

    /// `multi == false` replaces the selection; `multi == true` toggles.
    pub fn select(&mut self, id: &EntityId, multi: bool) -> Vec<Action> {
        if !self.doc.contains_entity(id) {
            return Vec::new();
        }
        self.selection.select(*id, multi);
        let mut actions = Vec::new();
        self.selection_changed(&mut actions);
        actions
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.selection.clear();
        let mut actions = Vec::new();
        self.selection_changed(&mut actions);
        actions
    }

    pub fn select_all(&mut self) -> Vec<Action> {
        if self.doc.is_empty() {
            return Vec::new();
        }
        self.selection.set(self.doc.entities().iter().map(|e| e.id));
        let mut actions = Vec::new();
        self.selection_changed(&mut actions);
        actions
    }

    fn selection_changed(&self, actions: &mut Vec<Action>) {
        actions.push(Action::SelectionChanged { ids: self.selection.to_sorted_vec() });
        actions.push(Action::RenderNeeded);
    }

    // --- Groups ---

    /// Group the current selection. Grouping ends the selection, and closes
    /// the create-group dialog when it is on top.
    pub fn create_group(&mut self, name: &str, color: GroupColor) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let ids = self.selection.to_sorted_vec();
        let Some(group_id) = self.doc.create_group(name, color, &ids) else {
            return Vec::new();
        };
        info!(%group_id, members = ids.len(), "group created");
        let mut actions = vec![Action::GroupCreated { id: group_id }];
        self.selection.clear();
        self.selection_changed(&mut actions);
        if self.modals.top().is_some_and(|m| m.kind == CanvasModal::CreateGroup) {
            actions.extend(self.close_modal());
        }
        self.finish(actions)
    }

    /// Remove a group; its members stay where they are, ungrouped.
    pub fn delete_group(&mut self, id: &GroupId) -> Vec<Action> {
        if !self.doc.delete_group(id) {
            return Vec::new();
        }
        info!(group_id = %id, "group deleted");
        self.drag.forget_group(id, &mut self.timers);
        self.finish(vec![Action::GroupDeleted { id: *id }, Action::RenderNeeded])
    }

    pub fn rename_group(&mut self, id: &GroupId, name: &str) -> Vec<Action> {
        if self.doc.rename_group(id, name) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn set_group_color(&mut self, id: &GroupId, color: GroupColor) -> Vec<Action> {
        if self.doc.set_group_color(id, color) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn add_entity_to_group(&mut self, entity_id: &EntityId, group_id: &GroupId) -> Vec<Action> {
        if self.doc.add_entity_to_group(entity_id, group_id) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn remove_entity_from_group(&mut self, entity_id: &EntityId) -> Vec<Action> {
        if self.doc.remove_entity_from_group(entity_id) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Context menu ---

    /// Run a menu entry against the card the menu is open on, then close it.
    /// Without an open menu this does nothing.
    pub fn apply_context_command(&mut self, command: ContextMenuCommand) -> Vec<Action> {
        let Some(menu) = self.context_menu else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        self.close_context_menu(&mut actions);
        let id = menu.entity_id;
        debug!(entity = %id, ?command, "context command");
        match command {
            ContextMenuCommand::Remove => actions.extend(self.remove(&id)),
            ContextMenuCommand::Duplicate => actions.extend(self.duplicate(&id)),
            ContextMenuCommand::MoveActor => {
                actions.extend(self.open_modal(CanvasModal::MoveActor { entity_id: id }, serde_json::Value::Null));
            }
            ContextMenuCommand::AddToGroup { group_id } => actions.extend(self.add_entity_to_group(&id, &group_id)),
            ContextMenuCommand::CreateNewGroup => {
                if !self.selection.contains(&id) {
                    self.selection.select(id, false);
                    self.selection_changed(&mut actions);
                }
                actions.extend(self.open_modal(CanvasModal::CreateGroup, serde_json::Value::Null));
            }
        }
        self.finish(actions)
    }

    pub fn dismiss_context_menu(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.close_context_menu(&mut actions);
        actions
    }

    fn close_context_menu(&mut self, actions: &mut Vec<Action>) {
        if self.context_menu.take().is_some() {
            actions.push(Action::ContextMenuClosed);
        }
    }

    // --- Votes ---

    /// Record a vote through the external store and flash the card.
    /// A newer vote replaces the previous highlight.
    pub fn cast_vote(&mut self, entity_id: &EntityId, user_id: &str, choice: VoteChoice) -> Vec<Action> {
        let Some(entity) = self.doc.entity(entity_id) else {
            return Vec::new();
        };
        let intent = Action::VoteIntent {
            actor_ref: entity.actor_ref.clone(),
            label: entity.label.clone(),
            user_id: user_id.to_owned(),
            choice,
        };
        if let Some((_, old)) = self.highlight.take() {
            self.timers.cancel(old);
        }
        let timer = self.timers.schedule(TimerKind::Highlight, self.config.highlight_ms);
        self.highlight = Some((*entity_id, timer));
        self.finish(vec![intent, Action::RenderNeeded])
    }

    // --- Modals ---

    pub fn open_modal(&mut self, kind: CanvasModal, data: serde_json::Value) -> Vec<Action> {
        self.modals.open(kind, data);
        vec![Action::ModalsChanged { depth: self.modals.len() }]
    }

    /// Close the top modal only. Empty stack is a no-op.
    pub fn close_modal(&mut self) -> Vec<Action> {
        match self.modals.close() {
            Some(_) => vec![Action::ModalsChanged { depth: self.modals.len() }],
            None => Vec::new(),
        }
    }

    pub fn close_all_modals(&mut self) -> Vec<Action> {
        if self.modals.close_all() == 0 {
            return Vec::new();
        }
        vec![Action::ModalsChanged { depth: 0 }]
    }

    /// A dialog other than the canvas overlay itself has focus.
    fn dialog_open(&self) -> bool {
        self.modals.top().is_some_and(|m| m.kind != CanvasModal::Canvas)
    }

    // --- Display ---

    pub fn set_display(&mut self, display: DisplayOptions) -> Vec<Action> {
        if display == self.display {
            return Vec::new();
        }
        self.display = display;
        vec![Action::RenderNeeded]
    }

    // --- Persistence ---

    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            entities: self.doc.entities().to_vec(),
            groups: self.doc.groups().to_vec(),
            zoom: self.camera.zoom,
            pan: PanOffset { x: self.camera.pan_x, y: self.camera.pan_y },
            display: self.display,
        }
    }

    /// Replace the session content with `snapshot`. Transient state
    /// (selection, gesture, menu, highlight) is reset.
    pub fn load_snapshot(&mut self, mut snapshot: CanvasSnapshot) -> (LoadReport, Vec<Action>) {
        let adopted = snapshot.adopt_listed_members();
        let camera = snapshot.camera(&self.config);
        let report = self.doc.load(snapshot.entities, snapshot.groups);
        if report != LoadReport::default() {
            warn!(
                dangling_group_refs = report.dangling_group_refs,
                duplicate_entities = report.duplicate_entities,
                duplicate_groups = report.duplicate_groups,
                "snapshot repaired on load"
            );
        }
        self.camera = camera;
        self.display = snapshot.display;
        self.selection.clear();
        self.drag.cancel(&mut self.timers);
        self.context_menu = None;
        if let Some((_, timer)) = self.highlight.take() {
            self.timers.cancel(timer);
        }
        info!(entities = self.doc.len(), groups = self.doc.groups().len(), adopted, "snapshot loaded");
        let actions = vec![Action::SelectionChanged { ids: Vec::new() }, Action::RenderNeeded];
        (report, self.finish(actions))
    }

    pub fn save_to(&self, store: &mut impl SnapshotStore) -> Result<(), CanvasError> {
        store.save(&self.snapshot())
    }

    /// Load from `store`. Returns `Ok(None)` when the store is empty.
    pub fn restore_from(&mut self, store: &impl SnapshotStore) -> Result<Option<Vec<Action>>, CanvasError> {
        let Some(snapshot) = store.load()? else {
            return Ok(None);
        };
        Ok(Some(self.load_snapshot(snapshot).1))
    }

    // --- Lifecycle ---

    /// Leave the canvas: drop the gesture and menu, and close every modal
    /// opened from within it.
    pub fn close_canvas(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.drag.cancel(&mut self.timers);
        self.close_context_menu(&mut actions);
        actions.extend(self.close_all_modals());
        self.finish(actions)
    }

    /// Unmount: cancel every live timer so nothing fires against stale state.
    pub fn teardown(&mut self) -> Vec<Action> {
        self.drag.cancel(&mut self.timers);
        self.highlight = None;
        self.timers.cancel_all();
        self.finish(Vec::new())
    }

    /// Append queued timer requests and collapse redraws into one trailing
    /// `RenderNeeded`.
    fn finish(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        let before = actions.len();
        actions.retain(|a| *a != Action::RenderNeeded);
        let render = actions.len() != before;
        for request in self.timers.drain_requests() {
            actions.push(match request {
                TimerRequest::Schedule { id, delay_ms } => Action::ScheduleTimer { id, delay_ms },
                TimerRequest::Cancel { id } => Action::CancelTimer { id },
            });
        }
        if render {
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}
