//! `wasm-bindgen` surface for the browser host.
//!
//! Everything crossing the boundary is a primitive or a JSON string, so the
//! same methods run natively in tests. Methods that change state return the
//! resulting [`Action`] list as a JSON array. Malformed input from the host
//! is logged and treated as a no-op (`"[]"`).

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use crate::actors::{ActorId, ActorSummary, MemoryDirectory, VoteChoice};
use crate::camera::ScreenPoint;
use crate::config::CanvasConfig;
use crate::doc::GroupColor;
use crate::engine::{Action, ContextMenuCommand, EngineCore};
use crate::input::{Key, Modifiers, PointerInput, WheelDelta};
use crate::modal::{Backdrop, CanvasModal};
use crate::persist::{self, DisplayOptions};
use crate::sort::{GroupSortKey, SortDirection};
use crate::timers::TimerId;

const EMPTY: &str = "[]";

/// One canvas session plus the actor list the host last supplied.
#[wasm_bindgen]
pub struct CanvasSession {
    core: EngineCore,
    actors: MemoryDirectory,
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CanvasSession {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self { core: EngineCore::new(), actors: MemoryDirectory::new() }
    }

    /// Session with config overrides. Invalid overrides fall back to the
    /// defaults with a warning.
    #[must_use]
    pub fn with_config(config_json: &str) -> Self {
        let core = match CanvasConfig::from_json(config_json).and_then(EngineCore::try_new) {
            Ok(core) => core,
            Err(e) => {
                warn!(error = %e, "config rejected, using defaults");
                EngineCore::new()
            }
        };
        Self { core, actors: MemoryDirectory::new() }
    }

    /// Replace the actor list used to validate drops and build card views.
    /// Returns false when the JSON is not a list of actors.
    pub fn set_actors(&mut self, actors_json: &str) -> bool {
        let Some(actors) = decode::<Vec<ActorSummary>>(actors_json, "actors") else {
            return false;
        };
        self.actors = actors.into_iter().collect();
        true
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, sidebar_width: f64) {
        self.core.set_viewport(width, height, sidebar_width);
    }

    // --- Events ---

    pub fn pointer_down(&mut self, input_json: &str) -> String {
        let Some(input) = decode::<PointerInput>(input_json, "pointer input") else {
            return EMPTY.into();
        };
        actions(&self.core.on_pointer_down(&input))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        actions(&self.core.on_pointer_move(ScreenPoint::new(x, y)))
    }

    pub fn pointer_up(&mut self) -> String {
        actions(&self.core.on_pointer_up())
    }

    pub fn pointer_cancel(&mut self) -> String {
        actions(&self.core.on_pointer_cancel())
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> String {
        actions(&self.core.on_wheel(ScreenPoint::new(x, y), WheelDelta { dx, dy }))
    }

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        actions(&self.core.on_key_down(&Key::new(key), modifiers))
    }

    /// A timer scheduled through `ScheduleTimer` elapsed.
    pub fn timer(&mut self, id: u32) -> String {
        actions(&self.core.on_timer(TimerId(u64::from(id))))
    }

    // --- Placements ---

    pub fn drop_actor(&mut self, payload: &str, x: f64, y: f64) -> String {
        actions(&self.core.drop_actor(payload, ScreenPoint::new(x, y), &self.actors))
    }

    pub fn add_actors(&mut self, actor_ids_json: &str) -> String {
        let Some(ids) = decode::<Vec<ActorId>>(actor_ids_json, "actor ids") else {
            return EMPTY.into();
        };
        actions(&self.core.add_actors(&ids, &self.actors))
    }

    pub fn duplicate(&mut self, entity_id: &str) -> String {
        with_id(entity_id, |id| self.core.duplicate(&id))
    }

    pub fn remove(&mut self, entity_id: &str) -> String {
        with_id(entity_id, |id| self.core.remove(&id))
    }

    pub fn delete_selected(&mut self) -> String {
        actions(&self.core.delete_selected())
    }

    pub fn set_label(&mut self, entity_id: &str, label: &str) -> String {
        with_id(entity_id, |id| self.core.set_label(&id, label))
    }

    // --- Selection ---

    pub fn select(&mut self, entity_id: &str, multi: bool) -> String {
        with_id(entity_id, |id| self.core.select(&id, multi))
    }

    pub fn clear_selection(&mut self) -> String {
        actions(&self.core.clear_selection())
    }

    pub fn select_all(&mut self) -> String {
        actions(&self.core.select_all())
    }

    // --- Groups ---

    pub fn create_group(&mut self, name: &str, color: &str) -> String {
        actions(&self.core.create_group(name, parse_color(color)))
    }

    pub fn delete_group(&mut self, group_id: &str) -> String {
        with_id(group_id, |id| self.core.delete_group(&id))
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> String {
        with_id(group_id, |id| self.core.rename_group(&id, name))
    }

    pub fn set_group_color(&mut self, group_id: &str, color: &str) -> String {
        let color = parse_color(color);
        with_id(group_id, |id| self.core.set_group_color(&id, color))
    }

    pub fn add_to_group(&mut self, entity_id: &str, group_id: &str) -> String {
        let (Some(entity), Some(group)) = (parse_id(entity_id), parse_id(group_id)) else {
            return EMPTY.into();
        };
        actions(&self.core.add_entity_to_group(&entity, &group))
    }

    pub fn remove_from_group(&mut self, entity_id: &str) -> String {
        with_id(entity_id, |id| self.core.remove_entity_from_group(&id))
    }

    /// Groups as JSON in a presentation order, e.g. `("name", "descending")`.
    pub fn groups(&self, key: &str, direction: &str) -> String {
        let key = decode_tag::<GroupSortKey>(key).unwrap_or_default();
        let direction = decode_tag::<SortDirection>(direction).unwrap_or_default();
        encode(&self.core.sorted_groups(key, direction), EMPTY)
    }

    // --- Context menu, votes ---

    pub fn context_command(&mut self, command_json: &str) -> String {
        let Some(command) = decode::<ContextMenuCommand>(command_json, "context command") else {
            return EMPTY.into();
        };
        actions(&self.core.apply_context_command(command))
    }

    pub fn dismiss_context_menu(&mut self) -> String {
        actions(&self.core.dismiss_context_menu())
    }

    pub fn cast_vote(&mut self, entity_id: &str, user_id: &str, choice: &str) -> String {
        let Some(choice) = decode_tag::<VoteChoice>(choice) else {
            warn!(choice, "unknown vote choice");
            return EMPTY.into();
        };
        with_id(entity_id, |id| self.core.cast_vote(&id, user_id, choice))
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) -> String {
        actions(&self.core.zoom_in())
    }

    pub fn zoom_out(&mut self) -> String {
        actions(&self.core.zoom_out())
    }

    pub fn reset_view(&mut self) -> String {
        actions(&self.core.reset_view())
    }

    pub fn fit_to_content(&mut self) -> String {
        actions(&self.core.fit_to_content())
    }

    pub fn fit_to_selection(&mut self) -> String {
        actions(&self.core.fit_to_selection())
    }

    /// Current camera as `{"pan_x", "pan_y", "zoom"}`.
    pub fn camera(&self) -> String {
        encode(&self.core.camera(), "null")
    }

    // --- Modals ---

    pub fn open_modal(&mut self, modal_json: &str, data_json: &str) -> String {
        let Some(kind) = decode::<CanvasModal>(modal_json, "modal") else {
            return EMPTY.into();
        };
        let data = decode::<serde_json::Value>(data_json, "modal data").unwrap_or_default();
        actions(&self.core.open_modal(kind, data))
    }

    pub fn close_modal(&mut self) -> String {
        actions(&self.core.close_modal())
    }

    pub fn close_all_modals(&mut self) -> String {
        actions(&self.core.close_all_modals())
    }

    /// Open modals with their stacking metadata, bottom first.
    pub fn modal_layers(&self) -> String {
        #[derive(Serialize)]
        struct Layer<'a> {
            modal: &'a CanvasModal,
            data: &'a serde_json::Value,
            z_index: i32,
            backdrop: Backdrop,
        }
        let entries = self.core.modals().entries();
        let layers: Vec<Layer<'_>> = self
            .core
            .modal_layers()
            .into_iter()
            .zip(entries)
            .map(|(layer, entry)| Layer {
                modal: &entry.kind,
                data: &entry.data,
                z_index: layer.z_index,
                backdrop: layer.backdrop,
            })
            .collect();
        encode(&layers, EMPTY)
    }

    // --- View ---

    pub fn cards(&self) -> String {
        encode(&self.core.card_views(&self.actors), EMPTY)
    }

    pub fn selection(&self) -> String {
        encode(&self.core.selection().to_sorted_vec(), EMPTY)
    }

    pub fn set_display(&mut self, display_json: &str) -> String {
        let Some(display) = decode::<DisplayOptions>(display_json, "display options") else {
            return EMPTY.into();
        };
        actions(&self.core.set_display(display))
    }

    // --- Persistence and lifecycle ---

    pub fn snapshot(&self) -> String {
        match self.core.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "snapshot encode failed");
                "{}".into()
            }
        }
    }

    pub fn load_snapshot(&mut self, snapshot_json: &str) -> String {
        match persist::snapshot_from_json(snapshot_json) {
            Ok(snapshot) => actions(&self.core.load_snapshot(snapshot).1),
            Err(e) => {
                warn!(error = %e, "snapshot rejected");
                EMPTY.into()
            }
        }
    }

    pub fn close_canvas(&mut self) -> String {
        actions(&self.core.close_canvas())
    }

    pub fn teardown(&mut self) -> String {
        actions(&self.core.teardown())
    }
}

fn actions(list: &[Action]) -> String {
    encode(list, EMPTY)
}

fn encode<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "encode failed");
            fallback.to_owned()
        }
    }
}

fn decode<T: DeserializeOwned>(raw: &str, what: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, input = what, "host sent malformed JSON");
            None
        }
    }
}

/// Decode a bare enum tag such as `"yes"` or `"member_count"`.
fn decode_tag<T: DeserializeOwned>(tag: &str) -> Option<T> {
    match serde_json::from_value(serde_json::Value::String(tag.to_owned())) {
        Ok(value) => Some(value),
        Err(e) => {
            trace!(error = %e, tag, "unrecognised tag");
            None
        }
    }
}

/// Unknown colour tags map to gray, matching snapshot decoding.
fn parse_color(tag: &str) -> GroupColor {
    decode_tag(tag).unwrap_or(GroupColor::Gray)
}

fn parse_id(raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, raw, "host sent malformed id");
            None
        }
    }
}

fn with_id(raw: &str, f: impl FnOnce(Uuid) -> Vec<Action>) -> String {
    match parse_id(raw) {
        Some(id) => actions(&f(id)),
        None => EMPTY.into(),
    }
}
