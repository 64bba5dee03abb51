//! JSON command protocol for scripted editing.
//!
//! Every user action the editor exposes has a command here, so scenes can
//! be built and checked headlessly through a [`TestHarness`].

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{Axis, ObjectId, Side, ZoneKind};

use crate::error::EditorResult;
use crate::harness::TestHarness;
use crate::state::{object_display_name, ClickOutcome, Handle, ZoneChoice};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Enter polygon drawing mode
    StartDrawing,
    /// Canvas click, snapped to the grid
    Click { x: f64, y: f64 },
    /// Answer the zone classification prompt
    Classify { choice: ZoneChoice },
    /// Live color/opacity update for a custom zone
    ZoneColor {
        hex: String,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
    ConfirmZone,
    CancelDrawing,

    AddDeploymentZone {
        kind: ZoneKind,
        #[serde(default)]
        at: Option<Point>,
    },
    AddDeploymentStrip { side: Side },
    AddObjective {
        #[serde(default)]
        at: Option<Point>,
    },
    AddStrikeForce {
        #[serde(default)]
        at: Option<Point>,
    },
    AddUnit {
        side: Side,
        #[serde(default)]
        at: Option<Point>,
    },
    AddMeasurement {
        axis: Axis,
        #[serde(default)]
        at: Option<Point>,
    },

    /// Select objects by ID (replaces the selection)
    Select { ids: Vec<ObjectId> },
    /// Select whatever is under a point
    SelectAt {
        x: f64,
        y: f64,
        #[serde(default)]
        additive: bool,
    },
    ClearSelection,

    Group,
    Ungroup,
    Duplicate,
    Delete,
    SetText { text: String },
    SetOpacity { opacity: f64 },
    SetFill { hex: String },

    Translate { id: ObjectId, dx: f64, dy: f64 },
    Scale { id: ObjectId, sx: f64, sy: f64 },
    /// Drag a selection handle
    Resize {
        id: ObjectId,
        handle: Handle,
        dx: f64,
        dy: f64,
    },
    /// Rotate about the bounds center, in degrees
    Rotate { id: ObjectId, degrees: f64 },
    BringToFront { id: ObjectId },

    ToggleCenterMarker,
    SetGridVisible { visible: bool },

    /// Clear the entire scene
    Clear,
    /// List the objects bottom to top
    Inspect,
    /// Export the scene as JSON
    ExportScene,
    /// Replace the scene with a saved one
    LoadScene { json: String },
}

fn default_opacity() -> f64 {
    0.5
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result<T>(result: EditorResult<T>, data: impl FnOnce(T) -> Option<serde_json::Value>) -> Self {
        match result {
            Ok(value) => match data(value) {
                Some(v) => Self::ok_with_data(v),
                None => Self::ok(),
            },
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn id_data(id: ObjectId) -> Option<serde_json::Value> {
    Some(json!({ "id": id }))
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditorCommand) -> CommandResponse {
    let session = &mut harness.session;
    match cmd {
        EditorCommand::StartDrawing => {
            session.start_drawing();
            CommandResponse::ok()
        }

        EditorCommand::Click { x, y } => {
            let outcome = match session.click(Point::new(x, y)) {
                ClickOutcome::Ignored => json!({ "outcome": "ignored" }),
                ClickOutcome::Placed(p) => json!({ "outcome": "placed", "x": p.x, "y": p.y }),
                ClickOutcome::Closed => json!({ "outcome": "closed" }),
            };
            CommandResponse::ok_with_data(outcome)
        }

        EditorCommand::Classify { choice } => {
            CommandResponse::from_result(session.classify(choice), |created| {
                Some(json!({ "id": created }))
            })
        }

        EditorCommand::ZoneColor { hex, opacity } => {
            CommandResponse::from_result(session.update_zone_color(&hex, opacity), |_| None)
        }

        EditorCommand::ConfirmZone => CommandResponse::from_result(session.confirm_custom_zone(), id_data),

        EditorCommand::CancelDrawing => {
            session.cancel_drawing();
            CommandResponse::ok()
        }

        EditorCommand::AddDeploymentZone { kind, at } => {
            CommandResponse::ok_with_data(json!({ "id": session.add_deployment_zone(kind, at) }))
        }

        EditorCommand::AddDeploymentStrip { side } => {
            CommandResponse::ok_with_data(json!({ "id": session.add_deployment_strip(side) }))
        }

        EditorCommand::AddObjective { at } => CommandResponse::from_result(session.add_objective(at), id_data),

        EditorCommand::AddStrikeForce { at } => {
            CommandResponse::from_result(session.add_strike_force(at), id_data)
        }

        EditorCommand::AddUnit { side, at } => CommandResponse::from_result(session.add_unit(side, at), id_data),

        EditorCommand::AddMeasurement { axis, at } => {
            CommandResponse::ok_with_data(json!({ "id": session.add_measurement(axis, at) }))
        }

        EditorCommand::Select { ids } => {
            if let Some(missing) = ids.iter().find(|id| !session.scene.contains(id)) {
                return CommandResponse::err(format!("no object with id {missing}"));
            }
            if session.scene.selection.is_locked() {
                return CommandResponse::err("selection is locked while drawing");
            }
            session.scene.selection.select_many(ids.clone());
            CommandResponse::ok_with_data(json!({ "selected": ids }))
        }

        EditorCommand::SelectAt { x, y, additive } => {
            let hit = session.select_at(Point::new(x, y), additive);
            CommandResponse::ok_with_data(json!({ "hit": hit }))
        }

        EditorCommand::ClearSelection => {
            session.scene.selection.clear();
            CommandResponse::ok()
        }

        EditorCommand::Group => CommandResponse::from_result(session.group_selected(), id_data),

        EditorCommand::Ungroup => CommandResponse::from_result(session.ungroup_selected(), |ids| {
            Some(json!({ "ids": ids }))
        }),

        EditorCommand::Duplicate => CommandResponse::from_result(session.duplicate_selected(), id_data),

        EditorCommand::Delete => {
            let removed = session.delete_selected();
            CommandResponse::ok_with_data(json!({ "removed": removed }))
        }

        EditorCommand::SetText { text } => CommandResponse::from_result(session.set_text(&text), id_data),

        EditorCommand::SetOpacity { opacity } => {
            CommandResponse::from_result(session.set_opacity(opacity), |_| None)
        }

        EditorCommand::SetFill { hex } => CommandResponse::from_result(session.set_fill(&hex), |_| None),

        EditorCommand::Translate { id, dx, dy } => {
            CommandResponse::from_result(session.scene.translate(&id, Vec2::new(dx, dy)), |_| None)
        }

        EditorCommand::Scale { id, sx, sy } => {
            CommandResponse::from_result(session.scene.scale(&id, sx, sy), |_| None)
        }

        EditorCommand::Resize { id, handle, dx, dy } => CommandResponse::from_result(
            session.scene.resize(&id, handle, Vec2::new(dx, dy)),
            |_| None,
        ),

        EditorCommand::Rotate { id, degrees } => {
            CommandResponse::from_result(session.scene.rotate(&id, degrees.to_radians()), |_| None)
        }

        EditorCommand::BringToFront { id } => {
            if session.scene.bring_to_front(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("no object with id {id}"))
            }
        }

        EditorCommand::ToggleCenterMarker => {
            let visible = session.toggle_center_marker();
            CommandResponse::ok_with_data(json!({ "visible": visible }))
        }

        EditorCommand::SetGridVisible { visible } => {
            session.set_grid_visible(visible);
            CommandResponse::ok()
        }

        EditorCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        EditorCommand::Inspect => {
            let objects: Vec<serde_json::Value> = session
                .scene
                .all()
                .iter()
                .filter(|o| !o.is_transient())
                .map(|o| {
                    let pos = o.position();
                    json!({
                        "id": o.id,
                        "name": o.name(),
                        "display": object_display_name(o),
                        "x": pos.x,
                        "y": pos.y,
                    })
                })
                .collect();
            let selected = session.scene.selection.all();
            CommandResponse::ok_with_data(json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected": selected,
                "drawing": session.drawing.is_active(),
            }))
        }

        EditorCommand::ExportScene => {
            let json = harness.export_scene_json();
            CommandResponse::ok_with_data(json!({ "scene_json": json }))
        }

        EditorCommand::LoadScene { json } => match harness.load_scene_json(&json) {
            Ok(()) => CommandResponse::ok_with_data(json!({ "object_count": harness.user_object_count() })),
            Err(e) => CommandResponse::err(e),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
