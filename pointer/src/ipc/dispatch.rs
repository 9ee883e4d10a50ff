//! IPC message dispatch — parse s-expressions and route to pointer handlers.

use lexpr::Value;
use tracing::{debug, warn};

use super::plist::{escape_string, get_bool, get_int, get_keyword, sexp_bool, try_float};
use crate::vr::{DwellPointer, PointerPose, Vec3};

/// Parse an s-expression message and dispatch to the appropriate handler.
/// Returns the response s-expression.
pub fn handle_message(pointer: &mut DwellPointer, raw: &str) -> String {
    let value = match lexpr::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("malformed s-expression: {}", e);
            return error_response(0, &format!("malformed s-expression: {e}"));
        }
    };

    let msg_type = get_keyword(&value, "type");
    let msg_id = get_int(&value, "id").unwrap_or(0);
    debug!(msg_id, "dispatch {:?}", msg_type);

    match msg_type.as_deref() {
        Some("pointer-set-pose") => handle_set_pose(pointer, msg_id, &value),
        Some("pointer-enter") => handle_enter(pointer, msg_id, &value),
        Some("pointer-hover") => handle_hover(pointer, msg_id, &value),
        Some("pointer-exit") => handle_exit(pointer, msg_id),
        Some("pointer-trigger") => handle_trigger(pointer, msg_id, &value),
        Some("pointer-frame") => handle_frame(pointer, msg_id, &value),
        Some("pointer-radii") => handle_radii(pointer, msg_id),
        Some("pointer-mesh") => handle_mesh(pointer, msg_id),
        Some("pointer-status") => handle_status(pointer, msg_id),
        Some("pointer-config") => handle_config(pointer, msg_id),
        Some(other) => error_response(msg_id, &format!("unknown message type: {other}")),
        None => error_response(msg_id, "missing :type"),
    }
}

// ── Argument helpers ────────────────────────────────────────

fn float_or(value: &Value, key: &str, default: f64) -> Result<f64, String> {
    Ok(try_float(value, key)?.unwrap_or(default))
}

fn required_float(value: &Value, key: &str) -> Result<f64, String> {
    try_float(value, key)?.ok_or_else(|| format!("missing :{key}"))
}

/// Target point and timestamp shared by enter and hover.
fn target_args(value: &Value) -> Result<(Vec3, bool, f64), String> {
    let target = Vec3::new(
        float_or(value, "x", 0.0)? as f32,
        float_or(value, "y", 0.0)? as f32,
        required_float(value, "z")? as f32,
    );
    let interactive = get_bool(value, "interactive").unwrap_or(false);
    let now = required_float(value, "now")?;
    Ok((target, interactive, now))
}

fn pose_args(value: &Value) -> Result<(Vec3, Vec3), String> {
    let origin = Vec3::new(
        float_or(value, "x", 0.0)? as f32,
        float_or(value, "y", 0.0)? as f32,
        float_or(value, "z", 0.0)? as f32,
    );
    let forward = Vec3::new(
        float_or(value, "fx", 0.0)? as f32,
        float_or(value, "fy", 0.0)? as f32,
        float_or(value, "fz", 1.0)? as f32,
    );
    Ok((origin, forward))
}

// ── Handlers ────────────────────────────────────────────────

fn handle_set_pose(pointer: &mut DwellPointer, msg_id: i64, value: &Value) -> String {
    let (origin, forward) = match pose_args(value) {
        Ok(args) => args,
        Err(e) => return error_response(msg_id, &e),
    };
    match PointerPose::looking(origin, forward, Vec3::UP) {
        Some(pose) => {
            pointer.set_pointer_transform(Box::new(pose));
            ok_response(msg_id)
        }
        None => error_response(msg_id, "forward must be non-zero and not vertical"),
    }
}

fn handle_enter(pointer: &mut DwellPointer, msg_id: i64, value: &Value) -> String {
    let (target, interactive, now) = match target_args(value) {
        Ok(args) => args,
        Err(e) => return error_response(msg_id, &e),
    };
    match pointer.on_enter(target, interactive, now) {
        Ok(()) => ok_response(msg_id),
        Err(e) => error_response(msg_id, &e.to_string()),
    }
}

fn handle_hover(pointer: &mut DwellPointer, msg_id: i64, value: &Value) -> String {
    let (target, interactive, now) = match target_args(value) {
        Ok(args) => args,
        Err(e) => return error_response(msg_id, &e),
    };
    match pointer.on_hover(target, interactive, now) {
        Ok(()) => ok_response(msg_id),
        Err(e) => error_response(msg_id, &e.to_string()),
    }
}

fn handle_exit(pointer: &mut DwellPointer, msg_id: i64) -> String {
    pointer.on_exit();
    ok_response(msg_id)
}

fn handle_trigger(pointer: &mut DwellPointer, msg_id: i64, value: &Value) -> String {
    let now = match required_float(value, "now") {
        Ok(now) => now,
        Err(e) => return error_response(msg_id, &e),
    };
    let triggered = pointer.query_trigger(now);
    format!(
        "(:type :response :id {} :status :ok :triggered {})",
        msg_id,
        sexp_bool(triggered)
    )
}

fn handle_frame(pointer: &mut DwellPointer, msg_id: i64, value: &Value) -> String {
    let now = match required_float(value, "now") {
        Ok(now) => now,
        Err(e) => return error_response(msg_id, &e),
    };
    let frame = pointer.update(now);
    format!(
        "(:type :response :id {} :status :ok :frame {})",
        msg_id,
        frame.to_sexp()
    )
}

fn handle_radii(pointer: &DwellPointer, msg_id: i64) -> String {
    let (enter, exit) = pointer.hysteresis_radii();
    format!(
        "(:type :response :id {} :status :ok :enter-radius {:.6} :exit-radius {:.6})",
        msg_id, enter, exit
    )
}

fn handle_mesh(pointer: &DwellPointer, msg_id: i64) -> String {
    let mesh = pointer.mesh();
    format!(
        "(:type :response :id {} :status :ok :segments {} :vertices {} :triangles {} :max-distance {:.3} :sorting-order {})",
        msg_id,
        mesh.segment_count(),
        mesh.vertices.len(),
        mesh.triangles.len(),
        pointer.max_pointer_distance(),
        pointer.sorting_order(),
    )
}

fn handle_status(pointer: &DwellPointer, msg_id: i64) -> String {
    format!(
        "(:type :response :id {} :status :ok :pointer {})",
        msg_id,
        pointer.status_sexp()
    )
}

fn handle_config(pointer: &DwellPointer, msg_id: i64) -> String {
    format!(
        "(:type :response :id {} :status :ok :config {})",
        msg_id,
        pointer.config_sexp()
    )
}

// ── Response helpers ────────────────────────────────────────

fn ok_response(id: i64) -> String {
    format!("(:type :response :id {} :status :ok)", id)
}

fn error_response(id: i64, reason: &str) -> String {
    format!(
        "(:type :response :id {} :status :error :reason \"{}\")",
        id,
        escape_string(reason)
    )
}
