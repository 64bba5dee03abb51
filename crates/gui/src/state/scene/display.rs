//! Display helpers for the object list

use shared::{ObjectKind, SceneObject};

/// Get display name for an object
pub fn object_display_name(obj: &SceneObject) -> String {
    let kind = match &obj.kind {
        ObjectKind::AttackerZone(_) => "Attacker Zone".to_string(),
        ObjectKind::DefenderZone(_) => "Defender Zone".to_string(),
        ObjectKind::CustomZone(z) => format!("Zone {}", z.fill.to_hex()),
        ObjectKind::ObjectiveMarker(_) => "Objective".to_string(),
        ObjectKind::StrikeForceMarker(_) => "Strike Force".to_string(),
        ObjectKind::AttackerUnit(_) => "Attacker Unit".to_string(),
        ObjectKind::DefenderUnit(_) => "Defender Unit".to_string(),
        ObjectKind::MeasurementGroup(m) => format!("Measure {}", m.label),
        ObjectKind::ZoneLabel(l) => format!("\"{}\"", l.text),
        ObjectKind::Group(g) => match obj.labelled_zone_parts() {
            Some((_, label)) => match &g.children[label].kind {
                ObjectKind::ZoneLabel(l) => format!("Zone \"{}\"", l.text),
                _ => "Group".to_string(),
            },
            None => format!("Group ({})", g.children.len()),
        },
        ObjectKind::DrawingMarker(_) | ObjectKind::DrawingLine(_) => "Draft".to_string(),
        ObjectKind::ZonePreview(_) => "Preview".to_string(),
    };
    format!("{} ({})", kind, short_id(&obj.id))
}

/// Get icon for an object
pub fn object_icon(obj: &SceneObject) -> &'static str {
    match &obj.kind {
        ObjectKind::AttackerZone(_) => "[A]",
        ObjectKind::DefenderZone(_) => "[D]",
        ObjectKind::CustomZone(_) => "[Z]",
        ObjectKind::ObjectiveMarker(_) => "[O]",
        ObjectKind::StrikeForceMarker(_) => "[S]",
        ObjectKind::AttackerUnit(_) | ObjectKind::DefenderUnit(_) => "[U]",
        ObjectKind::MeasurementGroup(_) => "[|]",
        ObjectKind::ZoneLabel(_) => "[T]",
        ObjectKind::Group(_) => "[G]",
        ObjectKind::DrawingMarker(_) | ObjectKind::DrawingLine(_) | ObjectKind::ZonePreview(_) => {
            "[~]"
        }
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{labelled_zone, triangle_zone};
    use shared::ZoneKind;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_labelled_zone_name_shows_text() {
        let name = object_display_name(&labelled_zone("g", "Hold"));
        assert_eq!(name, "Zone \"Hold\" (g)");
    }

    #[test]
    fn test_zone_icon() {
        assert_eq!(object_icon(&triangle_zone("z", ZoneKind::Defender)), "[D]");
    }
}
