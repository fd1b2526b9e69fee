//! Human-readable and JSON rendering of command results.

use neato_core::{Map, Robot, RobotState};
use serde::Serialize;

/// Maps of one robot, as printed by `neato maps --json`.
#[derive(Debug, Serialize)]
pub struct RobotMaps<'a> {
    pub serial: &'a str,
    pub name: &'a str,
    pub maps: &'a [Map],
}

/// Serialize `value` as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Numbered robot list, one robot per line.
pub fn robots(robots: &[Robot]) -> String {
    robots
        .iter()
        .enumerate()
        .map(|(idx, robot)| format!("{}) {robot}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header line and maps of one robot. Only the first map unless `all`.
pub fn robot_maps(robot: &Robot, maps: &[Map], all: bool) -> String {
    let shown = if all { maps.len() } else { maps.len().min(1) };
    let mut lines = vec![format!("Robot '{}' (serial: '{}')", robot.name, robot.serial)];
    lines.extend(
        maps.iter()
            .take(shown)
            .enumerate()
            .map(|(idx, map)| format!("  {}) {map}", idx + 1)),
    );
    lines.join("\n")
}

/// Multi-line robot state.
pub fn state(robot: &Robot, state: &RobotState) -> String {
    let mut lines = vec![
        format!("Robot '{}' (serial: '{}')", robot.name, robot.serial),
        format!("  State:  {}", state.state),
        format!("  Action: {}", state.action),
    ];
    if let Some(details) = &state.details {
        lines.push(format!(
            "  Charge: {}% (docked: {}, charging: {})",
            details.charge, details.is_docked, details.is_charging
        ));
    }
    if let Some(error) = &state.error {
        lines.push(format!("  Error:  {error}"));
    }
    if let Some(alert) = &state.alert {
        lines.push(format!("  Alert:  {alert}"));
    }
    if let Some(version) = &state.available_services.house_cleaning {
        lines.push(format!("  House cleaning service: {version}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn robot(serial: &str, name: &str) -> Robot {
        serde_json::from_value(json!({
            "serial": serial,
            "name": name,
            "secret_key": "k",
            "nucleo_url": "https://nucleo.example"
        }))
        .unwrap()
    }

    fn map(id: &str) -> Map {
        Map {
            id: id.to_string(),
            url: format!("https://maps.example/{id}.png"),
            ..Map::default()
        }
    }

    #[test]
    fn numbered_robot_list() {
        let list = robots(&[robot("A", "Kitchen"), robot("B", "Hall")]);
        assert_eq!(
            list,
            "1) Name: 'Kitchen', Serial: A, Model: <not set>\n2) Name: 'Hall', Serial: B, Model: <not set>"
        );
    }

    #[test]
    fn only_latest_map_by_default() {
        let maps = [map("new"), map("old")];
        let latest = robot_maps(&robot("A", "Kitchen"), &maps, false);
        assert_eq!(latest.lines().count(), 2);
        assert!(latest.contains("ID: 'new'"));

        let all = robot_maps(&robot("A", "Kitchen"), &maps, true);
        assert_eq!(all.lines().count(), 3);
        assert!(all.contains("2) ID: 'old'"));
    }

    #[test]
    fn state_lines() {
        let state: RobotState = serde_json::from_value(json!({
            "result": "ok",
            "state": 2,
            "action": 1,
            "details": { "charge": 80, "isDocked": false, "isCharging": false },
            "availableServices": { "houseCleaning": "basic-4" }
        }))
        .unwrap();
        let text = state_text(&state);
        assert!(text.contains("State:  busy"));
        assert!(text.contains("Action: house cleaning"));
        assert!(text.contains("Charge: 80%"));
        assert!(text.contains("House cleaning service: basic-4"));
    }

    fn state_text(s: &RobotState) -> String {
        state(&robot("A", "Kitchen"), s)
    }

    #[test]
    fn json_output_hides_secret() {
        let text = json(&[robot("A", "Kitchen")]).unwrap();
        assert!(!text.contains("secret_key"));
        assert!(text.contains("\"serial\": \"A\""));
    }
}
