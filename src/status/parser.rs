use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use super::models::{LiveParticipant, SessionInfo, StatusPage};
use crate::constants::tracks;

/// Participant rows with fewer cells than this are truncated markup and are
/// skipped, not errors.
const MIN_PARTICIPANT_COLUMNS: usize = 24;

const PARTICIPANTS_HEADING: &str = "Session Participants";

/// Parse the dedicated server status page.
///
/// Session attributes live in `<table class="simple">` blocks where a header
/// row of `<th>` cells is immediately followed by a value row of `<td>`
/// cells; headers and values pair up by column index and all tables feed one
/// flat key/value map. The participants table is the one right after the
/// `Session Participants` heading and is parsed positionally.
pub fn parse_status_page(html: &str) -> StatusPage {
    let document = Html::parse_document(html);
    let attributes = collect_attribute_pairs(&document);

    StatusPage {
        session: build_session_info(&attributes),
        participants: parse_participants(&document),
    }
}

// --- Session Attributes ---

fn collect_attribute_pairs(document: &Html) -> HashMap<String, String> {
    let table_selector = Selector::parse("table.simple").expect("valid selector");
    let row_selector = Selector::parse("tr").expect("valid selector");
    let header_selector = Selector::parse("th").expect("valid selector");
    let value_selector = Selector::parse("td").expect("valid selector");

    let mut pairs = HashMap::new();

    for table in document.select(&table_selector) {
        let mut headers: Vec<String> = Vec::new();

        for row in table.select(&row_selector) {
            let header_cells: Vec<String> = row.select(&header_selector).map(cell_text).collect();
            if !header_cells.is_empty() {
                headers = header_cells;
                continue;
            }

            let value_cells: Vec<String> = row.select(&value_selector).map(cell_text).collect();
            if value_cells.is_empty() || headers.is_empty() {
                continue;
            }

            for (key, value) in headers.iter().zip(value_cells.iter()) {
                pairs.insert(key.clone(), value.clone());
            }
            // Only the first value row pairs with a header row; the rest of a
            // multi-row table (like the participants list) is not attributes.
            headers.clear();
        }
    }

    pairs
}

fn build_session_info(pairs: &HashMap<String, String>) -> SessionInfo {
    let track_id = pairs.get("TrackId").and_then(|v| v.parse::<i64>().ok());

    SessionInfo {
        track_id,
        track_name: track_id
            .and_then(tracks::track_name)
            .map(str::to_string),
        session_state: string_or_unknown(pairs.get("SessionState")),
        session_stage: string_or_unknown(pairs.get("SessionStage")),
        track_temperature: temperature_celsius(pairs.get("TemperatureTrack")),
        ambient_temperature: temperature_celsius(pairs.get("TemperatureAmbient")),
    }
}

fn string_or_unknown(raw: Option<&String>) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.clone(),
        _ => "Unknown".to_string(),
    }
}

/// Raw value is thousandths of a degree; report one-decimal Celsius.
fn temperature_celsius(raw: Option<&String>) -> Option<f64> {
    let millidegrees: i64 = raw?.parse().ok()?;
    Some((millidegrees as f64 / 100.0).round() / 10.0)
}

// --- Session Participants ---

fn parse_participants(document: &Html) -> Vec<LiveParticipant> {
    let Some(table) = find_participants_table(document) else {
        return Vec::new();
    };

    let row_selector = Selector::parse("tr").expect("valid selector");
    let header_selector = Selector::parse("th").expect("valid selector");
    let value_selector = Selector::parse("td").expect("valid selector");

    let mut participants = Vec::new();

    for row in table.select(&row_selector) {
        if row.select(&header_selector).next().is_some() {
            continue;
        }

        let cells: Vec<String> = row.select(&value_selector).map(cell_text).collect();
        if cells.len() < MIN_PARTICIPANT_COLUMNS {
            continue;
        }

        participants.push(parse_participant_row(&cells));
    }

    participants
}

fn find_participants_table<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    let heading_selector = Selector::parse("h3").expect("valid selector");

    for heading in document.select(&heading_selector) {
        let title: String = heading.text().collect();
        if title.trim() != PARTICIPANTS_HEADING {
            continue;
        }

        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if element.value().name() == "table" {
                    return Some(element);
                }
            }
        }
    }

    None
}

fn parse_participant_row(cells: &[String]) -> LiveParticipant {
    LiveParticipant {
        participant_id: cell_i64(cells, 0),
        ref_id: cell_i64(cells, 1),
        name: cell_string(cells, 2),
        is_player: cells.get(3).map(String::as_str) == Some("1"),
        grid_position: cell_i64(cells, 4),
        vehicle_id: cell_i64(cells, 5),
        livery_id: cell_i64(cells, 6),
        race_position: cell_i64(cells, 7),
        current_lap: cell_i64(cells, 8),
        current_sector: cell_i64(cells, 9),
        sector1_time: cell_i64(cells, 10),
        sector2_time: cell_i64(cells, 11),
        sector3_time: cell_i64(cells, 12),
        last_lap_time: cell_i64(cells, 13),
        fastest_lap_time: cell_i64(cells, 14),
        state: cell_string(cells, 15),
        headlights_on: cells.get(16).is_some_and(|v| !v.is_empty()),
        wipers_level: cell_i64(cells, 17),
        speed: cell_i64(cells, 18),
        gear: cell_i64(cells, 19),
        rpm: cell_i64(cells, 20),
        position_x: cell_i64(cells, 21),
        position_y: cell_i64(cells, 22),
        position_z: cell_i64(cells, 23),
        orientation: cell_i64(cells, 24),
    }
}

// --- Cell Helpers ---

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn cell_i64(cells: &[String], index: usize) -> i64 {
    cells
        .get(index)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn cell_string(cells: &[String], index: usize) -> String {
    match cells.get(index) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant_row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    fn full_row(name: &str, is_player: &str) -> String {
        let cells = [
            "1",
            "2345",
            name,
            is_player,
            "3",
            "160008140",
            "7",
            "2",
            "5",
            "1",
            "31000",
            "29000",
            "30500",
            "91500",
            "90250",
            "Racing",
            "",
            "0",
            "210",
            "4",
            "7200",
            "1500000",
            "12000",
            "-800000",
            "180",
        ];
        participant_row(&cells)
    }

    fn status_html() -> String {
        format!(
            r#"<html><body>
            <h3>Server</h3>
            <table class="simple">
              <tr><th>Name</th><th>MaxPlayers</th></tr>
              <tr><td>My Server</td><td>24</td></tr>
            </table>
            <h3>Session Attributes</h3>
            <table class="simple">
              <tr><th>SessionState</th><th>SessionStage</th><th>TrackId</th></tr>
              <tr><td>Race</td><td>Race1</td><td>775712153</td></tr>
              <tr><th>TemperatureTrack</th><th>TemperatureAmbient</th></tr>
              <tr><td>31400</td><td>24900</td></tr>
            </table>
            <h3>Session Participants</h3>
            <table class="simple">
              <tr><th>Index</th><th>RefId</th><th>Name</th></tr>
              {}
              <tr><td>9</td><td>10</td></tr>
              {}
            </table>
            </body></html>"#,
            full_row("<a href='#'>Ayrton</a>", "1"),
            full_row("Rubens (AI)", "0"),
        )
    }

    #[test]
    fn track_id_found_in_any_table() {
        let page = parse_status_page(&status_html());
        assert_eq!(page.session.track_id, Some(775712153));
        assert_eq!(page.session.track_name.as_deref(), Some("Spa-Francorchamps"));
    }

    #[test]
    fn paired_headers_fill_the_session_info() {
        let page = parse_status_page(&status_html());
        assert_eq!(page.session.session_state, "Race");
        assert_eq!(page.session.session_stage, "Race1");
        assert_eq!(page.session.track_temperature, Some(31.4));
        assert_eq!(page.session.ambient_temperature, Some(24.9));
    }

    #[test]
    fn short_rows_are_skipped_not_errors() {
        let page = parse_status_page(&status_html());
        assert_eq!(page.participants.len(), 2);
    }

    #[test]
    fn participant_columns_parse_positionally() {
        let page = parse_status_page(&status_html());
        let first = &page.participants[0];
        assert_eq!(first.name, "Ayrton");
        assert!(first.is_player);
        assert_eq!(first.race_position, 2);
        assert_eq!(first.fastest_lap_time, 90250);
        assert_eq!(first.position_x, 1_500_000);
        assert_eq!(first.position_z, -800_000);

        let second = &page.participants[1];
        assert_eq!(second.name, "Rubens (AI)");
        assert!(!second.is_player);
    }

    #[test]
    fn unresolved_track_reports_no_name() {
        let html = r#"<table class="simple">
            <tr><th>TrackId</th></tr><tr><td>123456</td></tr>
        </table>"#;
        let page = parse_status_page(html);
        assert_eq!(page.session.track_id, Some(123456));
        assert_eq!(page.session.track_name, None);
    }

    #[test]
    fn empty_session_values_default_to_unknown() {
        let html = r#"<table class="simple">
            <tr><th>SessionState</th><th>SessionStage</th></tr>
            <tr><td></td><td>Race1</td></tr>
        </table>"#;
        let page = parse_status_page(html);
        assert_eq!(page.session.session_state, "Unknown");
        assert_eq!(page.session.session_stage, "Race1");
    }

    #[test]
    fn missing_everything_defaults() {
        let page = parse_status_page("<html><body><p>booting</p></body></html>");
        assert_eq!(page.session.track_id, None);
        assert_eq!(page.session.session_state, "Unknown");
        assert!(page.participants.is_empty());
    }
}
