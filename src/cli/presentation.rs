//! CLI presentation: gallery summaries as tables or JSON.

use crate::frame::GridSnapshot;
use comfy_table::Table;
use serde::Serialize;

/// One gallery line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryRow {
    pub id: String,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub resolved: bool,
    /// Length of the data URL, 0 while pending.
    pub encoded_bytes: usize,
}

impl GalleryRow {
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Vec<GalleryRow> {
        snapshot
            .frames
            .iter()
            .map(|frame| GalleryRow {
                id: frame.id.to_string(),
                label: frame.label.clone(),
                width: frame.width,
                height: frame.height,
                aspect_ratio: frame.aspect_ratio(),
                resolved: frame.is_resolved(),
                encoded_bytes: frame.image_data_url.as_ref().map_or(0, |url| url.len()),
            })
            .collect()
    }
}

pub fn format_gallery_table(snapshot: &GridSnapshot, peak_in_flight: usize) -> String {
    let rows = GalleryRow::from_snapshot(snapshot);
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Label", "Size", "Aspect", "Status", "Encoded"]);
    for row in &rows {
        let status = if row.resolved { "ready" } else { "pending" };
        table.add_row(vec![
            row.label.clone(),
            format!("{}x{}", row.width, row.height),
            format!("{:.3}", row.aspect_ratio),
            status.to_string(),
            row.encoded_bytes.to_string(),
        ]);
    }

    let ready = rows.iter().filter(|row| row.resolved).count();
    format!(
        "{}\n{} of {} frames ready, column width {}px, peak in flight {}",
        table,
        ready,
        rows.len(),
        snapshot.column_width,
        peak_in_flight
    )
}

pub fn format_gallery_json(
    snapshot: &GridSnapshot,
    peak_in_flight: usize,
) -> Result<String, serde_json::Error> {
    let value = serde_json::json!({
        "column_width": snapshot.column_width,
        "peak_in_flight": peak_in_flight,
        "frames": GalleryRow::from_snapshot(snapshot),
    });
    serde_json::to_string_pretty(&value)
}
