//! Per-document table of mask formats for `mask-inspect --report`

use prettytable::{format, Cell, Row, Table};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::inspect::InspectEvent;

#[derive(Debug, Clone, Default)]
pub struct DocumentEntry {
    pub path: PathBuf,
    pub masks: usize,
    pub failed: usize,
    /// Format label -> number of masks with that format
    pub formats: BTreeMap<String, usize>,
}

impl DocumentEntry {
    fn formats_label(&self) -> String {
        if self.formats.is_empty() {
            return "-".to_string();
        }
        self.formats
            .iter()
            .map(|(name, count)| format!("{} x{}", name, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Default)]
pub struct InspectReport {
    pub entries: Vec<DocumentEntry>,
}

impl InspectReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one inspection event into the report
    pub fn record(&mut self, event: &InspectEvent) {
        match event {
            InspectEvent::Document { path, mask_count } => self.entries.push(DocumentEntry {
                path: path.clone(),
                masks: *mask_count,
                ..Default::default()
            }),
            InspectEvent::Mask {
                path, detection, ..
            } => {
                let entry = self.entry_for(path);
                *entry.formats.entry(detection.kind.name()).or_insert(0) += 1;
            }
            InspectEvent::Failed {
                path,
                index: Some(_),
                ..
            } => self.entry_for(path).failed += 1,
            // Unreadable documents never produce a row
            InspectEvent::Failed { index: None, .. } => {}
        }
    }

    fn entry_for(&mut self, path: &Path) -> &mut DocumentEntry {
        let needs_entry = self
            .entries
            .last()
            .map_or(true, |entry| entry.path.as_path() != path);
        if needs_entry {
            self.entries.push(DocumentEntry {
                path: path.to_path_buf(),
                ..Default::default()
            });
        }
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.add_row(Row::new(vec![
            Cell::new("Document"),
            Cell::new("Masks"),
            Cell::new("Formats"),
            Cell::new("Failed"),
        ]));

        for entry in &self.entries {
            table.add_row(Row::new(vec![
                Cell::new(&entry.path.display().to_string()),
                Cell::new(&entry.masks.to_string()),
                Cell::new(&entry.formats_label()),
                Cell::new(&entry.failed.to_string()),
            ]));
        }

        table
    }

    /// Print the report as a formatted table
    pub fn print(&self) {
        if self.entries.is_empty() {
            println!("No masks found.");
            return;
        }

        println!();
        println!("MASK FORMATS ({} documents)", self.entries.len());
        self.table().printstd();
    }
}
