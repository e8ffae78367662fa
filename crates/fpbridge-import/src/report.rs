//! Per-document import results.

use std::fmt;

use fpbridge_document::{ImportItem, ItemKind};

/// Outcome of one part or prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartStatus {
    Imported,
    /// An outfit part whose slot was already filled by an earlier part.
    DuplicateSlot,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReport {
    /// Slot or mesh path identifying the part.
    pub label: String,
    pub status: PartStatus,
}

/// Outcome of one import item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub name: String,
    pub kind: ItemKind,
    pub parts: Vec<PartReport>,
    /// Bone count of the merged rig, when skeletons were merged.
    pub merged_bones: Option<usize>,
    /// Failure that stopped the item.
    pub error: Option<String>,
}

impl ItemReport {
    pub fn new(item: &ImportItem) -> Self {
        Self {
            name: item.name.clone(),
            kind: item.kind,
            parts: Vec::new(),
            merged_bones: None,
            error: None,
        }
    }

    pub(crate) fn record(&mut self, label: impl Into<String>, status: PartStatus) {
        self.parts.push(PartReport {
            label: label.into(),
            status,
        });
    }

    /// Whether the item completed, possibly with failed parts.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Number of parts that were imported.
    pub fn imported_parts(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| p.status == PartStatus::Imported)
            .count()
    }
}

/// Result of applying one request document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub items: Vec<ItemReport>,
    /// Materials created for this document; cache hits are not counted.
    pub materials_created: u64,
}

impl ImportReport {
    /// Every item and part failure as `item: message` or `item / part: message`.
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        for item in &self.items {
            if let Some(error) = &item.error {
                failures.push(format!("{}: {}", item.name, error));
            }
            for part in &item.parts {
                if let PartStatus::Failed(message) = &part.status {
                    failures.push(format!("{} / {}: {}", item.name, part.label, message));
                }
            }
        }
        failures
    }

    /// Items that completed.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_ok()).count()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} of {} items ({} new materials)",
            self.succeeded(),
            self.items.len(),
            self.materials_created
        )?;
        let failures = self.failures();
        if !failures.is_empty() {
            write!(f, ", {} failures: {}", failures.len(), failures.join("; "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ItemReport {
        ItemReport {
            name: name.to_string(),
            kind: ItemKind::Outfit,
            parts: Vec::new(),
            merged_bones: None,
            error: None,
        }
    }

    #[test]
    fn test_display_and_failures() {
        let mut ok = item("Renegade");
        ok.record("Body", PartStatus::Imported);
        ok.record("Hat", PartStatus::Failed("no mesh".into()));
        let mut failed = item("Floss");
        failed.error = Some("no armature".into());

        let report = ImportReport {
            items: vec![ok, failed],
            materials_created: 3,
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.items[0].imported_parts(), 1);
        assert_eq!(
            report.failures(),
            ["Renegade / Hat: no mesh", "Floss: no armature"]
        );
        assert_eq!(
            report.to_string(),
            "Imported 1 of 2 items (3 new materials), 2 failures: \
             Renegade / Hat: no mesh; Floss: no armature"
        );
    }
}
