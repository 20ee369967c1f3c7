use std::path::Path;

use super::keys;
use super::StepSection;
use crate::wizard::fields::{FieldDescriptor, FieldKind, StepSchema, Validator};
use crate::wizard::registry::StepKind;
use crate::wizard::store::FormPatch;

const ACCEPTED: [&str; 7] = ["zip", "stl", "ply", "obj", "png", "jpg", "jpeg"];
const SCAN_FORMATS: [&str; 4] = ["stl", "ply", "obj", "zip"];

pub struct AttachmentsStep {
    schema: StepSchema,
}

impl AttachmentsStep {
    pub fn new() -> Self {
        let fields = vec![FieldDescriptor::new(
            keys::ATTACHMENTS,
            "Attachments (comma-separated paths)",
            FieldKind::Files,
            Validator::Files(ACCEPTED.to_vec()),
        )
        .with_help("Intra-oral scans (STL/PLY/OBJ or a ZIP export) plus optional photos.")];
        Self {
            schema: StepSchema::new(fields),
        }
    }
}

impl Default for AttachmentsStep {
    fn default() -> Self {
        Self::new()
    }
}

fn is_scan(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCAN_FORMATS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl StepSection for AttachmentsStep {
    fn kind(&self) -> StepKind {
        StepKind::Attachments
    }

    fn schema(&self) -> &StepSchema {
        &self.schema
    }

    fn check(&self, patch: &FormPatch) -> Vec<String> {
        let has_scan = patch
            .get(keys::ATTACHMENTS)
            .and_then(|value| value.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).any(is_scan))
            .unwrap_or(false);
        if has_scan {
            Vec::new()
        } else {
            vec!["At least one scan (STL, PLY, OBJ or ZIP) is required".to_string()]
        }
    }
}
