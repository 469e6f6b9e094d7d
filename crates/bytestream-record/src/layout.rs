use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::ByteOrder;
use crate::descriptor::TypeDescriptor;
use crate::error::{RecordError, Result};
use crate::record::Record;

/// Largest layout file [`RecordLayout::from_path`] will read.
pub const MAX_LAYOUT_FILE_SIZE: u64 = 256 * 1024;

/// Field types and byte order of a record, loadable from JSON:
///
/// ```json
/// { "fields": ["u16", "u8[]"], "byte_order": "little" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordLayout {
    pub fields: Vec<TypeDescriptor>,
    #[serde(default)]
    pub byte_order: ByteOrder,
}

impl RecordLayout {
    pub fn new(fields: Vec<TypeDescriptor>, byte_order: ByteOrder) -> Self {
        Self { fields, byte_order }
    }

    /// Layout from type tokens.
    pub fn parse<I, S>(tokens: I, byte_order: ByteOrder) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = tokens
            .into_iter()
            .map(|token| TypeDescriptor::parse(token.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fields, byte_order))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| RecordError::Layout(err.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|err| RecordError::Layout(format!("{}: {err}", path.display())))?;

        let mut content = String::new();
        file.take(MAX_LAYOUT_FILE_SIZE + 1)
            .read_to_string(&mut content)
            .map_err(|err| RecordError::Layout(format!("{}: {err}", path.display())))?;
        if content.len() as u64 > MAX_LAYOUT_FILE_SIZE {
            return Err(RecordError::Layout(format!(
                "{}: exceeds {MAX_LAYOUT_FILE_SIZE} bytes",
                path.display()
            )));
        }

        let layout = Self::from_json_str(&content)
            .map_err(|err| RecordError::Layout(format!("{}: {err}", path.display())))?;
        tracing::debug!(path = %path.display(), fields = layout.fields.len(), "loaded record layout");
        Ok(layout)
    }

    /// Zero-filled record with this layout's fields.
    pub fn build(&self) -> Result<Record> {
        Record::new(self.fields.iter().copied())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| RecordError::Layout(err.to_string()))
    }
}
