//! Sample process-control namespace used by `rstree demo`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{LabelTree, TreeResult};

/// Signal quality of a tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Good,
    Bad,
}

/// Value of a process tag as delivered by an OPC-style server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValue {
    pub wellknown_id: String,
    pub engineering_unit: String,
    pub quality: Quality,
    /// Encoded value, e.g. `uint32:23.23`
    pub payload: String,
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({:?})", self.payload, self.engineering_unit, self.quality)
    }
}

/// Build the `pressures/P42` sample tree.
pub fn pressure_plant(tree: &mut LabelTree<TagValue>) -> TreeResult<()> {
    let (pressures, p42) = (tree.next_id(), tree.next_id());
    tree.root_mut()
        .create_child(pressures, "pressures", None)?
        .create_child(
            p42,
            "P42",
            Some(TagValue {
                wellknown_id: "P42".to_string(),
                engineering_unit: "bar".to_string(),
                quality: Quality::Good,
                payload: "uint32:23.23".to_string(),
            }),
        )?;
    Ok(())
}
