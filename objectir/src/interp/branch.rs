//! Label resolution for the goto-style branch opcodes (`br`, `brtrue`, ...).

use std::collections::HashMap;

use crate::error::{VmError, VmResult};

use super::Interpreter;

impl Interpreter {
    pub(super) fn resolve_label(&self, label_map: &HashMap<String, usize>, name: &str) -> VmResult<usize> {
        label_map
            .get(name)
            .copied()
            .ok_or_else(|| VmError::branch_out_of_range(format!("label '{name}' not found in this block")))
    }
}
