//! The model descriptor: the compiler-produced input contract the engine
//! trusts at runtime. Tables here are immutable once built, the same
//! builder-then-freeze shape the teacher's descriptor module uses, adapted
//! from a pattern-permutation table to a tensor map + operator table +
//! schedule.

use rustc_hash::FxHashMap;

use crate::config::{MAX_OP_INPUTS, MAX_OP_OUTPUTS};
use crate::context::KernelFn;
use crate::error::RuntimeError;

/// Sentinel for an absent/external SID slot.
pub const NO_SID: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Cpu,
    /// Reserved, unimplemented: dispatching to it is a descriptor
    /// inconsistency like any other, not a distinct error path.
    Gpu,
}

#[derive(Debug, Clone, Copy)]
pub struct TensorMapEntry {
    pub sid: i32,
    pub offset: u32,
    pub size: u32,
    pub align: u32,
}

pub struct TensorMap {
    entries: Vec<TensorMapEntry>,
    index: FxHashMap<i32, usize>,
}

impl TensorMap {
    pub fn new(entries: Vec<TensorMapEntry>) -> Self {
        let mut index = FxHashMap::default();
        for (i, e) in entries.iter().enumerate() {
            index.insert(e.sid, i);
        }
        TensorMap { entries, index }
    }

    pub fn get(&self, sid: i32) -> Option<&TensorMapEntry> {
        if sid < 0 {
            return None;
        }
        self.index.get(&sid).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TensorMapEntry> {
        self.entries.iter()
    }
}

#[derive(Clone)]
pub struct OperatorDescriptor {
    pub op_id: u32,
    pub name: &'static str,
    pub backend: BackendKind,
    pub func_entry_id: u32,
    pub input_sids: [i32; MAX_OP_INPUTS],
    pub output_sids: [i32; MAX_OP_OUTPUTS],
    pub input_count: usize,
    pub output_count: usize,
}

impl OperatorDescriptor {
    pub fn inputs(&self) -> &[i32] {
        &self.input_sids[..self.input_count]
    }

    pub fn outputs(&self) -> &[i32] {
        &self.output_sids[..self.output_count]
    }
}

#[derive(Clone)]
pub struct Layer {
    pub op_indices: Vec<u32>,
}

pub struct Schedule {
    pub layers: Vec<Layer>,
}

/// Per-backend array of kernel function pointers, indexed by `func_entry_id`.
/// Directly grounded on the teacher's `[PatternHandler; 44]` dispatch table,
/// generalized from a fixed 44-entry pattern taxonomy to an open, per-model
/// function list.
pub struct BackendFunctionTable {
    pub kind: BackendKind,
    pub functions: Vec<KernelFn>,
}

pub struct Descriptor {
    pub tensor_map: TensorMap,
    pub operators: Vec<OperatorDescriptor>,
    pub schedule: Schedule,
    pub function_tables: Vec<BackendFunctionTable>,
}

impl Descriptor {
    pub fn function_table(&self, kind: BackendKind) -> Option<&BackendFunctionTable> {
        self.function_tables.iter().find(|t| t.kind == kind)
    }

    /// Checks the invariants from the data model section: tensor-map
    /// bounds/alignment, SID references resolve, and `func_entry_id` is in
    /// range. Optional — the engine trusts the descriptor at runtime; this
    /// exists for a demo driver to call once at startup.
    pub fn validate(&self, workspace_len: usize) -> Result<(), RuntimeError> {
        for entry in self.tensor_map.iter() {
            if entry.align == 0 || !entry.align.is_power_of_two() {
                return Err(RuntimeError::DescriptorInvalid("tensor align not a power of two"));
            }
            if entry.offset % entry.align != 0 {
                return Err(RuntimeError::DescriptorInvalid("tensor offset not aligned"));
            }
            let end = entry.offset as usize + entry.size as usize;
            if end > workspace_len {
                return Err(RuntimeError::DescriptorInvalid("tensor exceeds workspace"));
            }
        }

        for op in &self.operators {
            let table = self
                .function_table(op.backend)
                .ok_or(RuntimeError::DescriptorInvalid("unknown backend kind"))?;
            if op.func_entry_id as usize >= table.functions.len() {
                return Err(RuntimeError::DescriptorInvalid("func_entry_id out of range"));
            }
            for &sid in op.inputs().iter().chain(op.outputs().iter()) {
                if sid != NO_SID && self.tensor_map.get(sid).is_none() {
                    return Err(RuntimeError::DescriptorInvalid("SID not present in tensor map"));
                }
            }
        }

        let mut seen = vec![false; self.operators.len()];
        for layer in &self.schedule.layers {
            for &idx in &layer.op_indices {
                let idx = idx as usize;
                if idx >= seen.len() || seen[idx] {
                    return Err(RuntimeError::DescriptorInvalid(
                        "operator index missing or duplicated across layers",
                    ));
                }
                seen[idx] = true;
            }
        }
        if seen.iter().any(|&s| !s) {
            return Err(RuntimeError::DescriptorInvalid(
                "operator index missing from schedule",
            ));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct DescriptorBuilder {
    tensor_map: Vec<TensorMapEntry>,
    operators: Vec<OperatorDescriptor>,
    layers: Vec<Layer>,
    function_tables: Vec<BackendFunctionTable>,
}

impl DescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tensor(mut self, entry: TensorMapEntry) -> Self {
        self.tensor_map.push(entry);
        self
    }

    pub fn with_operator(mut self, op: OperatorDescriptor) -> Self {
        self.operators.push(op);
        self
    }

    pub fn with_layer(mut self, op_indices: Vec<u32>) -> Self {
        self.layers.push(Layer { op_indices });
        self
    }

    pub fn with_function_table(mut self, kind: BackendKind, functions: Vec<KernelFn>) -> Self {
        self.function_tables.push(BackendFunctionTable { kind, functions });
        self
    }

    pub fn build(self) -> Descriptor {
        Descriptor {
            tensor_map: TensorMap::new(self.tensor_map),
            operators: self.operators,
            schedule: Schedule { layers: self.layers },
            function_tables: self.function_tables,
        }
    }
}
