//! Tensor-level operations.
//!
//! An [`Operation`] produces one or more tensor outputs: a placeholder is
//! an external input, a compute op defines each output element by a body
//! expression over its spatial axes (plus reduction axes for reductions).
//! A [`Tensor`] is one output slot of an operation; indexing a tensor from
//! another expression produces a call node that records the producing
//! operation and slot.

use std::sync::Arc;

use snafu::ensure;
use tessel_dtype::DType;

use crate::error::{EmptyComputeBodySnafu, Result, ValueIndexOutOfRangeSnafu};
use crate::expr::{Expr, ExprRef};
use crate::types::CallType;
use crate::var::Var;

/// External input with a known shape and element type.
#[derive(Debug)]
pub struct PlaceholderOp {
    name: String,
    shape: Vec<i64>,
    dtype: DType,
}

impl PlaceholderOp {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub const fn dtype(&self) -> DType {
        self.dtype
    }
}

/// Element-wise definition of one or more outputs over shared axes.
#[derive(Debug)]
pub struct ComputeOp {
    name: String,
    axis: Vec<Var>,
    reduce_axis: Vec<Var>,
    body: Vec<ExprRef>,
}

impl ComputeOp {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spatial axes, one per output dimension.
    pub fn axis(&self) -> &[Var] {
        &self.axis
    }

    /// Reduction axes; empty for pure element-wise definitions.
    pub fn reduce_axis(&self) -> &[Var] {
        &self.reduce_axis
    }

    /// One body expression per output slot.
    pub fn body(&self) -> &[ExprRef] {
        &self.body
    }
}

/// A tensor-producing operation.
#[derive(Debug)]
pub enum Operation {
    Placeholder(PlaceholderOp),
    Compute(ComputeOp),
}

impl Operation {
    pub fn placeholder(name: impl Into<String>, shape: Vec<i64>, dtype: DType) -> Arc<Self> {
        Arc::new(Self::Placeholder(PlaceholderOp { name: name.into(), shape, dtype }))
    }

    /// Compute operation with one body expression per output slot.
    pub fn compute(
        name: impl Into<String>,
        axis: Vec<Var>,
        reduce_axis: Vec<Var>,
        body: Vec<ExprRef>,
    ) -> Result<Arc<Self>> {
        let name = name.into();
        ensure!(!body.is_empty(), EmptyComputeBodySnafu { name: name.clone() });
        Ok(Arc::new(Self::Compute(ComputeOp { name, axis, reduce_axis, body })))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Placeholder(op) => &op.name,
            Self::Compute(op) => &op.name,
        }
    }

    /// Number of output slots this operation produces.
    pub fn num_outputs(&self) -> usize {
        match self {
            Self::Placeholder(_) => 1,
            Self::Compute(op) => op.body.len(),
        }
    }

    pub fn as_compute(&self) -> Option<&ComputeOp> {
        match self {
            Self::Compute(op) => Some(op),
            Self::Placeholder(_) => None,
        }
    }

    /// The output tensor at `value_index`.
    pub fn output(self: &Arc<Self>, value_index: usize) -> Result<Tensor> {
        ensure!(
            value_index < self.num_outputs(),
            ValueIndexOutOfRangeSnafu { value_index, outputs: self.num_outputs() }
        );
        let dtype = match self.as_ref() {
            Self::Placeholder(op) => op.dtype,
            Self::Compute(op) => op.body[value_index].dtype(),
        };
        Ok(Tensor { op: self.clone(), value_index, dtype })
    }

    /// The first output slot as a tensor. Every operation has at least one
    /// output, so this never fails; the common single-output case reads
    /// better without the slot index.
    pub fn tensor(self: &Arc<Self>) -> Tensor {
        let dtype = match self.as_ref() {
            Self::Placeholder(op) => op.dtype,
            Self::Compute(op) => op.body[0].dtype(),
        };
        Tensor { op: self.clone(), value_index: 0, dtype }
    }
}

/// One output slot of an operation.
#[derive(Debug, Clone)]
pub struct Tensor {
    op: Arc<Operation>,
    value_index: usize,
    dtype: DType,
}

impl Tensor {
    pub fn op(&self) -> &Arc<Operation> {
        &self.op
    }

    pub const fn value_index(&self) -> usize {
        self.value_index
    }

    pub const fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn name(&self) -> &str {
        self.op.name()
    }

    /// Element access `tensor[indices..]` as an expression. The resulting
    /// call records the producing operation and output slot.
    pub fn call(&self, indices: impl IntoIterator<Item = ExprRef>) -> Result<ExprRef> {
        Expr::call(
            self.op.name(),
            indices,
            CallType::Halide,
            self.dtype,
            Some(self.op.clone()),
            self.value_index,
        )
    }
}
