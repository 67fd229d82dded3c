//! Tool domain module
//!
//! This module defines the core abstractions for the agent's **Tool
//! System** — how an agent invokes named, schema-validated capabilities
//! in a risk-aware, approval-gated manner.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐   dispatch(name, args, ctx)   ┌──────────────────┐
//! │ ToolCatalog  │──────────────────────────────▶│ ExecutionResult  │
//! │ (registry)   │                               │ (output/ticket)  │
//! └──────┬───────┘                               └──────────────────┘
//!        │
//!        ├─ plain tool      → handler runs, result returned verbatim
//!        └─ proposing tool  → ApprovalRequest ticket, no side effect
//! ```
//!
//! # The Approval Gate
//!
//! A [`Tool`](entities::Tool) whose kind is
//! [`ToolKind::Proposing`](entities::ToolKind) never performs its side
//! effect. Dispatching it returns a failed result carrying an
//! [`ApprovalRequest`](value_objects::ApprovalRequest): the confirmation
//! message, the name of the hidden executor tool, and the exact
//! arguments to hand back on confirmation. There is no pending state on
//! the catalog side — the whole ticket travels in the result payload, so
//! an unconfirmed proposal simply expires by never being re-dispatched.
//!
//! The paired executor is built with [`ApprovalPair`](approval::ApprovalPair),
//! which enforces the shape at construction time: the executor is
//! hidden, has no approval spec of its own, and the argument mapping is
//! a pure function of the proposal's validated arguments.
//!
//! # Risk-Based Auto-Approval
//!
//! Each tool has a [`RiskLevel`](entities::RiskLevel) that decides
//! whether a proposal may be confirmed without a human in automated
//! workflows:
//!
//! | Risk | Examples | Auto-approve |
//! |------|----------|--------------|
//! | **ReadOnly** | `read_file`, provider queries | Yes |
//! | **LowRisk** | scratch-space writes | Yes |
//! | **HighRisk** | `write_file`, `run_command` | Never |
//!
//! # Key Types
//!
//! - [`ToolCatalog`](catalog::ToolCatalog) — name → tool registry with dispatch
//! - [`Tool`](entities::Tool) — a named capability with handler and schema
//! - [`ApprovalPair`](approval::ApprovalPair) — builder for proposing/executor pairs
//! - [`SchemaValidator`](traits::SchemaValidator) — opaque argument validation contract
//! - [`ExecutionResult`](value_objects::ExecutionResult) — outcome of a dispatch

pub mod approval;
pub mod catalog;
pub mod entities;
pub mod traits;
pub mod value_objects;

pub use approval::ApprovalPair;
pub use catalog::ToolCatalog;
pub use entities::{RiskLevel, Tool, ToolCategory, ToolKind};
pub use traits::{SchemaValidator, ToolHandler};
pub use value_objects::{ExecutionContext, ExecutionResult, ToolError};
