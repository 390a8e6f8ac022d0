//! draft-blocks: block-hierarchy writing assistant core.
//!
//! This crate provides the state model behind an outline-first writing tool.
//! It includes:
//!
//! - **Block store** - id-indexed arena of titled blocks in a two-level
//!   parent/child hierarchy with a stable display order
//! - **Hierarchy engine** - cycle, depth, and link-symmetry invariants
//!   enforced before any structural mutation commits
//! - **Move resolver** - drag gestures resolved into a tagged move union
//!   and applied check-then-commit
//! - **Composition** - paragraph development and regeneration against a
//!   pluggable completion backend, block generation, titling
//! - **OpenAI backend** - blocking chat-completions client (optional)
//!
//! # Quick Start
//!
//! ```rust
//! use draft_blocks::{Block, Draft, DropSpot, Source};
//!
//! let mut draft = Draft::new();
//! let block = Block::new(1, "Opening greeting", "Set a warm tone.", Source::Generated);
//! draft.insert_block(block, DropSpot::End);
//!
//! assert_eq!(draft.store().top_level(), vec![1]);
//! ```
//!
//! # Features
//!
//! - `openai` - Enables the HTTP completion backend and the CLI

// Block model and hierarchy invariants
pub mod core;

// Draft state, gestures, and structural moves
pub mod doc;

// Completion boundary and text composition
pub mod compose;

// JSON extraction and repair for model output
pub mod extract;

// Optional: OpenAI chat-completions backend
#[cfg(feature = "openai")]
pub mod openai;

// Re-export core types
pub use crate::core::{Block, BlockId, BlockStore, IdAllocator, Source, TITLE_MAX_CHARS};

// Re-export hierarchy checks
pub use crate::core::hierarchy::{ConsistencyError, check_consistency, would_create_cycle};

// Re-export draft types
pub use crate::doc::{
    BlockPatch, DragSource, Draft, DropSpot, DropTarget, EditError, MoveOp, MoveOutcome, MoveVeto,
    resolve_gesture,
};

// Re-export composition types
pub use crate::compose::{
    BLOCK_COUNT, Completion, CompletionError, CompletionRequest, ComposeError, develop, freeform,
    generate_blocks, generate_title, regenerate, title_from_text,
};

// Re-export extraction types
pub use crate::extract::{BlockSeed, ExtractError, block_seeds};

#[cfg(feature = "openai")]
pub use crate::openai::OpenAiClient;
