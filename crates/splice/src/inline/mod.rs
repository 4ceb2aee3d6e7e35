//! Import-inlining engine.
//!
//! Turns one entry file plus everything it transitively imports into a
//! single object literal:
//!
//! ```text
//! entry text ──▶ entry_object_body ──▶ CodeBlockBuffer
//!                                         ▲
//! for each import (depth first):          │
//!   fetch_text ──▶ extract_declarations ──▶ inline_file
//!                                           ├─ render_member + insert before final `}`
//!                                           └─ rewrite free call sites to `this._inlined_*`
//! ```
//!
//! Four pieces, each usable on its own:
//! - [`imports`]: finds `import { ... } from "..."` and resolves specifiers to URLs
//! - [`declarations`]: cuts function and arrow-function declarations out of text
//! - [`rewrite`]: renames, splices and rewrites call sites in the buffer
//! - [`driver`]: walks the import graph with the other three

pub mod declarations;
pub mod driver;
pub mod error;
pub mod imports;
pub mod rewrite;

pub use declarations::{DeclarationBlock, DeclarationBody, extract_declarations};
pub use driver::{
    InlineOptions, InlineOutput, Inliner, SkipReason, SkippedImport, entry_object_body,
};
pub use error::{InlineError, InlineResult};
pub use imports::{ImportReference, parse_imports, resolve_specifier};
pub use rewrite::{
    CodeBlockBuffer, FunctionTranslation, ImportScopes, TranslationTable, inline_declaration,
    inline_file, inlined_name,
};
