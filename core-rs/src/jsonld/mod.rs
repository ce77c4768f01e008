//! JSON-LD codec
//!
//! - `encoder`: entities to a `{"@context", "@graph"}` document
//! - `expand`: a document to triples in a `GraphStore`
//! - `context`: active-context processing and the encoder's context mode
//! - `source`: inline JSON, text, files and URLs as document sources

pub mod context;
pub mod encoder;
pub mod expand;
pub mod source;

pub use context::{default_context, set_default_context, Context, ContextMode, DEFAULT_CONTEXT_URL};
pub use encoder::{EncodeOptions, Encoder};
pub use expand::expand;
pub use source::Source;
