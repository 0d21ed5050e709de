//! Streaming Lottie (Bodymovin) document parser.
//!
//! A pull-style token cursor feeds recursive-descent builders that produce
//! the renderer-ready model defined in `lottie-model` in a single pass:
//! no DOM, with color, path, and keyframe transformations applied in-line
//! and precomp references resolved before the model is handed over.
//!
//! ```no_run
//! let data = std::fs::read("animation.json").unwrap();
//! let model = lottie_parser::parse(&data).unwrap();
//! println!("{} layers", model.root.layers.len());
//! ```

mod cursor;
mod parse;

pub use cursor::{JsonType, ScalarValue, TokenCursor};
pub use parse::LottieParser;

use anyhow::Result;
use lottie_model::model::Model;

/// One-call convenience over [`LottieParser`]: parses `document` and fails
/// if the cursor ended in the terminal error state. Soft corruption (bad
/// shape data, unknown node types) never fails the parse; it is logged and
/// the affected nodes degrade per the model's documented defaults.
pub fn parse(document: &[u8]) -> Result<Model> {
    let parser = LottieParser::new(document);
    if !parser.is_valid() {
        anyhow::bail!("malformed lottie document");
    }
    Ok(parser.model())
}
