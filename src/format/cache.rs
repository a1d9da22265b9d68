//! Compiled patterns, cached by their expanded text.

use super::tokens::{TokenFn, token};
use super::{RenderContext, formatting_tokens, literal_text};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

enum Piece {
    Literal(String),
    Token(TokenFn),
}

pub(crate) struct CompiledFormat {
    pieces: Vec<Piece>,
}

impl CompiledFormat {
    fn compile(pattern: &str) -> Self {
        let mut pieces: Vec<Piece> = Vec::new();
        for m in formatting_tokens().find_iter(pattern) {
            match token(m.as_str()) {
                Some(render) => pieces.push(Piece::Token(render)),
                None => {
                    let text = literal_text(m.as_str());
                    // Merge runs of literal text.
                    if let Some(Piece::Literal(previous)) = pieces.last_mut() {
                        previous.push_str(&text);
                    } else {
                        pieces.push(Piece::Literal(text));
                    }
                }
            }
        }
        CompiledFormat { pieces }
    }

    pub(crate) fn render(&self, ctx: &RenderContext) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Token(render) => out.push_str(&render(ctx)),
            }
        }
        out
    }
}

static CACHE: Lazy<RwLock<HashMap<String, Arc<CompiledFormat>>>> = Lazy::new(|| RwLock::new(HashMap::new()));

pub(crate) fn compiled(pattern: &str) -> Arc<CompiledFormat> {
    if let Some(hit) = CACHE.read().get(pattern) {
        return Arc::clone(hit);
    }
    let compiled = Arc::new(CompiledFormat::compile(pattern));
    tracing::debug!(pattern, pieces = compiled.pieces.len(), "compiled format pattern");
    CACHE.write().entry(pattern.to_string()).or_insert(compiled).clone()
}
