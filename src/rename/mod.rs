//! Name rewriting for pairing keys and display names.

pub mod rules;

pub use rules::{rewrite, CompiledRules, NameRewriter, RewriteRule, RuleSet};
