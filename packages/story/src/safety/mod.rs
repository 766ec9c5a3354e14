//! Keyword-based content safety.
//!
//! A static allow/deny filter: each language has an ordered list of regular
//! expressions, and the first match decides the rejection reason. Phrasing
//! outside the pattern list (spacing, leetspeak) is not caught.

mod blocklist;
mod scanner;

pub use blocklist::{Blocklist, BlocklistRule};
pub use scanner::{tighten_system_prompt, SafetyResult, SafetyScanner, TIGHTEN_CLAUSE};
