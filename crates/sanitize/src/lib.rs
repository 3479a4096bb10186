//! Filename sanitization utilities.
//!
//! Uploaded filenames are attacker-controlled: they can carry path
//! separators, control characters, HTML fragments, URI metacharacters and
//! arbitrarily long multi-byte sequences. Before a name is allowed anywhere
//! near a storage path it is run through [`sanitize`], which produces a name
//! that is safe on any POSIX or Windows filesystem and inert when rendered in
//! a UI surface that forgets to re-escape it.
//!
//! This crate is deliberately pure: no filesystem access, no clock, no
//! randomness. The same input always produces the same output, and the
//! output is a fixed point — `sanitize(&sanitize(x, b), b) == sanitize(x, b)`
//! for every input.
//!
//! ## Character policy
//!
//! The denylist replaced with `-` covers, in order:
//! - filesystem-reserved characters `< > : " / \ | ? *`
//! - ASCII control characters (0x00–0x1F)
//! - the non-printing code points DEL, NO-BREAK SPACE and SOFT HYPHEN
//! - URI-reserved punctuation `# [ ] @ ! $ & ' ( ) + , ; =`
//! - URL-unsafe symbols `{ } ^ ~ ` `
//!
//! ## Encoding
//!
//! Input is `&str`, so the text encoding is UTF-8 by construction. Callers
//! that receive raw bytes decide how to decode them *before* calling in; the
//! 255-byte basename budget is enforced with a cut that never splits a
//! multi-byte character.

mod filename;

pub use filename::{sanitize, slugify};
