//! Pipeline stages for PDF-to-DOCX conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap the extraction backend without touching classification.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ lines ──▶ profile ──▶ classify ──▶ docx
//! (path)    (pdfium)    (lines)   (fonts)     (blocks)     (file)
//! ```
//!
//! 1. [`input`]    — strip quotes from the user-supplied path and validate it
//! 2. [`extract`]  — read positioned fragments per page; [`table`] finds
//!    column-aligned grids while the page is open
//! 3. [`lines`]    — group fragments into baseline-aligned lines
//! 4. [`profile`]  — document-wide body font size and line spacing, computed
//!    once before any page is classified
//! 5. [`classify`] — assign each line a block role (heading, bullet, contact,
//!    paragraph) and place tables in reading order
//! 6. [`docx`]     — emit styled DOCX elements and write the file atomically
//!
//! [`text`] holds the clean-up rules shared by line assembly and paragraph
//! joining.

pub mod classify;
pub mod docx;
pub mod extract;
pub mod input;
pub mod lines;
pub mod profile;
pub mod table;
pub mod text;
