//! Pipeline stages for PDF summarisation.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──┬─ text ────────────────┬──▶ payload ──▶ client
//! (check)   (pdfium)  └─ pages ──▶ encode ────┘    (JSON)       (HTTP + retry)
//! ```
//!
//! 1. [`input`]   — confirm the path is a readable `%PDF` file
//! 2. [`extract`] — read the text layer, or render every page to PNG
//! 3. [`encode`]  — PNG-encode rendered pages and base64-wrap them as parts
//! 4. [`payload`] — `generateContent` request and response types
//! 5. [`client`]  — send the request; the only stage with network I/O

pub mod client;
pub mod encode;
pub mod extract;
pub mod input;
pub mod payload;
