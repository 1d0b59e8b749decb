//! Screen painter for the editor state.
//!
//! Pipeline per refresh:
//! 1. `viewport`: scroll so the cursor (row, render column) is visible.
//! 2. `render_engine`: compose text rows with highlight colours and the
//!    reverse-video visual selection, the status bar and the message bar
//!    into a `Writer` batch.
//! 3. `writer`: flush the batch to the terminal in one write.
//!
//! Composition is pure with respect to the terminal, so frames are tested by
//! inspecting the command batch.

pub mod render_engine;
pub mod status;
pub mod style;
pub mod viewport;
pub mod writer;

pub use render_engine::{RenderEngine, VERSION};
pub use viewport::Viewport;
pub use writer::{Command, Writer};
