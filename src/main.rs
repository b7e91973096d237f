//! # Chunk Pipeline Entry Point
//!
//! Calls into the library's `run()` function, which generates and meshes the
//! chunks around the origin and logs a summary.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    chunk_pipeline::run();
}
