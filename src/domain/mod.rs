//! Domain types shared by the loader and the dispatch engine.
pub mod run;

pub use run::RunConfig;
