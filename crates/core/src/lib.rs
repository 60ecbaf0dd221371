//! Core library for notesmd: moving notes around an Obsidian-style vault
//! without breaking the links that point at them.

pub mod config;
pub mod daily;
pub mod links;
pub mod mover;
pub mod notes;
pub mod opener;
pub mod paths;
pub mod rewrite;
pub mod vault;
