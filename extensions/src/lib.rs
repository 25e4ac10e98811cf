//! Concrete collaborators for `newsroom_core`: embedders, the Groq chat client and the web
//! page fetcher.

pub mod embedding;
pub mod groq;
pub mod web;
