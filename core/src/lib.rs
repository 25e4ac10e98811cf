//! Core library for Newsroom.
//!
//! Given a handful of fetched web documents and a question, Newsroom picks the single most
//! relevant document by embedding similarity and asks a chat model to answer the question with
//! that document as context. This crate holds the traits for the collaborators (embedders,
//! fetchers, chat APIs) and the pieces that tie them together.

pub mod acquisition;
pub mod answer;
pub mod chat;
pub mod config;
pub mod document;
pub mod embedding;
pub mod research;
pub mod retrieval;
