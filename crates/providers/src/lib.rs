//! Completion session implementations.
//!
//! [`OpenAiCompatProvider`] covers Groq and any other endpoint exposing an
//! OpenAI-compatible `/v1/chat/completions` route — which is the vast
//! majority of hosted inference providers.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
