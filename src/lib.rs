//! Like-count prediction for videos.
//!
//! Raw, user-entered video attributes are turned into the exact feature row a
//! pre-trained regression model expects (date decomposition, codec encoding,
//! title normalization and TF-IDF, numeric scaling, schema alignment) and the
//! model is applied to it. The HTTP layer in [`routes`] exposes this as a small
//! JSON service.

pub mod artifacts;
pub mod assemble;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod input;
pub mod lemma;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod routes;
pub mod scaler;
pub mod schema;
pub mod state;
pub mod temporal;
pub mod text;
pub mod tfidf;
