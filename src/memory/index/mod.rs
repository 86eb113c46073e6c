//! Index backends (dense and sparse) behind one client trait.

pub mod client;
pub mod pinecone;

pub use client::{Hit, IndexClient, IndexFuture, RerankOptions, SearchRequest};
pub use pinecone::{PINECONE_API_VERSION, PineconeIndex};
