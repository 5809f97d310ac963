pub mod fetcher;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod scanner;
pub mod search;
pub mod selector;
pub mod tools;
pub mod transcoder;

#[cfg(test)]
pub mod testing;
