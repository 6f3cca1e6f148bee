/*
[INPUT]:  List/filter/sort/pagination parameters
[OUTPUT]: Ordered query pairs ready for percent-encoding
[POS]:    HTTP layer - query string encoding
[UPDATE]: When list endpoints gain filters or encoding rules change
*/

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};

/// Params sent as a query string instead of a JSON body.
pub trait QueryParams {
    /// Pairs in a stable order; absent values are omitted, arrays repeat the key.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Accumulates query pairs.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<T: Display + ?Sized>(mut self, name: &'static str, value: Option<&T>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn each<T: Display>(mut self, name: &'static str, values: &[T]) -> Self {
        self.pairs
            .extend(values.iter().map(|value| (name, value.to_string())));
        self
    }

    pub fn timestamp(mut self, name: &'static str, value: Option<&DateTime<Utc>>) -> Self {
        if let Some(value) = value {
            self.pairs
                .push((name, value.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        self
    }

    pub fn build(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}
