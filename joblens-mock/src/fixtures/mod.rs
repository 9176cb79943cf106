pub mod postings;
pub mod rates;
