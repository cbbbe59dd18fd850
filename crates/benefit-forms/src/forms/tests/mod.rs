mod common;
mod documents;
mod fields;
mod grouping;
