//! Integration tests for the submit, poll, fetch and format pipeline.

pub mod pipeline_test;
