//! Integration tests for roster reconciliation

mod integration;
