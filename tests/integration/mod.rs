//! Integration tests for the rollcall team model

mod linkage_properties;
mod loading;
mod reports;
mod support;
