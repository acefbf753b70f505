//! Integration Tests Module
//!
//! End-to-end coverage of the generation orchestrator against scripted
//! in-memory transports: event routing, buffer accumulation, document
//! attachment, trigger ordering, failure handling, and the stop path.
//! No network calls are made.

// Shared test doubles (scripted transports, recording triggers)
mod support;

// Orchestrator behavior tests
mod orchestrator_test;

// Protocol scenario tests (canonical event sequences)
mod scenarios_test;
