//! Unit tests for the availability context.
