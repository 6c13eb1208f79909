//! Unit tests for notification shaping and delivery.
