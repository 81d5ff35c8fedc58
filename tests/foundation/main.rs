//! Integration tests for Layer 0: Foundation
//!
//! Tests for identifiers, namespaces, privileges, values, and errors.

mod errors;
mod identifiers;
mod values;
