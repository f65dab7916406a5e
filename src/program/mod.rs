//! Stateless instruction builders for native programs
//!
//! Each program exposes its id as a constant and plain functions returning
//! [`Instruction`](crate::instruction::Instruction) values.

pub mod compute_budget;
pub mod system;
