//! Wordle Chain
//!
//! Wordle game core with encrypted, wallet-signed score submission.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_chain::core::{RowFeedback, TileState, Word};
//!
//! let guess = Word::new("lolly").unwrap();
//! let answer = Word::new("allot").unwrap();
//!
//! let feedback = RowFeedback::evaluate(&guess, &answer);
//! assert_eq!(feedback.states()[2], TileState::Correct);
//! assert_eq!(feedback.to_code(), "YYGXX");
//! ```

// Core domain types
pub mod core;

// Daily answer and session state machine
pub mod game;

// Word lists
pub mod wordlists;

// Encryption, sign-in, relay and chain collaborators
pub mod submission;

// Decrypting and grouping stored scores
pub mod results;

// Resolved runtime settings
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;
