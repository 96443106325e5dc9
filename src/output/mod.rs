//! Terminal output formatting
//!
//! Colored boards, keyboards, share text and result listings.

pub mod display;
pub mod formatters;

pub use display::{
    print_board, print_decoded, print_distribution, print_keyboard, print_results, print_share,
    print_today,
};
