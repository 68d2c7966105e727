//! The tools module provides the helper stages and the command line
//! interface.
//!
//! The tools are:
//! - cli: command line parsing for the squish binary.
//! - mtf: Move-To-Front transform, run between the BWT and the zero-run
//!   stage.
//! - rle0: run-length coding of zero bytes, the last stage before the
//!   range coder.
//!
pub mod cli;
pub mod mtf;
pub mod rle0;
