//! bitpull reads bit-packed fields out of any byte stream.
//!
//! Compressed and binary-packed formats store values at widths that are
//! not a multiple of eight: a 5-bit field, a 3-bit field, a 22-bit field,
//! back to back with no padding. [`BitReader`] wraps anything implementing
//! `std::io::Read` and tracks the sub-byte position across reads, so
//! callers just ask for the next n bits.
//!
//! # Reading
//!
//! ```
//! use std::io::Cursor;
//! use bitpull::BitReader;
//!
//! let mut br = BitReader::new(Cursor::new(vec![0b0000_1111, 0b1010_0101]));
//!
//! assert_eq!(br.read_bits(5)?, 0b01111);
//! assert_eq!(br.read_bits(6)?, 0b101000);
//! # Ok::<(), bitpull::Error>(())
//! ```
//!
//! # Bit order
//!
//! Formats disagree on how bits spanning several bytes assemble into one
//! value. [`BitOrder::ShiftLow`] accumulates low-order-first (the default);
//! [`BitOrder::ShiftHigh`] accumulates high-order-first, so source byte
//! order maps onto most-significant-first value order:
//!
//! ```
//! use std::io::Cursor;
//! use bitpull::{BitOrder, BitReader};
//!
//! let data = vec![0x00, 0x19];
//! let mut br = BitReader::with_order(Cursor::new(data), BitOrder::ShiftHigh);
//!
//! assert_eq!(br.read_bits(5)?, 0x0);
//! assert_eq!(br.read_bits(7)?, 0x9);
//! assert_eq!(br.read_bits(4)?, 0x1);
//! # Ok::<(), bitpull::Error>(())
//! ```

pub mod error;
pub mod reader;

pub use error::{Error, Result};
pub use reader::{BitOrder, BitReader};
