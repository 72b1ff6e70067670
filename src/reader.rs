use std::io::{self, Read};

use crate::error::{Error, Result};

/// How bits pulled from successive source bytes combine into one value.
///
/// Both orders consume each source byte from its low bit upward and split
/// reads across bytes the same way; they differ only in where a consumed
/// chunk lands in the growing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Each chunk lands above the bits already gathered, so the first bits
    /// read become the least significant bits of the result.
    ShiftLow,
    /// The result shifts left to make room for each chunk, so the first
    /// bits read become the most significant bits of the result.
    ShiftHigh,
}

impl BitOrder {
    /// Merges a right-aligned `take`-bit chunk into the accumulator.
    fn merge(self, acc: u64, chunk: u64, take: u32, out_offset: u32) -> u64 {
        match self {
            BitOrder::ShiftLow => acc | (chunk << out_offset),
            BitOrder::ShiftHigh => (acc << take) | chunk,
        }
    }

    /// The same merge step, into a destination byte being filled in place.
    fn merge_byte(self, dst: u8, chunk: u8, take: u32, bit_offset: u32) -> u8 {
        match self {
            BitOrder::ShiftLow => dst | (chunk << bit_offset),
            BitOrder::ShiftHigh => (u16::from(dst) << take) as u8 | chunk,
        }
    }
}

/// A `BitReader` reads values of arbitrary bit width out of a byte stream.
///
/// Wire and file formats frequently pack fields at widths that are not a
/// multiple of eight. `BitReader` wraps anything implementing `Read`, keeps
/// a one-byte cache with a sub-byte cursor, and hands back each requested
/// span no matter how it straddles the underlying bytes. When the cursor
/// sits on a byte boundary, whole-byte reads skip the bit machinery and go
/// straight to the source.
///
/// Reads are strictly forward-only with at most one byte of lookahead, and
/// the reader never closes its source.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use bitpull::BitReader;
///
/// let mut br = BitReader::new(Cursor::new(vec![0b0110_0001, 0xff]));
///
/// let tag = br.read_bits(3)?;
/// let flag = br.read_bit()?;
/// let rest = br.read_bits(12)?;
/// # assert_eq!(tag, 0b001);
/// # Ok::<(), bitpull::Error>(())
/// ```
pub struct BitReader<R: Read> {
    cache: [u8; 1],
    cursor: u32,
    order: BitOrder,
    src: R,
}

impl<R: Read> BitReader<R> {
    /// Constructs a new `BitReader<R>` using [`BitOrder::ShiftLow`].
    ///
    /// # Arguments
    ///
    /// * src - an existing open file or stream (implementing `Read`).
    ///   Wrap slow sources in a `BufReader`; the reader pulls one byte at
    ///   a time except on the aligned bulk path.
    pub fn new(src: R) -> BitReader<R> {
        BitReader::with_order(src, BitOrder::ShiftLow)
    }

    /// Constructs a new `BitReader<R>` with an explicit bit order.
    ///
    /// The order is fixed for the life of the reader.
    pub fn with_order(src: R, order: BitOrder) -> BitReader<R> {
        BitReader {
            cache: [0],
            cursor: 8,
            order,
            src,
        }
    }

    /// The bit order this reader was constructed with.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Returns true when the cursor sits on a byte boundary.
    pub fn is_aligned(&self) -> bool {
        self.cursor == 8
    }

    /// Discards any unconsumed bits of the current byte, leaving the reader
    /// on the next byte boundary. Does not touch the source and cannot
    /// fail. Useful for skipping padding between fields.
    pub fn align(&mut self) {
        self.cursor = 8;
    }

    /// Gets a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.src
    }

    /// Gets a mutable reference to the underlying stream.
    ///
    /// Reading from it directly will desynchronize any partially consumed
    /// byte held by this reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.src
    }

    /// Unwraps the reader, returning the underlying stream.
    ///
    /// Unconsumed bits in the cache are lost.
    pub fn into_inner(self) -> R {
        self.src
    }

    /// Reads one byte straight from the source, retrying on interruption.
    fn fetch(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.src.read(&mut byte) {
                Ok(0) => return Err(Error::EndOfInput),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Refills the cache; on success the cursor rests at 0.
    fn refill(&mut self) -> Result<()> {
        self.cache[0] = self.fetch()?;
        self.cursor = 0;
        Ok(())
    }

    /// Takes `take` bits out of the cache at the cursor, right-aligned.
    /// Caller guarantees `1 <= take <= 8 - cursor`.
    fn take_chunk(&mut self, take: u32) -> u8 {
        let mask = ((1u16 << take) - 1) as u8;
        let chunk = (self.cache[0] >> self.cursor) & mask;
        self.cursor += take;
        chunk
    }

    /// Reads the next `n_bits` bits, up to a maximum of 64, refilling the
    /// one-byte cache from the source as often as needed.
    ///
    /// The returned value holds exactly `n_bits` meaningful low-order bits,
    /// assembled according to the reader's [`BitOrder`]. Fails with
    /// [`Error::EndOfInput`] if the source runs dry mid-span; the bits
    /// gathered up to that point are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `n_bits > 64`. A u64 cannot hold more, so asking for more
    /// is a bug in the caller rather than a runtime condition; nothing is
    /// consumed from the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use bitpull::BitReader;
    ///
    /// let mut br = BitReader::new(Cursor::new(vec![0b0000_1111]));
    /// assert_eq!(br.read_bits(5)?, 0b01111);
    /// assert_eq!(br.read_bits(3)?, 0b000);
    /// # Ok::<(), bitpull::Error>(())
    /// ```
    pub fn read_bits(&mut self, n_bits: u32) -> Result<u64> {
        assert!(n_bits <= 64, "read_bits can pull at most 64 bits at a time");

        let mut val = 0u64;
        let mut out_offset = 0;
        let mut remaining = n_bits;
        while remaining > 0 {
            if self.cursor == 8 {
                self.refill()?;
            }
            let take = remaining.min(8 - self.cursor);
            let chunk = self.take_chunk(take);
            val = self.order.merge(val, u64::from(chunk), take, out_offset);
            out_offset += take;
            remaining -= take;
        }
        Ok(val)
    }

    /// Reads a single bit. Returns `true` for a 1 bit, `false` for a 0 bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Reads the next 8 bits as a byte.
    ///
    /// When the reader is byte-aligned this bypasses the bit machinery and
    /// reads one raw byte from the source; source and output byte order
    /// coincide on a boundary, so neither [`BitOrder`] shifts anything.
    pub fn read_byte(&mut self) -> Result<u8> {
        if self.cursor == 8 {
            return self.fetch();
        }
        Ok(self.read_bits(8)? as u8)
    }

    /// Fills as much of `dst` as possible with whole bytes.
    ///
    /// Returns the number of bytes written together with the final status.
    /// These are independent: exhaustion mid-fill reports the bytes that
    /// did land alongside [`Error::EndOfInput`], and the call after a fully
    /// consumed source reports a zero count with the same error.
    ///
    /// When the reader is byte-aligned the whole buffer is handed to the
    /// source in bulk, looping over short reads until it is full or the
    /// source is definitively done. Mid-byte, each output byte is pulled
    /// through the bit path instead.
    pub fn read(&mut self, dst: &mut [u8]) -> (usize, Result<()>) {
        if self.cursor == 8 {
            return self.read_aligned(dst);
        }
        for (filled, slot) in dst.iter_mut().enumerate() {
            match self.read_bits(8) {
                Ok(bits) => *slot = bits as u8,
                Err(e) => return (filled, Err(e)),
            }
        }
        (dst.len(), Ok(()))
    }

    // Bulk path, valid only in the aligned state.
    fn read_aligned(&mut self, dst: &mut [u8]) -> (usize, Result<()>) {
        let mut filled = 0;
        while filled < dst.len() {
            match self.src.read(&mut dst[filled..]) {
                Ok(0) => return (filled, Err(Error::EndOfInput)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return (filled, Err(Error::Io(e))),
            }
        }
        (filled, Ok(()))
    }

    /// Packs the next `n_bits` bits into `dst`, left to right by byte
    /// index, with no 64-bit ceiling.
    ///
    /// `dst` must hold at least `n_bits` bits rounded up to whole bytes;
    /// otherwise the call fails with [`Error::BufferTooSmall`] before the
    /// source is touched. Each destination byte is zeroed as the fill
    /// reaches it, then chunks are merged in per the reader's
    /// [`BitOrder`], so the final byte of an uneven span carries its bits
    /// the same way a short `read_bits` result would. On
    /// [`Error::EndOfInput`] the destination past the last completed chunk
    /// is unspecified.
    pub fn read_bits_into(&mut self, dst: &mut [u8], n_bits: usize) -> Result<()> {
        let needed = n_bits.div_ceil(8);
        if dst.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                len: dst.len(),
            });
        }

        let mut byte_offset = 0;
        let mut bit_offset = 0u32;
        let mut remaining = n_bits;
        if remaining > 0 {
            dst[0] = 0;
        }
        while remaining > 0 {
            if self.cursor == 8 {
                self.refill()?;
            }
            if bit_offset == 8 {
                bit_offset = 0;
                byte_offset += 1;
                dst[byte_offset] = 0;
            }
            let take = remaining
                .min((8 - bit_offset) as usize)
                .min((8 - self.cursor) as usize) as u32;
            let chunk = self.take_chunk(take);
            dst[byte_offset] = self.order.merge_byte(dst[byte_offset], chunk, take, bit_offset);
            bit_offset += take;
            remaining -= take as usize;
        }
        Ok(())
    }
}
