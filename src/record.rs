/*-
 * Copyright 2025 David Michael Barr
 *
 * Redistribution and use in source and binary forms, with or without
 * modification, are permitted providing that the following conditions
 * are met:
 * 1. Redistributions of source code must retain the above copyright
 *    notice, this list of conditions and the following disclaimer.
 * 2. Redistributions in binary form must reproduce the above copyright
 *    notice, this list of conditions and the following disclaimer in the
 *    documentation and/or other materials provided with the distribution.
 *
 * THIS SOFTWARE IS PROVIDED BY THE AUTHOR ``AS IS'' AND ANY EXPRESS OR
 * IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
 * ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
 * DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
 * OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
 * HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
 * STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING
 * IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
 * POSSIBILITY OF SUCH DAMAGE.
 */

use crate::error::{Error, Field, Result};
use std::iter::FusedIterator;

const HEADER: &[u8; 5] = b"PATCH";
const EOF: &[u8; 3] = b"EOF";

/// A single IPS edit, borrowing literal data from the patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Record<'a> {
    /// Copy `data` verbatim to `offset`.
    Literal { offset: u32, data: &'a [u8] },
    /// Write `value` repeated `len` times from `offset`.
    Rle { offset: u32, len: u16, value: u8 },
}

impl Record<'_> {
    pub fn offset(&self) -> u32 {
        match *self {
            Record::Literal { offset, .. } | Record::Rle { offset, .. } => offset,
        }
    }

    /// Number of target bytes written by this record.
    pub fn len(&self) -> usize {
        match *self {
            Record::Literal { data, .. } => data.len(),
            Record::Rle { len, .. } => len as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last target byte written, if representable.
    pub fn end(&self) -> Option<usize> {
        usize::try_from(self.offset()).ok()?.checked_add(self.len())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Reading { index: usize },
    Done,
}

/// Iterator over the records of an IPS patch, in stream order.
///
/// An offset field spelling `EOF` ends the stream, wherever it occurs.
/// Iteration also stops after the first error.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    patch: &'a [u8],
    state: State,
}

/// Check the `PATCH` header and start decoding records.
pub fn records(patch: &[u8]) -> Result<Records<'_>> {
    let patch = patch
        .strip_prefix(HEADER.as_slice())
        .ok_or(Error::InvalidFormat)?;
    Ok(Records {
        patch,
        state: State::Reading { index: 0 },
    })
}

impl<'a> Records<'a> {
    /// Bytes not yet consumed. Once the sentinel has been read, this is
    /// whatever trailed it.
    pub fn remaining(&self) -> &'a [u8] {
        self.patch
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    fn take(&mut self, len: usize, record: usize, field: Field) -> Result<&'a [u8]> {
        if self.patch.len() < len {
            return Err(Error::TruncatedPatch { record, field });
        }
        let (head, tail) = self.patch.split_at(len);
        self.patch = tail;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self, record: usize, field: Field) -> Result<[u8; N]> {
        let (head, tail) = self
            .patch
            .split_first_chunk::<N>()
            .ok_or(Error::TruncatedPatch { record, field })?;
        self.patch = tail;
        Ok(*head)
    }

    fn decode(&mut self, index: usize) -> Result<Option<Record<'a>>> {
        let offset: [u8; 3] = self.take_array(index, Field::Offset)?;
        if &offset == EOF {
            return Ok(None);
        }
        let offset = u32::from_be_bytes([0, offset[0], offset[1], offset[2]]);
        let size = u16::from_be_bytes(self.take_array(index, Field::Size)?);
        if size != 0 {
            let data = self.take(size as usize, index, Field::Data)?;
            return Ok(Some(Record::Literal { offset, data }));
        }
        let len = u16::from_be_bytes(self.take_array(index, Field::RleSize)?);
        let [value] = self.take_array::<1>(index, Field::RleValue)?;
        Ok(Some(Record::Rle { offset, len, value }))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let State::Reading { index } = self.state else {
            return None;
        };
        match self.decode(index) {
            Ok(Some(record)) => {
                self.state = State::Reading { index: index + 1 };
                Some(Ok(record))
            }
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Records<'_> {}
