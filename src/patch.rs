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

use crate::error::{Error, Result};
use crate::record::{records, Record, Records};
use tracing::{debug, info};

/// Counters accumulated while applying a patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records applied, including zero-length ones.
    pub records: usize,
    /// Sum of literal sizes and RLE repeat counts.
    pub bytes: usize,
}

/// Patched output with its summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patched {
    pub target: Vec<u8>,
    pub summary: Summary,
}

/// Apply an IPS patch to `source`, returning the patched bytes.
/// The header is checked before anything is copied.
pub fn apply(patch: &[u8], source: &[u8]) -> Result<Patched> {
    let records = records(patch)?;
    let mut target = source.to_vec();
    let summary = apply_records(records, &mut target)?;
    Ok(Patched { target, summary })
}

/// Apply an IPS patch in place to `target`, which holds the source bytes.
/// The buffer grows as records require and never shrinks. On error the
/// contents of `target` are unspecified.
pub fn apply_into(patch: &[u8], target: &mut Vec<u8>) -> Result<Summary> {
    apply_records(records(patch)?, target)
}

fn apply_records(mut records: Records<'_>, target: &mut Vec<u8>) -> Result<Summary> {
    let summary = records.by_ref().enumerate().try_fold(
        Summary::default(),
        |summary, (index, record)| {
            let record = record?;
            write(target, index, &record)?;
            debug!(
                index,
                offset = record.offset(),
                len = record.len(),
                rle = matches!(record, Record::Rle { .. }),
                "applied record"
            );
            Ok::<_, Error>(Summary {
                records: summary.records + 1,
                bytes: summary.bytes + record.len(),
            })
        },
    )?;
    let trailing = records.remaining().len();
    if trailing != 0 {
        debug!(trailing, "ignoring bytes after EOF");
    }
    info!(records = summary.records, bytes = summary.bytes, "patch applied");
    Ok(summary)
}

fn write(target: &mut Vec<u8>, index: usize, record: &Record<'_>) -> Result<()> {
    if record.is_empty() {
        return Ok(());
    }
    let end = record
        .end()
        .ok_or(Error::OffsetOverflow { record: index })?;
    let start = end - record.len();
    // Gaps past the current end are zero-filled.
    if target.len() < end {
        target.resize(end, 0);
    }
    let dest = &mut target[start..end];
    match *record {
        Record::Literal { data, .. } => dest.copy_from_slice(data),
        Record::Rle { value, .. } => dest.fill(value),
    }
    Ok(())
}
