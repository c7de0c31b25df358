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

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::hint::black_box;

const SOURCE_LEN: usize = 524288;

/// Scattered literal and RLE records over the whole source, plus a tail
/// that grows the target.
fn gen_patch(records: usize) -> Vec<u8> {
    let mut rng = Xoshiro256Plus::seed_from_u64(0xeba2fa67e5a81121);
    let mut patch = b"PATCH".to_vec();
    let mut data = [0u8; 64];
    for _ in 0..records {
        let bits = rng.next_u32();
        let offset = bits as usize % (SOURCE_LEN + 4096);
        let len = 1 + (bits >> 26) as usize;
        patch.extend(&(offset as u32).to_be_bytes()[1..]);
        if bits & 1 == 0 {
            rng.fill_bytes(&mut data[..len]);
            patch.extend(&(len as u16).to_be_bytes());
            patch.extend(&data[..len]);
        } else {
            patch.extend(&[0, 0]);
            patch.extend(&(len as u16 * 16).to_be_bytes());
            patch.push(bits as u8);
        }
    }
    patch.extend(b"EOF");
    patch
}

fn criterion_benchmark(c: &mut Criterion) {
    let patch = gen_patch(16384);
    let old = vec![0; SOURCE_LEN];
    let mut new = Vec::with_capacity(SOURCE_LEN * 2);

    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Bytes(SOURCE_LEN as u64));
    group.bench_function("memcpy", |b| {
        b.iter(|| {
            new.clear();
            new.extend(black_box(&old));
        })
    });
    group.bench_function("apply", |b| {
        b.iter(|| ipstool::apply(black_box(&patch), black_box(&old)).unwrap())
    });
    group.bench_function("apply_into", |b| {
        b.iter(|| {
            new.clear();
            new.extend(black_box(&old));
            ipstool::apply_into(black_box(&patch), black_box(&mut new)).unwrap();
        })
    });
    group.bench_function("records", |b| {
        b.iter(|| {
            ipstool::records(black_box(&patch))
                .unwrap()
                .try_fold(0usize, |n, r| r.map(|r| n + r.len()))
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
