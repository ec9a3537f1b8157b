// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chef_tasks::signing::{Method, RequestSigner, canonical_string, content_hash, hashed_path};
use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const TEST_KEY: &str = include_str!("../tests/fixtures/test_user.pem");

fn bench_canonical_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_request");

    group.bench_function("hashed_path", |b| {
        b.iter(|| hashed_path(black_box("/organizations/acme/environments/production")))
    });

    for size in [0usize, 1024, 64 * 1024] {
        let body = "x".repeat(size);
        group.bench_with_input(BenchmarkId::new("content_hash", size), &body, |b, body| {
            b.iter(|| content_hash(Some(black_box(body.as_str()))))
        });
    }

    group.bench_function("canonical_string", |b| {
        b.iter(|| {
            canonical_string(
                black_box(Method::Put),
                black_box("2jmj7l5rSw0yVb/vlWAYkK/YBwk="),
                black_box("2jmj7l5rSw0yVb/vlWAYkK/YBwk="),
                black_box("2025-01-01T00:00:00Z"),
                black_box("pipeline"),
            )
        })
    });

    group.finish();
}

fn bench_sign_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign_request");
    let signer = RequestSigner::from_pem("pipeline", TEST_KEY).unwrap();
    let timestamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let body = r#"{"name":"production","cookbook_versions":{"webapp":"1.4.2"}}"#;

    group.bench_function("load_key", |b| {
        b.iter(|| RequestSigner::from_pem("pipeline", black_box(TEST_KEY)))
    });

    group.bench_function("get", |b| {
        b.iter(|| {
            signer.sign_at(
                Method::Get,
                black_box("/organizations/acme/environments/production"),
                None,
                timestamp,
            )
        })
    });

    group.bench_function("put_with_body", |b| {
        b.iter(|| {
            signer.sign_at(
                Method::Put,
                black_box("/organizations/acme/environments/production"),
                Some(black_box(body)),
                timestamp,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_canonical_request, bench_sign_request);
criterion_main!(benches);
