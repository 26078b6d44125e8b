///
/// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
///
/// Licensed under the Apache License, Version 2.0 (the "License").
/// You may not use this file except in compliance with the License.
/// A copy of the License is located at
///
///  http://aws.amazon.com/apache2.0
///
/// or in the "license" file accompanying this file. This file is distributed
/// on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
/// express or implied. See the License for the specific language governing
/// permissions and limitations under the License.
///
/// Compares the candidate character-validation strategies under large
/// adversarial inputs. Repeating ASCII digits are the historical worst
/// case: they are all acceptable characters, so every strategy must walk
/// the entire field, and they stress engines that resolve Unicode
/// properties per character. The interesting output is how each strategy
/// scales from 1 KiB to 2 MiB. The shipped default must stay linear with a
/// small constant; the regex strategy pays its constant-factor premium.
///
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use strict_http_firewall::{Firewall, FirewallPolicy, Request, StringValidator};

const KB: usize = 1024;
const FIELD_SIZES: &[usize] = &[KB, 64 * KB, 2 * KB * KB];

fn digit_field(size: usize) -> String {
    let mut field = "0123456789".repeat(size / 10 + 1);
    field.truncate(size);
    field
}

fn strategies() -> Vec<(&'static str, StringValidator)> {
    vec![
        (
            "assigned-non-control",
            StringValidator::assigned_non_control(),
        ),
        ("regex", StringValidator::assigned_non_control_regex()),
        (
            "accept-all-iterating",
            StringValidator::accept_all_iterating(),
        ),
        ("disabled", StringValidator::Disabled),
    ]
}

/// Raw validator throughput per strategy and field size.
fn benchmark_validator_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("string-validation");
    group.warm_up_time(Duration::from_secs(3)).sample_size(30);
    for size in FIELD_SIZES {
        let field = digit_field(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        for (name, validator) in strategies() {
            group.bench_with_input(BenchmarkId::new(name, size), &field, |b, field| {
                b.iter(|| black_box(validator.validate(field)))
            });
        }
    }
    group.finish();
}

/// End-to-end policy evaluation with an oversized header value, one policy
/// per strategy bound to header names, header values and parameter names.
fn benchmark_large_header_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("large-header-value");
    group.warm_up_time(Duration::from_secs(3)).sample_size(30);
    for size in FIELD_SIZES {
        let request = Request::new("GET", "/uri")
            .header("host", "host")
            .header("header", digit_field(*size))
            .parameter("p", "v");
        group.throughput(Throughput::Bytes(*size as u64));
        for (name, validator) in strategies() {
            let policy = FirewallPolicy::new()
                .with_header_name_validator(validator.clone())
                .with_header_value_validator(validator.clone())
                .with_parameter_name_validator(validator);
            group.bench_with_input(BenchmarkId::new(name, size), &request, |b, request| {
                b.iter(|| black_box(policy.evaluate(request)))
            });
        }
    }
    group.finish();
}

/// The mirrored case: the oversized field is a parameter name.
fn benchmark_large_parameter_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("large-parameter-name");
    group.warm_up_time(Duration::from_secs(3)).sample_size(30);
    for size in FIELD_SIZES {
        let request = Request::new("GET", "/uri")
            .header("host", "host")
            .parameter(digit_field(*size), "v");
        group.throughput(Throughput::Bytes(*size as u64));
        for (name, validator) in strategies() {
            let policy = FirewallPolicy::new().with_parameter_name_validator(validator);
            group.bench_with_input(BenchmarkId::new(name, size), &request, |b, request| {
                b.iter(|| black_box(policy.evaluate(request)))
            });
        }
    }
    group.finish();
}

/// Rejections must be cheap too: evaluation fails fast on the first
/// violation instead of scanning the rest of the request.
fn benchmark_rejected_requests(c: &mut Criterion) {
    let firewall = Firewall::default();
    let mut group = c.benchmark_group("rejected-requests");

    let traversal = Request::new("GET", "/a/../b").header("header", digit_field(64 * KB));
    group.bench_function("path-traversal", |b| {
        b.iter(|| black_box(firewall.filter(&traversal)))
    });

    let mut poisoned = digit_field(64 * KB);
    poisoned.insert(0, '\u{0}');
    let nul_header = Request::new("GET", "/uri").header("header", poisoned);
    group.bench_function("nul-at-header-start", |b| {
        b.iter(|| black_box(firewall.filter(&nul_header)))
    });

    group.finish();
}

/// Baseline for the path blocklist on clean paths of realistic depth.
fn benchmark_path_rules(c: &mut Criterion) {
    let firewall = Firewall::default();
    let mut group = c.benchmark_group("path-rules");

    let deep = Request::new("GET", "/api/v2/accounts/12345/orders/67890/items");
    group.bench_function("deep-clean-path", |b| {
        b.iter(|| black_box(firewall.filter(&deep)))
    });

    let encoded = Request::new("GET", "/files/report%20final%20v2.pdf");
    group.bench_function("percent-encoded-clean-path", |b| {
        b.iter(|| black_box(firewall.filter(&encoded)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_validator_strategies,
    benchmark_large_header_value,
    benchmark_large_parameter_name,
    benchmark_rejected_requests,
    benchmark_path_rules,
);

criterion_main!(benches);
