// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jasper_client::http::parser;
use jasper_client::ParsedHeader;

const HEADER_BLOCK: &str = "HTTP/1.1 200 OK\r\n\
    Server: Apache-Coyote/1.1\r\n\
    Cache-Control: private\r\n\
    Expires: Thu, 01 Jan 1970 00:00:00 GMT\r\n\
    Set-Cookie: JSESSIONID=7F3A9C0E5B2D4A18;Path=/jasperserver;HttpOnly\r\n\
    Set-Cookie: BACKEND=node7;Path=/\r\n\
    Content-Type: text/html;charset=UTF-8\r\n\
    Content-Length: 48213\r\n\
    Date: Mon, 19 Oct 2026 09:00:00 GMT\r\n\
    \r\n";

fn header_parsing_benchmark(c: &mut Criterion) {
    c.bench_function("parse_header_block", |b| {
        b.iter(|| ParsedHeader::parse(black_box(HEADER_BLOCK)))
    });

    c.bench_function("parse_headers_only", |b| {
        b.iter(|| parser::parse_headers(black_box(HEADER_BLOCK)))
    });
}

fn token_extraction_benchmark(c: &mut Criterion) {
    c.bench_function("session_tokens", |b| {
        b.iter(|| {
            (
                parser::parse_session_token(black_box(HEADER_BLOCK)),
                parser::parse_backend_token(black_box(HEADER_BLOCK)),
            )
        })
    });
}

criterion_group!(benches, header_parsing_benchmark, token_extraction_benchmark);
criterion_main!(benches);
