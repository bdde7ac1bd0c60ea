use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uhfble_core::{tag, Command, Frame};

fn inventory_report() -> Vec<u8> {
    let mut payload = vec![0x01, 0x4E, 0x30, 0x00];
    payload.extend_from_slice(&[0xE2, 0x80, 0x11, 0x70, 0x00, 0x00, 0x02, 0x0A, 0xBC, 0xDE, 0xF0, 0x12]);

    Frame::with_payload(Command::InventoryReport, payload)
        .map(|frame| frame.encode().to_vec())
        .unwrap_or_default()
}

fn bench_decode(c: &mut Criterion) {
    let raw = inventory_report();

    c.bench_function("frame_decode", |b| {
        b.iter(|| Frame::decode(black_box(&raw)))
    });
}

fn bench_decode_and_parse(c: &mut Criterion) {
    let raw = inventory_report();

    c.bench_function("frame_decode_tag_parse", |b| {
        b.iter(|| {
            Frame::decode(black_box(&raw))
                .and_then(|frame| tag::parse(&frame))
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("frame_encode_start", |b| {
        b.iter(|| black_box(Frame::start_inventory()).encode())
    });
}

criterion_group!(benches, bench_decode, bench_decode_and_parse, bench_encode);
criterion_main!(benches);
