use criterion::{black_box, criterion_group, criterion_main, Criterion};

use framelink::network::MockTransport;
use framelink::{ComsEngine, Frame, NoopHandler, DEFAULT_FRAME_SIZE};

const N: usize = DEFAULT_FRAME_SIZE;

fn bench_dispatch(c: &mut Criterion) {
    let mut engine = ComsEngine::new(MockTransport::<N>::new());
    engine.add_packet(NoopHandler::new(2, false)).unwrap();
    engine.add_packet(NoopHandler::new(3, true)).unwrap();

    c.bench_function("unreliable_iteration", |b| {
        b.iter(|| {
            engine.transport_mut().push_read(Frame::with_header(2, 0, 0));
            let dispatch = engine.run_iteration().unwrap();
            black_box(engine.transport_mut().pop_written());
            dispatch
        })
    });

    let mut seq = 0u8;
    c.bench_function("reliable_iteration", |b| {
        b.iter(|| {
            engine.transport_mut().push_read(Frame::with_header(3, seq, seq ^ 1));
            seq ^= 1;
            let dispatch = engine.run_iteration().unwrap();
            black_box(engine.transport_mut().pop_written());
            dispatch
        })
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
