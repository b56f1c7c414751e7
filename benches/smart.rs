use divan::{Bencher, black_box};
use depwalk::{TokenRecord, Treebank};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    divan::main();
}

/// Sentences of the shape "A sees B and (with) C, (which is) D", repeated
fn synthetic(sentences: usize) -> Treebank {
    const SHAPE: &[(usize, usize, &str)] = &[
        (1, 0, "PRED"),
        (2, 1, "SBJ"),
        (3, 1, "COORD"),
        (4, 3, "OBJ_CO"),
        (5, 3, "AuxP"),
        (6, 5, "OBJ_CO"),
        (7, 3, "ATR"),
        (8, 1, "AuxX"),
        (9, 7, "ADV"),
        (10, 2, "ATR"),
    ];

    let records = (0..sentences).flat_map(|s| {
        let offset = s * SHAPE.len();
        SHAPE.iter().map(move |&(id, head, rel)| {
            let head = if head == 0 { 0 } else { head + offset };
            TokenRecord::new(id + offset, s + 1, head, rel)
        })
    });
    Treebank::new(records).unwrap()
}

#[divan::bench(args = [100, 1000])]
fn smart_children_all(bencher: Bencher, sentences: usize) {
    let tb = synthetic(sentences);
    bencher.bench_local(|| {
        for id in tb.ids() {
            black_box(tb.smart_children(black_box(id)));
        }
    });
}

#[divan::bench(args = [100, 1000])]
fn smart_parents_all(bencher: Bencher, sentences: usize) {
    let tb = synthetic(sentences);
    bencher.bench_local(|| {
        for id in tb.ids() {
            black_box(tb.smart_parents(black_box(id)));
        }
    });
}

#[divan::bench(args = [1000, 10000])]
fn diagnose_serial(bencher: Bencher, sentences: usize) {
    let tb = synthetic(sentences);
    bencher.bench_local(|| {
        for sid in tb.sentence_ids() {
            black_box(tb.diagnose(sid));
        }
    });
}

#[divan::bench(args = [1000, 10000])]
fn diagnose_parallel(bencher: Bencher, sentences: usize) {
    let tb = synthetic(sentences);
    bencher.bench_local(|| black_box(tb.par_diagnose()));
}
