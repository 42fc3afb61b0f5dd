use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{HashMap, HashSet};

use crate::map::{Link, CHUNK_SIZE};

#[derive(Clone, Debug, Arbitrary)]
enum VecOp {
    Push(u16),
    Pop,
    Reserve(#[proptest(strategy = "0usize..300")] usize),
    Resize(#[proptest(strategy = "0usize..64")] usize),
    CloneFrom,
    Take,
}

#[derive(Clone, Debug, Arbitrary)]
enum MapOp {
    #[proptest(weight = 10)]
    Insert(#[proptest(strategy = "key_strategy()")] String, u32),
    #[proptest(weight = 10)]
    Bump(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 10)]
    Find(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 1)]
    Clear,
}

fn key_strategy() -> impl Strategy<Value = String> {
    // Small alphabet so keys repeat; no NUL, which the text strategies treat
    // as a terminator.
    "[a-e]{0,4}"
}

fn validate_vector<T: PartialEq + std::fmt::Debug>(v: &Vector<T>, model: &[T]) {
    assert!(v.len() <= v.capacity());
    assert_eq!(v.as_slice(), model);
    if v.capacity() == 0 {
        assert!(v.is_empty());
    }
}

/// Every allocated bucket sits on exactly one list: a slot chain if it holds
/// an entry, otherwise the free list.
fn validate_map<K, V, H, E>(m: &Map<K, V, H, E>) {
    let mut seen: HashSet<Link> = HashSet::new();

    let mut chained = 0;
    for &head in m.slots.iter() {
        let mut link = head;
        while !link.is_null() {
            assert!(seen.insert(link), "{link:?} linked twice");
            let bucket = &m.chunks[link.chunk()][link.offset()];
            assert!(bucket.entry.is_some(), "{link:?} chained without entry");
            chained += 1;
            link = bucket.next;
        }
    }
    assert_eq!(chained, m.len());

    let mut link = m.unused;
    while !link.is_null() {
        assert!(seen.insert(link), "{link:?} linked twice");
        let bucket = &m.chunks[link.chunk()][link.offset()];
        assert!(bucket.entry.is_none(), "{link:?} free but holds an entry");
        link = bucket.next;
    }

    assert_eq!(seen.len(), m.chunk_count() * CHUNK_SIZE, "bucket leaked");
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_vector_equivalence(ops in prop::collection::vec(any::<VecOp>(), 0..=500)) {
        let mut v: Vector<u16> = Vector::new();
        let mut model: Vec<u16> = Vec::new();

        for op in ops {
            let cap_before = v.capacity();
            match op {
                VecOp::Push(x) => {
                    v.push(x);
                    model.push(x);
                }
                VecOp::Pop => {
                    prop_assert_eq!(v.pop(), model.pop());
                }
                VecOp::Reserve(n) => {
                    v.reserve(n);
                    prop_assert!(v.capacity() >= n);
                    // Pushing up to the reserved capacity must not move the buffer.
                    let ptr = v.as_ptr();
                    let cap = v.capacity();
                    while v.len() < n {
                        v.push(0);
                        model.push(0);
                    }
                    if n > 0 {
                        prop_assert_eq!(v.as_ptr(), ptr);
                    }
                    prop_assert_eq!(v.capacity(), cap);
                }
                VecOp::Resize(n) => {
                    let n = n.min(model.len());
                    v.resize(n);
                    model.truncate(n);
                }
                VecOp::CloneFrom => {
                    let mut copy: Vector<u16> = Vector::new();
                    copy.clone_from(&v);
                    prop_assert_eq!(copy.as_slice(), model.as_slice());
                    copy.push(1);
                    prop_assert_eq!(v.as_slice(), model.as_slice());
                }
                VecOp::Take => {
                    let taken = core::mem::take(&mut v);
                    prop_assert!(v.is_empty());
                    prop_assert_eq!(taken.as_slice(), model.as_slice());
                    v = taken;
                }
            }
            prop_assert!(v.capacity() >= cap_before, "capacity shrank");
            validate_vector(&v, &model);
        }
    }

    #[test]
    fn prop_map_equivalence(
        slots in 1usize..40,
        ops in prop::collection::vec(any::<MapOp>(), 0..=1000),
    ) {
        let mut m: StrMap<String, u32> = Map::with_slots(slots);
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                MapOp::Insert(k, v) => {
                    let got = *m.insert(k.clone(), v);
                    prop_assert_eq!(got, *model.entry(k).or_insert(v));
                }
                MapOp::Bump(k) => {
                    let got = m.get_or_insert_default(k.clone());
                    *got = got.wrapping_add(1);
                    let want = model.entry(k).or_default();
                    *want = want.wrapping_add(1);
                }
                MapOp::Find(k) => {
                    prop_assert_eq!(m.find(&k), model.get(&k));
                }
                MapOp::Clear => {
                    m.clear();
                    model.clear();
                    prop_assert!(m.is_empty());
                }
            }
            prop_assert_eq!(m.len(), model.len());
            prop_assert_eq!(m.is_empty(), model.is_empty());
            validate_map(&m);
        }

        let mut seen: HashMap<String, u32> = HashMap::new();
        m.for_each(|k, v| {
            assert!(seen.insert(k.clone(), *v).is_none(), "visited {k:?} twice");
        });
        prop_assert_eq!(seen, model);
    }
}

#[test]
fn exhaustive_push_pop_small() {
    // Every push/pop interleaving of length 10 obeys stack discipline.
    for mask in 0u32..(1 << 10) {
        let mut v: Vector<u32> = Vector::new();
        let mut model: Vec<u32> = Vec::new();
        for step in 0..10 {
            if mask & (1 << step) != 0 {
                v.push(step);
                model.push(step);
            } else {
                assert_eq!(v.pop(), model.pop());
            }
        }
        validate_vector(&v, &model);
    }
}

#[test]
fn crowded_slots_keep_bucket_lists_disjoint() {
    let mut m: Map<u32, u32, IdentityHash, NativeEq> = Map::with_slots(7);
    for i in 0..500u32 {
        *m.get_or_insert_default(i % 300) += 1;
        if i % 50 == 0 {
            validate_map(&m);
        }
    }
    assert_eq!(m.len(), 300);
    assert_eq!(m.chunk_count(), 300usize.div_ceil(CHUNK_SIZE));
    validate_map(&m);

    m.clear();
    validate_map(&m);
    m.insert(1, 1);
    validate_map(&m);
}
