#![cfg(test)]

// Property tests for ChainedMap kept inside the crate so they can inspect
// handles and bucket counts without widening the public surface.

use crate::chained_map::{ChainedMap, Handle};
use crate::dispatch::{Defaults, MapBehavior};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (u32, Vec<String>, Vec<OpI>)> {
    let pool = proptest::collection::vec("[a-z]{0,5}", 1..=24);
    (0u32..=5, pool).prop_flat_map(|(shift, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (shift, pool.clone(), ops))
    })
}

// Every key hashes to the same bucket.
#[derive(Clone, Copy)]
struct ConstHash;

impl MapBehavior<String, i32> for ConstHash {
    fn hash(&self, _key: &String) -> u32 {
        0
    }
    fn key_eq(&self, a: &String, b: &String) -> bool {
        a == b
    }
    fn fmt_key(&self, key: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{key:?}")
    }
    fn fmt_value(&self, value: &i32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{value}")
    }
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `put` inserts or updates; the replaced value matches the model.
// - A key keeps one stable Handle from insertion to removal, across resizes.
// - `remove` reports presence exactly; removed and cleared handles never resolve.
// - `iter` yields each live entry exactly once; `len` matches the model.
// - Bucket count stays a power of two and never drops below the entry count.
fn run_state_machine<B>(
    map: ChainedMap<String, i32, B>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    B: MapBehavior<String, i32>,
{
    let mut sut = map;
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let before = sut.find(&k);
                let h = sut.put_handle(k.clone(), v);
                let prev = model.insert(k.clone(), v);
                prop_assert_eq!(before.is_some(), prev.is_some());
                if let Some(tracked) = live.get(&k) {
                    prop_assert_eq!(*tracked, h, "update must keep the entry's handle");
                }
                live.insert(k, h);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.find(k), live.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    let v = h.value_mut(&mut sut);
                    prop_assert!(v.is_some(), "live handle should resolve");
                    if let Some(v) = v {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(mv) = model.get_mut(k) {
                        *mv = mv.wrapping_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let s: BTreeSet<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(sut.iter().count(), sut.len());
                prop_assert_eq!(s, m);
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
                prop_assert_eq!(sut.capacity(), cap);
            }
        }

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        for (k, &h) in &live {
            prop_assert_eq!(h.key(&sut), Some(k));
            prop_assert_eq!(h.value(&sut), model.get(k));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.len() <= sut.capacity());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((shift, pool, ops) in arb_scenario()) {
        let map = ChainedMap::with_capacity_and_behavior(1usize << shift, Defaults);
        run_state_machine(map, &pool, ops)?;
    }
}

// Same invariants under worst-case collisions: one chain holds every entry,
// stressing unlinking at head, middle and tail.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((shift, pool, ops) in arb_scenario()) {
        let map = ChainedMap::with_capacity_and_behavior(1usize << shift, ConstHash);
        run_state_machine(map, &pool, ops)?;
    }
}

// Growth never loses an entry: after inserting `n` distinct keys into a map
// of any power-of-two size, every key is retrievable and the bucket count is
// the smallest doubling that kept each pre-insert check under 3/4.
proptest! {
    #[test]
    fn prop_growth_preserves_membership(shift in 0u32..=6, n in 0usize..300) {
        let mut m: ChainedMap<usize, usize> = ChainedMap::with_capacity(1 << shift);
        let mut expected_cap = 1usize << shift;
        for i in 0..n {
            if i * 4 >= expected_cap * 3 {
                expected_cap *= 2;
            }
            m.put(i.wrapping_mul(2_654_435_761), i);
        }
        prop_assert_eq!(m.capacity(), expected_cap);
        prop_assert_eq!(m.len(), n);
        for i in 0..n {
            prop_assert_eq!(m.get(&i.wrapping_mul(2_654_435_761)), Some(&i));
        }
    }
}
