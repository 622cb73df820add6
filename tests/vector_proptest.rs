use dispatch_containers::{Cursor, Vector};
use proptest::prelude::*;

// Model Vector against std Vec across random operation sequences and
// assert contents, length and the capacity laws after every step.
proptest! {
    #[test]
    fn prop_vector_matches_vec(
        initial in 0usize..=12,
        ops in proptest::collection::vec((0u8..=7u8, 0usize..32usize, any::<i16>()), 1..120),
    ) {
        let mut v: Vector<i16> = Vector::with_capacity(initial);
        let mut model: Vec<i16> = Vec::new();
        let mut last_cap = v.capacity();

        for (op, raw_i, x) in ops {
            let i = if model.is_empty() { raw_i } else { raw_i % (model.len() + 1) };
            match op {
                0 | 1 => {
                    v.push(x);
                    model.push(x);
                }
                2 => prop_assert_eq!(v.pop(), model.pop()),
                3 => {
                    let res = v.insert(i, x);
                    if i <= model.len() {
                        prop_assert!(res.is_ok());
                        model.insert(i, x);
                    } else {
                        prop_assert!(res.is_err());
                    }
                }
                4 => {
                    let expected = (i < model.len()).then(|| model.remove(i));
                    prop_assert_eq!(v.remove(i), expected);
                }
                5 => {
                    let res = v.set(i, x);
                    if i < model.len() {
                        prop_assert_eq!(res.ok(), Some(model[i]));
                        model[i] = x;
                    } else {
                        prop_assert!(res.is_err());
                    }
                }
                6 => {
                    let expected = model.iter().position(|e| *e == x);
                    prop_assert_eq!(v.index_of(&x), expected);
                    prop_assert_eq!(v.remove_element(&x), expected.map(|p| model.remove(p)));
                }
                // Clear keeps capacity
                _ => {
                    v.clear();
                    model.clear();
                }
            }

            // Capacity never shrinks; it only changes by doubling (or 0 -> 1).
            let cap = v.capacity();
            prop_assert!(cap >= last_cap);
            if cap != last_cap {
                prop_assert!(cap == last_cap * 2 || (last_cap == 0 && cap == 1));
            }
            last_cap = cap;

            prop_assert!(v.len() <= v.capacity());
            prop_assert_eq!(v.len(), model.len());
            prop_assert_eq!(v.as_slice(), model.as_slice());
        }

        // A fresh cursor visits exactly len elements.
        let mut c = v.cursor();
        let mut visits = 0;
        while c.advance() {
            visits += 1;
        }
        prop_assert_eq!(visits, model.len());
        prop_assert!(c.current().is_none());
    }
}
