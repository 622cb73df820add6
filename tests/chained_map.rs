// ChainedMap integration suite.
//
// Each test documents what behavior is being verified. The core
// invariants exercised:
// - Round trip: put(k, v) then get(k) yields v; contains(k) holds.
// - Removal: remove reports presence and changes len by exactly one.
// - Growth: crossing the 3/4 load factor doubles the bucket count and
//   loses no key.
// - Construction: explicit bucket counts must be powers of two.
// - Display: `{k: v}` over every entry, in unspecified order.
use dispatch_containers::{
    CapacityError, ChainedMap, Cursor, MapBehavior, MapTable, Vector, DEFAULT_MAP_CAPACITY,
};
use std::collections::BTreeSet;
use std::fmt;

// Test: text keys in an 8-bucket map.
// Verifies: get("b") == 2; remove("a") succeeds and "a" is then absent.
#[test]
fn text_keys_put_get_remove() {
    let mut m: ChainedMap<&str, i32> = ChainedMap::with_capacity(8);
    m.put("a", 1);
    m.put("b", 2);
    assert_eq!(m.get(&"b"), Some(&2));
    assert!(m.remove(&"a"));
    assert_eq!(m.get(&"a"), None);
    assert!(!m.contains(&"a"));
    assert_eq!(m.len(), 1);
}

// Test: explicit capacities.
// Verifies: 8 is accepted, 10 is rejected; the default is 16.
#[test]
fn capacity_must_be_power_of_two() {
    assert_eq!(ChainedMap::<u32, u32>::with_capacity(8).capacity(), 8);
    assert_eq!(
        ChainedMap::<u32, u32>::try_with_capacity(10).err(),
        Some(CapacityError::NotPowerOfTwo { capacity: 10 })
    );
    assert_eq!(ChainedMap::<u32, u32>::new().capacity(), DEFAULT_MAP_CAPACITY);
}

// Test: the fatal constructor path.
// Verifies: a non-power-of-two capacity yields no map.
#[test]
fn with_capacity_ten_is_fatal() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    let res = std::panic::catch_unwind(|| ChainedMap::<u32, u32>::with_capacity(10));
    assert!(res.is_err(), "capacity 10 must not produce a map");
}

// Test: remove on absent and present keys.
// Verifies: absent -> false with len unchanged; present -> true, len - 1.
#[test]
fn remove_changes_len_by_one() {
    let mut m: ChainedMap<u8, char> = ChainedMap::new();
    m.put(1, 'x');
    m.put(2, 'y');
    assert!(!m.remove(&3));
    assert_eq!(m.len(), 2);
    assert!(m.remove(&1));
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove_entry(&2), Some((2, 'y')));
    assert!(m.is_empty());
}

// Test: growth across several doublings.
// Verifies: every key inserted before each resize is still retrievable.
#[test]
fn resize_preserves_membership() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    let mut m: ChainedMap<String, usize> = ChainedMap::with_capacity(4);
    for i in 0..1000 {
        m.put(format!("key-{i}"), i);
        assert!(m.len() * 4 <= m.capacity() * 3 + 4);
    }
    assert_eq!(m.len(), 1000);
    assert_eq!(m.capacity(), 2048);
    for i in 0..1000 {
        assert_eq!(m.get(&format!("key-{i}")), Some(&i));
    }
}

// Test: clear keeps the bucket array.
// Verifies: len 0, same capacity, and put works without reconstruction.
#[test]
fn clear_then_put() {
    let mut m: ChainedMap<i32, i32> = (0..20).map(|i| (i, i * i)).collect();
    let cap = m.capacity();
    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), cap);
    m.put(4, 16);
    assert_eq!(m.get(&4), Some(&16));
}

// Test: traversal count law.
// Verifies: a fresh cursor visits exactly len entries, each once.
#[test]
fn traversal_visits_each_entry_once() {
    let m: ChainedMap<u64, u64> = (0..100u64).map(|i| (i * 7919, i)).collect();
    let mut c = m.cursor();
    let mut keys = BTreeSet::new();
    let mut visits = 0;
    while c.advance() {
        visits += 1;
        let k = *c.current_key().expect("positioned");
        assert_eq!(c.current_value(), Some(&(k / 7919)));
        keys.insert(k);
    }
    assert_eq!(visits, m.len());
    assert_eq!(keys.len(), m.len());
    assert_eq!(m.iter().count(), m.len());
}

// Test: display shape.
// Verifies: empty `{}`; entries as `key: value` pairs separated by ", ".
#[test]
fn display_shape() {
    let mut m: ChainedMap<&str, bool> = ChainedMap::new();
    assert_eq!(m.to_string(), "{}");
    m.put("only", true);
    assert_eq!(m.to_string(), "{\"only\": true}");
    m.put("other", false);
    let s = m.to_string();
    assert!(s.starts_with('{') && s.ends_with('}'));
    let parts: BTreeSet<&str> = s[1..s.len() - 1].split(", ").collect();
    assert_eq!(parts, BTreeSet::from(["\"only\": true", "\"other\": false"]));
}

// Test: values that are containers display nested.
#[test]
fn map_of_vectors_displays_nested() {
    let mut m: ChainedMap<&str, Vector<i32>> = ChainedMap::new();
    let mut v = Vector::new();
    v.push(1);
    v.push(2);
    m.put("class", v);
    if let Some(v) = m.get_mut(&"class") {
        v.push(3);
    }
    assert_eq!(m.to_string(), "{\"class\": [1, 2, 3]}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Point {
    x: i32,
    y: i32,
}

static POINTS: MapTable<Point, &str> = MapTable::<Point, &str>::new(
    |p| (p.x as u32).wrapping_mul(31) ^ (p.y as u32),
    |a, b| a == b,
    |p, f| write!(f, "({}, {})", p.x, p.y),
    |v, f| write!(f, "{v}"),
);

// Test: composite keys through an explicit dispatch table.
#[test]
fn composite_keys_use_explicit_table() {
    let mut m = ChainedMap::with_behavior(&POINTS);
    m.put(Point { x: 1, y: 2 }, "a");
    m.put(Point { x: 2, y: 1 }, "b");
    m.put(Point { x: 1, y: 2 }, "c");
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&Point { x: 1, y: 2 }), Some(&"c"));
    let m2: ChainedMap<Point, &str, _> = ChainedMap::with_capacity_and_behavior(2, &POINTS);
    assert!(m2.is_empty());
    assert!(core::ptr::eq(*m.behavior(), *m2.behavior()));
}

// Behavior implemented directly: case-insensitive ASCII keys.
struct Caseless;

impl MapBehavior<String, u32> for Caseless {
    fn hash(&self, key: &String) -> u32 {
        key.bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b.to_ascii_lowercase())))
    }
    fn key_eq(&self, a: &String, b: &String) -> bool {
        a.eq_ignore_ascii_case(b)
    }
    fn fmt_key(&self, key: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(key)
    }
    fn fmt_value(&self, value: &u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{value}")
    }
}

// Test: a user behavior type overrides hash and equality together.
#[test]
fn custom_behavior_type() {
    let mut m = ChainedMap::with_behavior(Caseless);
    m.put("Hello".to_string(), 1);
    m.put("HELLO".to_string(), 2);
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"hello".to_string()), Some(&2));
    assert_eq!(m.to_string(), "{Hello: 2}");
    m.free();
}

// Test: handles keep addressing their entry across growth.
#[test]
fn handle_outlives_resizes() {
    let mut m: ChainedMap<u32, &str> = ChainedMap::with_capacity(1);
    let h = m.put_handle(0, "zero");
    for i in 1..64 {
        m.put(i, "n");
    }
    assert_eq!(m.capacity(), 128);
    assert_eq!(h.value(&m), Some(&"zero"));
    assert!(m.remove(&0));
    assert_eq!(h.value(&m), None);
}
