//! Persistent lists
//!
//! Lists are immutable. Concatenation and slicing build lazy views over
//! their operands once the result is larger than [`DUPLICATE_LENGTH`];
//! smaller results are copied into a plain vector.

use std::rc::Rc;

use crate::value::Value;

/// Results at or below this size are materialized instead of wrapped
pub const DUPLICATE_LENGTH: usize = 8;

#[derive(Debug)]
pub enum List {
    /// An owned, materialized sequence
    Basic(Vec<Value>),
    /// The logical concatenation of two lists
    Concat {
        head: Rc<List>,
        tail: Rc<List>,
        size: usize,
    },
    /// A contiguous range `start..end` of a base list
    Sublist {
        base: Rc<List>,
        start: usize,
        end: usize,
    },
}

thread_local! {
    static EMPTY: Rc<List> = Rc::new(List::Basic(Vec::new()));
}

impl List {
    /// The shared empty list
    pub fn empty() -> Rc<List> {
        EMPTY.with(Rc::clone)
    }

    pub fn from_values(values: Vec<Value>) -> Rc<List> {
        if values.is_empty() {
            List::empty()
        } else {
            Rc::new(List::Basic(values))
        }
    }

    pub fn size(&self) -> usize {
        match self {
            List::Basic(values) => values.len(),
            List::Concat { size, .. } => *size,
            List::Sublist { start, end, .. } => end - start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at `index`, or void when out of range
    pub fn get(&self, index: usize) -> Value {
        let mut list = self;
        let mut index = index;
        loop {
            if index >= list.size() {
                return Value::Void;
            }
            match list {
                List::Basic(values) => return values[index].clone(),
                List::Concat { head, tail, .. } => {
                    let head_size = head.size();
                    if index < head_size {
                        list = &**head;
                    } else {
                        index -= head_size;
                        list = &**tail;
                    }
                }
                List::Sublist { base, start, .. } => {
                    index += start;
                    list = &**base;
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.size()).map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<Value> {
        match self {
            List::Basic(values) => values.clone(),
            _ => self.iter().collect(),
        }
    }

    pub fn concat(a: &Rc<List>, b: &Rc<List>) -> Rc<List> {
        if a.is_empty() {
            return Rc::clone(b);
        }
        if b.is_empty() {
            return Rc::clone(a);
        }

        let size = a.size() + b.size();
        if size <= DUPLICATE_LENGTH {
            let values = a.iter().chain(b.iter()).collect();
            return Rc::new(List::Basic(values));
        }

        Rc::new(List::Concat {
            head: Rc::clone(a),
            tail: Rc::clone(b),
            size,
        })
    }

    /// Elements `start..end` of `list`, with both bounds clamped to its size
    pub fn sublist(list: &Rc<List>, start: usize, end: usize) -> Rc<List> {
        let end = end.min(list.size());
        let start = start.min(end);
        if start == 0 && end == list.size() {
            return Rc::clone(list);
        }
        if start == end {
            return List::empty();
        }

        if end - start <= DUPLICATE_LENGTH {
            let values = (start..end).map(|i| list.get(i)).collect();
            return Rc::new(List::Basic(values));
        }

        // Slicing a slice re-targets the underlying base
        if let List::Sublist { base, start: offset, .. } = &**list {
            return Rc::new(List::Sublist {
                base: Rc::clone(base),
                start: offset + start,
                end: offset + end,
            });
        }

        Rc::new(List::Sublist {
            base: Rc::clone(list),
            start,
            end,
        })
    }
}

impl Drop for List {
    fn drop(&mut self) {
        // Long concatenation chains would otherwise be freed recursively
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut list) = Rc::try_unwrap(child) {
                take_children(&mut list, &mut pending);
            }
        }
    }
}

fn take_children(list: &mut List, pending: &mut Vec<Rc<List>>) {
    // The shared empty list may already be gone while thread locals are torn down
    let placeholder = || {
        EMPTY
            .try_with(Rc::clone)
            .unwrap_or_else(|_| Rc::new(List::Basic(Vec::new())))
    };
    match list {
        List::Basic(_) => {}
        List::Concat { head, tail, .. } => {
            pending.push(std::mem::replace(head, placeholder()));
            pending.push(std::mem::replace(tail, placeholder()));
        }
        List::Sublist { base, .. } => pending.push(std::mem::replace(base, placeholder())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(range: std::ops::Range<i32>) -> Rc<List> {
        List::from_values(range.map(|n| Value::Number(n as f64)).collect())
    }

    fn as_numbers(list: &List) -> Vec<f64> {
        list.iter()
            .map(|v| match v {
                Value::Number(n) => n,
                other => panic!("expected number, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_small_concat_is_materialized() {
        let list = List::concat(&numbers(0..3), &numbers(3..5));
        assert!(matches!(*list, List::Basic(_)));
        assert_eq!(as_numbers(&list), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_large_concat_is_lazy() {
        let list = List::concat(&numbers(0..6), &numbers(6..12));
        assert!(matches!(*list, List::Concat { .. }));
        assert_eq!(list.size(), 12);
        assert_eq!(as_numbers(&list), (0..12).map(|n| n as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_materialization_threshold() {
        let at_limit = List::concat(&numbers(0..4), &numbers(4..8));
        assert!(matches!(*at_limit, List::Basic(_)));
        let over_limit = List::concat(&numbers(0..4), &numbers(4..9));
        assert!(matches!(*over_limit, List::Concat { .. }));
        assert_eq!(as_numbers(&over_limit), (0..9).map(|n| n as f64).collect::<Vec<_>>());

        let list = numbers(0..20);
        let eight = List::sublist(&list, 2, 10);
        assert!(matches!(*eight, List::Basic(_)));
        assert_eq!(eight.size(), DUPLICATE_LENGTH);
        let nine = List::sublist(&list, 2, 11);
        assert!(matches!(*nine, List::Sublist { .. }));
        assert_eq!(as_numbers(&nine), (2..11).map(|n| n as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_range_is_void() {
        let list = List::concat(&numbers(0..6), &numbers(6..12));
        assert!(matches!(list.get(12), Value::Void));
        assert!(matches!(List::empty().get(0), Value::Void));
    }

    #[test]
    fn test_sublist() {
        let list = numbers(0..20);
        let tail = List::sublist(&list, 5, 20);
        assert!(matches!(*tail, List::Sublist { .. }));
        assert_eq!(tail.size(), 15);

        let inner = List::sublist(&tail, 2, 14);
        assert_eq!(inner.size(), 12);
        assert_eq!(as_numbers(&inner)[0], 7.0);

        let small = List::sublist(&list, 18, 100);
        assert!(matches!(*small, List::Basic(_)));
        assert_eq!(as_numbers(&small), vec![18.0, 19.0]);

        assert!(List::sublist(&list, 30, 40).is_empty());
    }

    #[test]
    fn test_empty_list_is_shared() {
        assert!(Rc::ptr_eq(&List::empty(), &List::from_values(Vec::new())));
        let list = numbers(0..3);
        assert!(Rc::ptr_eq(&List::concat(&List::empty(), &list), &list));
    }

    #[test]
    fn test_drop_reuses_the_empty_list() {
        let before = Rc::strong_count(&List::empty());
        let list = List::concat(&numbers(0..6), &numbers(6..12));
        let held = Rc::clone(match &*list {
            List::Concat { head, .. } => head,
            _ => panic!("expected concat"),
        });
        drop(list);
        // The surviving child is untouched and no placeholder is retained
        assert_eq!(held.size(), 6);
        assert_eq!(Rc::strong_count(&List::empty()), before);
    }

    #[test]
    fn test_long_chain_drops() {
        let mut list = numbers(0..9);
        for n in 0..100_000 {
            list = List::concat(&list, &List::from_values(vec![Value::Number(n as f64)]));
        }
        assert_eq!(list.size(), 100_009);
        assert!(matches!(list.get(100_008), Value::Number(n) if n == 99_999.0));
        drop(list);
    }
}
