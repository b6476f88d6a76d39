//! Runtime frames

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// A call frame: a fixed set of slots and the lexically enclosing frame
#[derive(Debug, Default)]
pub struct Closure {
    values: RefCell<Vec<Value>>,
    parent: Option<Rc<Closure>>,
}

impl Closure {
    pub fn new(values: Vec<Value>, parent: Option<Rc<Closure>>) -> Rc<Closure> {
        Rc::new(Closure {
            values: RefCell::new(values),
            parent,
        })
    }

    /// A frame of `size` void slots
    pub fn with_size(size: usize, parent: Option<Rc<Closure>>) -> Rc<Closure> {
        Closure::new(vec![Value::Void; size], parent)
    }

    /// Read slot `index` of the frame `depth` levels up; void if missing
    pub fn get(&self, index: usize, depth: usize) -> Value {
        let mut frame = self;
        for _ in 0..depth {
            match &frame.parent {
                Some(parent) => frame = &**parent,
                None => return Value::Void,
            }
        }
        frame
            .values
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or(Value::Void)
    }

    /// Write a slot of this frame
    pub fn set(&self, index: usize, value: Value) {
        if let Some(slot) = self.values.borrow_mut().get_mut(index) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
